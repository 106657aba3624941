// Ficheiro: src/moves/mod.rs
// Descrição: Declara os submódulos para a geração de lances de cada peça e
// expõe as tabelas de ataque.

pub mod king;
pub mod knight;
pub mod magic_bitboards;
pub mod move_list;
pub mod movegen;
pub mod pawn;
pub mod sliding;

pub use king::king_attacks;
pub use knight::knight_attacks;
pub use magic_bitboards::{between, get_bishop_attacks, get_queen_attacks, get_rook_attacks, init_magic_bitboards};
pub use move_list::{MoveList, ScoredMove, MAX_MOVES};
pub use movegen::{generate_pseudo_legal_moves, All, Captures, GenType, Quiets, Tacticals};
pub use pawn::pawn_attacks;
