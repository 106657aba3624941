pub mod bitboard;
pub mod error;
pub mod fen;
pub mod game;
pub mod position;
pub mod types;
pub mod zobrist;

pub use bitboard::{Bitboard, BitboardExt};
pub use error::*;
pub use game::*;
pub use position::*;
pub use types::*;
pub use zobrist::*;
