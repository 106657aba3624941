// Ficheiro: src/engine/mod.rs
// Descrição: Tabela de transposição e ferramentas de perft.

pub mod perft;
pub mod tt;

pub use perft::*;
pub use tt::*;
