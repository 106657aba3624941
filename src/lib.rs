// Folha - motor de xadrez em bitboards

pub mod core;
pub mod engine;
pub mod moves;
pub mod search;

pub use self::core::*;
