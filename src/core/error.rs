// Ficheiro: src/core/error.rs
// Descrição: Erros de entrada externa (FEN e lances em texto).

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FenError {
    #[error("FEN vazio")]
    Empty,
    #[error("esperados 4 a 6 campos, encontrados {0}")]
    FieldCount(usize),
    #[error("disposição das peças inválida: {0}")]
    Placement(String),
    #[error("peça desconhecida '{0}'")]
    UnknownPiece(char),
    #[error("lado a jogar inválido '{0}'")]
    SideToMove(String),
    #[error("direitos de roque inválidos '{0}'")]
    Castling(String),
    #[error("casa de en passant inválida '{0}'")]
    EnPassant(String),
    #[error("contador de lances inválido '{0}'")]
    Counter(String),
    #[error("cada lado precisa de exatamente um rei")]
    Kings,
    #[error("o lado que não joga está em xeque")]
    OpponentInCheck,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveParseError {
    #[error("notação de lance inválida '{0}'")]
    Malformed(String),
    #[error("lance ilegal nesta posição '{0}'")]
    Illegal(String),
}
