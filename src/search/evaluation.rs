// Ficheiro: src/search/evaluation.rs
// Descrição: Avaliação estática: material mais tabelas de casas (meio-jogo),
// sempre do ponto de vista do lado a jogar.

use super::Score;
use crate::core::bitboard::{popcount, BitboardExt};
use crate::core::position::Position;
use crate::core::types::*;

/// Função de avaliação usada pela busca.
pub type EvalFn = fn(&Position) -> Score;

// Tabelas desenhadas com a 8.ª fila no topo: uma peça branca em `sq` usa o
// índice `sq ^ 56`, uma preta usa `sq`.

#[rustfmt::skip]
const MG_PAWN: [i16; 64] = [
       0,    0,    0,    0,    0,    0,    0,    0,
      98,  134,   61,   95,   68,  126,   34,  -11,
      -6,    7,   26,   31,   65,   56,   25,  -20,
     -14,   13,    6,   21,   23,   12,   17,  -23,
     -27,   -2,   -5,   12,   17,    6,   10,  -25,
     -26,   -4,   -4,  -10,    3,    3,   33,  -12,
     -35,   -1,  -20,  -23,  -15,   24,   38,  -22,
       0,    0,    0,    0,    0,    0,    0,    0,
];

#[rustfmt::skip]
const MG_KNIGHT: [i16; 64] = [
    -167,  -89,  -34,  -49,   61,  -97,  -15, -107,
     -73,  -41,   72,   36,   23,   62,    7,  -17,
     -47,   60,   37,   65,   84,  129,   73,   44,
      -9,   17,   19,   53,   37,   69,   18,   22,
     -13,    4,   16,   13,   28,   19,   21,   -8,
     -23,   -9,   12,   10,   19,   17,   25,  -16,
     -29,  -53,  -12,   -3,   -1,   18,  -14,  -19,
    -105,  -21,  -58,  -33,  -17,  -28,  -19,  -23,
];

#[rustfmt::skip]
const MG_BISHOP: [i16; 64] = [
     -29,    4,  -82,  -37,  -25,  -42,    7,   -8,
     -26,   16,  -18,  -13,   30,   59,   18,  -47,
     -16,   37,   43,   40,   35,   50,   37,   -2,
      -4,    5,   19,   50,   37,   37,    7,   -2,
      -6,   13,   13,   26,   34,   12,   10,    4,
       0,   15,   15,   15,   14,   27,   18,   10,
       4,   15,   16,    0,    7,   21,   33,    1,
     -33,   -3,  -14,  -21,  -13,  -12,  -39,  -21,
];

#[rustfmt::skip]
const MG_ROOK: [i16; 64] = [
      32,   42,   32,   51,   63,    9,   31,   43,
      27,   32,   58,   62,   80,   67,   26,   44,
      -5,   19,   26,   36,   17,   45,   61,   16,
     -24,  -11,    7,   26,   24,   35,   -8,  -20,
     -36,  -26,  -12,   -1,    9,   -7,    6,  -23,
     -45,  -25,  -16,  -17,    3,    0,   -5,  -33,
     -44,  -16,  -20,   -9,   -1,   11,   -6,  -71,
     -19,  -13,    1,   17,   16,    7,  -37,  -26,
];

#[rustfmt::skip]
const MG_QUEEN: [i16; 64] = [
     -28,    0,   29,   12,   59,   44,   43,   45,
     -24,  -39,   -5,    1,  -16,   57,   28,   54,
     -13,  -17,    7,    8,   29,   56,   47,   57,
     -27,  -27,  -16,  -16,   -1,   17,   -2,    1,
      -9,  -26,   -9,  -10,   -2,   -4,    3,   -3,
     -14,    2,  -11,   -2,   -5,    2,   14,    5,
     -35,   -8,   11,    2,    8,   15,   -3,    1,
      -1,  -18,   -9,   10,  -15,  -25,  -31,  -50,
];

#[rustfmt::skip]
const MG_KING: [i16; 64] = [
     -65,   23,   16,  -15,  -56,  -34,    2,   13,
      29,   -1,  -20,   -7,   -8,   -4,  -38,  -29,
      -9,   24,    2,  -16,  -20,    6,   22,  -22,
     -17,  -20,  -12,  -27,  -30,  -25,  -14,  -36,
     -49,   -1,  -27,  -39,  -46,  -44,  -33,  -51,
     -14,  -14,  -22,  -46,  -44,  -30,  -15,  -27,
       1,    7,   -8,  -64,  -43,  -16,    9,    8,
     -15,   36,   12,  -54,    8,  -28,   24,   14,
];

const TABLES: [&[i16; 64]; 6] = [&MG_PAWN, &MG_KNIGHT, &MG_BISHOP, &MG_ROOK, &MG_QUEEN, &MG_KING];

#[inline(always)]
fn table_index(color: Color, square: Square) -> usize {
    match color {
        Color::White => (square ^ 56) as usize,
        Color::Black => square as usize,
    }
}

/// Diferença material (Q 900, R 500, B 300, N 300, P 100) para o lado a jogar.
pub fn mat_eval(pos: &Position) -> Score {
    let us = pos.turn();
    let them = !us;
    [PieceKind::Pawn, PieceKind::Knight, PieceKind::Bishop, PieceKind::Rook, PieceKind::Queen]
        .into_iter()
        .map(|kind| {
            let diff = popcount(pos.pieces(us, kind)) as Score - popcount(pos.pieces(them, kind)) as Score;
            diff * kind.value()
        })
        .sum()
}

fn placement(pos: &Position, color: Color) -> Score {
    let mut score = 0;
    for kind in PieceKind::ALL {
        let table = TABLES[kind.index()];
        for square in pos.pieces(color, kind).squares() {
            score += table[table_index(color, square)] as Score;
        }
    }
    score
}

/// Material mais tabelas de casas.
pub fn static_eval(pos: &Position) -> Score {
    let us = pos.turn();
    mat_eval(pos) + placement(pos, us) - placement(pos, !us)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_startpos_is_balanced() {
        let pos = Position::startpos();
        assert_eq!(mat_eval(&pos), 0);
        assert_eq!(static_eval(&pos), 0);
    }

    #[test]
    fn test_scores_are_side_relative() {
        // Brancas com uma torre a mais
        let white = Position::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 0 1").expect("FEN");
        let black = Position::from_fen("4k3/8/8/8/8/8/8/R3K3 b - - 0 1").expect("FEN");
        assert_eq!(mat_eval(&white), 500);
        assert_eq!(mat_eval(&black), -500);
        assert_eq!(static_eval(&white), -static_eval(&black));
    }

    #[test]
    fn test_mirrored_positions_score_equal() {
        let a = Position::from_fen("4k3/8/8/8/3N4/8/8/4K3 w - - 0 1").expect("FEN");
        let b = Position::from_fen("4k3/8/8/3n4/8/8/8/4K3 b - - 0 1").expect("FEN");
        assert_eq!(static_eval(&a), static_eval(&b));
    }

    #[test]
    fn test_advanced_pawn_is_rewarded() {
        let home = Position::from_fen("4k3/8/8/8/8/8/4P3/4K3 w - - 0 1").expect("FEN");
        let advanced = Position::from_fen("4k3/8/4P3/8/8/8/8/4K3 w - - 0 1").expect("FEN");
        assert!(static_eval(&advanced) > static_eval(&home));
    }
}
