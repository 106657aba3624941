// Ficheiro: src/moves/knight.rs
// Descrição: Tabela de ataques e geração de lances dos cavalos.

use super::movegen::push_targets;
use super::move_list::MoveList;
use crate::core::bitboard::*;
use crate::core::position::Position;
use crate::core::types::{PieceKind, Square};

/// Gera a tabela de ataques de cavalo com os deslocamentos protegidos nas bordas.
const fn generate_knight_attacks_table() -> [Bitboard; 64] {
    let mut attacks = [0u64; 64];
    let mut square = 0;

    while square < 64 {
        let bb = 1u64 << square;
        attacks[square] = ((bb << 17) & NOT_A_FILE)
            | ((bb << 15) & NOT_H_FILE)
            | ((bb << 10) & NOT_AB_FILE)
            | ((bb << 6) & NOT_GH_FILE)
            | ((bb >> 17) & NOT_H_FILE)
            | ((bb >> 15) & NOT_A_FILE)
            | ((bb >> 10) & NOT_GH_FILE)
            | ((bb >> 6) & NOT_AB_FILE);
        square += 1;
    }

    attacks
}

/// Tabela pré-calculada de ataques de cavalo para cada casa do tabuleiro.
static KNIGHT_ATTACKS: [Bitboard; 64] = generate_knight_attacks_table();

#[inline(always)]
pub fn knight_attacks(square: Square) -> Bitboard {
    KNIGHT_ATTACKS[square as usize]
}

/// Lances de cavalo para as casas em `targets` (já mascaradas pelo chamador).
pub fn generate_knight_moves(pos: &Position, list: &mut MoveList, targets: Bitboard, captures: bool) {
    for from in pos.pieces(pos.turn(), PieceKind::Knight).squares() {
        push_targets(pos, list, PieceKind::Knight, from, knight_attacks(from) & targets, captures);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_knight_attack_counts() {
        assert_eq!(popcount(knight_attacks(0)), 2); // a1
        assert_eq!(popcount(knight_attacks(7)), 2); // h1
        assert_eq!(popcount(knight_attacks(9)), 4); // b2
        assert_eq!(popcount(knight_attacks(27)), 8); // d4
        assert_eq!(knight_attacks(0), square_bb(10) | square_bb(17));
    }
}
