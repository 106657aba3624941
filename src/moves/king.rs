// Ficheiro: src/moves/king.rs
// Descrição: Tabela de ataques e geração de lances do Rei, incluindo roques.

use super::movegen::{push_targets, GenType};
use super::move_list::MoveList;
use crate::core::bitboard::*;
use crate::core::position::Position;
use crate::core::types::*;

/// Gera a tabela de ataques de rei com os deslocamentos de um passo.
const fn generate_king_attacks_table() -> [Bitboard; 64] {
    let mut attacks = [0u64; 64];
    let mut square = 0;

    while square < 64 {
        let bb = 1u64 << square;
        let sides = east(bb) | west(bb);
        let row = bb | sides;
        attacks[square] = sides | north(row) | south(row);
        square += 1;
    }

    attacks
}

/// Tabela pré-calculada de ataques de rei para cada casa do tabuleiro.
static KING_ATTACKS: [Bitboard; 64] = generate_king_attacks_table();

#[inline(always)]
pub fn king_attacks(square: Square) -> Bitboard {
    KING_ATTACKS[square as usize]
}

/// Lances do rei. As casas adjacentes ao rei adversário nunca são geradas;
/// os roques só aparecem quando se geram lances silenciosos.
pub fn generate_king_moves<G: GenType>(pos: &Position, list: &mut MoveList, targets: Bitboard, in_check: bool) {
    let us = pos.turn();
    let from = pos.king_square(us);
    let enemy_king = pos.king_square(!us);
    let destinations = king_attacks(from) & targets & !king_attacks(enemy_king);
    push_targets(pos, list, PieceKind::King, from, destinations, !G::QUIETS);

    if G::QUIETS && !in_check {
        let (short_to, long_to) = match us {
            Color::White => (G1, C1),
            Color::Black => (G8, C8),
        };
        if pos.can_castle(us, true) {
            list.push(Move::castle(from, short_to, true));
        }
        if pos.can_castle(us, false) {
            list.push(Move::castle(from, long_to, false));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_king_attack_counts() {
        assert_eq!(popcount(king_attacks(0)), 3);
        assert_eq!(popcount(king_attacks(63)), 3);
        assert_eq!(popcount(king_attacks(4)), 5);
        assert_eq!(popcount(king_attacks(27)), 8);
        assert_eq!(king_attacks(7), square_bb(6) | square_bb(14) | square_bb(15));
    }
}
