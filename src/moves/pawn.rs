// Ficheiro: src/moves/pawn.rs
// Descrição: Ataques e lances de peão: avanços, capturas, promoções e en passant.

use super::movegen::GenType;
use super::move_list::MoveList;
use crate::core::bitboard::*;
use crate::core::position::Position;
use crate::core::types::*;

const fn generate_pawn_attacks_table() -> [[Bitboard; 64]; 2] {
    let mut attacks = [[0u64; 64]; 2];
    let mut square = 0;

    while square < 64 {
        let bb = 1u64 << square;
        attacks[0][square] = north_east(bb) | north_west(bb);
        attacks[1][square] = south_east(bb) | south_west(bb);
        square += 1;
    }

    attacks
}

/// [cor][casa]: casas atacadas por um peão dessa cor nessa casa.
static PAWN_ATTACKS: [[Bitboard; 64]; 2] = generate_pawn_attacks_table();

#[inline(always)]
pub fn pawn_attacks(color: Color, square: Square) -> Bitboard {
    PAWN_ATTACKS[color.index()][square as usize]
}

const PROMOTION_PIECES: [PieceKind; 3] = [PieceKind::Knight, PieceKind::Rook, PieceKind::Bishop];

/// Emite as promoções de um peão. A promoção a dama pertence à fase de capturas;
/// as sub-promoções sem captura à fase de lances silenciosos.
#[inline]
fn push_promotions<G: GenType>(list: &mut MoveList, from: Square, to: Square, captured: Option<PieceKind>) {
    if G::CAPTURES || G::TACTICALS {
        list.push(Move::promotion(from, to, PieceKind::Queen, captured));
    }
    if captured.is_some() || G::QUIETS || G::TACTICALS {
        for kind in PROMOTION_PIECES {
            list.push(Move::promotion(from, to, kind, captured));
        }
    }
}

/// Lances de peão para o lado a jogar. `evasion` restringe os destinos quando o
/// rei está em xeque (FULL caso contrário); o en passant não é restringido.
pub fn generate_pawn_moves<G: GenType>(pos: &Position, list: &mut MoveList, evasion: Bitboard) {
    let us = pos.turn();
    let them = !us;
    let pawns = pos.pieces(us, PieceKind::Pawn);
    if pawns == 0 {
        return;
    }
    let empties = !pos.occupied();
    let enemies = pos.color_bb(them) & !pos.pieces(them, PieceKind::King);

    // Deslocamentos (em casas) do avanço e das duas capturas
    let (up, up_west, up_east, promo_rank, third_rank) = match us {
        Color::White => (8i8, 7i8, 9i8, RANK_8, RANK_3),
        Color::Black => (-8, -9, -7, RANK_1, RANK_6),
    };
    let shift_up = |bb: Bitboard| if us == Color::White { north(bb) } else { south(bb) };
    let shift_west = |bb: Bitboard| if us == Color::White { north_west(bb) } else { south_west(bb) };
    let shift_east = |bb: Bitboard| if us == Color::White { north_east(bb) } else { south_east(bb) };
    let origin = |to: Square, delta: i8| (to as i8 - delta) as Square;

    if G::CAPTURES || G::TACTICALS {
        for (attacked, delta) in [(shift_west(pawns), up_west), (shift_east(pawns), up_east)] {
            let targets = attacked & enemies & evasion;

            for to in (targets & promo_rank).squares() {
                let victim = pos.kind_on(to, them);
                push_promotions::<G>(list, origin(to, delta), to, victim);
            }
            for to in (targets & !promo_rank).squares() {
                if let Some(victim) = pos.kind_on(to, them) {
                    list.push(Move::capture(origin(to, delta), to, PieceKind::Pawn, victim));
                }
            }

            if let Some(ep) = pos.en_passant() {
                if attacked & square_bb(ep) != 0 {
                    list.push(Move::en_passant(origin(ep, delta), ep));
                }
            }
        }

        for to in (shift_up(pawns) & empties & evasion & promo_rank).squares() {
            push_promotions::<G>(list, origin(to, up), to, None);
        }
    }

    if G::QUIETS {
        let single = shift_up(pawns) & empties;

        for to in (single & evasion & promo_rank).squares() {
            push_promotions::<G>(list, origin(to, up), to, None);
        }
        for to in (single & evasion & !promo_rank).squares() {
            list.push(Move::quiet(origin(to, up), to, PieceKind::Pawn));
        }

        let double = shift_up(single & third_rank) & empties & evasion;
        for to in double.squares() {
            list.push(Move::quiet(origin(to, 2 * up), to, PieceKind::Pawn));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pawn_attacks_clip_edges() {
        assert_eq!(pawn_attacks(Color::White, 8), square_bb(17)); // a2 -> b3
        assert_eq!(pawn_attacks(Color::White, 15), square_bb(22)); // h2 -> g3
        assert_eq!(pawn_attacks(Color::Black, 52), square_bb(43) | square_bb(45)); // e7
        assert_eq!(pawn_attacks(Color::White, 60), 0);
    }
}
