// Ficheiro: src/moves/sliding.rs
// Descrição: Lógica para gerar os lances de peças deslizantes (Bispos, Torres e Damas).

use super::magic_bitboards::{get_bishop_attacks, get_queen_attacks, get_rook_attacks};
use super::movegen::push_targets;
use super::move_list::MoveList;
use crate::core::bitboard::*;
use crate::core::position::Position;
use crate::core::types::PieceKind;

/// Função genérica para gerar lances de Bispos, Torres e Damas.
pub fn generate_sliding_moves(
    pos: &Position,
    list: &mut MoveList,
    kind: PieceKind,
    targets: Bitboard,
    captures: bool,
) {
    let occupancy = pos.occupied();

    for from in pos.pieces(pos.turn(), kind).squares() {
        let attacks = match kind {
            PieceKind::Bishop => get_bishop_attacks(from, occupancy),
            PieceKind::Rook => get_rook_attacks(from, occupancy),
            PieceKind::Queen => get_queen_attacks(from, occupancy),
            _ => 0, // Não deve acontecer para esta função
        };
        push_targets(pos, list, kind, from, attacks & targets, captures);
    }
}
