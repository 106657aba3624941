// Ficheiro: src/search/quiescence.rs
// Descrição: Busca quiescente: só capturas (e promoções a dama) a partir das
// folhas da busca principal, para não avaliar a meio de uma troca.

use super::alpha_beta::Search;
use super::move_ordering::OrderKind;
use super::{Score, MAX_PLY};
use crate::core::position::{IrreversibleState, Position};
use crate::core::types::Move;

impl Search {
    /// Alpha-beta fail-hard sobre capturas, com avaliação estática como
    /// stand-pat. `None` se a busca foi interrompida.
    pub(crate) fn quiesce(&mut self, pos: &mut Position, mut alpha: Score, beta: Score, ply: usize) -> Option<Score> {
        self.pv_len[ply] = ply;
        self.nodes += 1;
        if self.should_abort() {
            return None;
        }

        let stand_pat = (self.evaluate)(pos);
        if ply >= MAX_PLY {
            return Some(stand_pat);
        }
        if stand_pat >= beta {
            return Some(beta);
        }
        if stand_pat > alpha {
            alpha = stand_pat;
        }

        self.tree[ply].reset(OrderKind::Quiescent, Move::NULL, Move::NULL, Move::NULL);
        let mut state = IrreversibleState::default();

        while let Some(mv) = self.tree[ply].next_move(pos, &self.heuristics) {
            // Casa onde a troca perde material
            if self.config.see_pruning && !mv.is_promotion() && pos.static_exchange_eval(mv.to()) < 0 {
                continue;
            }

            if !pos.make(mv, &mut state) {
                pos.unmake(mv, &state);
                continue;
            }
            let result = self.quiesce(pos, -beta, -alpha, ply + 1);
            pos.unmake(mv, &state);
            let score = -result?;

            if score >= beta {
                return Some(beta);
            }
            if score > alpha {
                alpha = score;
            }
        }

        Some(alpha)
    }
}
