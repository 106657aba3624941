// Ficheiro: src/search/heuristics.rs
// Descrição: Killers por ply, countermoves e tabela de história. Estado de uma
// instância de `Search`, limpo entre partidas.

use super::{Depth, MAX_PLY};
use crate::core::types::{Color, Move};

const HISTORY_MAX: i32 = 1 << 20;

pub struct OrderingHeuristics {
    killers: [Move; MAX_PLY + 1],
    /// [lado][peça do lance anterior][destino do lance anterior]
    countermoves: [[[Move; 64]; 6]; 2],
    /// [lado][origem][destino]
    history: [[[i32; 64]; 64]; 2],
}

impl OrderingHeuristics {
    pub fn new() -> Self {
        OrderingHeuristics {
            killers: [Move::NULL; MAX_PLY + 1],
            countermoves: [[[Move::NULL; 64]; 6]; 2],
            history: [[[0; 64]; 64]; 2],
        }
    }

    pub fn clear(&mut self) {
        *self = Self::new();
    }

    #[inline]
    pub fn killer(&self, ply: usize) -> Move {
        self.killers[ply]
    }

    #[inline]
    pub fn clear_killer(&mut self, ply: usize) {
        if ply <= MAX_PLY {
            self.killers[ply] = Move::NULL;
        }
    }

    /// Resposta guardada para o lance anterior `previous` (nula se não houver).
    #[inline]
    pub fn countermove(&self, side: Color, previous: Move) -> Move {
        if previous.is_null() {
            return Move::NULL;
        }
        self.countermoves[side.index()][previous.performer().index()][previous.to() as usize]
    }

    #[inline]
    pub fn history(&self, side: Color, mv: Move) -> i32 {
        self.history[side.index()][mv.from() as usize][mv.to() as usize]
    }

    /// Regista um corte beta. Killer e história só para lances silenciosos que
    /// não sejam promoção a dama.
    pub fn update_on_cutoff(&mut self, side: Color, mv: Move, previous: Move, depth: Depth, ply: usize) {
        if mv.is_capture() || mv.is_queen_promotion() {
            return;
        }

        self.killers[ply] = mv;
        if !previous.is_null() {
            self.countermoves[side.index()][previous.performer().index()][previous.to() as usize] = mv;
        }

        let entry = &mut self.history[side.index()][mv.from() as usize][mv.to() as usize];
        *entry += depth * depth;
        if *entry > HISTORY_MAX {
            self.age_history();
        }
    }

    fn age_history(&mut self) {
        self.history
            .iter_mut()
            .flatten()
            .flatten()
            .for_each(|value| *value /= 2);
    }
}

impl Default for OrderingHeuristics {
    fn default() -> Self {
        Self::new()
    }
}
