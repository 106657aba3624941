// Ficheiro: src/moves/move_list.rs
// Descrição: Buffer de lances de capacidade fixa, com pontuações para ordenação.

use crate::core::types::Move;

/// Limite superior de lances pseudo-legais numa posição alcançável.
pub const MAX_MOVES: usize = 256;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoredMove {
    pub mv: Move,
    pub score: i32,
}

/// Lista de lances sem alocação. `push` nunca limpa a lista: o gerador acrescenta
/// e é o chamador que decide quando limpar.
#[derive(Clone)]
pub struct MoveList {
    entries: [ScoredMove; MAX_MOVES],
    len: usize,
}

impl MoveList {
    pub fn new() -> Self {
        MoveList {
            entries: [ScoredMove::default(); MAX_MOVES],
            len: 0,
        }
    }

    #[inline(always)]
    pub fn clear(&mut self) {
        self.len = 0;
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline(always)]
    pub fn push(&mut self, mv: Move) {
        self.push_scored(mv, 0);
    }

    #[inline(always)]
    pub fn push_scored(&mut self, mv: Move, score: i32) {
        debug_assert!(self.len < MAX_MOVES, "MoveList cheia");
        self.entries[self.len] = ScoredMove { mv, score };
        self.len += 1;
    }

    #[inline(always)]
    pub fn get(&self, index: usize) -> Move {
        self.entries[index].mv
    }

    #[inline(always)]
    pub fn entry(&self, index: usize) -> ScoredMove {
        self.entries[index]
    }

    #[inline(always)]
    pub fn set_score(&mut self, index: usize, score: i32) {
        self.entries[index].score = score;
    }

    pub fn contains(&self, mv: Move) -> bool {
        self.as_slice().iter().any(|e| e.mv == mv)
    }

    pub fn as_slice(&self) -> &[ScoredMove] {
        &self.entries[..self.len]
    }

    pub fn iter(&self) -> impl Iterator<Item = Move> + '_ {
        self.as_slice().iter().map(|e| e.mv)
    }

    /// Ordena por pontuação decrescente a partir de `start` (sem alocar).
    pub fn sort_from(&mut self, start: usize) {
        self.entries[start..self.len].sort_unstable_by(|a, b| b.score.cmp(&a.score));
    }

    /// Ordenação parcial: traz para `index` a melhor entrada de `index..len`
    /// e devolve-a. Em empate fica a primeira encontrada.
    pub fn pick_best(&mut self, index: usize) -> ScoredMove {
        let mut best = index;
        for i in index + 1..self.len {
            if self.entries[i].score > self.entries[best].score {
                best = i;
            }
        }
        self.entries.swap(index, best);
        self.entries[index]
    }
}

impl Default for MoveList {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MoveList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}
