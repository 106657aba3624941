// Ficheiro: src/engine/tt.rs
// Descrição: Tabela de transposição de tamanho fixo com substituição sempre.

use crate::core::types::Move;
use crate::search::{score_from_tt, score_to_tt, Depth, Score};

/// Tipo de limite guardado numa entrada.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum Bound {
    #[default]
    None,
    Exact,
    /// Falhou alto: o valor real é >= à pontuação guardada.
    Lower,
    /// Nenhum lance melhorou alpha: o valor real é <= à pontuação guardada.
    Upper,
}

/// Entrada de 16 bytes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TTEntry {
    pub key: u64,
    pub best_move: Move,
    pub score: i16,
    pub depth: u8,
    pub bound: Bound,
}

/// Resultado de uma consulta com chave coincidente.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TTHit {
    pub best_move: Move,
    pub depth: u8,
    pub bound: Bound,
    /// Pontuação guardada, já ajustada ao ply de quem consulta.
    pub score: Score,
    /// Valor a devolver se a entrada permite um corte.
    pub cutoff: Option<Score>,
}

pub const DEFAULT_HASH_MB: usize = 128;

/// Tabela indexada por `key & (len - 1)`. Uma escrita substitui sempre a entrada
/// do balde; uma chave diferente no balde é tratada como falha.
pub struct TranspositionTable {
    entries: Vec<TTEntry>,
    mask: usize,
}

impl TranspositionTable {
    pub fn new(size_mb: usize) -> Self {
        let mut tt = TranspositionTable { entries: Vec::new(), mask: 0 };
        tt.resize(size_mb);
        tt
    }

    /// Número de entradas para um orçamento em MB, arredondado à potência de
    /// dois inferior.
    pub fn entries_for(size_mb: usize) -> usize {
        let wanted = (size_mb * 1024 * 1024 / std::mem::size_of::<TTEntry>()).max(1);
        1usize << (usize::BITS - 1 - wanted.leading_zeros())
    }

    /// Realoca a tabela (o conteúdo é perdido).
    pub fn resize(&mut self, size_mb: usize) {
        let count = Self::entries_for(size_mb);
        self.entries = vec![TTEntry::default(); count];
        self.mask = count - 1;
        log::info!("tabela de transposição: {} MB, {} entradas", size_mb, count);
    }

    pub fn clear(&mut self) {
        self.entries.fill(TTEntry::default());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline(always)]
    fn index(&self, key: u64) -> usize {
        key as usize & self.mask
    }

    pub fn write(&mut self, key: u64, depth: Depth, ply: usize, bound: Bound, score: Score, best_move: Move) {
        let index = self.index(key);
        self.entries[index] = TTEntry {
            key,
            best_move,
            score: score_to_tt(score, ply) as i16,
            depth: depth.clamp(0, u8::MAX as Depth) as u8,
            bound,
        };
    }

    /// `None` se a chave não coincide. Com chave coincidente devolve sempre a
    /// entrada (o lance serve para ordenação); `cutoff` só é preenchido se a
    /// profundidade guardada chega e o limite permite cortar com [alpha, beta].
    pub fn probe(&self, key: u64, alpha: Score, beta: Score, depth: Depth, ply: usize) -> Option<TTHit> {
        let entry = &self.entries[self.index(key)];
        if entry.key != key || entry.bound == Bound::None {
            return None;
        }

        let score = score_from_tt(entry.score as Score, ply);
        let cutoff = if (entry.depth as Depth) < depth {
            None
        } else {
            match entry.bound {
                Bound::Exact => Some(score),
                Bound::Lower if score >= beta => Some(beta),
                Bound::Upper if score <= alpha => Some(alpha),
                _ => None,
            }
        };

        Some(TTHit {
            best_move: entry.best_move,
            depth: entry.depth,
            bound: entry.bound,
            score,
            cutoff,
        })
    }

    /// Ocupação estimada em permilagem (amostra das primeiras 1000 entradas).
    pub fn hashfull(&self) -> usize {
        let sample = self.entries.len().min(1000);
        if sample == 0 {
            return 0;
        }
        let used = self.entries[..sample].iter().filter(|e| e.bound != Bound::None).count();
        used * 1000 / sample
    }
}

impl Default for TranspositionTable {
    fn default() -> Self {
        Self::new(DEFAULT_HASH_MB)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::PieceKind;
    use crate::search::{mated_in, INFINITY};

    #[test]
    fn test_entry_size() {
        assert_eq!(std::mem::size_of::<TTEntry>(), 16);
    }

    #[test]
    fn test_size_is_power_of_two() {
        assert_eq!(TranspositionTable::entries_for(1), 65_536);
        assert_eq!(TranspositionTable::entries_for(3), 131_072);
        assert_eq!(TranspositionTable::entries_for(0), 1);
        let tt = TranspositionTable::new(2);
        assert!(tt.len().is_power_of_two());
    }

    #[test]
    fn test_exact_hit_and_miss() {
        let mut tt = TranspositionTable::new(1);
        let mv = Move::quiet(12, 28, PieceKind::Pawn);
        tt.write(0xdead_beef, 5, 0, Bound::Exact, 42, mv);

        let hit = tt.probe(0xdead_beef, -INFINITY, INFINITY, 5, 0).expect("entrada");
        assert_eq!(hit.cutoff, Some(42));
        assert_eq!(hit.best_move, mv);

        // Profundidade insuficiente: entrada devolvida, sem corte
        let shallow = tt.probe(0xdead_beef, -INFINITY, INFINITY, 6, 0).expect("entrada");
        assert_eq!(shallow.cutoff, None);
        assert_eq!(shallow.best_move, mv);

        // Mesma posição na tabela, chave diferente: colisão tratada como falha
        let colliding = 0xdead_beef ^ ((tt.len() as u64) << 4);
        assert!(tt.probe(colliding, -INFINITY, INFINITY, 1, 0).is_none());
    }

    #[test]
    fn test_bound_cutoffs() {
        let mut tt = TranspositionTable::new(1);
        tt.write(1, 4, 0, Bound::Lower, 300, Move::NULL);
        assert_eq!(tt.probe(1, 0, 200, 4, 0).and_then(|h| h.cutoff), Some(200));
        assert_eq!(tt.probe(1, 0, 400, 4, 0).and_then(|h| h.cutoff), None);

        tt.write(2, 4, 0, Bound::Upper, -50, Move::NULL);
        assert_eq!(tt.probe(2, 0, 100, 4, 0).and_then(|h| h.cutoff), Some(0));
        assert_eq!(tt.probe(2, -100, 100, 4, 0).and_then(|h| h.cutoff), None);
    }

    #[test]
    fn test_mate_score_is_ply_independent() {
        let mut tt = TranspositionTable::new(1);
        // Mate encontrado no ply 3, três plies abaixo deste nó (mate no ply 6)
        let score = -mated_in(6);
        tt.write(7, 10, 3, Bound::Exact, score, Move::NULL);
        assert_eq!(tt.probe(7, -INFINITY, INFINITY, 10, 3).and_then(|h| h.cutoff), Some(score));
        // O mesmo nó alcançado no ply 5 fica a mate no ply 8
        assert_eq!(tt.probe(7, -INFINITY, INFINITY, 10, 5).and_then(|h| h.cutoff), Some(-mated_in(8)));
    }

    #[test]
    fn test_always_replace_and_clear() {
        let mut tt = TranspositionTable::new(1);
        tt.write(9, 20, 0, Bound::Exact, 1, Move::NULL);
        tt.write(9, 1, 0, Bound::Exact, 2, Move::NULL);
        assert_eq!(tt.probe(9, -INFINITY, INFINITY, 1, 0).map(|h| h.score), Some(2));
        assert!(tt.hashfull() <= 1000);
        tt.clear();
        assert!(tt.probe(9, -INFINITY, INFINITY, 1, 0).is_none());
    }
}
