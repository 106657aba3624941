// Ficheiro: src/engine/perft.rs
// Descrição: Contagem de nós (perft) para validar o gerador e o make/unmake.

use crate::core::position::{IrreversibleState, Position};
use crate::core::types::Move;
use crate::moves::{generate_pseudo_legal_moves, All, MoveList};
use rayon::prelude::*;
use std::collections::HashMap;

/// Número de folhas legais a `depth` plies.
pub fn perft(pos: &mut Position, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let mut list = MoveList::new();
    generate_pseudo_legal_moves::<All>(pos, &mut list);
    let mut state = IrreversibleState::default();
    let mut nodes = 0;

    for mv in list.iter() {
        if pos.make(mv, &mut state) {
            nodes += if depth == 1 { 1 } else { perft(pos, depth - 1) };
        }
        pos.unmake(mv, &state);
    }
    nodes
}

/// Perft por lance da raiz.
pub fn divide(pos: &mut Position, depth: u32) -> Vec<(Move, u64)> {
    let mut list = MoveList::new();
    generate_pseudo_legal_moves::<All>(pos, &mut list);
    let mut state = IrreversibleState::default();
    let mut result = Vec::with_capacity(list.len());

    for mv in list.iter() {
        if pos.make(mv, &mut state) {
            let nodes = if depth <= 1 { 1 } else { perft(pos, depth - 1) };
            result.push((mv, nodes));
        }
        pos.unmake(mv, &state);
    }
    result
}

/// `divide` com os lances da raiz repartidos pelo pool do rayon. Cada tarefa
/// trabalha numa cópia da posição.
pub fn parallel_divide(pos: &Position, depth: u32, threads: usize) -> Result<Vec<(Move, u64)>, rayon::ThreadPoolBuildError> {
    let pool = rayon::ThreadPoolBuilder::new().num_threads(threads.max(1)).build()?;
    let root_moves = pos.legal_moves();

    Ok(pool.install(|| {
        root_moves
            .par_iter()
            .map(|&mv| {
                let mut child = *pos;
                let mut state = IrreversibleState::default();
                child.make(mv, &mut state);
                let nodes = if depth <= 1 { 1 } else { perft(&mut child, depth - 1) };
                (mv, nodes)
            })
            .collect()
    }))
}

/// Cache de perft: (chave, profundidade) -> nós.
#[derive(Default)]
pub struct PerftCache {
    table: HashMap<(u64, u32), u64>,
    hits: u64,
    misses: u64,
}

impl PerftCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Perft com transposições em cache; útil para profundidades grandes.
pub fn perft_cached(pos: &mut Position, depth: u32, cache: &mut PerftCache) -> u64 {
    if depth == 0 {
        return 1;
    }
    if let Some(&nodes) = cache.table.get(&(pos.key(), depth)) {
        cache.hits += 1;
        return nodes;
    }
    cache.misses += 1;

    let mut list = MoveList::new();
    generate_pseudo_legal_moves::<All>(pos, &mut list);
    let mut state = IrreversibleState::default();
    let mut nodes = 0;

    for mv in list.iter() {
        if pos.make(mv, &mut state) {
            nodes += perft_cached(pos, depth - 1, cache);
        }
        pos.unmake(mv, &state);
    }
    cache.table.insert((pos.key(), depth), nodes);
    nodes
}
