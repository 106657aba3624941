// Ficheiro: src/search/alpha_beta.rs
// Descrição: Negamax alpha-beta com PVS, lance nulo e tabela de transposição,
// conduzido por aprofundamento iterativo.
//
// A interrupção (tempo, nós ou `stop`) é propagada como `None`. Cada nó desfaz
// o lance antes de propagar, por isso a posição fica sempre restaurada.

use super::config::SearchConfig;
use super::evaluation::{static_eval, EvalFn};
use super::heuristics::OrderingHeuristics;
use super::move_ordering::{MoveOrder, OrderKind};
use super::time_manager::{allot, SearchLimits};
use super::{mated_in, score_to_uci, Depth, Score, DRAW, INFINITY, MAX_DEPTH, MAX_PLY};
use crate::core::game::GameHistory;
use crate::core::position::{IrreversibleState, Position};
use crate::core::types::Move;
use crate::engine::tt::{Bound, TranspositionTable};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Resultado da última iteração completa.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub best_move: Move,
    pub score: Score,
    pub depth: Depth,
    pub nodes: u64,
    pub elapsed: Duration,
    pub pv: Vec<Move>,
}

/// Relatório de uma iteração, formatado como linha `info` do UCI.
#[derive(Debug, Clone)]
pub struct IterationInfo {
    pub depth: Depth,
    pub score: Score,
    pub nodes: u64,
    pub elapsed: Duration,
    pub hashfull: usize,
    pub pv: Vec<Move>,
}

impl IterationInfo {
    pub fn nps(&self) -> u64 {
        let micros = self.elapsed.as_micros().max(1);
        (self.nodes as u128 * 1_000_000 / micros) as u64
    }
}

impl fmt::Display for IterationInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "info depth {} score {} nodes {} time {} nps {} hashfull {} pv",
            self.depth,
            score_to_uci(self.score),
            self.nodes,
            self.elapsed.as_millis(),
            self.nps(),
            self.hashfull
        )?;
        for mv in &self.pv {
            write!(f, " {}", mv)?;
        }
        Ok(())
    }
}

pub struct Search {
    pub(crate) tt: TranspositionTable,
    /// Um `MoveOrder` por ply, alocados uma vez.
    pub(crate) tree: Vec<MoveOrder>,
    pub(crate) heuristics: OrderingHeuristics,
    pv_table: Vec<[Move; MAX_PLY + 2]>,
    pub(crate) pv_len: [usize; MAX_PLY + 2],
    /// Chave antes de cada lance do caminho desde a raiz, e o lance.
    key_stack: Vec<u64>,
    move_stack: Vec<Move>,
    pub(crate) nodes: u64,
    pub(crate) config: SearchConfig,
    pub(crate) evaluate: EvalFn,
    stop: Arc<AtomicBool>,
    deadline: Option<Instant>,
    node_limit: Option<u64>,
}

impl Search {
    pub fn new() -> Self {
        Self::with_config(SearchConfig::default())
    }

    pub fn with_config(config: SearchConfig) -> Self {
        Search {
            tt: TranspositionTable::new(config.hash_mb),
            tree: (0..=MAX_PLY).map(|_| MoveOrder::new(OrderKind::Main)).collect(),
            heuristics: OrderingHeuristics::new(),
            pv_table: vec![[Move::NULL; MAX_PLY + 2]; MAX_PLY + 2],
            pv_len: [0; MAX_PLY + 2],
            key_stack: Vec::with_capacity(MAX_PLY + 1),
            move_stack: Vec::with_capacity(MAX_PLY + 1),
            nodes: 0,
            config,
            evaluate: static_eval,
            stop: Arc::new(AtomicBool::new(false)),
            deadline: None,
            node_limit: None,
        }
    }

    /// Troca a função de avaliação (por omissão `static_eval`).
    pub fn with_evaluator(mut self, evaluate: EvalFn) -> Self {
        self.evaluate = evaluate;
        self
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Parâmetros que não exigem realocação. Para o tamanho da TT use `set_hash`.
    pub fn config_mut(&mut self) -> &mut SearchConfig {
        &mut self.config
    }

    pub fn set_hash(&mut self, size_mb: usize) {
        self.config.hash_mb = size_mb;
        self.tt.resize(size_mb);
    }

    pub fn tt(&self) -> &TranspositionTable {
        &self.tt
    }

    /// Limpa a TT e as heurísticas de ordenação (nova partida).
    pub fn new_game(&mut self) {
        self.tt.clear();
        self.heuristics.clear();
    }

    /// Flag partilhada de paragem. Quem a levanta também a deve baixar antes
    /// da busca seguinte.
    pub fn stop_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    pub fn best_move(&mut self, pos: &Position, game: &GameHistory, limits: &SearchLimits) -> SearchResult {
        self.best_move_with(pos, game, limits, |_| {})
    }

    /// Aprofundamento iterativo de 1 até `limits.depth`. `report` é chamado no
    /// fim de cada iteração completa; uma iteração interrompida é descartada.
    pub fn best_move_with<F>(&mut self, pos: &Position, game: &GameHistory, limits: &SearchLimits, mut report: F) -> SearchResult
    where
        F: FnMut(&IterationInfo),
    {
        let started = Instant::now();
        self.deadline = allot(pos, limits).map(|budget| started + budget);
        self.node_limit = limits.nodes;
        self.nodes = 0;
        self.key_stack.clear();
        self.move_stack.clear();

        let max_depth = limits.depth.unwrap_or(MAX_DEPTH).clamp(1, MAX_DEPTH);
        let mut root = *pos;
        let mut result = SearchResult {
            best_move: Move::NULL,
            score: 0,
            depth: 0,
            nodes: 0,
            elapsed: Duration::ZERO,
            pv: Vec::new(),
        };

        for depth in 1..=max_depth {
            let Some(score) = self.negamax::<true, true>(&mut root, game, -INFINITY, INFINITY, depth, 0, true) else {
                log::debug!("busca interrompida na profundidade {} ({} nós)", depth, self.nodes);
                break;
            };

            let pv = self.pv_table[0][..self.pv_len[0]].to_vec();
            let info = IterationInfo {
                depth,
                score,
                nodes: self.nodes,
                elapsed: started.elapsed(),
                hashfull: self.tt.hashfull(),
                pv: pv.clone(),
            };
            log::debug!("{}", info);
            report(&info);

            result = SearchResult {
                best_move: pv.first().copied().unwrap_or(Move::NULL),
                score,
                depth,
                nodes: self.nodes,
                elapsed: info.elapsed,
                pv,
            };
        }

        if result.best_move.is_null() {
            // Nenhuma iteração terminou: qualquer lance legal serve
            result.best_move = pos.legal_moves().first().copied().unwrap_or(Move::NULL);
        }
        result.nodes = self.nodes;
        result.elapsed = started.elapsed();
        result
    }

    /// Consultado a cada `node_check_mask + 1` nós.
    #[inline]
    pub(crate) fn should_abort(&self) -> bool {
        if self.nodes & self.config.node_check_mask != 0 {
            return false;
        }
        self.stop.load(Ordering::Relaxed)
            || self.deadline.is_some_and(|deadline| Instant::now() >= deadline)
            || self.node_limit.is_some_and(|limit| self.nodes >= limit)
    }

    /// A posição atual já ocorreu desde o último lance irreversível? Percorre
    /// o caminho da busca e depois a partida, até `repetition_window` plies.
    fn is_repetition(&self, pos: &Position, game: &GameHistory) -> bool {
        let key = pos.key();
        let path = self.move_stack.iter().copied().zip(self.key_stack.iter().copied()).rev();
        let played = (0..game.len()).rev().map(|i| (game.move_at(i), game.key_at(i)));

        path.chain(played)
            .take(self.config.repetition_window)
            .take_while(|(mv, _)| !mv.is_null() && !mv.is_irreversible())
            .any(|(_, previous)| previous == key)
    }

    fn previous_move(&self, game: &GameHistory) -> Move {
        match self.move_stack.last() {
            Some(&mv) => mv,
            None => game.last_move(),
        }
    }

    fn update_pv(&mut self, ply: usize, mv: Move) {
        let child_len = self.pv_len[ply + 1].max(ply + 1);
        let (parent, child) = self.pv_table.split_at_mut(ply + 1);
        parent[ply][ply] = mv;
        parent[ply][ply + 1..child_len].copy_from_slice(&child[0][ply + 1..child_len]);
        self.pv_len[ply] = child_len;
    }

    /// Joga `mv` no caminho. Devolve `false` (já desfeito) se for ilegal.
    fn push_move(&mut self, pos: &mut Position, mv: Move, state: &mut IrreversibleState) -> bool {
        self.key_stack.push(pos.key());
        self.move_stack.push(mv);
        if pos.make(mv, state) {
            return true;
        }
        self.pop_move(pos, mv, state);
        false
    }

    fn pop_move(&mut self, pos: &mut Position, mv: Move, state: &IrreversibleState) {
        pos.unmake(mv, state);
        self.key_stack.pop();
        self.move_stack.pop();
    }

    #[allow(clippy::too_many_arguments)]
    pub(crate) fn negamax<const ROOT: bool, const PV: bool>(
        &mut self,
        pos: &mut Position,
        game: &GameHistory,
        mut alpha: Score,
        beta: Score,
        depth: Depth,
        ply: usize,
        allow_null: bool,
    ) -> Option<Score> {
        self.pv_len[ply] = ply;

        if !ROOT {
            if pos.halfmove_clock() >= 100 || self.is_repetition(pos, game) {
                return Some(DRAW);
            }
            if ply >= MAX_PLY {
                return Some((self.evaluate)(pos));
            }
        }
        if depth <= 0 {
            return self.quiesce(pos, alpha, beta, ply);
        }

        self.nodes += 1;
        if self.should_abort() {
            return None;
        }

        let key = pos.key();
        let us = pos.turn();
        let in_check = pos.is_in_check(us);

        let mut hash_move = Move::NULL;
        if let Some(hit) = self.tt.probe(key, alpha, beta, depth, ply) {
            hash_move = hit.best_move;
            if !ROOT {
                if let Some(score) = hit.cutoff {
                    return Some(score);
                }
            }
        }

        // Lance nulo, com busca de verificação à mesma altura reduzida
        if !PV && allow_null && self.config.null_move && !in_check && depth >= 3 && pos.has_non_pawn_material(us) {
            let reduced = depth - self.config.null_move_reduction - 1;
            let mut state = IrreversibleState::default();
            self.key_stack.push(key);
            self.move_stack.push(Move::NULL);
            pos.make_null(&mut state);
            let result = self.negamax::<false, false>(pos, game, -beta, -beta + 1, reduced, ply + 1, false);
            pos.unmake_null(&state);
            self.key_stack.pop();
            self.move_stack.pop();

            if -result? >= beta {
                let verified = self.negamax::<false, false>(pos, game, beta - 1, beta, reduced, ply, false)?;
                if verified >= beta {
                    return Some(beta);
                }
            }
        }

        let previous = self.previous_move(game);
        let killer = self.heuristics.killer(ply);
        let countermove = self.heuristics.countermove(us, previous);
        self.tree[ply].reset(OrderKind::Main, hash_move, killer, countermove);

        let original_alpha = alpha;
        let mut best_move = Move::NULL;
        let mut best_score = -INFINITY;
        let mut legal = 0;
        let mut state = IrreversibleState::default();

        while let Some(mv) = self.tree[ply].next_move(pos, &self.heuristics) {
            if !self.push_move(pos, mv, &mut state) {
                continue;
            }
            legal += 1;

            let result = if !PV || legal == 1 {
                self.negamax::<false, PV>(pos, game, -beta, -alpha, depth - 1, ply + 1, true)
            } else {
                // PVS: janela nula primeiro, janela completa só se melhorar alpha
                match self.negamax::<false, false>(pos, game, -alpha - 1, -alpha, depth - 1, ply + 1, true) {
                    Some(score) if -score > alpha && -score < beta => {
                        self.negamax::<false, true>(pos, game, -beta, -alpha, depth - 1, ply + 1, true)
                    }
                    other => other,
                }
            };
            self.pop_move(pos, mv, &state);
            let score = -result?;

            if score > best_score {
                best_score = score;
                best_move = mv;
            }
            if score > alpha {
                alpha = score;
                self.update_pv(ply, mv);

                if score >= beta {
                    self.heuristics.update_on_cutoff(us, mv, previous, depth, ply);
                    self.tt.write(key, depth, ply, Bound::Lower, beta, mv);
                    self.heuristics.clear_killer(ply + 1);
                    return Some(beta);
                }
            }
        }

        if legal == 0 {
            let score = if in_check { mated_in(ply) } else { DRAW };
            self.tt.write(key, depth, ply, Bound::Exact, score, Move::NULL);
            return Some(score);
        }

        if ROOT && pos.halfmove_clock() >= 100 {
            alpha = DRAW;
        }

        let bound = if alpha > original_alpha { Bound::Exact } else { Bound::Upper };
        self.tt.write(key, depth, ply, bound, alpha, best_move);
        self.heuristics.clear_killer(ply + 1);
        Some(alpha)
    }
}

impl Default for Search {
    fn default() -> Self {
        Self::new()
    }
}
