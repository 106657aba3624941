// Ficheiro: src/search/move_ordering.rs
// Descrição: Ordenação de lances por etapas. Cada categoria só é gerada quando
// a etapa é alcançada: um corte nas capturas poupa a geração dos silenciosos.

use super::heuristics::OrderingHeuristics;
use crate::core::position::Position;
use crate::core::types::Move;
use crate::moves::{generate_pseudo_legal_moves, All, Captures, MoveList, Quiets};

/// MVV-LVA: linhas = atacante (P, N, B, R, Q, K), colunas = vítima (P, N, B, R, Q).
#[rustfmt::skip]
const MVV_LVA: [[i32; 5]; 6] = [
    [1050, 2050, 3050, 4050, 5050],
    [1040, 2040, 3040, 4040, 5040],
    [1038, 2038, 3038, 4038, 5038],
    [1015, 2015, 3015, 4015, 5015],
    [1009, 2009, 3009, 4009, 5009],
    [1000, 2000, 3000, 4000, 5000],
];

/// Promoção a dama sem captura.
const QUEEN_PROMOTION_SCORE: i32 = 2000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OrderKind {
    /// Busca principal: todas as etapas.
    Main,
    /// Só capturas e promoções a dama, por MVV-LVA.
    Quiescent,
    /// Capturas e silenciosos gerados de uma vez, sem ordenação.
    Plain,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    HashMove,
    Captures,
    PickCaptures,
    Killer,
    Countermove,
    Quiets,
    PickQuiets,
    Remaining,
    Done,
}

#[inline]
pub fn capture_score(mv: Move) -> i32 {
    match mv.captured() {
        Some(victim) => MVV_LVA[mv.performer().index()][victim.index()],
        None => QUEEN_PROMOTION_SCORE,
    }
}

pub struct MoveOrder {
    kind: OrderKind,
    stage: Stage,
    list: MoveList,
    cursor: usize,
    // Um campo fica a NULL quando o lance não foi devolvido.
    hash_move: Move,
    killer: Move,
    countermove: Move,
}

impl MoveOrder {
    pub fn new(kind: OrderKind) -> Self {
        let mut order = MoveOrder {
            kind,
            stage: Stage::Done,
            list: MoveList::new(),
            cursor: 0,
            hash_move: Move::NULL,
            killer: Move::NULL,
            countermove: Move::NULL,
        };
        order.reset(kind, Move::NULL, Move::NULL, Move::NULL);
        order
    }

    /// Prepara a ordenação para um novo nó.
    pub fn reset(&mut self, kind: OrderKind, hash_move: Move, killer: Move, countermove: Move) {
        self.kind = kind;
        self.list.clear();
        self.cursor = 0;
        self.stage = match kind {
            OrderKind::Main => Stage::HashMove,
            OrderKind::Quiescent | OrderKind::Plain => Stage::Captures,
        };
        let main = kind == OrderKind::Main;
        self.hash_move = if main { hash_move } else { Move::NULL };
        self.killer = if main { killer } else { Move::NULL };
        self.countermove = if main { countermove } else { Move::NULL };
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    #[inline]
    fn already_yielded(&self, mv: Move) -> bool {
        mv == self.hash_move || mv == self.killer || mv == self.countermove
    }

    /// Próximo lance pseudo-legal, ou `None` quando não há mais.
    pub fn next_move(&mut self, pos: &Position, heuristics: &OrderingHeuristics) -> Option<Move> {
        loop {
            match self.stage {
                Stage::HashMove => {
                    self.stage = Stage::Captures;
                    if pos.is_pseudo_legal(self.hash_move) {
                        return Some(self.hash_move);
                    }
                    self.hash_move = Move::NULL;
                }
                Stage::Captures => {
                    self.list.clear();
                    self.cursor = 0;
                    if self.kind == OrderKind::Plain {
                        generate_pseudo_legal_moves::<All>(pos, &mut self.list);
                        self.stage = Stage::Remaining;
                        continue;
                    }
                    generate_pseudo_legal_moves::<Captures>(pos, &mut self.list);
                    for i in 0..self.list.len() {
                        self.list.set_score(i, capture_score(self.list.get(i)));
                    }
                    self.list.sort_from(0);
                    self.stage = Stage::PickCaptures;
                }
                Stage::PickCaptures => {
                    while self.cursor < self.list.len() {
                        let mv = self.list.get(self.cursor);
                        self.cursor += 1;
                        if mv != self.hash_move {
                            return Some(mv);
                        }
                    }
                    self.stage = match self.kind {
                        OrderKind::Quiescent => Stage::Done,
                        _ => Stage::Killer,
                    };
                }
                Stage::Killer => {
                    self.stage = Stage::Countermove;
                    if self.killer != self.hash_move && pos.is_pseudo_legal(self.killer) {
                        return Some(self.killer);
                    }
                    self.killer = Move::NULL;
                }
                Stage::Countermove => {
                    self.stage = Stage::Quiets;
                    let mv = self.countermove;
                    if mv != self.hash_move && mv != self.killer && pos.is_pseudo_legal(mv) {
                        return Some(mv);
                    }
                    self.countermove = Move::NULL;
                }
                Stage::Quiets => {
                    self.list.clear();
                    self.cursor = 0;
                    generate_pseudo_legal_moves::<Quiets>(pos, &mut self.list);
                    let side = pos.turn();
                    for i in 0..self.list.len() {
                        self.list.set_score(i, heuristics.history(side, self.list.get(i)));
                    }
                    self.stage = Stage::PickQuiets;
                }
                Stage::PickQuiets => {
                    while self.cursor < self.list.len() {
                        let mv = self.list.pick_best(self.cursor).mv;
                        self.cursor += 1;
                        if !self.already_yielded(mv) {
                            return Some(mv);
                        }
                    }
                    self.stage = Stage::Done;
                }
                Stage::Remaining => {
                    if self.cursor < self.list.len() {
                        let mv = self.list.get(self.cursor);
                        self.cursor += 1;
                        return Some(mv);
                    }
                    self.stage = Stage::Done;
                }
                Stage::Done => return None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{Color, PieceKind};
    use std::collections::HashSet;

    const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";

    fn drain(order: &mut MoveOrder, pos: &Position, heuristics: &OrderingHeuristics) -> Vec<Move> {
        std::iter::from_fn(|| order.next_move(pos, heuristics)).collect()
    }

    fn all_moves(pos: &Position) -> HashSet<Move> {
        let mut list = MoveList::new();
        generate_pseudo_legal_moves::<All>(pos, &mut list);
        list.iter().collect()
    }

    #[test]
    fn test_mvv_lva_prefers_cheap_attacker() {
        let pxq = Move::capture(28, 35, PieceKind::Pawn, PieceKind::Queen);
        let qxp = Move::capture(1, 9, PieceKind::Queen, PieceKind::Pawn);
        assert!(capture_score(pxq) > capture_score(qxp));
        assert_eq!(capture_score(pxq), 5050);
        assert_eq!(capture_score(qxp), 1009);

        let pos = Position::from_fen("4k3/8/8/3q4/4P3/8/1p6/1Q2K3 w - - 0 1").expect("FEN");
        let mut order = MoveOrder::new(OrderKind::Quiescent);
        let moves = drain(&mut order, &pos, &OrderingHeuristics::new());
        let first = moves.iter().position(|m| m.to_string() == "e4d5").expect("exd5");
        let second = moves.iter().position(|m| m.to_string() == "b1b2").expect("Qxb2");
        assert_eq!(first, 0);
        assert!(first < second);
    }

    #[test]
    fn test_main_yields_every_move_once() {
        let pos = Position::from_fen(KIWIPETE).expect("FEN");
        let hash = pos.parse_move("e2a6").expect("lance");
        let killer = pos.parse_move("a2a3").expect("lance");
        let counter = pos.parse_move("e1g1").expect("lance");

        let mut order = MoveOrder::new(OrderKind::Main);
        order.reset(OrderKind::Main, hash, killer, counter);
        let moves = drain(&mut order, &pos, &OrderingHeuristics::new());

        assert_eq!(moves[0], hash);
        assert_eq!(moves.len(), 48);
        let unique: HashSet<Move> = moves.iter().copied().collect();
        assert_eq!(unique.len(), moves.len());
        assert_eq!(unique, all_moves(&pos));

        let killer_at = moves.iter().position(|&m| m == killer).expect("killer");
        let counter_at = moves.iter().position(|&m| m == counter).expect("countermove");
        assert_eq!(counter_at, killer_at + 1);
        assert!(moves[..killer_at].iter().skip(1).all(|m| m.is_capture() || m.is_promotion()));
    }

    #[test]
    fn test_invalid_candidates_are_skipped() {
        let pos = Position::startpos();
        // Lances que não existem na posição inicial
        let bogus_hash = Move::quiet(28, 36, PieceKind::Pawn);
        let bogus_killer = Move::quiet(3, 39, PieceKind::Queen);
        let mut order = MoveOrder::new(OrderKind::Main);
        order.reset(OrderKind::Main, bogus_hash, bogus_killer, Move::NULL);
        let moves = drain(&mut order, &pos, &OrderingHeuristics::new());
        assert_eq!(moves.len(), 20);
        assert!(!moves.contains(&bogus_hash));
        assert!(!moves.contains(&bogus_killer));
    }

    #[test]
    fn test_quiets_generated_lazily() {
        let pos = Position::from_fen(KIWIPETE).expect("FEN");
        let mut order = MoveOrder::new(OrderKind::Main);
        let heuristics = OrderingHeuristics::new();
        let first = order.next_move(&pos, &heuristics).expect("captura");
        assert!(first.is_capture());
        assert_eq!(order.stage(), Stage::PickCaptures);
    }

    #[test]
    fn test_quiets_follow_history() {
        let pos = Position::startpos();
        let mut heuristics = OrderingHeuristics::new();
        let favourite = pos.parse_move("g1f3").expect("lance");
        heuristics.update_on_cutoff(Color::White, favourite, Move::NULL, 6, 0);

        let mut order = MoveOrder::new(OrderKind::Main);
        let moves = drain(&mut order, &pos, &heuristics);
        assert_eq!(moves[0], favourite);
    }

    #[test]
    fn test_plain_and_quiescent_modes() {
        let pos = Position::from_fen(KIWIPETE).expect("FEN");
        let heuristics = OrderingHeuristics::new();

        let mut plain = MoveOrder::new(OrderKind::Plain);
        let moves = drain(&mut plain, &pos, &heuristics);
        assert_eq!(moves.into_iter().collect::<HashSet<_>>(), all_moves(&pos));

        let mut quiescent = MoveOrder::new(OrderKind::Quiescent);
        let captures = drain(&mut quiescent, &pos, &heuristics);
        assert_eq!(captures.len(), 8);
        assert!(captures.iter().all(|m| m.is_capture()));
        assert!(captures.windows(2).all(|w| capture_score(w[0]) >= capture_score(w[1])));
    }
}
