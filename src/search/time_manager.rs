// Ficheiro: src/search/time_manager.rs
// Descrição: Limites de uma busca e cálculo do tempo atribuído.

use super::Depth;
use crate::core::position::Position;
use crate::core::types::Color;
use std::time::Duration;

/// Limites recebidos do `go` (ou da CLI). Campos a `None` não limitam.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchLimits {
    pub depth: Option<Depth>,
    pub movetime: Option<Duration>,
    pub wtime: Option<Duration>,
    pub btime: Option<Duration>,
    pub winc: Option<Duration>,
    pub binc: Option<Duration>,
    pub nodes: Option<u64>,
    pub infinite: bool,
}

impl SearchLimits {
    pub fn depth(depth: Depth) -> Self {
        SearchLimits { depth: Some(depth), ..Self::default() }
    }

    pub fn movetime(movetime: Duration) -> Self {
        SearchLimits { movetime: Some(movetime), ..Self::default() }
    }

    /// Relógio e incremento do lado a jogar.
    fn clock(&self, color: Color) -> (Option<Duration>, Option<Duration>) {
        match color {
            Color::White => (self.wtime, self.winc),
            Color::Black => (self.btime, self.binc),
        }
    }
}

/// Tempo para esta jogada: `movetime` se existir, senão `tempo/20 + inc/2` do
/// lado a jogar, senão sem limite. Uma busca `infinite` nunca tem prazo.
pub fn allot(pos: &Position, limits: &SearchLimits) -> Option<Duration> {
    if limits.infinite {
        return None;
    }
    if let Some(movetime) = limits.movetime {
        return Some(movetime);
    }

    let (time, inc) = limits.clock(pos.turn());
    let time = time?;
    let budget = time / 20 + inc.unwrap_or_default() / 2;
    // Nunca mais do que o que resta no relógio
    Some(budget.min(time))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn test_movetime_wins() {
        let pos = Position::startpos();
        let limits = SearchLimits {
            movetime: Some(ms(500)),
            wtime: Some(ms(60_000)),
            ..SearchLimits::default()
        };
        assert_eq!(allot(&pos, &limits), Some(ms(500)));
    }

    #[test]
    fn test_clock_of_side_to_move() {
        let limits = SearchLimits {
            wtime: Some(ms(60_000)),
            btime: Some(ms(20_000)),
            winc: Some(ms(1_000)),
            binc: Some(ms(2_000)),
            ..SearchLimits::default()
        };
        let white = Position::startpos();
        let black = Position::from_fen("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1").expect("FEN");
        assert_eq!(allot(&white, &limits), Some(ms(3_500)));
        assert_eq!(allot(&black, &limits), Some(ms(2_000)));
    }

    #[test]
    fn test_unbounded() {
        let pos = Position::startpos();
        assert_eq!(allot(&pos, &SearchLimits::depth(5)), None);
        let infinite = SearchLimits { infinite: true, movetime: Some(ms(10)), ..SearchLimits::default() };
        assert_eq!(allot(&pos, &infinite), None);
    }

    #[test]
    fn test_budget_never_exceeds_clock() {
        let pos = Position::startpos();
        let limits = SearchLimits { wtime: Some(ms(100)), winc: Some(ms(1_000)), ..SearchLimits::default() };
        assert_eq!(allot(&pos, &limits), Some(ms(100)));
    }
}
