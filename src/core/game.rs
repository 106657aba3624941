// Ficheiro: src/core/game.rs
// Descrição: Registo da partida (chave e lance de cada meio-lance jogado),
// usado na deteção de repetições e para o countermove na raiz.

use super::position::{IrreversibleState, Position};
use super::types::Move;

#[derive(Debug, Clone, Default)]
pub struct GameHistory {
    keys: Vec<u64>,
    moves: Vec<Move>,
}

impl GameHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.keys.clear();
        self.moves.clear();
    }

    /// Regista a chave da posição antes do lance e o próprio lance.
    pub fn record(&mut self, key: u64, mv: Move) {
        self.keys.push(key);
        self.moves.push(mv);
    }

    /// Joga um lance legal na posição e regista-o.
    /// Devolve `false` (sem alterar nada) se o lance for ilegal.
    pub fn play(&mut self, position: &mut Position, mv: Move) -> bool {
        let key = position.key();
        let mut state = IrreversibleState::default();
        if position.make(mv, &mut state) {
            self.record(key, mv);
            true
        } else {
            position.unmake(mv, &state);
            false
        }
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// Chave da posição antes do meio-lance `index`.
    #[inline]
    pub fn key_at(&self, index: usize) -> u64 {
        self.keys[index]
    }

    #[inline]
    pub fn move_at(&self, index: usize) -> Move {
        self.moves[index]
    }

    pub fn last_move(&self) -> Move {
        self.moves.last().copied().unwrap_or(Move::NULL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_play_records_key_before_move() {
        let mut pos = Position::startpos();
        let start_key = pos.key();
        let mut game = GameHistory::new();
        let mv = pos.parse_move("e2e4").expect("legal");
        assert!(game.play(&mut pos, mv));
        assert_eq!(game.len(), 1);
        assert_eq!(game.key_at(0), start_key);
        assert_eq!(game.last_move(), mv);
        game.clear();
        assert!(game.is_empty());
        assert_eq!(game.last_move(), Move::NULL);
    }
}
