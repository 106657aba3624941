// Ficheiro: src/search/see.rs
// Descrição: Static Exchange Evaluation. Simula a sequência de capturas numa
// casa, sempre com o atacante de menor valor, e devolve o saldo material.

use super::Score;
use crate::core::bitboard::*;
use crate::core::position::Position;
use crate::core::types::*;

/// Número máximo de capturas numa casa (32 peças no tabuleiro).
const MAX_EXCHANGES: usize = 32;

impl Position {
    /// Atacante de menor valor de `side` dentro de `attackers`.
    fn least_valuable_attacker(&self, attackers: Bitboard, side: Color) -> Option<(Square, PieceKind)> {
        PieceKind::ALL.into_iter().find_map(|kind| {
            let candidates = attackers & self.pieces(side, kind);
            (candidates != EMPTY).then(|| (lsb(candidates), kind))
        })
    }

    /// Saldo da troca em `square` para o lado a jogar, que captura primeiro.
    /// Zero se a casa não tem peça adversária ou se ninguém a ataca. As peças
    /// deslizantes escondidas atrás de outras entram quando estas saem da
    /// ocupação.
    pub fn static_exchange_eval(&self, square: Square) -> Score {
        let us = self.turn();
        let victim = match self.kind_on(square, !us) {
            Some(kind) => kind,
            None => return 0,
        };

        let mut occupancy = self.occupied();
        let Some((mut from, mut attacker)) =
            self.least_valuable_attacker(self.attacks_to(square, us, occupancy), us)
        else {
            return 0;
        };

        let mut gain = [0 as Score; MAX_EXCHANGES];
        gain[0] = victim.value();
        let mut depth = 0;
        let mut side = us;

        loop {
            depth += 1;
            // Ganho especulativo se a peça que acabou de capturar for capturada
            gain[depth] = attacker.value() - gain[depth - 1];
            if depth + 1 == MAX_EXCHANGES {
                break;
            }

            occupancy ^= square_bb(from);
            side = !side;
            let attackers = self.attacks_to(square, side, occupancy) & occupancy;
            match self.least_valuable_attacker(attackers, side) {
                Some(next) => (from, attacker) = next,
                None => break,
            }
        }

        while depth > 1 {
            depth -= 1;
            gain[depth - 1] = -(-gain[depth - 1]).max(gain[depth]);
        }
        gain[0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn see(fen: &str, square: &str) -> Score {
        let pos = Position::from_fen(fen).expect("FEN");
        pos.static_exchange_eval(parse_square(square).expect("casa"))
    }

    #[test]
    fn test_undefended_piece() {
        // Torre branca captura peão indefeso em e5
        assert_eq!(see("1k1r4/1pp4p/p7/4p3/8/P5P1/1PP4P/2K1R3 w - - 0 1", "e5"), 100);
    }

    #[test]
    fn test_defended_pawn_with_knight() {
        // Cavalo toma peão defendido por peão: perde o cavalo
        assert_eq!(see("4k3/8/3p4/4p3/8/5N2/8/4K3 w - - 0 1", "e5"), 100 - 300);
    }

    #[test]
    fn test_xray_recapture() {
        // Dupla de torres contra uma torre defensora: a segunda torre entra por raio-x
        assert_eq!(see("4r1k1/8/8/4n3/8/8/4R3/4R1K1 w - - 0 1", "e5"), 300);
    }

    #[test]
    fn test_no_victim_or_attacker() {
        assert_eq!(see("4k3/8/8/8/8/8/8/4K3 w - - 0 1", "e4"), 0);
        assert_eq!(see("4k3/8/8/4p3/8/8/8/4K3 w - - 0 1", "e5"), 0);
    }

    #[test]
    fn test_pawn_takes_defended_queen() {
        assert_eq!(see("3rk3/8/8/3q4/4P3/8/8/4K3 w - - 0 1", "d5"), 900 - 100);
    }
}
