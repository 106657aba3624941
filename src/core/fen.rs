// Ficheiro: src/core/fen.rs
// Descrição: Leitura e escrita de posições em notação Forsyth-Edwards.

use super::bitboard::*;
use super::error::FenError;
use super::position::Position;
use super::types::*;

impl Position {
    /// Lê um FEN. Os contadores de meio-lance e de lance são opcionais.
    pub fn from_fen(fen: &str) -> Result<Position, FenError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if fields.is_empty() {
            return Err(FenError::Empty);
        }
        if !(4..=6).contains(&fields.len()) {
            return Err(FenError::FieldCount(fields.len()));
        }

        let mut pos = Position::empty();
        parse_placement(&mut pos, fields[0])?;

        for color in Color::BOTH {
            if popcount(pos.pieces(color, PieceKind::King)) != 1 {
                return Err(FenError::Kings);
            }
        }

        let turn = match fields[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(FenError::SideToMove(other.to_string())),
        };
        pos.set_turn(turn);

        if fields[2] != "-" {
            let mut white = CastlingRights::NONE;
            let mut black = CastlingRights::NONE;
            for c in fields[2].chars() {
                match c {
                    'K' => white.kingside = true,
                    'Q' => white.queenside = true,
                    'k' => black.kingside = true,
                    'q' => black.queenside = true,
                    _ => return Err(FenError::Castling(fields[2].to_string())),
                }
            }
            pos.set_castling(Color::White, white);
            pos.set_castling(Color::Black, black);
        }

        if fields[3] != "-" {
            let square = parse_square(fields[3]).ok_or_else(|| FenError::EnPassant(fields[3].to_string()))?;
            // A casa saltada fica na 6.ª fila se jogam as brancas, na 3.ª se jogam as pretas
            let expected_rank = if turn == Color::White { 5 } else { 2 };
            if rank_of(square) != expected_rank || !en_passant_is_consistent(&pos, square, turn) {
                return Err(FenError::EnPassant(fields[3].to_string()));
            }
            pos.set_en_passant(Some(square));
        }

        let halfmove = parse_counter(fields.get(4).copied(), 0)?;
        let fullmove = parse_counter(fields.get(5).copied(), 1)?.max(1);
        pos.set_counters(halfmove, fullmove);
        pos.refresh_key();

        if pos.is_in_check(!turn) {
            return Err(FenError::OpponentInCheck);
        }
        Ok(pos)
    }

    pub fn to_fen(&self) -> String {
        let mut fen = String::with_capacity(90);

        for rank in (0..8u8).rev() {
            let mut empty = 0;
            for file in 0..8u8 {
                match self.piece_on(rank * 8 + file) {
                    Some(piece) => {
                        if empty > 0 {
                            fen.push(char::from(b'0' + empty));
                            empty = 0;
                        }
                        fen.push(piece.to_char());
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                fen.push(char::from(b'0' + empty));
            }
            if rank > 0 {
                fen.push('/');
            }
        }

        fen.push(' ');
        fen.push(if self.turn() == Color::White { 'w' } else { 'b' });
        fen.push(' ');

        let white = self.castling_rights(Color::White);
        let black = self.castling_rights(Color::Black);
        let before = fen.len();
        for (flag, c) in [
            (white.kingside, 'K'),
            (white.queenside, 'Q'),
            (black.kingside, 'k'),
            (black.queenside, 'q'),
        ] {
            if flag {
                fen.push(c);
            }
        }
        if fen.len() == before {
            fen.push('-');
        }

        fen.push(' ');
        match self.en_passant() {
            Some(square) => fen.push_str(&square_name(square)),
            None => fen.push('-'),
        }

        fen.push_str(&format!(" {} {}", self.halfmove_clock(), self.fullmove_count()));
        fen
    }
}

fn parse_placement(pos: &mut Position, placement: &str) -> Result<(), FenError> {
    let ranks: Vec<&str> = placement.split('/').collect();
    if ranks.len() != 8 {
        return Err(FenError::Placement(format!("esperadas 8 filas, encontradas {}", ranks.len())));
    }

    for (i, rank_text) in ranks.iter().enumerate() {
        let rank = 7 - i as u8;
        let mut file = 0u8;
        for c in rank_text.chars() {
            if let Some(skip) = c.to_digit(10) {
                if !(1..=8).contains(&skip) {
                    return Err(FenError::Placement(format!("salto inválido '{}'", c)));
                }
                file += skip as u8;
            } else {
                let piece = Piece::from_char(c).ok_or(FenError::UnknownPiece(c))?;
                if file >= 8 {
                    return Err(FenError::Placement(format!("fila {} demasiado longa", rank + 1)));
                }
                pos.put_piece(piece.color, piece.kind, rank * 8 + file);
                file += 1;
            }
            if file > 8 {
                return Err(FenError::Placement(format!("fila {} demasiado longa", rank + 1)));
            }
        }
        if file != 8 {
            return Err(FenError::Placement(format!("fila {} com {} casas", rank + 1, file)));
        }
    }

    let pawns = pos.pieces(Color::White, PieceKind::Pawn) | pos.pieces(Color::Black, PieceKind::Pawn);
    if pawns & (RANK_1 | RANK_8) != 0 {
        return Err(FenError::Placement("peão na primeira ou última fila".to_string()));
    }
    Ok(())
}

/// Limite dos contadores lidos de um FEN; deixa folga para os incrementos do `make`.
const MAX_COUNTER: u16 = 10_000;

fn parse_counter(field: Option<&str>, default: u16) -> Result<u16, FenError> {
    match field {
        None => Ok(default),
        Some(text) => match text.parse::<u16>() {
            Ok(value) if value <= MAX_COUNTER => Ok(value),
            _ => Err(FenError::Counter(text.to_string())),
        },
    }
}

/// O peão que avançou duas casas tem de estar à frente da casa saltada, e
/// essa casa e a de origem têm de estar vazias.
fn en_passant_is_consistent(pos: &Position, square: Square, turn: Color) -> bool {
    let (pushed, origin) = match turn {
        Color::White => (square - 8, square + 8),
        Color::Black => (square + 8, square - 8),
    };
    let occupied = pos.occupied();
    pos.pieces(!turn, PieceKind::Pawn) & square_bb(pushed) != 0
        && occupied & (square_bb(square) | square_bb(origin)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::position::STARTPOS_FEN;

    #[test]
    fn test_fen_roundtrip() {
        for fen in [
            STARTPOS_FEN,
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
            "rnbqkbnr/ppp1pppp/8/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 3",
            "r3k2r/8/8/8/8/8/8/R3K2R b Kq - 12 40",
        ] {
            let pos = Position::from_fen(fen).expect("FEN válido");
            assert_eq!(pos.to_fen(), fen);
            assert_eq!(pos.key(), pos.compute_key());
        }
    }

    #[test]
    fn test_en_passant_square_matches_board() {
        let pos = Position::from_fen("4k3/8/8/3Pp3/8/8/8/4K3 w - e6 0 1").expect("FEN válido");
        assert_eq!(pos.en_passant(), Some(44));
        let mut copy = pos;
        assert_eq!(crate::engine::perft(&mut copy, 1), 7);
    }

    #[test]
    fn test_large_counters_survive_make() {
        let mut late = Position::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 10000 10000").expect("FEN válido");
        let mut fresh = Position::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 0 1").expect("FEN válido");
        assert_eq!(crate::engine::perft(&mut late, 2), crate::engine::perft(&mut fresh, 2));
        assert_eq!(late.halfmove_clock(), 10_000);
    }

    #[test]
    fn test_optional_counters() {
        let pos = Position::from_fen("8/8/8/8/8/8/8/K6k w - -").expect("FEN sem contadores");
        assert_eq!(pos.halfmove_clock(), 0);
        assert_eq!(pos.fullmove_count(), 1);
    }

    #[test]
    fn test_fen_errors() {
        assert_eq!(Position::from_fen(""), Err(FenError::Empty));
        assert_eq!(Position::from_fen("8/8/8 w"), Err(FenError::FieldCount(2)));
        assert!(matches!(
            Position::from_fen("8/8/8/8/8/8/8 w - - 0 1"),
            Err(FenError::Placement(_))
        ));
        assert_eq!(
            Position::from_fen("8/8/8/8/8/8/8/K6x w - - 0 1"),
            Err(FenError::UnknownPiece('x'))
        );
        assert_eq!(Position::from_fen("8/8/8/8/8/8/8/K7 w - - 0 1"), Err(FenError::Kings));
        assert!(matches!(
            Position::from_fen("8/8/8/8/8/8/8/K6k x - - 0 1"),
            Err(FenError::SideToMove(_))
        ));
        assert!(matches!(
            Position::from_fen("8/8/8/8/8/8/8/K6k w KX - 0 1"),
            Err(FenError::Castling(_))
        ));
        assert!(matches!(
            Position::from_fen("8/8/8/8/8/8/8/K6k w - e4 0 1"),
            Err(FenError::EnPassant(_))
        ));
        // Sem peão preto em e5 não há captura en passant possível
        assert!(matches!(
            Position::from_fen("4k3/8/8/3P4/8/8/8/4K3 w - e6 0 1"),
            Err(FenError::EnPassant(_))
        ));
        // Casa de origem ocupada
        assert!(matches!(
            Position::from_fen("4k3/4p3/8/3Pp3/8/8/8/4K3 w - e6 0 1"),
            Err(FenError::EnPassant(_))
        ));
        assert!(matches!(
            Position::from_fen("4k3/8/8/8/4P3/4n3/8/4K3 b - e3 0 1"),
            Err(FenError::EnPassant(_))
        ));
        assert!(matches!(
            Position::from_fen("8/8/8/8/8/8/8/K6k w - - x 1"),
            Err(FenError::Counter(_))
        ));
        assert!(matches!(
            Position::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 65535 1"),
            Err(FenError::Counter(_))
        ));
        assert!(matches!(
            Position::from_fen("8/8/8/8/8/8/8/K5pk w - - 0 1"),
            Err(FenError::Placement(_))
        ));
        // As pretas estão em xeque mas jogam as brancas
        assert_eq!(
            Position::from_fen("k7/8/8/8/8/8/8/R5K1 w - - 0 1"),
            Err(FenError::OpponentInCheck)
        );
    }
}
