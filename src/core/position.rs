// Ficheiro: src/core/position.rs
// Descrição: Estado do tabuleiro em bitboards, make/unmake incremental com hash
// Zobrist e consultas de ataque.

use super::bitboard::*;
use super::error::MoveParseError;
use super::types::*;
use super::zobrist::ZOBRIST_KEYS;
use crate::moves::move_list::MoveList;
use crate::moves::movegen::{generate_pseudo_legal_moves, All};
use crate::moves::{
    get_bishop_attacks, get_queen_attacks, get_rook_attacks, king_attacks, knight_attacks, pawn_attacks,
};
use std::fmt;

/// Componentes irreversíveis da posição, guardados antes de `make` e
/// restaurados literalmente por `unmake`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IrreversibleState {
    pub en_passant: Option<Square>,
    pub halfmove_clock: u16,
    pub castling: [CastlingRights; 2],
    pub key: u64,
    /// Peça capturada, resolvida por `make` a partir do tabuleiro.
    pub captured: Option<PieceKind>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pieces: [[Bitboard; 6]; 2],
    colors: [Bitboard; 2],
    turn: Color,
    castling: [CastlingRights; 2],
    en_passant: Option<Square>,
    halfmove_clock: u16,
    fullmove_count: u16,
    king_square: [Square; 2],
    key: u64,
}

pub const STARTPOS_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Origem e destino da torre num roque, a partir do destino do rei.
#[inline(always)]
const fn castle_rook_squares(king_to: Square) -> (Square, Square) {
    match king_to {
        G1 => (H1, F1),
        C1 => (A1, D1),
        G8 => (H8, F8),
        _ => (A8, D8),
    }
}

impl Position {
    /// Tabuleiro vazio; usado pelo parser de FEN antes de colocar as peças.
    pub(crate) fn empty() -> Self {
        Position {
            pieces: [[0; 6]; 2],
            colors: [0; 2],
            turn: Color::White,
            castling: [CastlingRights::NONE; 2],
            en_passant: None,
            halfmove_clock: 0,
            fullmove_count: 1,
            king_square: [E1, E8],
            key: 0,
        }
    }

    pub fn startpos() -> Self {
        match Self::from_fen(STARTPOS_FEN) {
            Ok(pos) => pos,
            Err(e) => unreachable!("FEN inicial inválido: {}", e),
        }
    }

    // ========================================================================
    // ACESSORES
    // ========================================================================

    #[inline(always)]
    pub fn turn(&self) -> Color {
        self.turn
    }

    #[inline(always)]
    pub fn pieces(&self, color: Color, kind: PieceKind) -> Bitboard {
        self.pieces[color.index()][kind.index()]
    }

    #[inline(always)]
    pub fn color_bb(&self, color: Color) -> Bitboard {
        self.colors[color.index()]
    }

    #[inline(always)]
    pub fn occupied(&self) -> Bitboard {
        self.colors[0] | self.colors[1]
    }

    #[inline(always)]
    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    #[inline(always)]
    pub fn halfmove_clock(&self) -> u16 {
        self.halfmove_clock
    }

    #[inline(always)]
    pub fn fullmove_count(&self) -> u16 {
        self.fullmove_count
    }

    #[inline(always)]
    pub fn castling_rights(&self, color: Color) -> CastlingRights {
        self.castling[color.index()]
    }

    #[inline(always)]
    pub fn king_square(&self, color: Color) -> Square {
        self.king_square[color.index()]
    }

    /// Chave Zobrist incremental.
    #[inline(always)]
    pub fn key(&self) -> u64 {
        self.key
    }

    /// Tipo da peça de `color` em `square`, se houver.
    #[inline]
    pub fn kind_on(&self, square: Square, color: Color) -> Option<PieceKind> {
        let bb = square_bb(square);
        if self.colors[color.index()] & bb == 0 {
            return None;
        }
        PieceKind::ALL
            .into_iter()
            .find(|&kind| self.pieces[color.index()][kind.index()] & bb != 0)
    }

    pub fn piece_on(&self, square: Square) -> Option<Piece> {
        Color::BOTH
            .into_iter()
            .find_map(|color| self.kind_on(square, color).map(|kind| Piece::new(kind, color)))
    }

    /// Verdadeiro se a cor tiver peças além de peões e rei.
    pub fn has_non_pawn_material(&self, color: Color) -> bool {
        let c = color.index();
        self.pieces[c][PieceKind::Knight.index()]
            | self.pieces[c][PieceKind::Bishop.index()]
            | self.pieces[c][PieceKind::Rook.index()]
            | self.pieces[c][PieceKind::Queen.index()]
            != 0
    }

    pub fn irreversible(&self) -> IrreversibleState {
        IrreversibleState {
            en_passant: self.en_passant,
            halfmove_clock: self.halfmove_clock,
            castling: self.castling,
            key: self.key,
            captured: None,
        }
    }

    // ========================================================================
    // MONTAGEM (usada pelo parser de FEN)
    // ========================================================================

    pub(crate) fn put_piece(&mut self, color: Color, kind: PieceKind, square: Square) {
        self.toggle_piece(color, kind, square);
        if kind == PieceKind::King {
            self.king_square[color.index()] = square;
        }
    }

    pub(crate) fn set_turn(&mut self, color: Color) {
        self.turn = color;
    }

    pub(crate) fn set_castling(&mut self, color: Color, rights: CastlingRights) {
        self.castling[color.index()] = rights;
    }

    pub(crate) fn set_en_passant(&mut self, square: Option<Square>) {
        self.en_passant = square;
    }

    pub(crate) fn set_counters(&mut self, halfmove_clock: u16, fullmove_count: u16) {
        self.halfmove_clock = halfmove_clock;
        self.fullmove_count = fullmove_count;
    }

    pub(crate) fn refresh_key(&mut self) {
        self.key = self.compute_key();
    }

    /// Recalcula a chave Zobrist do zero (referência para a chave incremental).
    pub fn compute_key(&self) -> u64 {
        let keys = &*ZOBRIST_KEYS;
        let mut key = 0;
        for color in Color::BOTH {
            for kind in PieceKind::ALL {
                for square in self.pieces(color, kind).squares() {
                    key ^= keys.piece(color, kind, square);
                }
            }
            key ^= keys.castling_rights(color, self.castling_rights(color));
        }
        if let Some(ep) = self.en_passant {
            key ^= keys.en_passant_file(ep);
        }
        if self.turn == Color::Black {
            key ^= keys.side_to_move;
        }
        key
    }

    // ========================================================================
    // PRIMITIVAS DE COLOCAÇÃO
    // ========================================================================

    #[inline(always)]
    fn toggle_piece(&mut self, color: Color, kind: PieceKind, square: Square) {
        let bb = square_bb(square);
        self.pieces[color.index()][kind.index()] ^= bb;
        self.colors[color.index()] ^= bb;
    }

    #[inline(always)]
    fn toggle_piece_hashed(&mut self, color: Color, kind: PieceKind, square: Square) {
        self.toggle_piece(color, kind, square);
        self.key ^= ZOBRIST_KEYS.piece(color, kind, square);
    }

    /// Retira os direitos ligados a uma casa de origem do rei ou de canto.
    #[inline(always)]
    fn revoke_castling(&mut self, square: Square) {
        match square {
            E1 => self.castling[0] = CastlingRights::NONE,
            A1 => self.castling[0].queenside = false,
            H1 => self.castling[0].kingside = false,
            E8 => self.castling[1] = CastlingRights::NONE,
            A8 => self.castling[1].queenside = false,
            H8 => self.castling[1].kingside = false,
            _ => {}
        }
    }

    // ========================================================================
    // MAKE / UNMAKE
    // ========================================================================

    /// Aplica um lance pseudo-legal. Devolve `true` se o rei de quem jogou não
    /// ficou em xeque. O tabuleiro é alterado em qualquer caso: o chamador tem
    /// de chamar `unmake` mesmo quando o lance é ilegal.
    pub fn make(&mut self, mv: Move, state: &mut IrreversibleState) -> bool {
        debug_assert!(!mv.is_null());
        *state = self.irreversible();

        let keys = &*ZOBRIST_KEYS;
        let us = self.turn;
        let them = !us;
        let from = mv.from();
        let to = mv.to();
        let piece = mv.performer();
        let old_castling = self.castling;

        if let Some(ep) = self.en_passant.take() {
            self.key ^= keys.en_passant_file(ep);
        }

        if mv.is_capture() {
            let captured_square = if mv.is_en_passant() {
                (to as i8 - us.forward()) as Square
            } else {
                to
            };
            state.captured = self.kind_on(captured_square, them);
            debug_assert_eq!(state.captured, mv.captured(), "peça capturada não coincide em {}", mv);
            if let Some(victim) = state.captured {
                self.toggle_piece_hashed(them, victim, captured_square);
            }
        }

        self.toggle_piece_hashed(us, piece, from);
        self.toggle_piece_hashed(us, mv.promoted().unwrap_or(piece), to);

        if piece == PieceKind::King {
            self.king_square[us.index()] = to;
            if mv.is_castle() {
                let (rook_from, rook_to) = castle_rook_squares(to);
                self.toggle_piece_hashed(us, PieceKind::Rook, rook_from);
                self.toggle_piece_hashed(us, PieceKind::Rook, rook_to);
            }
        }

        self.revoke_castling(from);
        self.revoke_castling(to);
        if self.castling != old_castling {
            for color in Color::BOTH {
                self.key ^= keys.castling_rights(color, old_castling[color.index()]);
                self.key ^= keys.castling_rights(color, self.castling[color.index()]);
            }
        }

        if piece == PieceKind::Pawn && (from ^ to) == 16 {
            let ep = (from + to) / 2;
            self.en_passant = Some(ep);
            self.key ^= keys.en_passant_file(ep);
        }

        if mv.is_capture() || piece == PieceKind::Pawn {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock = self.halfmove_clock.saturating_add(1);
        }
        if us == Color::Black {
            self.fullmove_count += 1;
        }

        self.turn = them;
        self.key ^= keys.side_to_move;

        !self.is_square_attacked(self.king_square[us.index()], them)
    }

    /// Desfaz exatamente o `make` correspondente.
    pub fn unmake(&mut self, mv: Move, state: &IrreversibleState) {
        self.turn = !self.turn;
        let us = self.turn;
        let from = mv.from();
        let to = mv.to();
        let piece = mv.performer();

        self.toggle_piece(us, mv.promoted().unwrap_or(piece), to);
        self.toggle_piece(us, piece, from);

        if piece == PieceKind::King {
            self.king_square[us.index()] = from;
            if mv.is_castle() {
                let (rook_from, rook_to) = castle_rook_squares(to);
                self.toggle_piece(us, PieceKind::Rook, rook_to);
                self.toggle_piece(us, PieceKind::Rook, rook_from);
            }
        }

        if let Some(victim) = state.captured {
            let captured_square = if mv.is_en_passant() {
                (to as i8 - us.forward()) as Square
            } else {
                to
            };
            self.toggle_piece(!us, victim, captured_square);
        }

        if us == Color::Black {
            self.fullmove_count -= 1;
        }
        self.en_passant = state.en_passant;
        self.halfmove_clock = state.halfmove_clock;
        self.castling = state.castling;
        self.key = state.key;
    }

    /// Passa a vez sem mover peças (poda de lance nulo).
    pub fn make_null(&mut self, state: &mut IrreversibleState) {
        *state = self.irreversible();
        if let Some(ep) = self.en_passant.take() {
            self.key ^= ZOBRIST_KEYS.en_passant_file(ep);
        }
        self.turn = !self.turn;
        self.key ^= ZOBRIST_KEYS.side_to_move;
    }

    pub fn unmake_null(&mut self, state: &IrreversibleState) {
        self.turn = !self.turn;
        self.en_passant = state.en_passant;
        self.key = state.key;
    }

    // ========================================================================
    // CONSULTAS DE ATAQUE
    // ========================================================================

    /// Peças de `by` que atacam `square` com a ocupação dada.
    #[inline]
    pub fn attacks_to(&self, square: Square, by: Color, occupancy: Bitboard) -> Bitboard {
        let c = by.index();
        let bishops_queens = self.pieces[c][PieceKind::Bishop.index()] | self.pieces[c][PieceKind::Queen.index()];
        let rooks_queens = self.pieces[c][PieceKind::Rook.index()] | self.pieces[c][PieceKind::Queen.index()];

        (pawn_attacks(!by, square) & self.pieces[c][PieceKind::Pawn.index()])
            | (knight_attacks(square) & self.pieces[c][PieceKind::Knight.index()])
            | (king_attacks(square) & self.pieces[c][PieceKind::King.index()])
            | (get_bishop_attacks(square, occupancy) & bishops_queens)
            | (get_rook_attacks(square, occupancy) & rooks_queens)
    }

    /// Verdadeiro se `square` está atacada por `by`. Pára na primeira categoria
    /// de atacante encontrada.
    #[inline]
    pub fn is_square_attacked(&self, square: Square, by: Color) -> bool {
        let c = by.index();
        if pawn_attacks(!by, square) & self.pieces[c][PieceKind::Pawn.index()] != 0 {
            return true;
        }
        if knight_attacks(square) & self.pieces[c][PieceKind::Knight.index()] != 0 {
            return true;
        }
        if king_attacks(square) & self.pieces[c][PieceKind::King.index()] != 0 {
            return true;
        }
        let occupancy = self.occupied();
        let queens = self.pieces[c][PieceKind::Queen.index()];
        if get_bishop_attacks(square, occupancy) & (self.pieces[c][PieceKind::Bishop.index()] | queens) != 0 {
            return true;
        }
        get_rook_attacks(square, occupancy) & (self.pieces[c][PieceKind::Rook.index()] | queens) != 0
    }

    #[inline]
    pub fn is_in_check(&self, color: Color) -> bool {
        self.is_square_attacked(self.king_square[color.index()], !color)
    }

    /// Conta fontes de xeque entre categorias e pára ao chegar a duas.
    pub fn is_in_double_check(&self, color: Color) -> bool {
        let king = self.king_square[color.index()];
        let them = !color;
        let t = them.index();
        let occupancy = self.occupied();
        let queens = self.pieces[t][PieceKind::Queen.index()];

        let categories = [
            pawn_attacks(color, king) & self.pieces[t][PieceKind::Pawn.index()],
            knight_attacks(king) & self.pieces[t][PieceKind::Knight.index()],
            get_bishop_attacks(king, occupancy) & (self.pieces[t][PieceKind::Bishop.index()] | queens),
            get_rook_attacks(king, occupancy) & (self.pieces[t][PieceKind::Rook.index()] | queens),
        ];

        let mut count = 0;
        for attackers in categories {
            count += popcount(attackers);
            if count >= 2 {
                return true;
            }
        }
        false
    }

    /// Peças que dão xeque ao rei de `color`: devolve apenas a primeira
    /// categoria não vazia (peões, cavalos, diagonais, linhas).
    pub fn checkers(&self, color: Color) -> Bitboard {
        let king = self.king_square[color.index()];
        let t = (!color).index();
        let occupancy = self.occupied();
        let queens = self.pieces[t][PieceKind::Queen.index()];

        let pawns = pawn_attacks(color, king) & self.pieces[t][PieceKind::Pawn.index()];
        if pawns != 0 {
            return pawns;
        }
        let knights = knight_attacks(king) & self.pieces[t][PieceKind::Knight.index()];
        if knights != 0 {
            return knights;
        }
        let diagonal = get_bishop_attacks(king, occupancy) & (self.pieces[t][PieceKind::Bishop.index()] | queens);
        if diagonal != 0 {
            return diagonal;
        }
        get_rook_attacks(king, occupancy) & (self.pieces[t][PieceKind::Rook.index()] | queens)
    }

    /// Ataques de uma peça de `kind` em `square` com a ocupação dada.
    #[inline]
    pub fn piece_attacks(kind: PieceKind, color: Color, square: Square, occupancy: Bitboard) -> Bitboard {
        match kind {
            PieceKind::Pawn => pawn_attacks(color, square),
            PieceKind::Knight => knight_attacks(square),
            PieceKind::Bishop => get_bishop_attacks(square, occupancy),
            PieceKind::Rook => get_rook_attacks(square, occupancy),
            PieceKind::Queen => get_queen_attacks(square, occupancy),
            PieceKind::King => king_attacks(square),
        }
    }

    // ========================================================================
    // ROQUE E PSEUDO-LEGALIDADE
    // ========================================================================

    /// Condições do roque: direito ativo, rei e torre nas casas de origem,
    /// casas intermédias vazias e nenhuma casa do trajeto do rei atacada.
    pub fn can_castle(&self, color: Color, kingside: bool) -> bool {
        let rights = self.castling[color.index()];
        if (kingside && !rights.kingside) || (!kingside && !rights.queenside) {
            return false;
        }

        let (king_from, rook_square, empty, path) = match (color, kingside) {
            (Color::White, true) => (E1, H1, square_bb(F1) | square_bb(G1), [F1, G1]),
            (Color::White, false) => (E1, A1, square_bb(B1) | square_bb(C1) | square_bb(D1), [D1, C1]),
            (Color::Black, true) => (E8, H8, square_bb(F8) | square_bb(G8), [F8, G8]),
            (Color::Black, false) => (E8, A8, square_bb(B8) | square_bb(C8) | square_bb(D8), [D8, C8]),
        };

        let them = !color;
        self.king_square[color.index()] == king_from
            && self.pieces(color, PieceKind::Rook).has(rook_square)
            && self.occupied() & empty == 0
            && !self.is_square_attacked(king_from, them)
            && path.iter().all(|&sq| !self.is_square_attacked(sq, them))
    }

    /// Verifica se um lance (vindo da TT, killer ou countermove) pode ter sido
    /// gerado nesta posição. Não verifica se deixa o rei em xeque.
    pub fn is_pseudo_legal(&self, mv: Move) -> bool {
        if mv.is_null() {
            return false;
        }
        let us = self.turn;
        let them = !us;
        let from = mv.from();
        let to = mv.to();
        let piece = mv.performer();

        if !self.pieces(us, piece).has(from) || self.color_bb(us).has(to) {
            return false;
        }

        if mv.is_castle() {
            let kingside = mv.is_short_castle();
            let expected_to = match (us, kingside) {
                (Color::White, true) => G1,
                (Color::White, false) => C1,
                (Color::Black, true) => G8,
                (Color::Black, false) => C8,
            };
            return piece == PieceKind::King && to == expected_to && self.can_castle(us, kingside);
        }

        if mv.is_en_passant() {
            return piece == PieceKind::Pawn
                && self.en_passant == Some(to)
                && pawn_attacks(us, from).has(to);
        }

        if mv.is_capture() {
            let victim = self.kind_on(to, them);
            if victim.is_none() || victim != mv.captured() || victim == Some(PieceKind::King) {
                return false;
            }
        } else if self.color_bb(them).has(to) {
            return false;
        }

        if piece == PieceKind::Pawn {
            let back_rank = if us == Color::White { RANK_8 } else { RANK_1 };
            if back_rank.has(to) != mv.is_promotion() {
                return false;
            }
            if mv.is_capture() {
                return pawn_attacks(us, from).has(to);
            }
            let push = (from as i8 + us.forward()) as Square;
            if to == push {
                return true;
            }
            let start_rank = if us == Color::White { RANK_2 } else { RANK_7 };
            let double = (push as i8 + us.forward()) as Square;
            return start_rank.has(from) && to == double && !self.occupied().has(push);
        }

        if mv.is_promotion() {
            return false;
        }

        let attacks = Self::piece_attacks(piece, us, from, self.occupied());
        if !attacks.has(to) {
            return false;
        }
        piece != PieceKind::King || !king_attacks(self.king_square(them)).has(to)
    }

    /// Lê um lance em notação de coordenadas ("e2e4", "a7a8q") e devolve o lance
    /// legal correspondente, com a mesma codificação do gerador.
    pub fn parse_move(&self, text: &str) -> Result<Move, MoveParseError> {
        let text = text.trim();
        let well_formed = text.is_ascii()
            && (text.len() == 4 || text.len() == 5)
            && parse_square(&text[0..2]).is_some()
            && parse_square(&text[2..4]).is_some()
            && text[4..].chars().all(|c| "nbrq".contains(c));
        if !well_formed {
            return Err(MoveParseError::Malformed(text.to_string()));
        }

        let mut list = MoveList::new();
        generate_pseudo_legal_moves::<All>(self, &mut list);
        let mut scratch = *self;
        let mut state = IrreversibleState::default();

        for mv in list.iter() {
            if mv.to_string() != text {
                continue;
            }
            let legal = scratch.make(mv, &mut state);
            scratch.unmake(mv, &state);
            if legal {
                return Ok(mv);
            }
        }
        Err(MoveParseError::Illegal(text.to_string()))
    }

    /// Lista dos lances legais (gerar e filtrar com make/unmake).
    pub fn legal_moves(&self) -> Vec<Move> {
        let mut list = MoveList::new();
        generate_pseudo_legal_moves::<All>(self, &mut list);
        let mut scratch = *self;
        let mut state = IrreversibleState::default();
        list.iter()
            .filter(|&mv| {
                let legal = scratch.make(mv, &mut state);
                scratch.unmake(mv, &state);
                legal
            })
            .collect()
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::startpos()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0..8u8).rev() {
            write!(f, "{} ", rank + 1)?;
            for file in 0..8u8 {
                let c = self.piece_on(rank * 8 + file).map_or('.', Piece::to_char);
                write!(f, "{} ", c)?;
            }
            writeln!(f)?;
        }
        writeln!(f, "  a b c d e f g h")?;
        writeln!(f, "FEN: {}", self.to_fen())?;
        write!(f, "Key: {:016x}", self.key)
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Position({})", self.to_fen())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(fen: &str) -> Position {
        Position::from_fen(fen).expect("FEN de teste válido")
    }

    fn assert_roundtrip(position: &Position, depth: u32) {
        if depth == 0 {
            return;
        }
        let mut list = MoveList::new();
        generate_pseudo_legal_moves::<All>(position, &mut list);
        for mv in list.iter() {
            let mut child = *position;
            let mut state = IrreversibleState::default();
            let legal = child.make(mv, &mut state);
            assert_eq!(child.key(), child.compute_key(), "chave incremental após {}", mv);
            if legal {
                assert_roundtrip(&child, depth - 1);
            }
            child.unmake(mv, &state);
            assert_eq!(child, *position, "unmake não restaurou a posição após {}", mv);
        }
    }

    #[test]
    fn test_make_unmake_roundtrip_startpos() {
        assert_roundtrip(&Position::startpos(), 3);
    }

    #[test]
    fn test_make_unmake_roundtrip_kiwipete() {
        let kiwipete = pos("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1");
        assert_roundtrip(&kiwipete, 2);
    }

    #[test]
    fn test_make_unmake_promotions_and_en_passant() {
        // Promoções com captura, en passant e roques disponíveis
        let p = pos("r3k2r/1P4P1/8/3pP3/8/8/6p1/R3K2R w KQkq d6 0 1");
        assert_roundtrip(&p, 2);
    }

    #[test]
    fn test_null_move_roundtrip() {
        let mut p = pos("rnbqkbnr/ppp1pppp/8/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 3");
        let before = p;
        let mut state = IrreversibleState::default();
        p.make_null(&mut state);
        assert_eq!(p.turn(), Color::Black);
        assert_eq!(p.en_passant(), None);
        assert_eq!(p.key(), p.compute_key());
        p.unmake_null(&state);
        assert_eq!(p, before);
    }

    #[test]
    fn test_castling_moves_rook_and_revokes_rights() {
        let mut p = pos("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
        let mv = p.parse_move("e1g1").expect("roque legal");
        assert!(mv.is_short_castle());
        let mut state = IrreversibleState::default();
        assert!(p.make(mv, &mut state));
        assert!(p.pieces(Color::White, PieceKind::Rook).has(F1));
        assert!(!p.pieces(Color::White, PieceKind::Rook).has(H1));
        assert_eq!(p.king_square(Color::White), G1);
        assert_eq!(p.castling_rights(Color::White), CastlingRights::NONE);
        assert_eq!(p.castling_rights(Color::Black), CastlingRights::BOTH);
    }

    #[test]
    fn test_rook_capture_revokes_opponent_right() {
        let mut p = pos("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
        let mv = p.parse_move("a1a8").expect("captura legal");
        let mut state = IrreversibleState::default();
        assert!(p.make(mv, &mut state));
        assert_eq!(state.captured, Some(PieceKind::Rook));
        assert!(!p.castling_rights(Color::Black).queenside);
        assert!(p.castling_rights(Color::Black).kingside);
        assert!(!p.castling_rights(Color::White).queenside);
        assert_eq!(p.key(), p.compute_key());
    }

    #[test]
    fn test_make_reports_illegal_pinned_move() {
        // O cavalo em e2 está cravado pela torre em e8
        let mut p = pos("4r2k/8/8/8/8/8/4N3/4K3 w - - 0 1");
        let mv = Move::quiet(12, 29, PieceKind::Knight);
        let mut state = IrreversibleState::default();
        assert!(!p.make(mv, &mut state));
        p.unmake(mv, &state);
        assert_eq!(p, pos("4r2k/8/8/8/8/8/4N3/4K3 w - - 0 1"));
    }

    #[test]
    fn test_check_queries() {
        // Xeque duplo: torre em e8 e cavalo em d3
        let p = pos("4r2k/8/8/8/8/3n4/8/4K3 w - - 0 1");
        assert!(p.is_in_check(Color::White));
        assert!(p.is_in_double_check(Color::White));
        // Devolve só a primeira categoria (o cavalo)
        assert_eq!(p.checkers(Color::White), square_bb(19));

        let single = pos("4r2k/8/8/8/8/8/8/4K3 w - - 0 1");
        assert!(single.is_in_check(Color::White));
        assert!(!single.is_in_double_check(Color::White));
        assert_eq!(single.checkers(Color::White), square_bb(60));
        assert_eq!(single.attacks_to(4, Color::Black, single.occupied()), square_bb(60));
    }

    #[test]
    fn test_pseudo_legality_of_foreign_moves() {
        let p = Position::startpos();
        assert!(p.is_pseudo_legal(Move::quiet(12, 28, PieceKind::Pawn)));
        assert!(p.is_pseudo_legal(Move::quiet(6, 21, PieceKind::Knight)));
        // Bispo bloqueado pelos próprios peões
        assert!(!p.is_pseudo_legal(Move::quiet(5, 26, PieceKind::Bishop)));
        // Peça errada na origem
        assert!(!p.is_pseudo_legal(Move::quiet(12, 28, PieceKind::Knight)));
        // Captura sem vítima
        assert!(!p.is_pseudo_legal(Move::capture(12, 21, PieceKind::Pawn, PieceKind::Pawn)));
        // Roque sem casas livres
        assert!(!p.is_pseudo_legal(Move::castle(E1, G1, true)));
        assert!(!p.is_pseudo_legal(Move::NULL));
    }

    #[test]
    fn test_parse_move_errors() {
        let p = Position::startpos();
        assert_eq!(p.parse_move("e2e4").map(|m| m.to_string()), Ok("e2e4".to_string()));
        assert!(matches!(p.parse_move("e2e5"), Err(MoveParseError::Illegal(_))));
        assert!(matches!(p.parse_move("zz"), Err(MoveParseError::Malformed(_))));
        assert!(matches!(p.parse_move("e7e8x"), Err(MoveParseError::Malformed(_))));
    }

    #[test]
    fn test_halfmove_and_fullmove_counters() {
        let mut p = Position::startpos();
        let mut state = IrreversibleState::default();
        let mv = p.parse_move("g1f3").expect("legal");
        p.make(mv, &mut state);
        assert_eq!(p.halfmove_clock(), 1);
        assert_eq!(p.fullmove_count(), 1);
        let reply = p.parse_move("e7e5").expect("legal");
        p.make(reply, &mut state);
        assert_eq!(p.halfmove_clock(), 0);
        assert_eq!(p.fullmove_count(), 2);
        assert_eq!(p.en_passant(), Some(44));
    }
}
