// Ficheiro: src/core/types.rs
// Descrição: Módulo para as definições de tipos de dados fundamentais do jogo.

use std::fmt;

/// Casa do tabuleiro, 0 = a1 ... 63 = h8. A ausência de casa é `Option::None`.
pub type Square = u8;

pub const A1: Square = 0;
pub const B1: Square = 1;
pub const C1: Square = 2;
pub const D1: Square = 3;
pub const E1: Square = 4;
pub const F1: Square = 5;
pub const G1: Square = 6;
pub const H1: Square = 7;
pub const A8: Square = 56;
pub const B8: Square = 57;
pub const C8: Square = 58;
pub const D8: Square = 59;
pub const E8: Square = 60;
pub const F8: Square = 61;
pub const G8: Square = 62;
pub const H8: Square = 63;

/// Converte uma casa para notação algébrica ("e4").
pub fn square_name(square: Square) -> String {
    let file = (square % 8) + b'a';
    let rank = (square / 8) + b'1';
    format!("{}{}", file as char, rank as char)
}

/// Lê uma casa em notação algébrica. Devolve `None` se o texto não for uma casa.
pub fn parse_square(text: &str) -> Option<Square> {
    let bytes = text.as_bytes();
    if bytes.len() != 2 {
        return None;
    }
    let file = bytes[0].checked_sub(b'a')?;
    let rank = bytes[1].checked_sub(b'1')?;
    if file < 8 && rank < 8 {
        Some(rank * 8 + file)
    } else {
        None
    }
}

// Enum para representar a cor de uma peça ou de um jogador.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub const BOTH: [Color; 2] = [Color::White, Color::Black];

    #[inline(always)]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Direção do avanço dos peões desta cor (em casas).
    #[inline(always)]
    pub const fn forward(self) -> i8 {
        match self {
            Color::White => 8,
            Color::Black => -8,
        }
    }
}

impl std::ops::Not for Color {
    type Output = Color;

    #[inline(always)]
    fn not(self) -> Self::Output {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
}

// Enum para representar o tipo de uma peça de xadrez.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    pub const ALL: [PieceKind; 6] = [
        PieceKind::Pawn,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
    ];

    #[inline(always)]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[inline(always)]
    pub const fn from_index(index: u32) -> Option<PieceKind> {
        match index {
            0 => Some(PieceKind::Pawn),
            1 => Some(PieceKind::Knight),
            2 => Some(PieceKind::Bishop),
            3 => Some(PieceKind::Rook),
            4 => Some(PieceKind::Queen),
            5 => Some(PieceKind::King),
            _ => None,
        }
    }

    /// Valor material em centipeões (usado pela avaliação material e pelo SEE).
    #[inline(always)]
    pub const fn value(self) -> i32 {
        match self {
            PieceKind::Pawn => 100,
            PieceKind::Knight => 300,
            PieceKind::Bishop => 300,
            PieceKind::Rook => 500,
            PieceKind::Queen => 900,
            PieceKind::King => 20000, // Valor alto para evitar trocas
        }
    }

    pub const fn to_char(self) -> char {
        match self {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        }
    }

    pub fn from_char(c: char) -> Option<PieceKind> {
        match c.to_ascii_lowercase() {
            'p' => Some(PieceKind::Pawn),
            'n' => Some(PieceKind::Knight),
            'b' => Some(PieceKind::Bishop),
            'r' => Some(PieceKind::Rook),
            'q' => Some(PieceKind::Queen),
            'k' => Some(PieceKind::King),
            _ => None,
        }
    }
}

// Struct para representar uma peça no tabuleiro, combinando o tipo e a cor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
}

impl Piece {
    pub fn new(kind: PieceKind, color: Color) -> Self {
        Piece { kind, color }
    }

    /// Letra FEN: maiúscula para as brancas, minúscula para as pretas.
    pub fn to_char(self) -> char {
        let c = self.kind.to_char();
        match self.color {
            Color::White => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }

    pub fn from_char(c: char) -> Option<Piece> {
        let kind = PieceKind::from_char(c)?;
        let color = if c.is_ascii_uppercase() { Color::White } else { Color::Black };
        Some(Piece { kind, color })
    }
}

/// Direitos de roque de uma cor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CastlingRights {
    pub kingside: bool,
    pub queenside: bool,
}

impl CastlingRights {
    pub const NONE: CastlingRights = CastlingRights { kingside: false, queenside: false };
    pub const BOTH: CastlingRights = CastlingRights { kingside: true, queenside: true };
}

// ============================================================================
// LANCE COMPACTADO
// ============================================================================
//
// Layout dos 32 bits:
//   0-5   origem          6-11  destino
//   12-14 peça que move   15-17 peça capturada (7 = nenhuma)
//   18-20 promoção (7 = nenhuma)
//   21 captura  22 en passant  23 roque curto  24 roque longo  25 promoção

const FROM_SHIFT: u32 = 0;
const TO_SHIFT: u32 = 6;
const PERFORMER_SHIFT: u32 = 12;
const CAPTURED_SHIFT: u32 = 15;
const PROMOTION_SHIFT: u32 = 18;
const PIECE_MASK: u32 = 0b111;
const NO_PIECE: u32 = 7;

const CAPTURE_FLAG: u32 = 1 << 21;
const EN_PASSANT_FLAG: u32 = 1 << 22;
const SHORT_CASTLE_FLAG: u32 = 1 << 23;
const LONG_CASTLE_FLAG: u32 = 1 << 24;
const PROMOTION_FLAG: u32 = 1 << 25;

/// Lance compactado num u32. `Move::NULL` (zero) representa "nenhum lance":
/// nenhum lance real tem origem igual ao destino.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Move(u32);

impl Move {
    pub const NULL: Move = Move(0);

    #[inline(always)]
    const fn pack(from: Square, to: Square, performer: PieceKind, captured: u32, promotion: u32, flags: u32) -> Move {
        Move(
            (from as u32) << FROM_SHIFT
                | (to as u32) << TO_SHIFT
                | (performer as u32) << PERFORMER_SHIFT
                | captured << CAPTURED_SHIFT
                | promotion << PROMOTION_SHIFT
                | flags,
        )
    }

    /// Lance silencioso (sem captura).
    #[inline(always)]
    pub const fn quiet(from: Square, to: Square, performer: PieceKind) -> Move {
        Self::pack(from, to, performer, NO_PIECE, NO_PIECE, 0)
    }

    #[inline(always)]
    pub const fn capture(from: Square, to: Square, performer: PieceKind, captured: PieceKind) -> Move {
        Self::pack(from, to, performer, captured as u32, NO_PIECE, CAPTURE_FLAG)
    }

    #[inline(always)]
    pub const fn en_passant(from: Square, to: Square) -> Move {
        Self::pack(
            from,
            to,
            PieceKind::Pawn,
            PieceKind::Pawn as u32,
            NO_PIECE,
            CAPTURE_FLAG | EN_PASSANT_FLAG,
        )
    }

    #[inline(always)]
    pub const fn promotion(from: Square, to: Square, promoted: PieceKind, captured: Option<PieceKind>) -> Move {
        match captured {
            Some(victim) => Self::pack(
                from,
                to,
                PieceKind::Pawn,
                victim as u32,
                promoted as u32,
                PROMOTION_FLAG | CAPTURE_FLAG,
            ),
            None => Self::pack(from, to, PieceKind::Pawn, NO_PIECE, promoted as u32, PROMOTION_FLAG),
        }
    }

    #[inline(always)]
    pub const fn castle(from: Square, to: Square, kingside: bool) -> Move {
        let flag = if kingside { SHORT_CASTLE_FLAG } else { LONG_CASTLE_FLAG };
        Self::pack(from, to, PieceKind::King, NO_PIECE, NO_PIECE, flag)
    }

    #[inline(always)]
    pub const fn from(self) -> Square {
        ((self.0 >> FROM_SHIFT) & 63) as Square
    }

    #[inline(always)]
    pub const fn to(self) -> Square {
        ((self.0 >> TO_SHIFT) & 63) as Square
    }

    /// Tipo da peça que move. Para `Move::NULL` devolve `Pawn`.
    #[inline(always)]
    pub fn performer(self) -> PieceKind {
        PieceKind::from_index((self.0 >> PERFORMER_SHIFT) & PIECE_MASK).unwrap_or(PieceKind::Pawn)
    }

    #[inline(always)]
    pub const fn captured(self) -> Option<PieceKind> {
        PieceKind::from_index((self.0 >> CAPTURED_SHIFT) & PIECE_MASK)
    }

    #[inline(always)]
    pub const fn promoted(self) -> Option<PieceKind> {
        PieceKind::from_index((self.0 >> PROMOTION_SHIFT) & PIECE_MASK)
    }

    #[inline(always)]
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }

    #[inline(always)]
    pub const fn is_capture(self) -> bool {
        self.0 & CAPTURE_FLAG != 0
    }

    #[inline(always)]
    pub const fn is_en_passant(self) -> bool {
        self.0 & EN_PASSANT_FLAG != 0
    }

    #[inline(always)]
    pub const fn is_short_castle(self) -> bool {
        self.0 & SHORT_CASTLE_FLAG != 0
    }

    #[inline(always)]
    pub const fn is_long_castle(self) -> bool {
        self.0 & LONG_CASTLE_FLAG != 0
    }

    #[inline(always)]
    pub const fn is_castle(self) -> bool {
        self.0 & (SHORT_CASTLE_FLAG | LONG_CASTLE_FLAG) != 0
    }

    #[inline(always)]
    pub const fn is_promotion(self) -> bool {
        self.0 & PROMOTION_FLAG != 0
    }

    #[inline(always)]
    pub fn is_queen_promotion(self) -> bool {
        self.promoted() == Some(PieceKind::Queen)
    }

    /// Lance que não é captura (inclui roques e sub-promoções sem captura).
    #[inline(always)]
    pub const fn is_quiet(self) -> bool {
        !self.is_capture()
    }

    /// Captura ou lance de peão: quebra qualquer sequência de repetição.
    #[inline(always)]
    pub fn is_irreversible(self) -> bool {
        self.is_capture() || self.performer() == PieceKind::Pawn
    }

    #[inline(always)]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

// Notação de coordenadas: "e2e4", "e7e8q"; o lance nulo é "0000".
impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            return write!(f, "0000");
        }
        write!(f, "{}{}", square_name(self.from()), square_name(self.to()))?;
        if let Some(p) = self.promoted() {
            write!(f, "{}", p.to_char())?;
        }
        Ok(())
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({})", self)
    }
}
