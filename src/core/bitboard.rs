// Ficheiro: src/core/bitboard.rs
// Descrição: Primitivas de bitboard: máscaras constantes, deslocamentos com
// proteção de bordas e iteração destrutiva pelo bit menos significativo.

use super::types::Square;

// Um Bitboard é um inteiro de 64 bits sem sinal. Cada bit representa uma casa.
// Bit 0 = a1, Bit 1 = b1, ..., Bit 63 = h8.
pub type Bitboard = u64;

// ============================================================================
// MÁSCARAS CONSTANTES
// ============================================================================

pub const EMPTY: Bitboard = 0;
pub const FULL: Bitboard = !0;

pub const FILE_A: Bitboard = 0x0101_0101_0101_0101;
pub const FILE_B: Bitboard = FILE_A << 1;
pub const FILE_G: Bitboard = FILE_A << 6;
pub const FILE_H: Bitboard = FILE_A << 7;

pub const RANK_1: Bitboard = 0xff;
pub const RANK_2: Bitboard = RANK_1 << 8;
pub const RANK_3: Bitboard = RANK_1 << 16;
pub const RANK_4: Bitboard = RANK_1 << 24;
pub const RANK_5: Bitboard = RANK_1 << 32;
pub const RANK_6: Bitboard = RANK_1 << 40;
pub const RANK_7: Bitboard = RANK_1 << 48;
pub const RANK_8: Bitboard = RANK_1 << 56;

pub const NOT_A_FILE: Bitboard = !FILE_A;
pub const NOT_H_FILE: Bitboard = !FILE_H;
pub const NOT_AB_FILE: Bitboard = !(FILE_A | FILE_B);
pub const NOT_GH_FILE: Bitboard = !(FILE_G | FILE_H);

/// Casas das bordas, excluídas das máscaras de ocupação relevante.
pub const EDGES: Bitboard = FILE_A | FILE_H | RANK_1 | RANK_8;

#[inline(always)]
pub const fn square_bb(square: Square) -> Bitboard {
    1u64 << square
}

#[inline(always)]
pub const fn file_of(square: Square) -> u8 {
    square & 7
}

#[inline(always)]
pub const fn rank_of(square: Square) -> u8 {
    square >> 3
}

// ============================================================================
// DESLOCAMENTOS (um passo em cada direção, sem wrap-around)
// ============================================================================

#[inline(always)]
pub const fn north(bb: Bitboard) -> Bitboard {
    bb << 8
}

#[inline(always)]
pub const fn south(bb: Bitboard) -> Bitboard {
    bb >> 8
}

#[inline(always)]
pub const fn east(bb: Bitboard) -> Bitboard {
    (bb << 1) & NOT_A_FILE
}

#[inline(always)]
pub const fn west(bb: Bitboard) -> Bitboard {
    (bb >> 1) & NOT_H_FILE
}

#[inline(always)]
pub const fn north_east(bb: Bitboard) -> Bitboard {
    (bb << 9) & NOT_A_FILE
}

#[inline(always)]
pub const fn north_west(bb: Bitboard) -> Bitboard {
    (bb << 7) & NOT_H_FILE
}

#[inline(always)]
pub const fn south_east(bb: Bitboard) -> Bitboard {
    (bb >> 7) & NOT_A_FILE
}

#[inline(always)]
pub const fn south_west(bb: Bitboard) -> Bitboard {
    (bb >> 9) & NOT_H_FILE
}

// ============================================================================
// CONTAGEM E ITERAÇÃO
// ============================================================================

#[inline(always)]
pub const fn popcount(bb: Bitboard) -> u32 {
    bb.count_ones()
}

/// Índice do bit menos significativo. O bitboard não pode estar vazio.
#[inline(always)]
pub fn lsb(bb: Bitboard) -> Square {
    debug_assert!(bb != 0, "lsb de bitboard vazio");
    bb.trailing_zeros() as Square
}

/// Remove e retorna o LSB (scan-forward-and-clear).
#[inline(always)]
pub fn pop_lsb(bb: &mut Bitboard) -> Square {
    let square = lsb(*bb);
    *bb &= *bb - 1;
    square
}

#[inline(always)]
pub const fn more_than_one(bb: Bitboard) -> bool {
    bb & bb.wrapping_sub(1) != 0
}

/// Iterador destrutivo sobre as casas de um bitboard, do a1 para o h8.
pub struct SquareIter(Bitboard);

impl Iterator for SquareIter {
    type Item = Square;

    #[inline(always)]
    fn next(&mut self) -> Option<Square> {
        if self.0 == 0 {
            None
        } else {
            Some(pop_lsb(&mut self.0))
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.0.count_ones() as usize;
        (n, Some(n))
    }
}

/// Extensão para iterar bitboards com `for square in bb.squares()`.
pub trait BitboardExt {
    fn squares(self) -> SquareIter;
    fn has(self, square: Square) -> bool;
}

impl BitboardExt for Bitboard {
    #[inline(always)]
    fn squares(self) -> SquareIter {
        SquareIter(self)
    }

    #[inline(always)]
    fn has(self, square: Square) -> bool {
        self & square_bb(square) != 0
    }
}

/// Desenha o bitboard em ASCII, fila 8 no topo (útil para depuração).
pub fn pretty(bb: Bitboard) -> String {
    let mut out = String::with_capacity(8 * 18);
    for rank in (0..8u8).rev() {
        for file in 0..8u8 {
            out.push(if bb.has(rank * 8 + file) { 'X' } else { '.' });
            out.push(' ');
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shifts_do_not_wrap() {
        assert_eq!(east(FILE_H), 0);
        assert_eq!(west(FILE_A), 0);
        assert_eq!(north_east(FILE_H), 0);
        assert_eq!(south_west(FILE_A), 0);
        assert_eq!(north(RANK_8), 0);
        assert_eq!(south(RANK_1), 0);
        // a2 não tem vizinho a noroeste
        assert_eq!(north_west(square_bb(8)), 0);
        assert_eq!(north_west(square_bb(9)), square_bb(16));
    }

    #[test]
    fn test_pop_lsb_iterates_in_order() {
        let mut bb = square_bb(3) | square_bb(17) | square_bb(63);
        assert_eq!(pop_lsb(&mut bb), 3);
        assert_eq!(pop_lsb(&mut bb), 17);
        assert_eq!(pop_lsb(&mut bb), 63);
        assert_eq!(bb, 0);
    }

    #[test]
    fn test_squares_iterator_matches_popcount() {
        let bb = RANK_2 | FILE_H;
        assert_eq!(bb.squares().count() as u32, popcount(bb));
        assert!(more_than_one(bb));
        assert!(!more_than_one(square_bb(12)));
    }
}
