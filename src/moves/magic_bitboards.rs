// Ficheiro: src/moves/magic_bitboards.rs
// Descrição: Magic bitboards para torres e bispos e a tabela "entre casas".
//
// Os números mágicos são procurados na inicialização com um gerador de semente
// fixa; cada candidato só é aceite depois de verificado contra o ray casting,
// por isso as tabelas são sempre corretas e iguais em todas as execuções.

use crate::core::bitboard::*;
use crate::core::types::Square;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::OnceLock;

// ============================================================================
// ESTRUTURAS FUNDAMENTAIS PARA MAGIC BITBOARDS
// ============================================================================

/// Dados de magic bitboard para uma casa.
#[derive(Debug, Clone, Copy, Default)]
pub struct MagicBitboard {
    pub mask: Bitboard,
    pub magic: u64,
    pub shift: u8,
    pub offset: usize,
}

impl MagicBitboard {
    #[inline(always)]
    pub fn index(&self, occupancy: Bitboard) -> usize {
        self.offset + (((occupancy & self.mask).wrapping_mul(self.magic)) >> self.shift) as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slider {
    Bishop,
    Rook,
}

impl Slider {
    const fn directions(self) -> [(i8, i8); 4] {
        match self {
            Slider::Bishop => [(1, 1), (1, -1), (-1, 1), (-1, -1)],
            Slider::Rook => [(1, 0), (-1, 0), (0, 1), (0, -1)],
        }
    }
}

/// Tabelas de ataque das peças deslizantes, construídas uma única vez.
pub struct SlidingTables {
    rook_magics: [MagicBitboard; 64],
    bishop_magics: [MagicBitboard; 64],
    rook_attacks: Vec<Bitboard>,
    bishop_attacks: Vec<Bitboard>,
    between: Vec<[Bitboard; 64]>,
}

static SLIDING_TABLES: OnceLock<SlidingTables> = OnceLock::new();

// Sementes fixas da procura dos números mágicos.
const ROOK_SEED: u64 = 0x5eed_0001;
const BISHOP_SEED: u64 = 0x5eed_0002;

// ============================================================================
// GERAÇÃO DE MÁSCARAS E ATAQUES (RAY CASTING)
// ============================================================================

/// Ataques por ray casting: a referência usada para construir e testar as tabelas.
pub fn slider_attacks_naive(slider: Slider, square: Square, occupancy: Bitboard) -> Bitboard {
    let mut attacks = 0;
    let rank = (square / 8) as i8;
    let file = (square % 8) as i8;

    for (dr, df) in slider.directions() {
        let (mut r, mut f) = (rank + dr, file + df);
        while (0..8).contains(&r) && (0..8).contains(&f) {
            let bb = square_bb((r * 8 + f) as Square);
            attacks |= bb;
            if occupancy & bb != 0 {
                break;
            }
            r += dr;
            f += df;
        }
    }
    attacks
}

/// Máscara de ocupação relevante: os raios sem a última casa de cada direção.
pub fn relevant_mask(slider: Slider, square: Square) -> Bitboard {
    let mut mask = 0;
    let rank = (square / 8) as i8;
    let file = (square % 8) as i8;

    for (dr, df) in slider.directions() {
        let (mut r, mut f) = (rank + dr, file + df);
        // Só conta a casa se a seguinte ainda estiver no tabuleiro
        while (0..8).contains(&(r + dr)) && (0..8).contains(&(f + df)) {
            mask |= square_bb((r * 8 + f) as Square);
            r += dr;
            f += df;
        }
    }
    mask
}

/// Candidato com poucos bits a 1, que converge mais depressa.
fn sparse_random(rng: &mut StdRng) -> u64 {
    rng.gen::<u64>() & rng.gen::<u64>() & rng.gen::<u64>()
}

// ============================================================================
// INICIALIZAÇÃO DAS TABELAS
// ============================================================================

fn find_magics(slider: Slider, seed: u64, table: &mut Vec<Bitboard>) -> [MagicBitboard; 64] {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut magics = [MagicBitboard::default(); 64];
    let mut occupancies = Vec::with_capacity(4096);
    let mut reference = Vec::with_capacity(4096);
    let mut epoch = vec![0u32; 4096];

    for square in 0..64u8 {
        let mask = relevant_mask(slider, square);
        let bits = popcount(mask);
        let size = 1usize << bits;

        // Enumera todos os subconjuntos da máscara (carry-rippler)
        occupancies.clear();
        reference.clear();
        let mut subset: Bitboard = 0;
        loop {
            occupancies.push(subset);
            reference.push(slider_attacks_naive(slider, square, subset));
            subset = subset.wrapping_sub(mask) & mask;
            if subset == 0 {
                break;
            }
        }

        let offset = table.len();
        table.resize(offset + size, 0);
        epoch[..size].fill(0);
        let shift = (64 - bits) as u8;
        let mut attempt = 0u32;

        loop {
            let magic = sparse_random(&mut rng);
            if (mask.wrapping_mul(magic) >> 56).count_ones() < 6 {
                continue;
            }
            attempt += 1;

            let mut ok = true;
            for (occupancy, attacks) in occupancies.iter().zip(reference.iter()) {
                let idx = (occupancy.wrapping_mul(magic) >> shift) as usize;
                if epoch[idx] < attempt {
                    epoch[idx] = attempt;
                    table[offset + idx] = *attacks;
                } else if table[offset + idx] != *attacks {
                    ok = false;
                    break;
                }
            }

            if ok {
                magics[square as usize] = MagicBitboard { mask, magic, shift, offset };
                break;
            }
        }
    }
    magics
}

fn build_between_table() -> Vec<[Bitboard; 64]> {
    let mut between = vec![[0u64; 64]; 64];
    let directions = [(1, 0), (-1, 0), (0, 1), (0, -1), (1, 1), (1, -1), (-1, 1), (-1, -1)];

    for from in 0..64u8 {
        let rank = (from / 8) as i8;
        let file = (from % 8) as i8;
        for (dr, df) in directions {
            let mut ray: Bitboard = 0;
            let (mut r, mut f) = (rank + dr, file + df);
            while (0..8).contains(&r) && (0..8).contains(&f) {
                let to = (r * 8 + f) as usize;
                between[from as usize][to] = ray;
                ray |= 1u64 << to;
                r += dr;
                f += df;
            }
        }
    }
    between
}

impl SlidingTables {
    fn new() -> Self {
        let mut rook_attacks = Vec::with_capacity(102_400);
        let mut bishop_attacks = Vec::with_capacity(5_248);
        let rook_magics = find_magics(Slider::Rook, ROOK_SEED, &mut rook_attacks);
        let bishop_magics = find_magics(Slider::Bishop, BISHOP_SEED, &mut bishop_attacks);

        log::info!(
            "magic bitboards prontos: {} entradas de torre, {} de bispo",
            rook_attacks.len(),
            bishop_attacks.len()
        );

        SlidingTables {
            rook_magics,
            bishop_magics,
            rook_attacks,
            bishop_attacks,
            between: build_between_table(),
        }
    }
}

#[inline(always)]
fn tables() -> &'static SlidingTables {
    SLIDING_TABLES.get_or_init(SlidingTables::new)
}

/// Força a construção das tabelas (chamado no arranque dos binários para que
/// a primeira busca não pague o custo).
pub fn init_magic_bitboards() {
    let _ = tables();
}

// ============================================================================
// FUNÇÕES PÚBLICAS DE ALTA PERFORMANCE
// ============================================================================

#[inline(always)]
pub fn get_rook_attacks(square: Square, occupancy: Bitboard) -> Bitboard {
    let t = tables();
    t.rook_attacks[t.rook_magics[square as usize].index(occupancy)]
}

#[inline(always)]
pub fn get_bishop_attacks(square: Square, occupancy: Bitboard) -> Bitboard {
    let t = tables();
    t.bishop_attacks[t.bishop_magics[square as usize].index(occupancy)]
}

#[inline(always)]
pub fn get_queen_attacks(square: Square, occupancy: Bitboard) -> Bitboard {
    get_rook_attacks(square, occupancy) | get_bishop_attacks(square, occupancy)
}

/// Casas estritamente entre `a` e `b` numa linha, coluna ou diagonal comum;
/// vazio se não estiverem alinhadas.
#[inline(always)]
pub fn between(a: Square, b: Square) -> Bitboard {
    tables().between[a as usize][b as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check_every_subset(slider: Slider) {
        for square in 0..64u8 {
            let mask = relevant_mask(slider, square);
            let mut subset: Bitboard = 0;
            loop {
                let expected = slider_attacks_naive(slider, square, subset);
                let got = match slider {
                    Slider::Rook => get_rook_attacks(square, subset),
                    Slider::Bishop => get_bishop_attacks(square, subset),
                };
                assert_eq!(got, expected, "{:?} em {} com ocupação {:#x}", slider, square, subset);
                subset = subset.wrapping_sub(mask) & mask;
                if subset == 0 {
                    break;
                }
            }
        }
    }

    #[test]
    fn test_rook_magics_match_ray_casting() {
        check_every_subset(Slider::Rook);
    }

    #[test]
    fn test_bishop_magics_match_ray_casting() {
        check_every_subset(Slider::Bishop);
    }

    #[test]
    fn test_outside_mask_occupancy_is_ignored() {
        // Peças nas bordas e fora dos raios não alteram o índice
        let occupancy = FILE_A | RANK_8 | square_bb(27);
        assert_eq!(get_rook_attacks(0, occupancy), slider_attacks_naive(Slider::Rook, 0, occupancy));
        assert_eq!(get_bishop_attacks(0, occupancy), slider_attacks_naive(Slider::Bishop, 0, occupancy));
    }

    #[test]
    fn test_relevant_bits() {
        assert_eq!(popcount(relevant_mask(Slider::Rook, 0)), 12);
        assert_eq!(popcount(relevant_mask(Slider::Rook, 27)), 10);
        assert_eq!(popcount(relevant_mask(Slider::Bishop, 27)), 9);
        assert_eq!(popcount(relevant_mask(Slider::Bishop, 0)), 6);
    }

    #[test]
    fn test_between() {
        // a1-h8: b2..g7
        assert_eq!(popcount(between(0, 63)), 6);
        assert_eq!(between(4, 7), square_bb(5) | square_bb(6));
        assert_eq!(between(4, 5), 0);
        // cavalo: sem alinhamento
        assert_eq!(between(1, 18), 0);
        assert_eq!(between(60, 4), between(4, 60));
    }
}
