// Ficheiro: src/core/zobrist.rs
// Descrição: Chaves Zobrist para o hash incremental das posições.

use super::types::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Semente fixa: as chaves são iguais em todas as execuções.
const ZOBRIST_SEED: u64 = 0xfff;

pub struct ZobristKeys {
    pub pieces: [[[u64; 64]; 6]; 2], // [color][piece_type][square]
    pub castling: [[u64; 2]; 2],     // [color][0 = curto, 1 = longo]
    pub en_passant: [u64; 8],        // Para en passant por coluna
    pub side_to_move: u64,           // Para quem joga
}

impl ZobristKeys {
    pub fn new() -> Self {
        let mut rng = StdRng::seed_from_u64(ZOBRIST_SEED);
        let mut keys = ZobristKeys {
            pieces: [[[0; 64]; 6]; 2],
            castling: [[0; 2]; 2],
            en_passant: [0; 8],
            side_to_move: 0,
        };

        for color in keys.pieces.iter_mut() {
            for piece in color.iter_mut() {
                for key in piece.iter_mut() {
                    *key = rng.gen();
                }
            }
        }
        for color in keys.castling.iter_mut() {
            color[0] = rng.gen();
            color[1] = rng.gen();
        }
        for key in keys.en_passant.iter_mut() {
            *key = rng.gen();
        }
        keys.side_to_move = rng.gen();

        keys
    }

    #[inline(always)]
    pub fn piece(&self, color: Color, kind: PieceKind, square: Square) -> u64 {
        self.pieces[color.index()][kind.index()][square as usize]
    }

    /// Combinação das chaves para os direitos de roque de uma cor.
    #[inline(always)]
    pub fn castling_rights(&self, color: Color, rights: CastlingRights) -> u64 {
        let keys = &self.castling[color.index()];
        let mut key = 0;
        if rights.kingside {
            key ^= keys[0];
        }
        if rights.queenside {
            key ^= keys[1];
        }
        key
    }

    #[inline(always)]
    pub fn en_passant_file(&self, square: Square) -> u64 {
        self.en_passant[(square & 7) as usize]
    }
}

impl Default for ZobristKeys {
    fn default() -> Self {
        Self::new()
    }
}

// Instância global das chaves Zobrist
lazy_static::lazy_static! {
    pub static ref ZOBRIST_KEYS: ZobristKeys = ZobristKeys::new();
}
