// Ficheiro: src/search/mod.rs
// Descrição: Busca alpha-beta e os tipos de pontuação partilhados.

pub mod alpha_beta;
pub mod config;
pub mod evaluation;
pub mod heuristics;
pub mod move_ordering;
pub mod quiescence;
pub mod see;
pub mod time_manager;

pub use alpha_beta::*;
pub use config::*;
pub use evaluation::*;
pub use heuristics::*;
pub use move_ordering::*;
pub use time_manager::*;

/// Pontuação em centipeões, relativa ao lado a jogar.
pub type Score = i32;
pub type Depth = i32;

/// Cabe num i16 (formato da entrada da TT).
pub const INFINITY: Score = 32_000;
pub const DRAW: Score = 0;

/// Profundidade máxima em plies (tamanho da árvore de nós).
pub const MAX_PLY: usize = 128;
pub const MAX_DEPTH: Depth = MAX_PLY as Depth - 1;

const MATE_THRESHOLD: Score = INFINITY - MAX_PLY as Score;

#[inline(always)]
pub fn is_mate_score(score: Score) -> bool {
    score.abs() > MATE_THRESHOLD
}

/// Pontuação de quem leva mate no ply `ply`: mates mais curtos valem mais.
#[inline(always)]
pub fn mated_in(ply: usize) -> Score {
    -INFINITY + ply as Score
}

/// Normaliza pontuações de mate para a TT (distância a partir deste nó).
#[inline(always)]
pub fn score_to_tt(score: Score, ply: usize) -> Score {
    if score > MATE_THRESHOLD {
        score + ply as Score
    } else if score < -MATE_THRESHOLD {
        score - ply as Score
    } else {
        score
    }
}

/// Inverso de `score_to_tt` para o ply de quem consulta.
#[inline(always)]
pub fn score_from_tt(score: Score, ply: usize) -> Score {
    if score > MATE_THRESHOLD {
        score - ply as Score
    } else if score < -MATE_THRESHOLD {
        score + ply as Score
    } else {
        score
    }
}

/// Formato UCI: "cp 35" ou "mate 3" / "mate -2" (em lances).
pub fn score_to_uci(score: Score) -> String {
    if is_mate_score(score) {
        let moves = if score > 0 {
            (INFINITY - score + 1) / 2
        } else {
            -(INFINITY + score) / 2
        };
        format!("mate {}", moves)
    } else {
        format!("cp {}", score)
    }
}
