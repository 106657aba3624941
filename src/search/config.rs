// Ficheiro: src/search/config.rs
// Descrição: Parâmetros ajustáveis da busca.

use crate::engine::tt::DEFAULT_HASH_MB;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    /// Tamanho da tabela de transposição em MB.
    pub hash_mb: usize,
    pub null_move: bool,
    /// Redução R do lance nulo (a busca reduzida corre a `depth - R - 1`).
    pub null_move_reduction: i32,
    /// Quantos meios-lances para trás a deteção de repetições percorre.
    pub repetition_window: usize,
    /// Ignora na quiescência capturas com troca estática negativa.
    pub see_pruning: bool,
    /// Relógio e flag de paragem são consultados quando `nodes & mask == 0`.
    pub node_check_mask: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            hash_mb: DEFAULT_HASH_MB,
            null_move: true,
            null_move_reduction: 2,
            repetition_window: 100,
            see_pruning: true,
            node_check_mask: 4095,
        }
    }
}

impl SearchConfig {
    /// Configuração sem podas que alteram a árvore (lance nulo, SEE), usada
    /// para comparar com um minimax exaustivo.
    pub fn exhaustive() -> Self {
        SearchConfig {
            null_move: false,
            see_pruning: false,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SearchConfig::default();
        assert_eq!(config.hash_mb, 128);
        assert_eq!(config.null_move_reduction, 2);
        assert_eq!(config.node_check_mask + 1, 4096);
        assert!(config.null_move && config.see_pruning);
        assert!(!SearchConfig::exhaustive().null_move);
    }
}
