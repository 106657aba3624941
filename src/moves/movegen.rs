// Ficheiro: src/moves/movegen.rs
// Descrição: Gerador de lances pseudo-legais, especializado por modo de geração.
//
// O modo é um tipo (Captures, Tacticals, Quiets, All) para que cada variante
// seja monomorfizada sem testes em tempo de execução.

use super::king::generate_king_moves;
use super::knight::generate_knight_moves;
use super::magic_bitboards::between;
use super::move_list::MoveList;
use super::pawn::generate_pawn_moves;
use super::sliding::generate_sliding_moves;
use crate::core::bitboard::*;
use crate::core::position::Position;
use crate::core::types::*;

/// Modo de geração.
pub trait GenType {
    /// Capturas e promoções a dama.
    const CAPTURES: bool;
    /// Lances sem captura, incluindo roques e sub-promoções.
    const QUIETS: bool;
    /// Capturas e todas as promoções.
    const TACTICALS: bool;
}

pub struct Captures;
pub struct Tacticals;
pub struct Quiets;
/// Capturas seguidas de lances silenciosos.
pub struct All;

impl GenType for Captures {
    const CAPTURES: bool = true;
    const QUIETS: bool = false;
    const TACTICALS: bool = false;
}

impl GenType for Tacticals {
    const CAPTURES: bool = false;
    const QUIETS: bool = false;
    const TACTICALS: bool = true;
}

impl GenType for Quiets {
    const CAPTURES: bool = false;
    const QUIETS: bool = true;
    const TACTICALS: bool = false;
}

impl GenType for All {
    const CAPTURES: bool = true;
    const QUIETS: bool = true;
    const TACTICALS: bool = false;
}

/// Emite um lance por casa de `targets`. Para capturas resolve a peça vítima.
#[inline]
pub(crate) fn push_targets(
    pos: &Position,
    list: &mut MoveList,
    kind: PieceKind,
    from: Square,
    targets: Bitboard,
    captures: bool,
) {
    if captures {
        let them = !pos.turn();
        for to in targets.squares() {
            if let Some(victim) = pos.kind_on(to, them) {
                list.push(Move::capture(from, to, kind, victim));
            }
        }
    } else {
        for to in targets.squares() {
            list.push(Move::quiet(from, to, kind));
        }
    }
}

/// Máscara de evasão: se o lado a jogar está em xeque, as peças que não são o
/// rei só podem capturar o atacante ou interpor-se entre ele e o rei.
#[inline]
fn evasion_mask(pos: &Position) -> (Bitboard, bool) {
    let us = pos.turn();
    let checkers = pos.checkers(us);
    if checkers == 0 {
        return (FULL, false);
    }
    let checker = lsb(checkers);
    (between(pos.king_square(us), checker) | square_bb(checker), true)
}

/// Acrescenta a `list` os lances pseudo-legais do modo `G`, sem limpar a lista.
pub fn generate_pseudo_legal_moves<G: GenType>(pos: &Position, list: &mut MoveList) {
    if G::CAPTURES && G::QUIETS {
        generate_pseudo_legal_moves::<Captures>(pos, list);
        generate_pseudo_legal_moves::<Quiets>(pos, list);
        return;
    }

    let us = pos.turn();
    let them = !us;
    let (evasion, in_check) = evasion_mask(pos);

    let captures = G::CAPTURES || G::TACTICALS;
    let targets = if captures {
        pos.color_bb(them) & !pos.pieces(them, PieceKind::King)
    } else {
        !pos.occupied()
    };

    generate_pawn_moves::<G>(pos, list, evasion);
    generate_knight_moves(pos, list, targets & evasion, captures);
    for kind in [PieceKind::Bishop, PieceKind::Rook, PieceKind::Queen] {
        generate_sliding_moves(pos, list, kind, targets & evasion, captures);
    }
    generate_king_moves::<G>(pos, list, targets, in_check);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generate<G: GenType>(fen: &str) -> MoveList {
        let pos = Position::from_fen(fen).expect("FEN de teste válido");
        let mut list = MoveList::new();
        generate_pseudo_legal_moves::<G>(&pos, &mut list);
        list
    }

    fn names(list: &MoveList) -> Vec<String> {
        let mut v: Vec<String> = list.iter().map(|m| m.to_string()).collect();
        v.sort();
        v
    }

    #[test]
    fn test_startpos_counts() {
        let fen = crate::core::position::STARTPOS_FEN;
        assert_eq!(generate::<All>(fen).len(), 20);
        assert_eq!(generate::<Quiets>(fen).len(), 20);
        assert_eq!(generate::<Captures>(fen).len(), 0);
        assert_eq!(generate::<Tacticals>(fen).len(), 0);
    }

    #[test]
    fn test_promotion_split_between_modes() {
        // Peão em b7 pode avançar ou capturar a torre em a8
        let fen = "r3k3/1P6/8/8/8/8/8/4K3 w - - 0 1";
        let captures = generate::<Captures>(fen);
        let cap_names = names(&captures);
        assert!(cap_names.contains(&"b7b8q".to_string()));
        assert!(!cap_names.contains(&"b7b8n".to_string()));
        for promo in ["b7a8q", "b7a8r", "b7a8b", "b7a8n"] {
            assert!(cap_names.contains(&promo.to_string()), "falta {}", promo);
        }

        let quiet_names = names(&generate::<Quiets>(fen));
        assert!(!quiet_names.contains(&"b7b8q".to_string()));
        for promo in ["b7b8r", "b7b8b", "b7b8n"] {
            assert!(quiet_names.contains(&promo.to_string()), "falta {}", promo);
        }

        let tactical_names = names(&generate::<Tacticals>(fen));
        assert_eq!(tactical_names.iter().filter(|m| m.starts_with("b7")).count(), 8);
        assert!(!tactical_names.iter().any(|m| m.starts_with("e1")));
    }

    #[test]
    fn test_all_is_captures_then_quiets() {
        let fen = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
        let all = generate::<All>(fen);
        let captures = generate::<Captures>(fen);
        let quiets = generate::<Quiets>(fen);
        assert_eq!(all.len(), captures.len() + quiets.len());
        assert_eq!(all.len(), 48);
        assert!(all.iter().take(captures.len()).all(|m| m.is_capture() || m.is_queen_promotion()));
    }

    #[test]
    fn test_en_passant_generated() {
        let list = generate::<Captures>("rnbqkbnr/ppp1pppp/8/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 3");
        let ep: Vec<Move> = list.iter().filter(|m| m.is_en_passant()).collect();
        assert_eq!(ep.len(), 1);
        assert_eq!(ep[0].to_string(), "e5d6");
    }

    #[test]
    fn test_castling_generation() {
        let list = generate::<Quiets>("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
        let castles: Vec<String> = list.iter().filter(|m| m.is_castle()).map(|m| m.to_string()).collect();
        assert_eq!(castles.len(), 2);
        assert!(castles.contains(&"e1g1".to_string()) && castles.contains(&"e1c1".to_string()));

        // Casa f1 atacada pelo bispo em c4: só o roque longo
        let list = generate::<Quiets>("r3k2r/8/8/8/2b5/8/8/R3K2R w KQkq - 0 1");
        let castles: Vec<String> = list.iter().filter(|m| m.is_castle()).map(|m| m.to_string()).collect();
        assert_eq!(castles, vec!["e1c1".to_string()]);
    }

    #[test]
    fn test_check_evasion_mask() {
        // Torre em e8 dá xeque: o cavalo só pode interpor-se em e2..e7 ou capturar
        let list = generate::<All>("4r2k/8/8/8/8/2N5/8/4K3 w - - 0 1");
        for mv in list.iter().filter(|m| m.performer() == PieceKind::Knight) {
            assert_eq!(file_of(mv.to()), 4, "lance de cavalo fora da coluna e: {}", mv);
        }
        assert!(names(&list).contains(&"c3e2".to_string()));
        assert!(names(&list).contains(&"c3e4".to_string()));
        assert!(!list.iter().any(|m| m.is_castle()));
    }

    #[test]
    fn test_kings_never_adjacent() {
        let list = generate::<All>("8/8/8/3k4/8/3K4/8/8 w - - 0 1");
        let king_targets: Vec<String> = names(&list);
        for forbidden in ["d3c4", "d3d4", "d3e4"] {
            assert!(!king_targets.contains(&forbidden.to_string()));
        }
        assert_eq!(list.len(), 5);
    }
}
