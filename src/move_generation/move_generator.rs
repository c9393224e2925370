//! Move generation entry points.
//!
//! `generate_pseudo_legal_moves` fills a caller-owned buffer in a fixed order
//! (pawns, knights, bishops, rooks, queens, king); legality against self-check
//! is the caller's job, done here by `generate_legal_moves` through
//! apply, king-attack test, undo.

use crate::game_state::chess_types::*;
use crate::move_generation::legal_move_checks::is_king_in_check;
use crate::move_generation::legal_moves_king::generate_king_moves;
use crate::move_generation::legal_moves_pawn::generate_pawn_moves;
use crate::move_generation::legal_moves_pieces::{
    generate_bishop_moves, generate_knight_moves, generate_queen_moves, generate_rook_moves,
};
use crate::moves::chess_move::Move;

/// Append every pseudo-legal move for the side to move to `out`.
///
/// `out` is cleared first so a buffer can be reused across calls.
pub fn generate_pseudo_legal_moves(game_state: &GameState, captures_only: bool, out: &mut Vec<Move>) {
    out.clear();
    generate_pawn_moves(game_state, captures_only, out);
    generate_knight_moves(game_state, captures_only, out);
    generate_bishop_moves(game_state, captures_only, out);
    generate_rook_moves(game_state, captures_only, out);
    generate_queen_moves(game_state, captures_only, out);
    generate_king_moves(game_state, captures_only, out);
}

/// Keep only the moves of `pseudo` that do not leave the mover's king attacked.
pub fn filter_legal_moves(game_state: &mut GameState, pseudo: &[Move]) -> Vec<Move> {
    let mover = game_state.side_to_move();
    let mut legal = Vec::with_capacity(pseudo.len());
    for &mv in pseudo {
        let undo = game_state.apply_move(mv);
        let illegal = is_king_in_check(game_state, mover);
        game_state.undo_move(mv, undo);
        if !illegal {
            legal.push(mv);
        }
    }
    legal
}

/// Legal moves in generation order. The position is restored before returning.
pub fn generate_legal_moves(game_state: &mut GameState) -> Vec<Move> {
    let mut pseudo = Vec::with_capacity(64);
    generate_pseudo_legal_moves(game_state, false, &mut pseudo);
    filter_legal_moves(game_state, &pseudo)
}

/// Legal captures only (en passant and capture-promotions included).
pub fn generate_legal_captures(game_state: &mut GameState) -> Vec<Move> {
    let mut pseudo = Vec::with_capacity(16);
    generate_pseudo_legal_moves(game_state, true, &mut pseudo);
    filter_legal_moves(game_state, &pseudo)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn start_position_has_twenty_pseudo_legal_moves() {
        let game = GameState::new_game();
        let mut moves = Vec::new();
        generate_pseudo_legal_moves(&game, false, &mut moves);
        assert_eq!(moves.len(), 20);
    }

    #[test]
    fn generation_is_deterministic() {
        let game = GameState::new_game();
        let mut first = Vec::new();
        let mut second = Vec::new();
        generate_pseudo_legal_moves(&game, false, &mut first);
        generate_pseudo_legal_moves(&game, false, &mut second);
        assert_eq!(first, second);
    }

    #[test]
    fn captures_only_is_subset_of_full_generation() {
        let game = GameState::from_fen("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1")
            .expect("FEN should parse");
        let mut all = Vec::new();
        let mut captures = Vec::new();
        generate_pseudo_legal_moves(&game, false, &mut all);
        generate_pseudo_legal_moves(&game, true, &mut captures);

        assert!(!captures.is_empty());
        assert!(captures.iter().all(|m| m.is_capture() && all.contains(m)));
        assert_eq!(captures.len(), all.iter().filter(|m| m.is_capture()).count());
    }

    #[test]
    fn no_move_lands_on_a_friendly_piece_along_random_games() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..30 {
            let mut game = GameState::new_game();
            for _ in 0..40 {
                let side = game.side_to_move();
                let mut pseudo = Vec::new();
                generate_pseudo_legal_moves(&game, false, &mut pseudo);
                for mv in &pseudo {
                    assert_eq!(game.occupancy(side) & (1u64 << mv.to), 0, "{mv} hits own piece");
                }

                let legal = generate_legal_moves(&mut game);
                if legal.is_empty() {
                    break;
                }
                game.apply_move(legal[rng.random_range(0..legal.len())]);
            }
        }
    }

    #[test]
    fn pinned_piece_moves_are_filtered_out() {
        // Knight on e2 is pinned by the rook on e8.
        let mut game = GameState::from_fen("4r1k1/8/8/8/8/8/4N3/4K3 w - - 0 1").expect("FEN should parse");
        let legal = generate_legal_moves(&mut game);
        assert!(legal.iter().all(|m| m.piece != PieceKind::Knight));
        assert!(!legal.is_empty());
    }

    #[test]
    fn checkmated_side_has_no_legal_moves() {
        // Fool's mate.
        let mut game = GameState::from_fen("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3")
            .expect("FEN should parse");
        assert!(game.in_check());
        assert!(generate_legal_moves(&mut game).is_empty());
    }
}
