//! Perft: exhaustive leaf counting used to validate move generation.

use crate::game_state::chess_types::*;
use crate::move_generation::move_generator::generate_legal_moves;
use crate::moves::chess_move::MoveKind;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PerftCounts {
    pub nodes: u64,
    pub captures: u64,
    pub en_passant: u64,
    pub castles: u64,
    pub promotions: u64,
    pub checks: u64,
}

impl PerftCounts {
    fn merge(&mut self, rhs: PerftCounts) {
        self.nodes += rhs.nodes;
        self.captures += rhs.captures;
        self.en_passant += rhs.en_passant;
        self.castles += rhs.castles;
        self.promotions += rhs.promotions;
        self.checks += rhs.checks;
    }
}

/// Number of leaf nodes `depth` plies below `game_state`.
pub fn perft(game_state: &mut GameState, depth: u8) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = generate_legal_moves(game_state);
    if depth == 1 {
        return moves.len() as u64;
    }

    moves
        .into_iter()
        .map(|mv| {
            let mut child = game_state.play(mv);
            perft(&mut child, depth - 1)
        })
        .sum()
}

/// Leaf counts broken down by move category, as in published perft tables.
pub fn perft_detailed(game_state: &mut GameState, depth: u8) -> PerftCounts {
    if depth == 0 {
        return PerftCounts {
            nodes: 1,
            ..PerftCounts::default()
        };
    }

    let mut total = PerftCounts::default();
    for mv in generate_legal_moves(game_state) {
        let mut child = game_state.play(mv);
        if depth == 1 {
            total.nodes += 1;
            total.captures += u64::from(mv.is_capture());
            total.en_passant += u64::from(mv.kind == MoveKind::EnPassant);
            total.castles += u64::from(mv.is_castle());
            total.promotions += u64::from(mv.is_promotion());
            total.checks += u64::from(child.in_check());
        } else {
            total.merge(perft_detailed(&mut child, depth - 1));
        }
    }
    total
}

/// Per-root-move leaf counts in long algebraic notation, for diffing
/// against a reference engine.
pub fn perft_divide(game_state: &mut GameState, depth: u8) -> Vec<(String, u64)> {
    if depth == 0 {
        return Vec::new();
    }
    generate_legal_moves(game_state)
        .into_iter()
        .map(|mv| {
            let mut child = game_state.play(mv);
            (mv.to_long_algebraic(), perft(&mut child, depth - 1))
        })
        .collect()
}
