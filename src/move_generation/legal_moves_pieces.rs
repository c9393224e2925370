//! Pseudo-legal knight, bishop, rook, and queen moves.
//!
//! Knights leap via the precomputed table; sliders ray-cast and stop at the
//! first occupied square, which is kept only when it holds an enemy piece.

use crate::game_state::chess_types::*;
use crate::move_generation::legal_move_shared::{push_moves_to_targets, target_mask};
use crate::moves::attack_tables::{bishop_attacks, knight_attacks, queen_attacks, rook_attacks};
use crate::moves::chess_move::Move;

pub fn generate_knight_moves(game_state: &GameState, captures_only: bool, out: &mut Vec<Move>) {
    generate_for_kind(game_state, PieceKind::Knight, captures_only, out, |sq, _| {
        knight_attacks(sq)
    });
}

pub fn generate_bishop_moves(game_state: &GameState, captures_only: bool, out: &mut Vec<Move>) {
    generate_for_kind(game_state, PieceKind::Bishop, captures_only, out, bishop_attacks);
}

pub fn generate_rook_moves(game_state: &GameState, captures_only: bool, out: &mut Vec<Move>) {
    generate_for_kind(game_state, PieceKind::Rook, captures_only, out, rook_attacks);
}

pub fn generate_queen_moves(game_state: &GameState, captures_only: bool, out: &mut Vec<Move>) {
    generate_for_kind(game_state, PieceKind::Queen, captures_only, out, queen_attacks);
}

fn generate_for_kind(
    game_state: &GameState,
    kind: PieceKind,
    captures_only: bool,
    out: &mut Vec<Move>,
    attacks: impl Fn(Square, u64) -> u64,
) {
    let targets = target_mask(game_state, captures_only);
    let occupancy = game_state.occupancy_all();

    let mut pieces = game_state.pieces(game_state.side_to_move(), kind);
    while pieces != 0 {
        let from = pieces.trailing_zeros() as Square;
        push_moves_to_targets(game_state, from, kind, attacks(from, occupancy) & targets, out);
        pieces &= pieces - 1;
    }
}
