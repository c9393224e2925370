use crate::game_state::chess_rules::{castling_rook_squares, king_home};
use crate::game_state::chess_types::*;
use crate::move_generation::legal_move_checks::is_square_attacked;
use crate::move_generation::legal_move_shared::{push_moves_to_targets, target_mask};
use crate::moves::attack_tables::king_attacks;
use crate::moves::chess_move::{Move, MoveKind};

pub fn generate_king_moves(game_state: &GameState, captures_only: bool, out: &mut Vec<Move>) {
    let side = game_state.side_to_move();
    let king_bb = game_state.pieces(side, PieceKind::King);
    if king_bb == 0 {
        return;
    }

    let from = king_bb.trailing_zeros() as Square;
    let targets = king_attacks(from) & target_mask(game_state, captures_only);
    push_moves_to_targets(game_state, from, PieceKind::King, targets, out);

    if !captures_only {
        generate_castling_moves(game_state, from, out);
    }
}

fn generate_castling_moves(game_state: &GameState, king_from: Square, out: &mut Vec<Move>) {
    let side = game_state.side_to_move();
    let enemy = side.opposite();
    let home = king_home(side);
    let rights = game_state.castling_rights();

    if king_from != home
        || !(rights.contains(CastlingRights::kingside(side))
            || rights.contains(CastlingRights::queenside(side)))
    {
        return;
    }
    // Cannot castle out of check.
    if is_square_attacked(game_state, king_from, enemy) {
        return;
    }

    let candidates = [
        (CastlingRights::kingside(side), home + 2, MoveKind::KingSideCastle),
        (CastlingRights::queenside(side), home - 2, MoveKind::QueenSideCastle),
    ];

    for (right, king_to, kind) in candidates {
        if !rights.contains(right) {
            continue;
        }

        let (rook_from, rook_to) = castling_rook_squares(king_to);
        if game_state.piece_at(rook_from) != Some(Piece::new(side, PieceKind::Rook)) {
            continue;
        }

        // Every square strictly between king and rook must be empty.
        let (low, high) = (home.min(rook_from), home.max(rook_from));
        let between = (low + 1..high).fold(0u64, |mask, sq| mask | (1u64 << sq));
        if game_state.occupancy_all() & between != 0 {
            continue;
        }

        // The king passes over the rook's destination square.
        if is_square_attacked(game_state, rook_to, enemy)
            || is_square_attacked(game_state, king_to, enemy)
        {
            continue;
        }

        out.push(Move::quiet(king_from, king_to, PieceKind::King).with_kind(kind));
    }
}
