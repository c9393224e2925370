//! In-place make/unmake of a single move.
//!
//! `apply_move` updates every field of `GameState` (including the
//! fingerprint, incrementally) and returns an `UndoState`; `undo_move`
//! restores the exact prior state from the move plus that token.

use crate::game_state::chess_rules::castling_rook_squares;
use crate::game_state::chess_types::*;
use crate::moves::chess_move::{Move, MoveKind};
use crate::search::zobrist::{castling_key, en_passant_key, side_to_move_key};

/// Square of the pawn removed by an en-passant capture landing on `to`.
#[inline]
fn en_passant_victim_square(mover: Color, to: Square) -> Square {
    match mover {
        Color::White => to - 8,
        Color::Black => to + 8,
    }
}

/// Play `mv` on `game_state`.
///
/// # Panics
/// If `mv` does not describe the board: the side to move has no
/// `mv.piece` on `mv.from`, or the recorded capture is not where the move
/// says it is.
pub fn apply_move(game_state: &mut GameState, mv: Move) -> UndoState {
    let us = game_state.side_to_move;
    let them = us.opposite();
    let moving = Piece::new(us, mv.piece);

    assert_eq!(
        game_state.squares[mv.from as usize],
        Some(moving),
        "move {mv} does not match the piece on its from-square"
    );

    let mut undo = UndoState {
        captured: None,
        prev_castling_rights: game_state.castling_rights,
        prev_en_passant_square: game_state.en_passant_square,
        prev_halfmove_clock: game_state.halfmove_clock,
        prev_fullmove_number: game_state.fullmove_number,
        prev_zobrist_key: game_state.zobrist_key,
    };
    game_state.key_history.push(game_state.zobrist_key);

    if let Some(ep_square) = game_state.en_passant_square.take() {
        game_state.zobrist_key ^= en_passant_key(ep_square);
    }

    if let Some(captured) = mv.captured {
        let victim_square = if mv.kind == MoveKind::EnPassant {
            en_passant_victim_square(us, mv.to)
        } else {
            mv.to
        };
        let victim = game_state.remove_piece(victim_square);
        assert_eq!(
            victim,
            Piece::new(them, captured),
            "move {mv} records a capture that is not on the board"
        );
        undo.captured = Some(victim);
    }

    game_state.remove_piece(mv.from);
    let placed = mv.promotion.map_or(moving, |kind| Piece::new(us, kind));
    game_state.put_piece(mv.to, placed);

    if mv.is_castle() {
        let (rook_from, rook_to) = castling_rook_squares(mv.to);
        let rook = game_state.remove_piece(rook_from);
        game_state.put_piece(rook_to, rook);
    }

    let mut rights = game_state.castling_rights;
    if mv.piece == PieceKind::King {
        rights.remove(CastlingRights::both(us));
    }
    rights.remove(CastlingRights::for_rook_home(mv.from));
    rights.remove(CastlingRights::for_rook_home(mv.to));
    if rights != game_state.castling_rights {
        game_state.zobrist_key ^= castling_key(game_state.castling_rights) ^ castling_key(rights);
        game_state.castling_rights = rights;
    }

    if mv.kind == MoveKind::DoublePawnPush {
        let ep_square = (mv.from + mv.to) / 2;
        game_state.en_passant_square = Some(ep_square);
        game_state.zobrist_key ^= en_passant_key(ep_square);
    }

    if mv.piece == PieceKind::Pawn || mv.is_capture() {
        game_state.halfmove_clock = 0;
    } else {
        game_state.halfmove_clock = game_state.halfmove_clock.saturating_add(1);
    }
    if us == Color::Black {
        game_state.fullmove_number = game_state.fullmove_number.saturating_add(1);
    }

    game_state.side_to_move = them;
    game_state.zobrist_key ^= side_to_move_key();
    game_state.ply = game_state.ply.wrapping_add(1);

    undo
}

/// Reverse `apply_move(game_state, mv)` using the token it returned.
pub fn undo_move(game_state: &mut GameState, mv: Move, undo: UndoState) {
    let us = game_state.side_to_move.opposite();
    game_state.side_to_move = us;

    if mv.is_castle() {
        let (rook_from, rook_to) = castling_rook_squares(mv.to);
        let rook = game_state.remove_piece(rook_to);
        game_state.put_piece(rook_from, rook);
    }

    game_state.remove_piece(mv.to);
    game_state.put_piece(mv.from, Piece::new(us, mv.piece));

    if let Some(victim) = undo.captured {
        let victim_square = if mv.kind == MoveKind::EnPassant {
            en_passant_victim_square(us, mv.to)
        } else {
            mv.to
        };
        game_state.put_piece(victim_square, victim);
    }

    game_state.castling_rights = undo.prev_castling_rights;
    game_state.en_passant_square = undo.prev_en_passant_square;
    game_state.halfmove_clock = undo.prev_halfmove_clock;
    game_state.fullmove_number = undo.prev_fullmove_number;
    game_state.zobrist_key = undo.prev_zobrist_key;
    game_state.ply = game_state.ply.wrapping_sub(1);
    game_state.key_history.pop();
}
