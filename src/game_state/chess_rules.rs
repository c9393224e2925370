//! Canonical chess-rule constants.
//!
//! Static rule-related literals: the standard starting position and the
//! board geometry of castling.

use crate::game_state::chess_types::{Color, Square};

/// Standard chess starting position in Forsyth-Edwards Notation (FEN).
pub const STARTING_POSITION_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Home square of each king.
#[inline]
pub const fn king_home(color: Color) -> Square {
    match color {
        Color::White => 4,
        Color::Black => 60,
    }
}

/// Rook (from, to) squares for a castle whose king lands on `king_to`.
#[inline]
pub fn castling_rook_squares(king_to: Square) -> (Square, Square) {
    match king_to {
        6 => (7, 5),
        2 => (0, 3),
        62 => (63, 61),
        58 => (56, 59),
        _ => unreachable!("square {king_to} is not a castling destination"),
    }
}

#[cfg(test)]
mod tests {
    use super::castling_rook_squares;

    #[test]
    fn rook_squares_for_each_castle() {
        assert_eq!(castling_rook_squares(6), (7, 5));
        assert_eq!(castling_rook_squares(58), (56, 59));
    }

    #[test]
    #[should_panic(expected = "square 4 is not a castling destination")]
    fn non_castling_destination_is_unreachable() {
        castling_rook_squares(4);
    }
}
