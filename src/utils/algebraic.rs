//! Square conversions for long algebraic coordinates.
//!
//! Converts between human-readable coordinates (e.g., `e4`) and internal
//! square indices reused by FEN and move-notation components.

use crate::errors::MoveParseError;
use crate::game_state::chess_types::{square_file, square_rank, Square};

/// Convert long algebraic notation (for example: "e4") to a square index.
#[inline]
pub fn algebraic_to_square(square: &str) -> Result<Square, MoveParseError> {
    let bytes = square.as_bytes();
    if bytes.len() != 2 {
        return Err(MoveParseError::Square(square.to_owned()));
    }

    let file = bytes[0];
    let rank = bytes[1];

    if !(b'a'..=b'h').contains(&file) || !(b'1'..=b'8').contains(&rank) {
        return Err(MoveParseError::Square(square.to_owned()));
    }

    Ok((rank - b'1') * 8 + (file - b'a'))
}

/// Convert a square index (`0..=63`) to long algebraic notation (for example: "e4").
#[inline]
pub fn square_to_algebraic(square: Square) -> Result<String, MoveParseError> {
    if square > 63 {
        return Err(MoveParseError::Square(square.to_string()));
    }

    let file_char = char::from(b'a' + square_file(square));
    let rank_char = char::from(b'1' + square_rank(square));

    Ok(format!("{file_char}{rank_char}"))
}
