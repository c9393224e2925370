use crate::errors::MoveParseError;
use crate::game_state::chess_types::*;
use crate::move_generation::move_generator::generate_legal_moves;
use crate::moves::chess_move::Move;
use crate::utils::algebraic::algebraic_to_square;

/// Resolve long algebraic text (`e2e4`, `e7e8q`) against the legal moves of
/// `game_state`.
///
/// Syntax errors are reported before legality; a well-formed string that
/// names no legal move yields `MoveParseError::Illegal`. A promotion move
/// written without its piece letter is rejected rather than guessed.
pub fn parse_long_algebraic(text: &str, game_state: &GameState) -> Result<Move, MoveParseError> {
    if !text.is_ascii() || (text.len() != 4 && text.len() != 5) {
        return Err(MoveParseError::Length(text.to_owned()));
    }

    let from = algebraic_to_square(&text[0..2])?;
    let to = algebraic_to_square(&text[2..4])?;
    let promotion = match text[4..].chars().next() {
        Some(ch) => match PieceKind::from_char(ch) {
            Some(kind) if PieceKind::PROMOTIONS.contains(&kind) => Some(kind),
            _ => return Err(MoveParseError::Promotion(ch)),
        },
        None => None,
    };

    let mut scratch = game_state.clone();
    generate_legal_moves(&mut scratch)
        .into_iter()
        .find(|mv| mv.from == from && mv.to == to && mv.promotion == promotion)
        .ok_or_else(|| MoveParseError::Illegal(text.to_owned()))
}
