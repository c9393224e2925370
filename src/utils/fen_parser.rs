//! FEN-to-GameState parser.
//!
//! Builds fully-populated incremental state from a Forsyth-Edwards Notation
//! string: mailbox, piece bitboards, occupancies, rights, clocks, and the
//! fingerprint. The result is checked for the invariants the rest of the
//! engine relies on (one king per side, no pawns on back ranks, side not to
//! move not in check).

use crate::errors::FenError;
use crate::game_state::chess_types::*;
use crate::move_generation::legal_move_checks::is_king_in_check;
use crate::search::zobrist::compute_zobrist_key;
use crate::utils::algebraic::{algebraic_to_square, square_to_algebraic};

/// Parse a FEN record. The halfmove clock and fullmove number may be
/// omitted, defaulting to `0` and `1`.
pub fn parse_fen(fen: &str) -> Result<GameState, FenError> {
    let mut parts = fen.split_whitespace();

    let board_part = parts.next().ok_or(FenError::MissingField("board layout"))?;
    let side_part = parts.next().ok_or(FenError::MissingField("side to move"))?;
    let castling_part = parts.next().ok_or(FenError::MissingField("castling rights"))?;
    let en_passant_part = parts.next().ok_or(FenError::MissingField("en-passant square"))?;
    let halfmove_part = parts.next();
    let fullmove_part = parts.next();

    if let Some(extra) = parts.next() {
        return Err(FenError::TrailingField(extra.to_owned()));
    }

    let mut game_state = GameState::new_empty();

    parse_board(board_part, &mut game_state)?;
    game_state.side_to_move = parse_side_to_move(side_part)?;
    game_state.castling_rights = parse_castling_rights(castling_part)?;
    game_state.en_passant_square =
        parse_en_passant_square(en_passant_part, game_state.side_to_move)?;
    game_state.halfmove_clock = match halfmove_part {
        Some(text) => parse_counter("halfmove", text)?,
        None => 0,
    };
    game_state.fullmove_number = match fullmove_part {
        Some(text) => parse_counter("fullmove", text)?.max(1),
        None => 1,
    };

    validate(&game_state)?;
    game_state.zobrist_key = compute_zobrist_key(&game_state);

    Ok(game_state)
}

fn parse_board(board_part: &str, game_state: &mut GameState) -> Result<(), FenError> {
    let ranks: Vec<&str> = board_part.split('/').collect();
    if ranks.len() != 8 {
        return Err(FenError::RankCount(ranks.len()));
    }

    for (fen_rank_idx, rank_str) in ranks.iter().enumerate() {
        let board_rank = 7 - fen_rank_idx;
        let mut file = 0usize;

        for ch in rank_str.chars() {
            if let Some(empty_count) = ch.to_digit(10) {
                if !(1..=8).contains(&empty_count) {
                    return Err(FenError::RankWidth { rank: board_rank + 1 });
                }
                file += empty_count as usize;
                if file > 8 {
                    return Err(FenError::RankWidth { rank: board_rank + 1 });
                }
                continue;
            }

            let piece = Piece::from_fen_char(ch).ok_or(FenError::InvalidPiece(ch))?;
            if file >= 8 {
                return Err(FenError::RankWidth { rank: board_rank + 1 });
            }

            game_state.put_piece((board_rank * 8 + file) as Square, piece);
            file += 1;
        }

        if file != 8 {
            return Err(FenError::RankWidth { rank: board_rank + 1 });
        }
    }

    Ok(())
}

fn parse_side_to_move(side_part: &str) -> Result<Color, FenError> {
    match side_part {
        "w" => Ok(Color::White),
        "b" => Ok(Color::Black),
        other => Err(FenError::InvalidSide(other.to_owned())),
    }
}

fn parse_castling_rights(castling_part: &str) -> Result<CastlingRights, FenError> {
    if castling_part == "-" {
        return Ok(CastlingRights::NONE);
    }

    let mut rights = CastlingRights::NONE;
    for ch in castling_part.chars() {
        let right = match ch {
            'K' => CastlingRights::WHITE_KINGSIDE,
            'Q' => CastlingRights::WHITE_QUEENSIDE,
            'k' => CastlingRights::BLACK_KINGSIDE,
            'q' => CastlingRights::BLACK_QUEENSIDE,
            other => return Err(FenError::InvalidCastling(other)),
        };
        rights.insert(right);
    }
    Ok(rights)
}

/// The en-passant square must sit on the rank a double push just crossed.
fn parse_en_passant_square(
    en_passant_part: &str,
    side_to_move: Color,
) -> Result<Option<Square>, FenError> {
    if en_passant_part == "-" {
        return Ok(None);
    }

    let square = algebraic_to_square(en_passant_part)
        .map_err(|_| FenError::InvalidEnPassant(en_passant_part.to_owned()))?;
    let expected_rank = match side_to_move {
        Color::White => 5,
        Color::Black => 2,
    };
    if square_rank(square) != expected_rank {
        return Err(FenError::InvalidEnPassant(en_passant_part.to_owned()));
    }
    Ok(Some(square))
}

fn parse_counter(field: &'static str, text: &str) -> Result<u16, FenError> {
    text.parse::<u16>().map_err(|_| FenError::InvalidCounter {
        field,
        value: text.to_owned(),
    })
}

fn validate(game_state: &GameState) -> Result<(), FenError> {
    for (color, name) in [(Color::White, "white"), (Color::Black, "black")] {
        if game_state.pieces(color, PieceKind::King).count_ones() != 1 {
            return Err(FenError::KingCount(name));
        }
    }

    const BACK_RANKS: u64 = 0xFF00_0000_0000_00FF;
    let pawns = game_state.pieces(Color::White, PieceKind::Pawn)
        | game_state.pieces(Color::Black, PieceKind::Pawn);
    if pawns & BACK_RANKS != 0 {
        return Err(FenError::PawnOnBackRank);
    }

    if is_king_in_check(game_state, game_state.side_to_move.opposite()) {
        return Err(FenError::OpponentInCheck);
    }

    // The en-passant target must be empty, with the pawn that just
    // double-pushed standing directly beyond it.
    if let Some(ep_square) = game_state.en_passant_square {
        let pusher = game_state.side_to_move.opposite();
        let pawn_square = match pusher {
            Color::White => ep_square + 8,
            Color::Black => ep_square - 8,
        };
        if game_state.piece_at(ep_square).is_some()
            || game_state.piece_at(pawn_square) != Some(Piece::new(pusher, PieceKind::Pawn))
        {
            return Err(FenError::InvalidEnPassant(
                square_to_algebraic(ep_square).unwrap_or_default(),
            ));
        }
    }

    Ok(())
}
