//! Error types for every fallible boundary of the engine.
//!
//! Malformed external input is reported through these types and recovered by
//! the caller. Internal invariant violations are not errors: they panic.

use thiserror::Error;

/// The position text could not be turned into a legal `GameState`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FenError {
    #[error("missing {0} field")]
    MissingField(&'static str),
    #[error("unexpected trailing field '{0}'")]
    TrailingField(String),
    #[error("board layout must contain 8 ranks, found {0}")]
    RankCount(usize),
    #[error("rank {rank} does not describe exactly 8 files")]
    RankWidth { rank: usize },
    #[error("invalid piece character '{0}'")]
    InvalidPiece(char),
    #[error("invalid side-to-move field '{0}'")]
    InvalidSide(String),
    #[error("invalid castling character '{0}'")]
    InvalidCastling(char),
    #[error("invalid en-passant square '{0}'")]
    InvalidEnPassant(String),
    #[error("invalid {field} counter '{value}'")]
    InvalidCounter { field: &'static str, value: String },
    #[error("expected exactly one {0} king")]
    KingCount(&'static str),
    #[error("pawn placed on a back rank")]
    PawnOnBackRank,
    #[error("side not to move is in check")]
    OpponentInCheck,
}

/// A long-algebraic move string that cannot be played in the given position.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveParseError {
    #[error("move text '{0}' must be 4 or 5 characters")]
    Length(String),
    #[error("invalid square '{0}'")]
    Square(String),
    #[error("invalid promotion piece '{0}'")]
    Promotion(char),
    #[error("move '{0}' is not legal in this position")]
    Illegal(String),
}

/// Failures surfaced by an `Engine` to the protocol layer.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("unknown option '{0}'")]
    UnknownOption(String),
    #[error("invalid value '{value}' for option '{name}'")]
    InvalidOptionValue { name: String, value: String },
}
