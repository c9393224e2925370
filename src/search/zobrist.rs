//! Zobrist keys for position fingerprints.
//!
//! The keys are drawn once from a fixed-seed `StdRng`, so fingerprints are
//! deterministic across runs of the same build, which keeps searches and
//! tests reproducible.

use std::sync::OnceLock;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::game_state::chess_types::*;

const ZOBRIST_SEED: u64 = 0x9E37_79B9_7F4A_7C15;

#[derive(Debug)]
struct ZobristTables {
    piece_square: [[[u64; 64]; 6]; 2],
    side_to_move: u64,
    castling: [u64; 16],
    en_passant_file: [u64; 8],
}

static TABLES: OnceLock<ZobristTables> = OnceLock::new();

#[inline]
fn tables() -> &'static ZobristTables {
    TABLES.get_or_init(build_tables)
}

fn build_tables() -> ZobristTables {
    let mut rng = StdRng::seed_from_u64(ZOBRIST_SEED);

    let mut piece_square = [[[0u64; 64]; 6]; 2];
    for color in &mut piece_square {
        for piece in color {
            for key in piece {
                *key = rng.random();
            }
        }
    }

    let side_to_move = rng.random();

    // Index 0 (no rights) stays zero so a rights-free position hashes only
    // its pieces and side.
    let mut castling = [0u64; 16];
    for key in castling.iter_mut().skip(1) {
        *key = rng.random();
    }

    let mut en_passant_file = [0u64; 8];
    for key in &mut en_passant_file {
        *key = rng.random();
    }

    ZobristTables {
        piece_square,
        side_to_move,
        castling,
        en_passant_file,
    }
}

#[inline]
pub fn piece_square_key(piece: Piece, square: Square) -> u64 {
    tables().piece_square[piece.color.index()][piece.kind.index()][square as usize]
}

#[inline]
pub fn castling_key(castling_rights: CastlingRights) -> u64 {
    tables().castling[castling_rights.bits()]
}

#[inline]
pub fn en_passant_key(square: Square) -> u64 {
    tables().en_passant_file[square_file(square) as usize]
}

/// Toggled in whenever black is to move.
#[inline]
pub fn side_to_move_key() -> u64 {
    tables().side_to_move
}

/// Compute the full fingerprint from scratch.
///
/// `GameState` maintains the same value incrementally; this is the reference
/// it is checked against.
pub fn compute_zobrist_key(game_state: &GameState) -> u64 {
    let mut key = 0u64;

    for (square, occupant) in game_state.squares.iter().enumerate() {
        if let Some(piece) = occupant {
            key ^= piece_square_key(*piece, square as Square);
        }
    }

    if game_state.side_to_move == Color::Black {
        key ^= side_to_move_key();
    }

    key ^= castling_key(game_state.castling_rights);

    if let Some(ep_square) = game_state.en_passant_square {
        key ^= en_passant_key(ep_square);
    }

    key
}
