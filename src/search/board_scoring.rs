//! Pluggable static evaluation.
//!
//! Search stays independent of the heuristics by delegating static scoring
//! to the `Evaluator` trait. Scores are centipawns from White's point of view;
//! the search flips the sign for Black itself.

use crate::game_state::chess_types::*;

/// Magnitude of a mate-at-root score. Mate `n` plies away scores
/// `MATE_SCORE - n`.
pub const MATE_SCORE: i32 = 30000;

/// Scores at or beyond this magnitude encode a forced mate.
pub const MATE_THRESHOLD: i32 = MATE_SCORE - 1000;

/// Static position evaluation.
///
/// Implementations must be pure functions of the position: no hidden state
/// that would make two calls on the same position disagree.
pub trait Evaluator: Send + Sync {
    /// Centipawn score, positive when White is better.
    fn score(&self, game_state: &GameState) -> i32;
}

/// Score from the perspective of the side to move.
#[inline]
pub fn relative_score(evaluator: &dyn Evaluator, game_state: &GameState) -> i32 {
    let white_minus_black = evaluator.score(game_state);
    match game_state.side_to_move() {
        Color::White => white_minus_black,
        Color::Black => -white_minus_black,
    }
}

/// Plain material count.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaterialScorer;

impl MaterialScorer {
    #[inline]
    pub const fn piece_value(piece: PieceKind) -> i32 {
        match piece {
            PieceKind::Pawn => 100,
            PieceKind::Knight => 320,
            PieceKind::Bishop => 330,
            PieceKind::Rook => 500,
            PieceKind::Queen => 900,
            PieceKind::King => 20000,
        }
    }

    #[inline]
    fn material_balance_white_minus_black(game_state: &GameState) -> i32 {
        PieceKind::ALL
            .iter()
            .map(|&piece| {
                let white = game_state.pieces(Color::White, piece).count_ones() as i32;
                let black = game_state.pieces(Color::Black, piece).count_ones() as i32;
                (white - black) * Self::piece_value(piece)
            })
            .sum()
    }
}

impl Evaluator for MaterialScorer {
    fn score(&self, game_state: &GameState) -> i32 {
        Self::material_balance_white_minus_black(game_state)
    }
}

// Tables are laid out as seen from White's side of the board: the first row
// is rank 8, the last row rank 1.
#[rustfmt::skip]
const PAWN_TABLE: [i32; 64] = [
      0,   0,   0,   0,   0,   0,   0,   0,
     50,  50,  50,  50,  50,  50,  50,  50,
     10,  10,  20,  30,  30,  20,  10,  10,
      5,   5,  10,  25,  25,  10,   5,   5,
      0,   0,   0,  20,  20,   0,   0,   0,
      5,  -5, -10,   0,   0, -10,  -5,   5,
      5,  10,  10, -20, -20,  10,  10,   5,
      0,   0,   0,   0,   0,   0,   0,   0,
];

#[rustfmt::skip]
const KNIGHT_TABLE: [i32; 64] = [
    -50, -40, -30, -30, -30, -30, -40, -50,
    -40, -20,   0,   0,   0,   0, -20, -40,
    -30,   0,  10,  15,  15,  10,   0, -30,
    -30,   5,  15,  20,  20,  15,   5, -30,
    -30,   0,  15,  20,  20,  15,   0, -30,
    -30,   5,  10,  15,  15,  10,   5, -30,
    -40, -20,   0,   5,   5,   0, -20, -40,
    -50, -40, -30, -30, -30, -30, -40, -50,
];

#[rustfmt::skip]
const BISHOP_TABLE: [i32; 64] = [
    -20, -10, -10, -10, -10, -10, -10, -20,
    -10,   0,   0,   0,   0,   0,   0, -10,
    -10,   0,   5,  10,  10,   5,   0, -10,
    -10,   5,   5,  10,  10,   5,   5, -10,
    -10,   0,  10,  10,  10,  10,   0, -10,
    -10,  10,  10,  10,  10,  10,  10, -10,
    -10,   5,   0,   0,   0,   0,   5, -10,
    -20, -10, -10, -10, -10, -10, -10, -20,
];

#[rustfmt::skip]
const ROOK_TABLE: [i32; 64] = [
      0,   0,   0,   0,   0,   0,   0,   0,
      5,  10,  10,  10,  10,  10,  10,   5,
     -5,   0,   0,   0,   0,   0,   0,  -5,
     -5,   0,   0,   0,   0,   0,   0,  -5,
     -5,   0,   0,   0,   0,   0,   0,  -5,
     -5,   0,   0,   0,   0,   0,   0,  -5,
     -5,   0,   0,   0,   0,   0,   0,  -5,
      0,   0,   0,   5,   5,   0,   0,   0,
];

#[rustfmt::skip]
const QUEEN_TABLE: [i32; 64] = [
    -20, -10, -10,  -5,  -5, -10, -10, -20,
    -10,   0,   0,   0,   0,   0,   0, -10,
    -10,   0,   5,   5,   5,   5,   0, -10,
     -5,   0,   5,   5,   5,   5,   0,  -5,
      0,   0,   5,   5,   5,   5,   0,  -5,
    -10,   5,   5,   5,   5,   5,   0, -10,
    -10,   0,   5,   0,   0,   0,   0, -10,
    -20, -10, -10,  -5,  -5, -10, -10, -20,
];

#[rustfmt::skip]
const KING_TABLE: [i32; 64] = [
    -30, -40, -40, -50, -50, -40, -40, -30,
    -30, -40, -40, -50, -50, -40, -40, -30,
    -30, -40, -40, -50, -50, -40, -40, -30,
    -30, -40, -40, -50, -50, -40, -40, -30,
    -20, -30, -30, -40, -40, -30, -30, -20,
    -10, -20, -20, -20, -20, -20, -20, -10,
     20,  20,   0,   0,   0,   0,  20,  20,
     20,  30,  10,   0,   0,  10,  30,  20,
];

#[inline]
const fn piece_table(piece: PieceKind) -> &'static [i32; 64] {
    match piece {
        PieceKind::Pawn => &PAWN_TABLE,
        PieceKind::Knight => &KNIGHT_TABLE,
        PieceKind::Bishop => &BISHOP_TABLE,
        PieceKind::Rook => &ROOK_TABLE,
        PieceKind::Queen => &QUEEN_TABLE,
        PieceKind::King => &KING_TABLE,
    }
}

/// Table bonus for `piece` of `color` standing on `square`. Black reads the
/// same tables mirrored vertically.
#[inline]
pub fn piece_square_bonus(piece: PieceKind, color: Color, square: Square) -> i32 {
    let file = square_file(square) as usize;
    let rank = square_rank(square) as usize;
    let row = match color {
        Color::White => 7 - rank,
        Color::Black => rank,
    };
    piece_table(piece)[row * 8 + file]
}

/// Material, piece-square tables, and a bishop-pair bonus.
#[derive(Debug, Clone, Copy, Default)]
pub struct PieceSquareScorer;

impl PieceSquareScorer {
    pub const BISHOP_PAIR_BONUS: i32 = 30;

    fn positional_term(game_state: &GameState) -> i32 {
        let mut score = 0i32;
        for color in Color::ALL {
            let sign = if color == Color::White { 1 } else { -1 };
            for piece in PieceKind::ALL {
                let mut bb = game_state.pieces(color, piece);
                while bb != 0 {
                    let sq = bb.trailing_zeros() as Square;
                    score += sign * piece_square_bonus(piece, color, sq);
                    bb &= bb - 1;
                }
            }
        }
        score
    }

    fn bishop_pair_term(game_state: &GameState) -> i32 {
        let has_pair =
            |color| game_state.pieces(color, PieceKind::Bishop).count_ones() >= 2;
        let mut score = 0;
        if has_pair(Color::White) {
            score += Self::BISHOP_PAIR_BONUS;
        }
        if has_pair(Color::Black) {
            score -= Self::BISHOP_PAIR_BONUS;
        }
        score
    }
}

impl Evaluator for PieceSquareScorer {
    fn score(&self, game_state: &GameState) -> i32 {
        MaterialScorer::material_balance_white_minus_black(game_state)
            + Self::positional_term(game_state)
            + Self::bishop_pair_term(game_state)
    }
}

#[cfg(test)]
mod tests {
    use super::{relative_score, Evaluator, MaterialScorer, PieceSquareScorer};
    use crate::game_state::chess_types::GameState;

    #[test]
    fn material_scorer_is_white_positive() {
        let white_to_move =
            GameState::from_fen("4k3/8/8/8/8/8/8/4KQ2 w - - 0 1").expect("FEN should parse");
        let black_to_move =
            GameState::from_fen("4k3/8/8/8/8/8/8/4KQ2 b - - 0 1").expect("FEN should parse");

        let scorer = MaterialScorer;
        assert_eq!(scorer.score(&white_to_move), 900);
        assert_eq!(scorer.score(&black_to_move), 900);
        assert_eq!(relative_score(&scorer, &black_to_move), -900);
    }

    #[test]
    fn start_position_is_balanced() {
        let game = GameState::new_game();
        assert_eq!(MaterialScorer.score(&game), 0);
        assert_eq!(PieceSquareScorer.score(&game), 0);
    }

    #[test]
    fn mirrored_positions_score_opposite() {
        let white = GameState::from_fen("4k3/8/8/8/3N4/8/1P6/4K3 w - - 0 1").expect("FEN should parse");
        let black = GameState::from_fen("4k3/1p6/8/3n4/8/8/8/4K3 b - - 0 1").expect("FEN should parse");
        assert_eq!(PieceSquareScorer.score(&white), -PieceSquareScorer.score(&black));
        assert_eq!(
            relative_score(&PieceSquareScorer, &white),
            relative_score(&PieceSquareScorer, &black)
        );
    }

    #[test]
    fn piece_square_scorer_rewards_central_knight() {
        let center =
            GameState::from_fen("4k3/8/8/3N4/8/8/8/4K3 w - - 0 1").expect("FEN should parse");
        let rim = GameState::from_fen("4k3/8/8/8/8/8/N7/4K3 w - - 0 1").expect("FEN should parse");
        assert!(PieceSquareScorer.score(&center) > PieceSquareScorer.score(&rim));
    }

    #[test]
    fn advanced_pawn_scores_higher() {
        let advanced = GameState::from_fen("4k3/8/4P3/8/8/8/8/4K3 w - - 0 1").expect("FEN should parse");
        let home = GameState::from_fen("4k3/8/8/8/8/8/4P3/4K3 w - - 0 1").expect("FEN should parse");
        assert!(PieceSquareScorer.score(&advanced) > PieceSquareScorer.score(&home));
    }

    #[test]
    fn bishop_pair_earns_a_bonus() {
        let pair = GameState::from_fen("4k3/8/8/8/8/8/8/2B1KB2 w - - 0 1").expect("FEN should parse");
        let bishop_knight =
            GameState::from_fen("4k3/8/8/8/8/8/8/2B1KN2 w - - 0 1").expect("FEN should parse");
        let difference = PieceSquareScorer.score(&pair) - PieceSquareScorer.score(&bishop_knight);
        // f1 bishop -10 vs f1 knight -30, plus the bonus and the 10cp material gap.
        assert_eq!(difference, 10 + 20 + PieceSquareScorer::BISHOP_PAIR_BONUS);
    }
}
