//! Core incremental board state representation.
//!
//! `GameState` is the central model for the engine. It stores a square
//! mailbox, per-piece bitboards, occupancy caches, turn/state flags, clocks,
//! the incremental fingerprint, and the fingerprint history used for
//! repetition detection. Every mutation goes through `put_piece` /
//! `remove_piece` (or the state setters in `legal_move_apply`) so all views
//! and the fingerprint stay consistent.

use log::warn;

use crate::errors::FenError;
use crate::game_state::chess_rules::STARTING_POSITION_FEN;
use crate::game_state::chess_types::*;
use crate::game_state::move_guard::MoveGuard;
use crate::move_generation::legal_move_apply::{apply_move, undo_move};
use crate::move_generation::legal_move_checks::is_square_attacked;
use crate::moves::chess_move::Move;
use crate::search::zobrist::piece_square_key;
use crate::utils::fen_generator::generate_fen;
use crate::utils::fen_parser::parse_fen;

/// Incremental game state optimized for fast move making/unmaking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    pub(crate) squares: [Option<Piece>; 64],

    // [color][piece_kind]
    pub(crate) pieces: [[u64; 6]; 2],
    pub(crate) occupancy_by_color: [u64; 2],
    pub(crate) occupancy_all: u64,

    pub(crate) side_to_move: Color,
    pub(crate) castling_rights: CastlingRights,
    pub(crate) en_passant_square: Option<Square>,

    pub(crate) halfmove_clock: u16,
    pub(crate) fullmove_number: u16,
    pub(crate) ply: u16,

    pub(crate) zobrist_key: u64,
    /// Fingerprints of every earlier position, oldest first.
    pub(crate) key_history: Vec<u64>,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new_game()
    }
}

impl GameState {
    /// Board with no pieces, white to move, no rights. Only meaningful as a
    /// parser scratch state; it violates the one-king-per-side invariant.
    pub(crate) fn new_empty() -> Self {
        Self {
            squares: [None; 64],
            pieces: [[0; 6]; 2],
            occupancy_by_color: [0; 2],
            occupancy_all: 0,
            side_to_move: Color::White,
            castling_rights: CastlingRights::NONE,
            en_passant_square: None,
            halfmove_clock: 0,
            fullmove_number: 1,
            ply: 0,
            zobrist_key: 0,
            key_history: Vec::new(),
        }
    }

    /// Standard initial layout.
    pub fn new_game() -> Self {
        match parse_fen(STARTING_POSITION_FEN) {
            Ok(game_state) => game_state,
            Err(err) => panic!("starting FEN must parse: {err}"),
        }
    }

    #[inline]
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        parse_fen(fen)
    }

    /// Parse `fen`, falling back to the initial layout on any error.
    pub fn from_fen_or_default(fen: &str) -> Self {
        parse_fen(fen).unwrap_or_else(|err| {
            warn!("rejected position '{fen}': {err}; using the initial layout");
            Self::new_game()
        })
    }

    #[inline]
    pub fn to_fen(&self) -> String {
        generate_fen(self)
    }

    #[inline]
    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.squares[square as usize]
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline]
    pub fn castling_rights(&self) -> CastlingRights {
        self.castling_rights
    }

    #[inline]
    pub fn en_passant_square(&self) -> Option<Square> {
        self.en_passant_square
    }

    #[inline]
    pub fn halfmove_clock(&self) -> u16 {
        self.halfmove_clock
    }

    #[inline]
    pub fn fullmove_number(&self) -> u16 {
        self.fullmove_number
    }

    #[inline]
    pub fn ply(&self) -> u16 {
        self.ply
    }

    /// Position fingerprint.
    #[inline]
    pub fn zobrist_key(&self) -> u64 {
        self.zobrist_key
    }

    /// Bitboard of `color`'s pieces of `kind`.
    #[inline]
    pub fn pieces(&self, color: Color, kind: PieceKind) -> u64 {
        self.pieces[color.index()][kind.index()]
    }

    #[inline]
    pub fn occupancy(&self, color: Color) -> u64 {
        self.occupancy_by_color[color.index()]
    }

    #[inline]
    pub fn occupancy_all(&self) -> u64 {
        self.occupancy_all
    }

    /// Square of `color`'s king.
    ///
    /// # Panics
    /// If `color` has no king, which no legal position allows.
    #[inline]
    pub fn king_square(&self, color: Color) -> Square {
        let kings = self.pieces(color, PieceKind::King);
        assert!(kings != 0, "{color:?} king missing from the board");
        kings.trailing_zeros() as Square
    }

    /// True if any piece of `by` attacks `square`.
    #[inline]
    pub fn is_square_attacked(&self, square: Square, by: Color) -> bool {
        is_square_attacked(self, square, by)
    }

    /// True if the side to move is in check.
    #[inline]
    pub fn in_check(&self) -> bool {
        let side = self.side_to_move;
        self.is_square_attacked(self.king_square(side), side.opposite())
    }

    /// Fifty-move rule or a repetition since the last irreversible move.
    pub fn is_draw_by_rule(&self) -> bool {
        self.halfmove_clock >= 100 || self.is_repetition()
    }

    /// True if the current fingerprint already occurred since the last pawn
    /// move or capture.
    pub fn is_repetition(&self) -> bool {
        self.key_history
            .iter()
            .rev()
            .take(self.halfmove_clock as usize)
            .any(|&key| key == self.zobrist_key)
    }

    /// Play `mv`, returning the token `undo_move` needs to reverse it.
    #[inline]
    pub fn apply_move(&mut self, mv: Move) -> UndoState {
        apply_move(self, mv)
    }

    #[inline]
    pub fn undo_move(&mut self, mv: Move, undo: UndoState) {
        undo_move(self, mv, undo)
    }

    /// Play `mv` for the lifetime of the returned guard.
    #[inline]
    pub fn play(&mut self, mv: Move) -> MoveGuard<'_> {
        MoveGuard::new(self, mv)
    }

    pub(crate) fn put_piece(&mut self, square: Square, piece: Piece) {
        debug_assert!(self.squares[square as usize].is_none());
        let mask = 1u64 << square;
        self.squares[square as usize] = Some(piece);
        self.pieces[piece.color.index()][piece.kind.index()] |= mask;
        self.occupancy_by_color[piece.color.index()] |= mask;
        self.occupancy_all |= mask;
        self.zobrist_key ^= piece_square_key(piece, square);
    }

    pub(crate) fn remove_piece(&mut self, square: Square) -> Piece {
        let Some(piece) = self.squares[square as usize].take() else {
            panic!("no piece to remove on square {square}");
        };
        let mask = !(1u64 << square);
        self.pieces[piece.color.index()][piece.kind.index()] &= mask;
        self.occupancy_by_color[piece.color.index()] &= mask;
        self.occupancy_all &= mask;
        self.zobrist_key ^= piece_square_key(piece, square);
        piece
    }
}

#[cfg(test)]
mod tests {
    use super::GameState;
    use crate::game_state::chess_types::{CastlingRights, Color, Piece, PieceKind};
    use crate::search::zobrist::compute_zobrist_key;
    use crate::utils::long_algebraic::parse_long_algebraic;

    #[test]
    fn new_game_has_consistent_views() {
        let game = GameState::new_game();
        assert_eq!(game.occupancy_all().count_ones(), 32);
        assert_eq!(game.piece_at(4), Some(Piece::new(Color::White, PieceKind::King)));
        assert_eq!(game.piece_at(59), Some(Piece::new(Color::Black, PieceKind::Queen)));
        assert_eq!(game.king_square(Color::Black), 60);
        assert_eq!(game.castling_rights(), CastlingRights::ALL);
        assert_eq!(game.zobrist_key(), compute_zobrist_key(&game));
        assert!(!game.in_check());
    }

    #[test]
    fn malformed_fen_falls_back_to_initial_layout() {
        let fallback = GameState::from_fen_or_default("not a position at all");
        assert_eq!(fallback, GameState::new_game());

        let truncated = GameState::from_fen_or_default("rnbqkbnr/pppppppp/8/8 w KQkq - 0 1");
        assert_eq!(truncated, GameState::new_game());
    }

    #[test]
    fn fifty_move_rule_is_a_draw() {
        let game = GameState::from_fen("4k3/8/8/8/8/8/8/4K2R w - - 100 90").expect("FEN should parse");
        assert!(game.is_draw_by_rule());
    }

    #[test]
    fn knight_shuffle_repeats_the_start_position() {
        let mut game = GameState::new_game();
        for (i, lan) in ["g1f3", "g8f6", "f3g1", "f6g8"].into_iter().enumerate() {
            assert!(!game.is_repetition(), "no repetition before move {i}");
            let mv = parse_long_algebraic(lan, &game).expect("shuffle move is legal");
            game.apply_move(mv);
        }
        assert!(game.is_repetition());
        assert!(game.is_draw_by_rule());
        assert_eq!(game.zobrist_key(), GameState::new_game().zobrist_key());
    }

    #[test]
    fn pawn_move_resets_the_repetition_window() {
        let mut game = GameState::new_game();
        for lan in ["g1f3", "g8f6", "f3g1", "f6g8", "e2e4"] {
            let mv = parse_long_algebraic(lan, &game).expect("move is legal");
            game.apply_move(mv);
        }
        assert_eq!(game.halfmove_clock(), 0);
        assert!(!game.is_repetition());
    }

    #[test]
    #[should_panic(expected = "no piece to remove")]
    fn removing_from_an_empty_square_panics() {
        let mut game = GameState::new_game();
        game.remove_piece(27);
    }
}
