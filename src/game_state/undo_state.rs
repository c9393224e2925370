use crate::game_state::chess_types::*;

/// Everything `apply_move` overwrites that the move itself cannot restore.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UndoState {
    pub captured: Option<Piece>,

    pub prev_castling_rights: CastlingRights,
    pub prev_en_passant_square: Option<Square>,
    pub prev_halfmove_clock: u16,
    pub prev_fullmove_number: u16,

    pub prev_zobrist_key: u64,
}
