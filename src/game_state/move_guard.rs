//! Scoped make/unmake.
//!
//! `GameState::play` returns a `MoveGuard` that dereferences to the mutated
//! position and undoes the move when dropped. Search recursion holds one
//! guard per ply, so early returns (cutoffs, stop signal, `?`) always leave
//! the caller's position exactly as it was.

use std::ops::{Deref, DerefMut};

use crate::game_state::chess_types::*;
use crate::moves::chess_move::Move;

pub struct MoveGuard<'a> {
    game_state: &'a mut GameState,
    mv: Move,
    undo: UndoState,
}

impl<'a> MoveGuard<'a> {
    pub(crate) fn new(game_state: &'a mut GameState, mv: Move) -> Self {
        let undo = game_state.apply_move(mv);
        Self {
            game_state,
            mv,
            undo,
        }
    }
}

impl Deref for MoveGuard<'_> {
    type Target = GameState;

    #[inline]
    fn deref(&self) -> &GameState {
        self.game_state
    }
}

impl DerefMut for MoveGuard<'_> {
    #[inline]
    fn deref_mut(&mut self) -> &mut GameState {
        self.game_state
    }
}

impl Drop for MoveGuard<'_> {
    fn drop(&mut self) {
        self.game_state.undo_move(self.mv, self.undo);
    }
}
