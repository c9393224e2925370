//! Engine abstraction layer used by the UCI subsystem.
//!
//! Defines the `go` parameters and the output payload so the protocol layer
//! only talks to a trait object and never to the search directly.

use crate::errors::EngineError;
use crate::game_state::chess_types::GameState;
use crate::moves::chess_move::Move;
use crate::search::iterative_deepening::StopSignal;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoParams {
    pub depth: Option<u8>,
    pub movetime_ms: Option<u64>,
    pub wtime_ms: Option<u64>,
    pub btime_ms: Option<u64>,
    pub winc_ms: Option<u64>,
    pub binc_ms: Option<u64>,
    pub movestogo: Option<u16>,
    pub infinite: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineOutput {
    pub best_move: Option<Move>,
    /// Protocol lines (`info ...`) produced while searching, in order.
    pub info_lines: Vec<String>,
}

pub trait Engine: Send {
    fn new_game(&mut self) {}

    fn set_option(&mut self, name: &str, _value: &str) -> Result<(), EngineError> {
        Err(EngineError::UnknownOption(name.to_owned()))
    }

    /// Signal the search polls; raising it ends `choose_move` early.
    fn stop_signal(&self) -> StopSignal;

    /// Search `game_state`, forwarding each `info` line to `on_info` as soon
    /// as it is produced.
    fn choose_move(
        &mut self,
        game_state: &GameState,
        params: &GoParams,
        on_info: &mut dyn FnMut(&str),
    ) -> EngineOutput;
}
