//! Iterative-deepening alpha-beta engine.
//!
//! Owns the transposition table across moves of a game, resolves `go`
//! parameters into search limits, and turns each completed iteration into a
//! UCI `info` line.

use log::debug;

use crate::engines::engine_trait::{Engine, EngineOutput, GoParams};
use crate::engines::time_management::resolve_movetime;
use crate::errors::EngineError;
use crate::game_state::chess_types::GameState;
use crate::search::board_scoring::{Evaluator, PieceSquareScorer};
use crate::search::iterative_deepening::{
    format_pv, search_with_progress, SearchLimits, SearchResult, StopSignal, MAX_PLY,
};
use crate::search::transposition_table::TranspositionTable;

/// Transposition table size used when none is configured.
pub const DEFAULT_TT_ENTRIES: usize = 1024 * 1024;

pub struct IterativeEngine {
    default_depth: u8,
    evaluator: Box<dyn Evaluator>,
    tt: TranspositionTable,
    stop: StopSignal,
}

impl IterativeEngine {
    pub fn new(default_depth: u8, tt_entries: usize) -> Self {
        Self::new_with_evaluator(default_depth, tt_entries, Box::new(PieceSquareScorer))
    }

    pub fn new_with_evaluator(
        default_depth: u8,
        tt_entries: usize,
        evaluator: Box<dyn Evaluator>,
    ) -> Self {
        Self {
            default_depth: default_depth.clamp(1, MAX_PLY),
            evaluator,
            tt: TranspositionTable::new(tt_entries),
            stop: StopSignal::new(),
        }
    }

    pub fn tt_len(&self) -> usize {
        self.tt.len()
    }

    fn limits_for(&self, game_state: &GameState, params: &GoParams) -> SearchLimits {
        let movetime = resolve_movetime(params, game_state.side_to_move());
        let max_depth = match params.depth {
            Some(depth) => depth.clamp(1, MAX_PLY),
            None if movetime.is_some() || params.infinite => MAX_PLY,
            None => self.default_depth,
        };
        SearchLimits {
            max_depth,
            movetime,
        }
    }
}

impl Engine for IterativeEngine {
    fn new_game(&mut self) {
        self.tt.clear();
    }

    fn set_option(&mut self, name: &str, value: &str) -> Result<(), EngineError> {
        if name.eq_ignore_ascii_case("Hash") {
            let size_mb = value
                .trim()
                .parse::<usize>()
                .map_err(|_| EngineError::InvalidOptionValue {
                    name: name.to_owned(),
                    value: value.to_owned(),
                })?;
            self.tt = TranspositionTable::new_with_mb(size_mb);
            debug!("transposition table resized to {} entries", self.tt.len());
            return Ok(());
        }
        if name.eq_ignore_ascii_case("Clear Hash") {
            self.tt.clear();
            return Ok(());
        }
        Err(EngineError::UnknownOption(name.to_owned()))
    }

    fn stop_signal(&self) -> StopSignal {
        self.stop.clone()
    }

    fn choose_move(
        &mut self,
        game_state: &GameState,
        params: &GoParams,
        on_info: &mut dyn FnMut(&str),
    ) -> EngineOutput {
        let limits = self.limits_for(game_state, params);
        debug!("go {params:?} resolved to {limits:?}");

        let mut out = EngineOutput::default();
        let result = search_with_progress(
            game_state,
            self.evaluator.as_ref(),
            &mut self.tt,
            limits,
            &self.stop,
            |iteration| {
                let line = format_info_line(iteration);
                on_info(&line);
                out.info_lines.push(line);
            },
        );

        let summary = format!(
            "info string tt probes {} hits {} stores {} hashfull {}",
            result.tt_stats.probes,
            result.tt_stats.hits,
            result.tt_stats.stores,
            self.tt.hashfull_permille()
        );
        on_info(&summary);
        out.info_lines.push(summary);

        out.best_move = result.best_move;
        out
    }
}

/// `info depth ... score ... pv ...` for one completed iteration.
pub fn format_info_line(result: &SearchResult) -> String {
    let score = match result.mate_in() {
        Some(moves) => format!("mate {moves}"),
        None => format!("cp {}", result.score),
    };
    let mut line = format!(
        "info depth {} score {} nodes {} time {} nps {}",
        result.depth,
        score,
        result.nodes,
        result.elapsed.as_millis(),
        result.nps()
    );
    if !result.pv.is_empty() {
        line.push_str(" pv ");
        line.push_str(&format_pv(&result.pv));
    }
    line
}
