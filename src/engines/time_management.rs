//! Per-move time budgeting.
//!
//! UCI passes raw clock data (`wtime/btime/winc/binc/movetime`); the engine
//! turns it into a single movetime for the search.

use std::time::Duration;

use crate::engines::engine_trait::GoParams;
use crate::game_state::chess_types::Color;

/// Share of the remaining clock spent on one move when `movestogo` is unknown.
const DEFAULT_MOVES_TO_GO: u64 = 30;

/// Search budget for the side to move, or `None` when the search should be
/// bounded by depth (or run until stopped) instead.
///
/// An explicit `movetime` always wins. Otherwise the budget is the remaining
/// clock split over the expected moves plus three quarters of the increment,
/// never more than a quarter of what is left.
pub fn resolve_movetime(params: &GoParams, side_to_move: Color) -> Option<Duration> {
    if params.infinite {
        return None;
    }
    if let Some(ms) = params.movetime_ms {
        return Some(Duration::from_millis(ms.max(1)));
    }

    let (remaining, increment) = match side_to_move {
        Color::White => (params.wtime_ms?, params.winc_ms),
        Color::Black => (params.btime_ms?, params.binc_ms),
    };

    let moves_to_go = params
        .movestogo
        .map_or(DEFAULT_MOVES_TO_GO, |mtg| u64::from(mtg.max(1)));
    let base = remaining / moves_to_go;
    let bonus = increment.unwrap_or(0).saturating_mul(3) / 4;
    let ceiling = (remaining / 4).max(1);

    Some(Duration::from_millis(base.saturating_add(bonus).clamp(1, ceiling)))
}

#[cfg(test)]
mod tests {
    use super::resolve_movetime;
    use crate::engines::engine_trait::GoParams;
    use crate::game_state::chess_types::Color;
    use std::time::Duration;

    #[test]
    fn explicit_movetime_wins() {
        let params = GoParams {
            movetime_ms: Some(250),
            wtime_ms: Some(60_000),
            ..GoParams::default()
        };
        assert_eq!(resolve_movetime(&params, Color::White), Some(Duration::from_millis(250)));
    }

    #[test]
    fn clock_budget_uses_the_side_to_move() {
        let params = GoParams {
            wtime_ms: Some(60_000),
            btime_ms: Some(30_000),
            winc_ms: Some(1_000),
            ..GoParams::default()
        };
        assert_eq!(resolve_movetime(&params, Color::White), Some(Duration::from_millis(2_750)));
        assert_eq!(resolve_movetime(&params, Color::Black), Some(Duration::from_millis(1_000)));
    }

    #[test]
    fn budget_is_capped_at_a_quarter_of_the_clock() {
        let params = GoParams {
            btime_ms: Some(1_000),
            binc_ms: Some(5_000),
            ..GoParams::default()
        };
        assert_eq!(resolve_movetime(&params, Color::Black), Some(Duration::from_millis(250)));
    }

    #[test]
    fn movestogo_splits_the_clock() {
        let params = GoParams {
            wtime_ms: Some(10_000),
            movestogo: Some(5),
            ..GoParams::default()
        };
        assert_eq!(resolve_movetime(&params, Color::White), Some(Duration::from_millis(2_000)));
    }

    #[test]
    fn depth_only_and_infinite_have_no_budget() {
        let depth_only = GoParams {
            depth: Some(5),
            ..GoParams::default()
        };
        assert_eq!(resolve_movetime(&depth_only, Color::White), None);

        let infinite = GoParams {
            infinite: true,
            wtime_ms: Some(1_000),
            ..GoParams::default()
        };
        assert_eq!(resolve_movetime(&infinite, Color::White), None);
    }
}
