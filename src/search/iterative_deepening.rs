//! Iterative deepening search with negamax alpha-beta pruning.
//!
//! Each iteration runs a full-window root search one ply deeper than the
//! last; only completed iterations update the result. Nodes below the root
//! use fail-hard alpha-beta with transposition-table cutoffs, and the
//! horizon is extended by a quiescence search over captures (or over all
//! evasions when the side to move is in check).
//!
//! Cancellation comes from a shared `StopSignal` or a deadline. Once either
//! trips, every node returns `None` and the recursion unwinds; each applied
//! move lives in a `MoveGuard`, so the position is restored on the way out.

use std::cmp::Reverse;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{debug, info};

use crate::game_state::chess_types::*;
use crate::move_generation::move_generator::{generate_legal_captures, generate_legal_moves};
use crate::moves::chess_move::Move;
use crate::search::board_scoring::{relative_score, Evaluator, MaterialScorer, MATE_SCORE, MATE_THRESHOLD};
use crate::search::transposition_table::{Bound, TTStats, TranspositionTable};

/// Window bound strictly outside every reachable score.
const INFINITY: i32 = MATE_SCORE + 1;

/// Hard recursion limit. Nodes this deep return their static score.
pub const MAX_PLY: u8 = 64;

/// How often (in nodes) the deadline is compared against the clock.
const DEADLINE_POLL_MASK: u64 = 1023;

/// Cooperative cancellation flag shared between the searching thread and
/// whoever may want to interrupt it.
#[derive(Debug, Clone, Default)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn stop(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    #[inline]
    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    /// Re-arm the signal before the next search.
    #[inline]
    pub fn reset(&self) {
        self.0.store(false, Ordering::Relaxed);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchLimits {
    pub max_depth: u8,
    pub movetime: Option<Duration>,
}

impl SearchLimits {
    pub const fn depth(max_depth: u8) -> Self {
        Self {
            max_depth,
            movetime: None,
        }
    }

    /// Search as deep as time allows.
    pub const fn movetime(movetime: Duration) -> Self {
        Self {
            max_depth: MAX_PLY,
            movetime: Some(movetime),
        }
    }
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self::depth(4)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchResult {
    pub best_move: Option<Move>,
    /// Side-to-move score of the last completed iteration.
    pub score: i32,
    /// Deepest completed iteration; 0 when none completed.
    pub depth: u8,
    pub nodes: u64,
    pub elapsed: Duration,
    pub pv: Vec<Move>,
    pub tt_stats: TTStats,
}

impl SearchResult {
    /// Moves to mate (positive when the side to move mates), if the score
    /// encodes one.
    pub fn mate_in(&self) -> Option<i32> {
        if self.score >= MATE_THRESHOLD {
            Some((MATE_SCORE - self.score + 1) / 2)
        } else if self.score <= -MATE_THRESHOLD {
            Some(-(MATE_SCORE + self.score) / 2)
        } else {
            None
        }
    }

    pub fn nps(&self) -> u64 {
        let millis = self.elapsed.as_millis() as u64;
        if millis == 0 {
            0
        } else {
            self.nodes.saturating_mul(1000) / millis
        }
    }
}

/// Search `game_state` within `limits`, or until `stop` is raised.
pub fn search(
    game_state: &GameState,
    evaluator: &dyn Evaluator,
    tt: &mut TranspositionTable,
    limits: SearchLimits,
    stop: &StopSignal,
) -> SearchResult {
    search_with_progress(game_state, evaluator, tt, limits, stop, |_| {})
}

/// As [`search`], calling `on_iteration` with the running result after each
/// completed depth.
pub fn search_with_progress(
    game_state: &GameState,
    evaluator: &dyn Evaluator,
    tt: &mut TranspositionTable,
    limits: SearchLimits,
    stop: &StopSignal,
    mut on_iteration: impl FnMut(&SearchResult),
) -> SearchResult {
    let started_at = Instant::now();
    let deadline = limits.movetime.map(|budget| started_at + budget);
    tt.new_generation();

    let mut root = game_state.clone();
    let mut root_moves = generate_legal_moves(&mut root);

    let mut result = SearchResult {
        best_move: root_moves.first().copied(),
        score: relative_score(evaluator, &root),
        ..SearchResult::default()
    };

    if root_moves.is_empty() {
        result.score = if root.in_check() { -MATE_SCORE } else { 0 };
        result.tt_stats = tt.stats();
        info!("no legal moves at the root; score {}", result.score);
        return result;
    }

    let mut searcher = Searcher::new(evaluator, tt, stop, deadline);

    for depth in 1..=limits.max_depth.min(MAX_PLY) {
        let Some((best_move, score)) = searcher.search_root(&mut root, depth, &mut root_moves) else {
            debug!("depth {depth} interrupted after {} nodes", searcher.nodes());
            break;
        };

        result.best_move = Some(best_move);
        result.score = score;
        result.depth = depth;
        result.nodes = searcher.nodes();
        result.elapsed = started_at.elapsed();
        result.pv = principal_variation(&root, searcher.tt, depth);

        debug!(
            "depth {depth} score {score} nodes {} best {best_move} pv {}",
            result.nodes,
            format_pv(&result.pv)
        );
        on_iteration(&result);

        // A mate inside the horizon cannot improve with more depth.
        if score.abs() >= MATE_THRESHOLD && MATE_SCORE - score.abs() <= i32::from(depth) {
            break;
        }
        if searcher.should_stop_now() {
            break;
        }
    }

    result.nodes = searcher.nodes();
    result.elapsed = started_at.elapsed();
    result.tt_stats = searcher.tt.stats();

    info!(
        "search finished: depth {} score {} nodes {} time {}ms nps {}",
        result.depth,
        result.score,
        result.nodes,
        result.elapsed.as_millis(),
        result.nps()
    );

    result
}

/// Convenience wrapper: fixed-depth search with material-only scoring and a
/// private table.
pub fn search_to_depth(game_state: &GameState, depth: u8) -> SearchResult {
    let mut tt = TranspositionTable::new(1 << 16);
    search(
        game_state,
        &MaterialScorer,
        &mut tt,
        SearchLimits::depth(depth),
        &StopSignal::new(),
    )
}

/// Per-search state threaded through the recursion.
pub struct Searcher<'a> {
    evaluator: &'a dyn Evaluator,
    tt: &'a mut TranspositionTable,
    stop: &'a StopSignal,
    deadline: Option<Instant>,
    nodes: u64,
    aborted: bool,
}

impl<'a> Searcher<'a> {
    pub fn new(
        evaluator: &'a dyn Evaluator,
        tt: &'a mut TranspositionTable,
        stop: &'a StopSignal,
        deadline: Option<Instant>,
    ) -> Self {
        Self {
            evaluator,
            tt,
            stop,
            deadline,
            nodes: 0,
            aborted: false,
        }
    }

    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    /// Polled at every node: the stop flag always, the clock every 1024 nodes.
    #[inline]
    fn should_stop(&mut self) -> bool {
        if self.aborted {
            return true;
        }
        if self.stop.is_stopped() {
            self.aborted = true;
        } else if self.nodes & DEADLINE_POLL_MASK == 0 {
            self.aborted = self.deadline.is_some_and(|limit| Instant::now() >= limit);
        }
        self.aborted
    }

    /// Unconditional check used between iterations.
    fn should_stop_now(&mut self) -> bool {
        self.aborted = self.aborted
            || self.stop.is_stopped()
            || self.deadline.is_some_and(|limit| Instant::now() >= limit);
        self.aborted
    }

    fn search_root(
        &mut self,
        root: &mut GameState,
        depth: u8,
        moves: &mut [Move],
    ) -> Option<(Move, i32)> {
        let key = root.zobrist_key();
        order_moves(moves, self.tt.best_move_hint(key));

        let mut alpha = -INFINITY;
        let beta = INFINITY;
        let mut best_move = *moves.first()?;

        for &mv in moves.iter() {
            let score = {
                let mut child = root.play(mv);
                -self.alpha_beta(&mut child, -beta, -alpha, depth - 1, 1)?
            };
            if score > alpha {
                alpha = score;
                best_move = mv;
            }
        }

        self.tt.store(key, depth, score_to_tt(alpha, 0), Bound::Exact, Some(best_move));
        Some((best_move, alpha))
    }

    /// Fail-hard negamax. Returns `None` once the search has been stopped.
    pub fn alpha_beta(
        &mut self,
        game_state: &mut GameState,
        mut alpha: i32,
        beta: i32,
        depth: u8,
        ply: u8,
    ) -> Option<i32> {
        if self.should_stop() {
            return None;
        }
        self.nodes += 1;

        if ply > 0 && game_state.is_draw_by_rule() {
            return Some(0);
        }
        if ply >= MAX_PLY {
            return Some(relative_score(self.evaluator, game_state));
        }

        let key = game_state.zobrist_key();
        if let Some(entry) = self.tt.probe(key, depth) {
            let score = score_from_tt(entry.score, ply);
            match entry.bound {
                Bound::Exact => return Some(score),
                Bound::Lower if score >= beta => return Some(beta),
                Bound::Upper if score <= alpha => return Some(alpha),
                _ => {}
            }
        }

        if depth == 0 {
            return self.quiescence(game_state, alpha, beta, ply);
        }

        let mut moves = generate_legal_moves(game_state);
        if moves.is_empty() {
            return Some(terminal_score(game_state, ply));
        }
        order_moves(&mut moves, self.tt.best_move_hint(key));

        let mut best_move = None;
        for mv in moves {
            let score = {
                let mut child = game_state.play(mv);
                -self.alpha_beta(&mut child, -beta, -alpha, depth - 1, ply + 1)?
            };

            if score >= beta {
                self.tt.store(key, depth, score_to_tt(beta, ply), Bound::Lower, Some(mv));
                return Some(beta);
            }
            if score > alpha {
                alpha = score;
                best_move = Some(mv);
            }
        }

        let bound = if best_move.is_some() {
            Bound::Exact
        } else {
            Bound::Upper
        };
        self.tt.store(key, depth, score_to_tt(alpha, ply), bound, best_move);
        Some(alpha)
    }

    /// Capture-only extension of the horizon. In check there is no stand pat:
    /// every evasion is searched, and having none is mate.
    pub fn quiescence(
        &mut self,
        game_state: &mut GameState,
        mut alpha: i32,
        beta: i32,
        ply: u8,
    ) -> Option<i32> {
        if self.should_stop() {
            return None;
        }
        self.nodes += 1;

        if ply >= MAX_PLY {
            return Some(relative_score(self.evaluator, game_state));
        }

        let mut moves = if game_state.in_check() {
            let evasions = generate_legal_moves(game_state);
            if evasions.is_empty() {
                return Some(terminal_score(game_state, ply));
            }
            evasions
        } else {
            let stand_pat = relative_score(self.evaluator, game_state);
            if stand_pat >= beta {
                return Some(beta);
            }
            alpha = alpha.max(stand_pat);
            generate_legal_captures(game_state)
        };
        order_moves(&mut moves, None);

        for mv in moves {
            let score = {
                let mut child = game_state.play(mv);
                -self.quiescence(&mut child, -beta, -alpha, ply + 1)?
            };

            if score >= beta {
                return Some(beta);
            }
            alpha = alpha.max(score);
        }

        Some(alpha)
    }
}

#[inline]
fn terminal_score(game_state: &GameState, ply: u8) -> i32 {
    if game_state.in_check() {
        -MATE_SCORE + i32::from(ply)
    } else {
        0
    }
}

/// Mate scores are stored relative to the node so they stay valid when the
/// same position is reached at another ply.
#[inline]
fn score_to_tt(score: i32, ply: u8) -> i32 {
    if score >= MATE_THRESHOLD {
        score + i32::from(ply)
    } else if score <= -MATE_THRESHOLD {
        score - i32::from(ply)
    } else {
        score
    }
}

#[inline]
fn score_from_tt(score: i32, ply: u8) -> i32 {
    if score >= MATE_THRESHOLD {
        score - i32::from(ply)
    } else if score <= -MATE_THRESHOLD {
        score + i32::from(ply)
    } else {
        score
    }
}

/// Table move first, then captures by most valuable victim / least valuable
/// attacker, then promotions, then quiet moves in generation order.
fn order_moves(moves: &mut [Move], tt_move: Option<Move>) {
    moves.sort_by_key(|&mv| Reverse(move_order_score(mv, tt_move)));
}

fn move_order_score(mv: Move, tt_move: Option<Move>) -> i32 {
    if Some(mv) == tt_move {
        return 1_000_000;
    }
    if !mv.is_tactical() {
        return 0;
    }
    let mut score = 0;
    if let Some(victim) = mv.captured {
        score += 100_000 + 10 * MaterialScorer::piece_value(victim)
            - MaterialScorer::piece_value(mv.piece) / 10;
    }
    if let Some(promotion) = mv.promotion {
        score += 90_000 + MaterialScorer::piece_value(promotion);
    }
    score
}

/// Follow remembered best moves from `game_state`, stopping at the first
/// missing or illegal entry or at a repeated position.
pub fn principal_variation(
    game_state: &GameState,
    tt: &TranspositionTable,
    max_len: u8,
) -> Vec<Move> {
    let mut pv = Vec::new();
    let mut state = game_state.clone();
    let mut seen = vec![state.zobrist_key()];

    for _ in 0..max_len {
        let Some(mv) = tt.best_move_hint(state.zobrist_key()) else {
            break;
        };
        if !generate_legal_moves(&mut state).contains(&mv) {
            break;
        }
        state.apply_move(mv);
        pv.push(mv);
        if seen.contains(&state.zobrist_key()) {
            break;
        }
        seen.push(state.zobrist_key());
    }

    pv
}

pub fn format_pv(pv: &[Move]) -> String {
    pv.iter()
        .map(Move::to_long_algebraic)
        .collect::<Vec<_>>()
        .join(" ")
}
