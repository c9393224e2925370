use crate::game_state::chess_types::*;
use crate::moves::chess_move::Move;

/// Destination mask for the side to move: enemy-occupied squares only when
/// `captures_only`, otherwise every square not holding a friendly piece.
#[inline]
pub fn target_mask(game_state: &GameState, captures_only: bool) -> u64 {
    let side = game_state.side_to_move();
    if captures_only {
        game_state.occupancy(side.opposite())
    } else {
        !game_state.occupancy(side)
    }
}

/// Emit one move per set bit of `targets`, recording the captured kind.
#[inline]
pub fn push_moves_to_targets(
    game_state: &GameState,
    from: Square,
    piece: PieceKind,
    mut targets: u64,
    out: &mut Vec<Move>,
) {
    while targets != 0 {
        let to = targets.trailing_zeros() as Square;
        let mv = match game_state.piece_at(to) {
            Some(victim) => Move::capture(from, to, piece, victim.kind),
            None => Move::quiet(from, to, piece),
        };
        out.push(mv);
        targets &= targets - 1;
    }
}
