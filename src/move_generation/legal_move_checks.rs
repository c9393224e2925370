use crate::game_state::chess_types::*;
use crate::moves::attack_tables::{
    bishop_attacks, king_attacks, knight_attacks, pawn_attacks, rook_attacks,
};

/// True if any piece of `attacker_color` pseudo-attacks `square`.
///
/// Each test looks outward from the target square: a pawn of the attacker
/// hits `square` exactly when a defender pawn on `square` would hit it back.
pub fn is_square_attacked(game_state: &GameState, square: Square, attacker_color: Color) -> bool {
    let attacker = |kind: PieceKind| game_state.pieces(attacker_color, kind);

    if pawn_attacks(attacker_color.opposite(), square) & attacker(PieceKind::Pawn) != 0 {
        return true;
    }

    if knight_attacks(square) & attacker(PieceKind::Knight) != 0 {
        return true;
    }

    if king_attacks(square) & attacker(PieceKind::King) != 0 {
        return true;
    }

    let occupancy = game_state.occupancy_all();

    let bishops_queens = attacker(PieceKind::Bishop) | attacker(PieceKind::Queen);
    if bishops_queens != 0 && bishop_attacks(square, occupancy) & bishops_queens != 0 {
        return true;
    }

    let rooks_queens = attacker(PieceKind::Rook) | attacker(PieceKind::Queen);
    rooks_queens != 0 && rook_attacks(square, occupancy) & rooks_queens != 0
}

/// True if `color`'s king is attacked.
#[inline]
pub fn is_king_in_check(game_state: &GameState, color: Color) -> bool {
    is_square_attacked(game_state, game_state.king_square(color), color.opposite())
}

#[cfg(test)]
mod tests {
    use super::{is_king_in_check, is_square_attacked};
    use crate::game_state::chess_types::{Color, GameState};

    #[test]
    fn start_position_third_rank_is_covered_by_white() {
        let game = GameState::new_game();
        for square in 16..24 {
            assert!(is_square_attacked(&game, square, Color::White));
            assert!(!is_square_attacked(&game, square, Color::Black));
        }
        assert!(!is_square_attacked(&game, 28, Color::White));
    }

    #[test]
    fn sliders_are_blocked_by_intervening_pieces() {
        let game = GameState::from_fen("4k3/8/8/8/4p3/8/8/4R2K w - - 0 1").expect("FEN should parse");
        assert!(is_square_attacked(&game, 28, Color::White), "e4 blocker is itself attacked");
        assert!(!is_square_attacked(&game, 36, Color::White), "e5 lies behind the blocker");
        assert!(!is_king_in_check(&game, Color::Black));
    }

    #[test]
    fn pawn_attack_direction_depends_on_color() {
        let game = GameState::from_fen("4k3/8/8/3p4/8/8/8/4K3 w - - 0 1").expect("FEN should parse");
        // Black pawn on d5 attacks c4 and e4, not c6/e6.
        assert!(is_square_attacked(&game, 26, Color::Black));
        assert!(is_square_attacked(&game, 28, Color::Black));
        assert!(!is_square_attacked(&game, 42, Color::Black));
        assert!(!is_square_attacked(&game, 44, Color::Black));
    }

    #[test]
    fn detects_check_from_a_knight() {
        let game = GameState::from_fen("4k3/8/3N4/8/8/8/8/4K3 b - - 0 1").expect("FEN should parse");
        assert!(is_king_in_check(&game, Color::Black));
        assert!(game.in_check());
    }
}
