use crate::game_state::chess_types::*;
use crate::moves::attack_tables::pawn_attacks;
use crate::moves::chess_move::{Move, MoveKind};

/// Push a pawn move, expanding it into the four promotions when `to` is on
/// the last rank.
fn push_pawn_move(side: Color, mv: Move, out: &mut Vec<Move>) {
    if square_rank(mv.to) == side.promotion_rank() {
        for promotion in PieceKind::PROMOTIONS {
            out.push(mv.with_promotion(promotion));
        }
    } else {
        out.push(mv);
    }
}

/// Pseudo-legal pawn moves for the side to move.
///
/// With `captures_only` the pushes (including quiet promotions) are skipped;
/// diagonal captures, en passant, and capture-promotions remain.
pub fn generate_pawn_moves(game_state: &GameState, captures_only: bool, out: &mut Vec<Move>) {
    let side = game_state.side_to_move();
    let enemy_occ = game_state.occupancy(side.opposite());
    let empty = !game_state.occupancy_all();

    let mut pawns = game_state.pieces(side, PieceKind::Pawn);
    while pawns != 0 {
        let from = pawns.trailing_zeros() as Square;
        pawns &= pawns - 1;

        if !captures_only {
            // A pawn never stands on its promotion rank, so one step stays on the board.
            let one_step = match side {
                Color::White => from + 8,
                Color::Black => from - 8,
            };
            if empty & (1u64 << one_step) != 0 {
                push_pawn_move(side, Move::quiet(from, one_step, PieceKind::Pawn), out);

                if square_rank(from) == side.pawn_start_rank() {
                    let two_step = match side {
                        Color::White => from + 16,
                        Color::Black => from - 16,
                    };
                    if empty & (1u64 << two_step) != 0 {
                        out.push(
                            Move::quiet(from, two_step, PieceKind::Pawn)
                                .with_kind(MoveKind::DoublePawnPush),
                        );
                    }
                }
            }
        }

        let mut attacks = pawn_attacks(side, from);
        while attacks != 0 {
            let to = attacks.trailing_zeros() as Square;
            attacks &= attacks - 1;

            if enemy_occ & (1u64 << to) != 0 {
                if let Some(victim) = game_state.piece_at(to) {
                    push_pawn_move(side, Move::capture(from, to, PieceKind::Pawn, victim.kind), out);
                }
            } else if game_state.en_passant_square() == Some(to) {
                out.push(
                    Move::capture(from, to, PieceKind::Pawn, PieceKind::Pawn)
                        .with_kind(MoveKind::EnPassant),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::generate_pawn_moves;
    use crate::game_state::chess_types::*;
    use crate::moves::chess_move::{Move, MoveKind};

    fn pawn_moves(fen: &str, captures_only: bool) -> Vec<Move> {
        let game = GameState::from_fen(fen).expect("FEN should parse");
        let mut out = Vec::new();
        generate_pawn_moves(&game, captures_only, &mut out);
        out
    }

    #[test]
    fn start_position_has_sixteen_pawn_moves() {
        let moves = pawn_moves(crate::game_state::chess_rules::STARTING_POSITION_FEN, false);
        assert_eq!(moves.len(), 16);
        assert_eq!(moves.iter().filter(|m| m.kind == MoveKind::DoublePawnPush).count(), 8);
    }

    #[test]
    fn blocked_pawn_has_no_pushes() {
        // e2 pawn blocked on e3; double push is impossible too.
        let moves = pawn_moves("4k3/8/8/8/8/4n3/4P3/4K3 w - - 0 1", false);
        assert!(moves.iter().all(|m| m.to != 20 && m.to != 28));
    }

    #[test]
    fn double_push_needs_both_squares_empty() {
        let moves = pawn_moves("4k3/8/8/8/4n3/8/4P3/4K3 w - - 0 1", false);
        let targets: Vec<u8> = moves.iter().map(|m| m.to).collect();
        assert_eq!(targets, vec![20]);
    }

    #[test]
    fn promotions_come_in_four_kinds() {
        let moves = pawn_moves("3rk3/2P5/8/8/8/8/8/4K3 w - - 0 1", false);
        let pushes: Vec<_> = moves.iter().filter(|m| m.to == 58).collect();
        let captures: Vec<_> = moves.iter().filter(|m| m.to == 59).collect();
        assert_eq!(pushes.len(), 4);
        assert_eq!(captures.len(), 4);
        assert!(captures.iter().all(|m| m.captured == Some(PieceKind::Rook)));
        let kinds: Vec<_> = pushes.iter().filter_map(|m| m.promotion).collect();
        assert_eq!(kinds, PieceKind::PROMOTIONS.to_vec());
    }

    #[test]
    fn captures_only_keeps_en_passant_and_capture_promotions() {
        let moves = pawn_moves("3rk3/2P5/8/3pP3/8/8/8/4K3 w - d6 0 1", true);
        assert_eq!(moves.len(), 5);
        assert!(moves.iter().all(|m| m.is_capture()));
        assert_eq!(moves.iter().filter(|m| m.kind == MoveKind::EnPassant).count(), 1);
    }

    #[test]
    fn black_pawns_move_down_the_board() {
        let moves = pawn_moves("4k3/3p4/8/8/8/8/8/4K3 b - - 0 1", false);
        let mut targets: Vec<u8> = moves.iter().map(|m| m.to).collect();
        targets.sort_unstable();
        assert_eq!(targets, vec![35, 43]);
    }
}
