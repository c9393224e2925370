//! Move value type produced by generation and consumed by search.
//!
//! A `Move` carries everything `apply_move` needs (moving and captured piece
//! kinds, promotion, special kind) so applying it never re-derives rules.

use std::fmt;

use crate::game_state::chess_types::{PieceKind, Square};
use crate::utils::algebraic::square_to_algebraic;

/// Special-rule classification of a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveKind {
    Normal,
    DoublePawnPush,
    EnPassant,
    KingSideCastle,
    QueenSideCastle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub piece: PieceKind,
    pub captured: Option<PieceKind>,
    pub promotion: Option<PieceKind>,
    pub kind: MoveKind,
}

impl Move {
    #[inline]
    pub const fn quiet(from: Square, to: Square, piece: PieceKind) -> Self {
        Self {
            from,
            to,
            piece,
            captured: None,
            promotion: None,
            kind: MoveKind::Normal,
        }
    }

    #[inline]
    pub const fn capture(from: Square, to: Square, piece: PieceKind, captured: PieceKind) -> Self {
        Self {
            from,
            to,
            piece,
            captured: Some(captured),
            promotion: None,
            kind: MoveKind::Normal,
        }
    }

    #[inline]
    pub const fn with_kind(mut self, kind: MoveKind) -> Self {
        self.kind = kind;
        self
    }

    #[inline]
    pub const fn with_promotion(mut self, promotion: PieceKind) -> Self {
        self.promotion = Some(promotion);
        self
    }

    /// True when the move removes an enemy piece (en passant included).
    #[inline]
    pub const fn is_capture(&self) -> bool {
        self.captured.is_some()
    }

    #[inline]
    pub const fn is_promotion(&self) -> bool {
        self.promotion.is_some()
    }

    #[inline]
    pub const fn is_castle(&self) -> bool {
        matches!(self.kind, MoveKind::KingSideCastle | MoveKind::QueenSideCastle)
    }

    /// Captures and promotions: the moves quiescence and ordering care about.
    #[inline]
    pub const fn is_tactical(&self) -> bool {
        self.is_capture() || self.is_promotion()
    }

    /// Long algebraic notation (`e2e4`, `e7e8q`).
    pub fn to_long_algebraic(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let from = square_to_algebraic(self.from).map_err(|_| fmt::Error)?;
        let to = square_to_algebraic(self.to).map_err(|_| fmt::Error)?;
        write!(f, "{from}{to}")?;
        if let Some(promotion) = self.promotion {
            write!(f, "{}", promotion.to_char())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{Move, MoveKind};
    use crate::game_state::chess_types::PieceKind;

    #[test]
    fn display_uses_long_algebraic() {
        let push = Move::quiet(12, 28, PieceKind::Pawn).with_kind(MoveKind::DoublePawnPush);
        assert_eq!(push.to_string(), "e2e4");

        let promo = Move::capture(54, 63, PieceKind::Pawn, PieceKind::Rook)
            .with_promotion(PieceKind::Knight);
        assert_eq!(promo.to_long_algebraic(), "g7h8n");
        assert!(promo.is_capture());
        assert!(promo.is_tactical());
    }

    #[test]
    fn castle_flags_are_reported() {
        let castle = Move::quiet(4, 6, PieceKind::King).with_kind(MoveKind::KingSideCastle);
        assert!(castle.is_castle());
        assert!(!castle.is_tactical());
    }
}
