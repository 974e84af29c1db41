//! Pending pawn promotion
//!
//! When the player's two selections describe a pawn reaching the last rank,
//! the move is parked here while the four promotion choices are shown. The
//! choice list works like a small menu: direction keys move the highlight,
//! confirm takes the highlighted piece.

use crate::game::notation::Move;
use crate::game::types::PromotionPiece;

/// Choice list shown to the player
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromotionPrompt {
    /// Piece and the full UCI move it would play, in display order
    pub options: Vec<(PromotionPiece, String)>,
    pub highlighted: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingPromotion {
    mv: Move,
    highlighted: usize,
}

impl PendingPromotion {
    /// Park `mv` (without suffix) with the queen highlighted
    pub fn new(mv: Move) -> Self {
        Self {
            mv: Move {
                promotion: None,
                ..mv
            },
            highlighted: 0,
        }
    }

    pub fn base_move(&self) -> Move {
        self.mv
    }

    pub fn highlighted(&self) -> PromotionPiece {
        PromotionPiece::ALL[self.highlighted]
    }

    /// Move the highlight by `delta` entries, wrapping around
    pub fn cycle(&mut self, delta: isize) {
        let len = PromotionPiece::ALL.len() as isize;
        self.highlighted = (self.highlighted as isize + delta).rem_euclid(len) as usize;
    }

    /// The complete move for `piece`
    pub fn complete(&self, piece: PromotionPiece) -> Move {
        self.mv.with_promotion(piece)
    }

    pub fn prompt(&self) -> PromotionPrompt {
        PromotionPrompt {
            options: PromotionPiece::ALL
                .iter()
                .map(|&piece| (piece, self.complete(piece).uci()))
                .collect(),
            highlighted: self.highlighted,
        }
    }
}
