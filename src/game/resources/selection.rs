//! Pending square selections
//!
//! A move is entered as two confirmed squares. The buffer holds the origin
//! until the destination arrives, then hands out the pair in one piece.

use crate::game::types::Square;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    origin: Option<Square>,
}

impl Selection {
    /// Record a square; returns `(origin, destination)` once both are known
    ///
    /// The buffer is empty again after a pair has been returned.
    pub fn push(&mut self, square: Square) -> Option<(Square, Square)> {
        match self.origin.take() {
            Some(origin) => Some((origin, square)),
            None => {
                self.origin = Some(square);
                None
            }
        }
    }

    pub fn origin(&self) -> Option<Square> {
        self.origin
    }

    pub fn clear(&mut self) -> Option<Square> {
        self.origin.take()
    }

    pub fn is_selected(&self) -> bool {
        self.origin.is_some()
    }
}
