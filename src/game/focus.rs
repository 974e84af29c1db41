//! Focus navigation
//!
//! A remote control has no pointer, so the player moves a highlighted square
//! around the board with direction keys and confirms it. "Up" always means
//! toward the opponent as seen by the viewer: when black is at the bottom the
//! offset table is inverted.

use crate::game::types::Square;
use tracing::trace;

/// The eight key directions, as seen on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    South,
    East,
    West,
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
}

impl Direction {
    /// (file delta, rank delta) with white at the bottom
    pub fn offset(self) -> (i8, i8) {
        match self {
            Direction::North => (0, 1),
            Direction::South => (0, -1),
            Direction::East => (1, 0),
            Direction::West => (-1, 0),
            Direction::NorthEast => (1, 1),
            Direction::NorthWest => (-1, 1),
            Direction::SouthEast => (1, -1),
            Direction::SouthWest => (-1, -1),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Orientation {
    #[default]
    WhiteAtBottom,
    BlackAtBottom,
}

impl Orientation {
    pub fn flipped(self) -> Self {
        match self {
            Orientation::WhiteAtBottom => Orientation::BlackAtBottom,
            Orientation::BlackAtBottom => Orientation::WhiteAtBottom,
        }
    }

    pub fn white_at_bottom(self) -> bool {
        self == Orientation::WhiteAtBottom
    }
}

/// A focus change: both squares need repainting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusMove {
    pub previous: Square,
    pub current: Square,
}

/// Highlighted square plus board orientation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusNavigator {
    focus: Square,
    orientation: Orientation,
}

impl Default for FocusNavigator {
    fn default() -> Self {
        Self::new(Orientation::default())
    }
}

impl FocusNavigator {
    /// Focus starts on e2
    pub fn new(orientation: Orientation) -> Self {
        Self {
            focus: Square::E2,
            orientation,
        }
    }

    pub fn focus(&self) -> Square {
        self.focus
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Move focus one square; `None` if that would leave the board
    pub fn step(&mut self, direction: Direction) -> Option<FocusMove> {
        let (mut file_delta, mut rank_delta) = direction.offset();
        if self.orientation == Orientation::BlackAtBottom {
            file_delta = -file_delta;
            rank_delta = -rank_delta;
        }

        let target = self.focus.offset(file_delta, rank_delta)?;
        trace!("[FOCUS] {:?}: {} -> {}", direction, self.focus, target);
        Some(self.set_focus(target))
    }

    pub fn set_focus(&mut self, square: Square) -> FocusMove {
        let previous = self.focus;
        self.focus = square;
        FocusMove {
            previous,
            current: square,
        }
    }

    /// Flip the board; focus stays on the same square
    pub fn rotate(&mut self) -> Orientation {
        self.orientation = self.orientation.flipped();
        self.orientation
    }
}
