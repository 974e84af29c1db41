//! Declarative session output
//!
//! Every controller operation returns a [`SessionUpdate`] describing what the
//! screen has to change: which squares to repaint, the new status and hint
//! texts, the history page, player labels and the promotion menu. Fields left
//! `None` mean "unchanged".

use crate::game::resources::{HistoryView, PromotionPrompt};
use crate::game::session::state::GameState;
use crate::game::types::{PieceColor, Square};
use std::fmt;

/// Board area that needs repainting
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RedrawScope {
    #[default]
    Nothing,
    Squares(Vec<Square>),
    Board,
}

impl RedrawScope {
    /// Widen the scope to cover `squares`
    pub fn include(&mut self, squares: &[Square]) {
        match self {
            RedrawScope::Board => {}
            RedrawScope::Nothing => {
                let mut list = Vec::with_capacity(squares.len());
                for square in squares {
                    if !list.contains(square) {
                        list.push(*square);
                    }
                }
                if !list.is_empty() {
                    *self = RedrawScope::Squares(list);
                }
            }
            RedrawScope::Squares(list) => {
                for square in squares {
                    if !list.contains(square) {
                        list.push(*square);
                    }
                }
            }
        }
    }

    pub fn full(&mut self) {
        *self = RedrawScope::Board;
    }

    pub fn is_nothing(&self) -> bool {
        *self == RedrawScope::Nothing
    }
}

/// Texts for the status and hint lines
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Blank the line
    Cleared,
    /// Squares picked so far, e.g. `e2` or `e2e4`
    Selection(String),
    /// A move just played
    Move(String),
    Check,
    IllegalMove,
    GameOver,
    /// PGN result plus the reason
    Result { result: String, reason: String },
    Hint(String),
    NoHint,
    UndoPending,
    ThinkingTime { seconds: u64 },
    EngineBusy,
    EngineFailed(String),
    NothingToUndo,
    ChoosePromotion,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::Cleared => Ok(()),
            Notice::Selection(text) | Notice::Move(text) => write!(f, "{text}"),
            Notice::Check => write!(f, "Check"),
            Notice::IllegalMove => write!(f, "Illegal move"),
            Notice::GameOver => write!(f, "Game over"),
            Notice::Result { result, reason } => write!(f, "Result: {result} ({reason})"),
            Notice::Hint(uci) => write!(f, "Hint: {uci}"),
            Notice::NoHint => write!(f, "No hint available"),
            Notice::UndoPending => write!(f, "Taking back move"),
            Notice::ThinkingTime { seconds } => write!(f, "New thinking time: {seconds} seconds"),
            Notice::EngineBusy => write!(f, "Engine is thinking"),
            Notice::EngineFailed(message) => {
                write!(f, "Engine failed: {message} (OK to retry)")
            }
            Notice::NothingToUndo => write!(f, "Nothing to take back"),
            Notice::ChoosePromotion => write!(f, "Choose promotion piece"),
        }
    }
}

/// Player name plates and the side-switch key caption
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerLabels {
    pub white: String,
    pub black: String,
    /// Caption of the side-switch key, e.g. `Play black`
    pub switch_action: String,
}

impl PlayerLabels {
    pub fn new(human: PieceColor, engine_name: &str) -> Self {
        let (white, black, switch_action) = match human {
            PieceColor::White => ("Player", engine_name, "Play black"),
            PieceColor::Black => (engine_name, "Player", "Play white"),
        };
        Self {
            white: white.to_string(),
            black: black.to_string(),
            switch_action: switch_action.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUpdate {
    pub state: GameState,
    pub redraw: RedrawScope,
    /// Status line (current move, check, game over)
    pub status: Option<Notice>,
    /// Hint line (ponder move, result, thinking time)
    pub hint: Option<Notice>,
    pub history: Option<HistoryView>,
    pub labels: Option<PlayerLabels>,
    /// `Some` while a promotion choice is open
    pub promotion: Option<PromotionPrompt>,
    /// Orientation changed; coordinate strips need repainting
    pub rotated: bool,
    pub closed: bool,
}

impl SessionUpdate {
    pub fn new(state: GameState) -> Self {
        Self {
            state,
            redraw: RedrawScope::Nothing,
            status: None,
            hint: None,
            history: None,
            labels: None,
            promotion: None,
            rotated: false,
            closed: false,
        }
    }

    /// True if nothing but the state is reported
    pub fn is_empty(&self) -> bool {
        self.redraw.is_nothing()
            && self.status.is_none()
            && self.hint.is_none()
            && self.history.is_none()
            && self.labels.is_none()
            && self.promotion.is_none()
            && !self.rotated
            && !self.closed
    }
}
