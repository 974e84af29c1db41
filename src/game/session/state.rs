//! Session state machine
//!
//! [`GameState`] tracks where the game is within the turn cycle. Every change
//! goes through [`GameState::can_transition_to`]; the controller panics on an
//! invalid transition in debug builds.

use crate::game::rules::GameOverReason;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    /// Human to move, no square chosen yet
    ///
    /// Valid transitions: → AwaitingSecondSelection, → WaitingForEngine (side switch)
    AwaitingFirstSelection,

    /// Origin chosen, waiting for the destination
    ///
    /// Valid transitions: → AwaitingPromotionChoice, → WaitingForEngine,
    /// → GameOver, → AwaitingFirstSelection / Check (illegal move, undo),
    /// → EngineFailed
    AwaitingSecondSelection,

    /// Pawn move onto the last rank waiting for its piece
    AwaitingPromotionChoice,

    /// A best-move request is outstanding
    WaitingForEngine,

    /// A request is outstanding and the player asked to take back their move
    PendingUndoAfterEngine,

    /// Human to move while in check; behaves like AwaitingFirstSelection
    Check,

    /// The last request failed; confirm retries, undo takes the move back
    EngineFailed,

    /// Checkmate or draw; only a new game or closing leaves it
    GameOver(GameOverReason),

    /// Terminal state after cancel/close
    Closed,
}

impl GameState {
    /// States in which the human is to move and may pick squares
    pub fn accepts_selection(&self) -> bool {
        matches!(
            self,
            GameState::AwaitingFirstSelection
                | GameState::AwaitingSecondSelection
                | GameState::Check
        )
    }

    /// States with a best-move request in flight
    pub fn is_waiting_for_engine(&self) -> bool {
        matches!(
            self,
            GameState::WaitingForEngine | GameState::PendingUndoAfterEngine
        )
    }

    /// Human to move: first/second selection, check or promotion choice
    pub fn is_human_turn(&self) -> bool {
        self.accepts_selection() || *self == GameState::AwaitingPromotionChoice
    }

    pub fn is_game_over(&self) -> bool {
        matches!(self, GameState::GameOver(_))
    }

    /// States a fresh turn for the human starts in
    pub fn is_idle(&self) -> bool {
        matches!(self, GameState::AwaitingFirstSelection | GameState::Check)
    }

    pub fn can_transition_to(&self, next: &GameState) -> bool {
        use GameState::*;

        if *self == Closed {
            return false;
        }
        if *next == Closed || self == next {
            return true;
        }

        match (self, next) {
            (AwaitingFirstSelection | Check, AwaitingSecondSelection) => true,
            (
                AwaitingSecondSelection,
                AwaitingPromotionChoice | WaitingForEngine | GameOver(_) | EngineFailed,
            ) => true,
            (AwaitingPromotionChoice, WaitingForEngine | GameOver(_) | EngineFailed) => true,
            // Side switch
            (AwaitingFirstSelection | Check, WaitingForEngine) => true,
            (
                WaitingForEngine,
                AwaitingFirstSelection | Check | GameOver(_) | EngineFailed | PendingUndoAfterEngine,
            ) => true,
            (PendingUndoAfterEngine, AwaitingFirstSelection | Check) => true,
            (EngineFailed, WaitingForEngine) => true,
            // Illegal move, cancel, undo or new game
            (_, AwaitingFirstSelection | Check) => !self.is_waiting_for_engine(),
            _ => false,
        }
    }
}
