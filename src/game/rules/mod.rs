//! Chess rules
//!
//! The session never decides legality itself. It talks to a [`RulesEngine`]:
//! apply a UCI move, ask about check and game end, read pieces for drawing,
//! and take moves back. [`ShakmatyRules`] implements it on top of `shakmaty`.
//!
//! # Game end
//!
//! Checkmate, stalemate and insufficient material end the game outright.
//! The fifty-move rule and threefold repetition only count when the caller
//! asks with `claim_draw = true`; the session always does, so those draws are
//! claimed automatically.

pub mod board_state;

pub use board_state::ShakmatyRules;

use crate::game::error::GameResult;
use crate::game::types::{Piece, PieceColor, PieceType, Square};
use std::fmt;

/// How a legal move changed the board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveKind {
    Normal,
    Capture,
    Castle,
    EnPassant,
    Promotion,
}

impl MoveKind {
    /// Castling and en passant touch squares besides origin and destination
    pub fn touches_other_squares(self) -> bool {
        matches!(self, MoveKind::Castle | MoveKind::EnPassant)
    }
}

/// A move the rules engine accepted and played
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedMove {
    pub origin: Square,
    pub destination: Square,
    /// Canonical UCI as recorded in the history (`e1g1` for short castling)
    pub uci: String,
    pub kind: MoveKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOverReason {
    Checkmate { winner: PieceColor },
    Stalemate,
    InsufficientMaterial,
    FiftyMoveRule,
    ThreefoldRepetition,
}

impl GameOverReason {
    /// PGN-style result string
    pub fn result(self) -> &'static str {
        match self {
            GameOverReason::Checkmate {
                winner: PieceColor::White,
            } => "1-0",
            GameOverReason::Checkmate {
                winner: PieceColor::Black,
            } => "0-1",
            _ => "1/2-1/2",
        }
    }
}

impl fmt::Display for GameOverReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameOverReason::Checkmate { winner } => write!(f, "checkmate, {winner} wins"),
            GameOverReason::Stalemate => write!(f, "stalemate"),
            GameOverReason::InsufficientMaterial => write!(f, "insufficient material"),
            GameOverReason::FiftyMoveRule => write!(f, "fifty-move rule"),
            GameOverReason::ThreefoldRepetition => write!(f, "threefold repetition"),
        }
    }
}

/// Chess legality and board state, as seen by the session
pub trait RulesEngine {
    /// Validate and play a UCI move
    ///
    /// # Errors
    ///
    /// - [`GameError::InvalidNotation`](crate::game::error::GameError::InvalidNotation)
    ///   for text that is not a UCI move
    /// - [`GameError::InvalidMove`](crate::game::error::GameError::InvalidMove)
    ///   for moves that are illegal here (including a missing promotion piece)
    fn apply_move(&mut self, uci: &str) -> GameResult<AppliedMove>;

    /// Take back the latest move; returns its UCI, or `None` at the start
    fn undo_last_move(&mut self) -> Option<String>;

    /// Is the side to move in check?
    fn is_check(&self) -> bool;

    fn termination(&self, claim_draw: bool) -> Option<GameOverReason>;

    fn is_game_over(&self, claim_draw: bool) -> bool {
        self.termination(claim_draw).is_some()
    }

    /// `1-0`, `0-1`, `1/2-1/2`, or `*` while the game is running
    fn result(&self, claim_draw: bool) -> &'static str {
        self.termination(claim_draw)
            .map_or("*", GameOverReason::result)
    }

    fn piece_at(&self, square: Square) -> Option<Piece>;

    fn piece_type_at(&self, square: Square) -> Option<PieceType> {
        self.piece_at(square).map(|piece| piece.piece_type)
    }

    fn side_to_move(&self) -> PieceColor;

    /// True when origin → destination is a legal pawn move onto the last rank
    /// that still needs its promotion piece
    fn requires_promotion(&self, origin: Square, destination: Square) -> bool;

    /// Moves played since the start position, in UCI
    fn move_history(&self) -> &[String];

    /// Start position as FEN, or `None` for the standard start
    fn start_fen(&self) -> Option<&str>;

    /// Back to the start position
    fn reset(&mut self);
}
