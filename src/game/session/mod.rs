//! Game session
//!
//! - [`state`] - the [`GameState`] turn cycle and its transition table
//! - [`update`] - [`SessionUpdate`], what the view has to change after each call
//! - [`controller`] - [`GameSession`], which owns the game and handles events

pub mod controller;
pub mod state;
pub mod update;

pub use controller::GameSession;
pub use state::GameState;
pub use update::{Notice, PlayerLabels, RedrawScope, SessionUpdate};
