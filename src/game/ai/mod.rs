//! Engine opponent
//!
//! The opponent is an external UCI engine driven through the `uci_bridge`
//! crate. The session only sees the [`EngineClient`] trait, so tests can swap
//! the process for a recording double.
//!
//! # Request cycle
//!
//! 1. The session sends the full position (start FEN + move list)
//! 2. The bridge's driver task runs `go movetime` on the tokio runtime
//! 3. The answer arrives as an [`EngineEvent`] on a crossbeam channel
//! 4. The owner of the session feeds it to
//!    [`GameSession::on_engine_event`](crate::game::session::GameSession::on_engine_event)
//!
//! Requests never block the caller; replies never touch the session from
//! another thread.

pub mod client;

pub use client::{start_engine, EngineClient};
pub use uci_bridge::{EngineEvent, EnginePosition, EngineReply, SearchBudget};
