//! Chess game logic module - one human against a UCI engine
//!
//! Everything here is single-threaded and free of I/O except the engine
//! client, which hands work to the `uci_bridge` driver task and gets answers
//! back as events.
//!
//! # Module Organization
//!
//! - `types` - Squares, files, ranks and pieces
//! - `notation` - Algebraic squares and UCI move strings
//! - `focus` - Remote-control focus navigation and board orientation
//! - `rules` - [`RulesEngine`](rules::RulesEngine) and its shakmaty implementation
//! - `resources` - Move history, square selection and the promotion menu
//! - `ai` - The [`EngineClient`](ai::EngineClient) boundary to the engine process
//! - `session` - [`GameSession`](session::GameSession), the turn state machine
//! - `error` - [`GameError`](error::GameError) and the `GameResult` alias
//!
//! # Event Flow
//!
//! 1. Input events (keys, typed squares) go to `GameSession::handle`
//! 2. A completed move is validated by the rules engine and recorded
//! 3. The session asks the engine for a reply and waits
//! 4. The reply comes back through `GameSession::on_engine_event`
//! 5. Each call returns a `SessionUpdate` the view paints from

pub mod ai;
pub mod error;
pub mod focus;
pub mod notation;
pub mod resources;
pub mod rules;
pub mod session;
pub mod types;

pub use error::{GameError, GameResult};
pub use session::{GameSession, GameState, SessionUpdate};
