//! UCI engine bridge
//!
//! Runs an external chess engine as a child process and plays the GUI side of
//! the Universal Chess Interface with it: handshake, position setup and
//! time-limited best-move searches. Results arrive asynchronously as
//! [`EngineEvent`]s on a crossbeam channel so a single-threaded game loop can
//! `select!` over engine replies and user input.
//!
//! ```no_run
//! use uci_bridge::{EngineBridge, EngineConfig, EngineEvent, EnginePosition};
//!
//! let runtime = tokio::runtime::Runtime::new().unwrap();
//! let (tx, rx) = crossbeam_channel::unbounded();
//! let bridge = EngineBridge::start(EngineConfig::default(), runtime.handle().clone(), tx).unwrap();
//!
//! bridge
//!     .request_best_move(EnginePosition::from_moves(["e2e4".to_string()]))
//!     .unwrap();
//! if let Ok(EngineEvent::Reply(reply)) = rx.recv() {
//!     println!("engine plays {:?}", reply.best_move);
//! }
//! ```

pub mod bridge;
pub mod budget;
pub mod config;
pub mod error;
pub mod protocol;

pub use bridge::{EngineBridge, EngineEvent};
pub use budget::SearchBudget;
pub use config::EngineConfig;
pub use error::{BridgeError, BridgeResult};
pub use protocol::{EnginePosition, EngineReply};
