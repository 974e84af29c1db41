//! Engine client boundary

use crate::game::error::{GameError, GameResult};
use crossbeam_channel::Sender;
use tokio::runtime::Handle;
use tracing::{info, warn};
use uci_bridge::{BridgeError, EngineBridge, EngineConfig, EngineEvent, EnginePosition, SearchBudget};

/// What the session needs from an engine
pub trait EngineClient {
    /// Start a search; the result arrives later as an [`EngineEvent`]
    fn request_best_move(&mut self, position: EnginePosition) -> GameResult<()>;

    /// Store the thinking time for future requests; returns the clamped value
    fn set_search_budget(&mut self, millis: u64) -> SearchBudget;

    fn search_budget(&self) -> SearchBudget;

    /// Tell the engine a fresh game starts
    fn new_game(&mut self) -> GameResult<()>;

    /// Display name, if the engine announced one
    fn engine_name(&self) -> Option<&str>;

    /// Shut the engine down; must be safe to call more than once
    fn stop(&mut self);
}

fn communication_failure(error: BridgeError) -> GameError {
    GameError::EngineCommunicationFailure {
        message: error.to_string(),
    }
}

/// Launch the engine process and complete the UCI handshake
///
/// # Errors
///
/// [`GameError::EngineStartupFailure`] wrapping the bridge error.
pub fn start_engine(
    config: EngineConfig,
    runtime: Handle,
    events: Sender<EngineEvent>,
    budget: SearchBudget,
) -> GameResult<EngineBridge> {
    let mut bridge = EngineBridge::start(config, runtime, events)
        .map_err(|source| GameError::EngineStartupFailure { source })?;
    bridge.set_search_budget(budget.millis());
    info!(
        "[AI] Engine {} ready, thinking time {}",
        bridge.engine_name().unwrap_or("(unnamed)"),
        bridge.search_budget()
    );
    Ok(bridge)
}

impl EngineClient for EngineBridge {
    fn request_best_move(&mut self, position: EnginePosition) -> GameResult<()> {
        EngineBridge::request_best_move(self, position).map_err(communication_failure)
    }

    fn set_search_budget(&mut self, millis: u64) -> SearchBudget {
        EngineBridge::set_search_budget(self, millis)
    }

    fn search_budget(&self) -> SearchBudget {
        EngineBridge::search_budget(self)
    }

    fn new_game(&mut self) -> GameResult<()> {
        EngineBridge::new_game(self).map_err(|e| {
            warn!("[AI] Could not start a new engine game: {}", e);
            communication_failure(e)
        })
    }

    fn engine_name(&self) -> Option<&str> {
        EngineBridge::engine_name(self)
    }

    fn stop(&mut self) {
        EngineBridge::stop(self);
    }
}
