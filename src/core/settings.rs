//! User preferences for the game and the engine process
//!
//! [`GameSettings`] is the single configuration record of the application.
//! It is loaded from disk at startup (see [`super::settings_persistence`]),
//! overridden by command-line flags in the binary, and converted into the
//! per-component configs ([`EngineConfig`], [`HistoryLayout`]) here.

use crate::core::error::{CoreError, CoreResult};
use crate::game::focus::Orientation;
use crate::game::resources::HistoryLayout;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use uci_bridge::{EngineConfig, SearchBudget};

/// One `setoption` sent to the engine after the handshake
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineOption {
    pub name: String,
    pub value: String,
}

impl EngineOption {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Persisted preferences
///
/// Missing fields in an older settings file take their default values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    /// Engine executable
    pub engine_path: PathBuf,
    pub engine_args: Vec<String>,
    pub engine_options: Vec<EngineOption>,
    pub handshake_timeout_ms: u64,
    /// Extra time on top of the search budget before a request is failed
    pub reply_grace_ms: u64,
    /// Thinking time per engine move; clamped to 1–10 s when applied
    pub search_budget_ms: u64,
    pub history_page_size: usize,
    pub history_visible_pages: usize,
    pub white_at_bottom: bool,
}

impl Default for GameSettings {
    fn default() -> Self {
        let engine = EngineConfig::default();
        let layout = HistoryLayout::default();
        Self {
            engine_path: engine.path,
            engine_args: engine.args,
            engine_options: engine
                .options
                .into_iter()
                .map(|(name, value)| EngineOption { name, value })
                .collect(),
            handshake_timeout_ms: engine.handshake_timeout.as_millis() as u64,
            reply_grace_ms: engine.reply_grace.as_millis() as u64,
            search_budget_ms: SearchBudget::default().millis(),
            history_page_size: layout.page_size(),
            history_visible_pages: layout.visible_pages(),
            white_at_bottom: true,
        }
    }
}

impl GameSettings {
    /// Reject values that would leave the game unusable
    ///
    /// Out-of-range search budgets are not an error; they are clamped later.
    pub fn validate(&self) -> CoreResult<()> {
        if self.engine_path.as_os_str().is_empty() {
            return Err(CoreError::InvalidSetting {
                field: "engine_path",
                message: "must not be empty".to_string(),
            });
        }
        if self.history_page_size < 2 {
            return Err(CoreError::InvalidSetting {
                field: "history_page_size",
                message: format!("{} is smaller than one full move", self.history_page_size),
            });
        }
        if self.history_visible_pages == 0 {
            return Err(CoreError::InvalidSetting {
                field: "history_visible_pages",
                message: "at least one page must be visible".to_string(),
            });
        }
        if self.handshake_timeout_ms == 0 {
            return Err(CoreError::InvalidSetting {
                field: "handshake_timeout_ms",
                message: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            path: self.engine_path.clone(),
            args: self.engine_args.clone(),
            options: self
                .engine_options
                .iter()
                .map(|o| (o.name.clone(), o.value.clone()))
                .collect(),
            handshake_timeout: Duration::from_millis(self.handshake_timeout_ms),
            reply_grace: Duration::from_millis(self.reply_grace_ms),
        }
    }

    pub fn history_layout(&self) -> HistoryLayout {
        HistoryLayout::new(self.history_page_size, self.history_visible_pages)
    }

    pub fn search_budget(&self) -> SearchBudget {
        SearchBudget::clamped(self.search_budget_ms)
    }

    pub fn orientation(&self) -> Orientation {
        if self.white_at_bottom {
            Orientation::WhiteAtBottom
        } else {
            Orientation::BlackAtBottom
        }
    }
}
