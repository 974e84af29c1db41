//! Core module - application infrastructure
//!
//! - [`error`] - [`CoreError`] and the [`CoreResult`] alias
//! - [`settings`] - [`GameSettings`], the persisted user preferences
//! - [`settings_persistence`] - loading and saving settings as JSON

pub mod error;
pub mod settings;
pub mod settings_persistence;

pub use error::{CoreError, CoreResult};
pub use settings::{EngineOption, GameSettings};
pub use settings_persistence::{
    load_settings, load_settings_from, load_settings_or_default, save_settings, save_settings_to,
    settings_path,
};
