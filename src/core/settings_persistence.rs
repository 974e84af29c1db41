//! Settings persistence
//!
//! Saves and loads [`GameSettings`] to/from a JSON file.
//!
//! # File Location
//!
//! Settings are stored in `settings.json` inside the user's configuration
//! directory (resolved with `directories::ProjectDirs`), or in the working
//! directory when no configuration directory exists.
//!
//! # Error Handling
//!
//! - Load failures fall back to default settings with a warning
//! - Save failures are returned to the caller

use crate::core::error::CoreResult;
use crate::core::settings::GameSettings;
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Settings filename
const SETTINGS_FILENAME: &str = "settings.json";

/// Resolve the settings file path
///
/// E.g. `~/.config/remote_chess/settings.json` on Linux. Falls back to a local
/// `settings.json` if the system config dir cannot be found.
pub fn settings_path() -> PathBuf {
    if let Some(proj_dirs) = ProjectDirs::from("com", "trilltino", "remote_chess") {
        proj_dirs.config_dir().join(SETTINGS_FILENAME)
    } else {
        PathBuf::from(SETTINGS_FILENAME)
    }
}

/// Read and validate settings from `path`
pub fn load_settings_from(path: &Path) -> CoreResult<GameSettings> {
    let contents = fs::read_to_string(path)?;
    let settings: GameSettings = serde_json::from_str(&contents)?;
    settings.validate()?;
    Ok(settings)
}

/// Load settings from `path`, using defaults if the file is missing or bad
pub fn load_settings_or_default(path: &Path) -> GameSettings {
    if !path.exists() {
        info!(
            "[SETTINGS] No settings file found at {:?}. Using defaults.",
            path
        );
        return GameSettings::default();
    }

    match load_settings_from(path) {
        Ok(settings) => {
            info!("[SETTINGS] Loaded settings from {:?}", path);
            settings
        }
        Err(e) => {
            warn!(
                "[SETTINGS] Failed to load settings file at {:?}: {}. Using defaults.",
                path, e
            );
            GameSettings::default()
        }
    }
}

/// Load settings from the default location
pub fn load_settings() -> GameSettings {
    load_settings_or_default(&settings_path())
}

/// Write settings as pretty JSON, creating the parent directory if needed
pub fn save_settings_to(settings: &GameSettings, path: &Path) -> CoreResult<()> {
    settings.validate()?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }

    let json = serde_json::to_string_pretty(settings)?;
    fs::write(path, json)?;
    info!("[SETTINGS] Saved settings to {:?}", path);
    Ok(())
}

/// Save settings to the default location; returns the path written
pub fn save_settings(settings: &GameSettings) -> CoreResult<PathBuf> {
    let path = settings_path();
    save_settings_to(settings, &path)?;
    Ok(path)
}
