mod config;

pub use config::{AnnouncementsConfig, CoachConfig, Config, LocationConfig};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns `~/.config/runwalk[-dev]/` based on RUNWALK_ENV.
///
/// Set RUNWALK_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("RUNWALK_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("runwalk-dev")
    } else {
        base_dir.join("runwalk")
    };

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::DataDir(e.to_string()))?;
    Ok(dir)
}
