pub mod config;
pub mod distance;
pub mod replay;

use std::path::Path;

use runwalk_core::{Config, ConfigError};

/// Load the config from `path` if given, otherwise from the default location.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}
