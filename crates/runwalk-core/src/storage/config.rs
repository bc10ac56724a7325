//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Run/walk cycle tuning
//! - Location watch options passed to the position source
//! - Whether announcements are spoken
//!
//! Configuration is stored at `~/.config/runwalk/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::ConfigError;
use crate::providers::WatchOptions;
use crate::session::SessionRules;

/// Run/walk cycle configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoachConfig {
    #[serde(default = "default_walk_interval")]
    pub walk_interval_miles: f64,
    #[serde(default = "default_true")]
    pub walk_after_first_mile: bool,
}

/// Location watch configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationConfig {
    #[serde(default = "default_true")]
    pub high_accuracy: bool,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_max_sample_age_ms")]
    pub max_sample_age_ms: u64,
    #[serde(default = "default_min_distance_filter_m")]
    pub min_distance_filter_m: f64,
}

/// Spoken feedback configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnouncementsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/runwalk/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub coach: CoachConfig,
    #[serde(default)]
    pub location: LocationConfig,
    #[serde(default)]
    pub announcements: AnnouncementsConfig,
}

// Default functions
fn default_walk_interval() -> f64 {
    0.1
}
fn default_true() -> bool {
    true
}
fn default_timeout_ms() -> u64 {
    15_000
}
fn default_max_sample_age_ms() -> u64 {
    10_000
}
fn default_min_distance_filter_m() -> f64 {
    50.0
}

impl Default for CoachConfig {
    fn default() -> Self {
        Self {
            walk_interval_miles: default_walk_interval(),
            walk_after_first_mile: true,
        }
    }
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            timeout_ms: default_timeout_ms(),
            max_sample_age_ms: default_max_sample_age_ms(),
            min_distance_filter_m: default_min_distance_filter_m(),
        }
    }
}

impl Default for AnnouncementsConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => value
                        .parse::<bool>()
                        .map(serde_json::Value::Bool)
                        .map_err(|e| invalid(e.to_string()))?,
                    serde_json::Value::Number(n) if n.is_f64() => value
                        .parse::<f64>()
                        .ok()
                        .and_then(serde_json::Number::from_f64)
                        .map(serde_json::Value::Number)
                        .ok_or_else(|| invalid(format!("cannot parse '{value}' as number")))?,
                    serde_json::Value::Number(_) => value
                        .parse::<u64>()
                        .map(|n| serde_json::Value::Number(n.into()))
                        .map_err(|_| invalid(format!("cannot parse '{value}' as integer")))?,
                    serde_json::Value::Object(_) => return Err(unknown()),
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    /// Default location of the config file.
    pub fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing defaults if no file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from `path`, writing defaults there if the file is missing.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let load_failed = |message: String| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message,
        };
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content).map_err(|e| load_failed(e.to_string()))?;
                cfg.validate()?;
                Ok(cfg)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(load_failed(e.to_string())),
        }
    }

    /// Persist to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    /// Persist to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Object(_) => None,
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key. The change is validated but not saved.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value cannot be parsed
    /// or is out of range.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config =
            serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
                key: key.to_string(),
                message: e.to_string(),
            })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let walk = self.coach.walk_interval_miles;
        if !(walk > 0.0 && walk < 1.0) {
            return Err(ConfigError::InvalidValue {
                key: "coach.walk_interval_miles".into(),
                message: format!("{walk} is not between 0 and 1"),
            });
        }
        if self.location.timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                key: "location.timeout_ms".into(),
                message: "must be greater than zero".into(),
            });
        }
        let filter = self.location.min_distance_filter_m;
        if !(filter.is_finite() && filter >= 0.0) {
            return Err(ConfigError::InvalidValue {
                key: "location.min_distance_filter_m".into(),
                message: format!("{filter} is not a non-negative distance"),
            });
        }
        Ok(())
    }

    pub fn session_rules(&self) -> SessionRules {
        SessionRules {
            walk_interval_miles: self.coach.walk_interval_miles,
            walk_after_first_mile: self.coach.walk_after_first_mile,
        }
    }

    pub fn watch_options(&self) -> WatchOptions {
        WatchOptions {
            high_accuracy: self.location.high_accuracy,
            timeout_ms: self.location.timeout_ms,
            max_sample_age_ms: self.location.max_sample_age_ms,
            min_distance_filter_m: self.location.min_distance_filter_m,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.coach.walk_interval_miles, 0.1);
        assert_eq!(parsed.location.timeout_ms, 15_000);
    }

    #[test]
    fn missing_sections_take_defaults() {
        let parsed: Config = toml::from_str("[coach]\nwalk_interval_miles = 0.25\n").unwrap();
        assert_eq!(parsed.coach.walk_interval_miles, 0.25);
        assert!(parsed.coach.walk_after_first_mile);
        assert_eq!(parsed.location.min_distance_filter_m, 50.0);
        assert!(parsed.announcements.enabled);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("coach.walk_interval_miles").as_deref(), Some("0.1"));
        assert_eq!(cfg.get("location.timeout_ms").as_deref(), Some("15000"));
        assert_eq!(cfg.get("announcements.enabled").as_deref(), Some("true"));
        assert!(cfg.get("coach.missing_key").is_none());
        assert!(cfg.get("coach").is_none());
    }

    #[test]
    fn set_updates_float_integer_and_bool() {
        let mut cfg = Config::default();
        cfg.set("coach.walk_interval_miles", "0.2").unwrap();
        cfg.set("location.max_sample_age_ms", "5000").unwrap();
        cfg.set("announcements.enabled", "false").unwrap();
        assert_eq!(cfg.coach.walk_interval_miles, 0.2);
        assert_eq!(cfg.location.max_sample_age_ms, 5000);
        assert!(!cfg.announcements.enabled);
    }

    #[test]
    fn set_rejects_unknown_key() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.set("coach.nonexistent_key", "1"),
            Err(ConfigError::UnknownKey(_))
        ));
        assert!(matches!(cfg.set("", "1"), Err(ConfigError::UnknownKey(_))));
    }

    #[test]
    fn set_rejects_invalid_type() {
        let mut cfg = Config::default();
        assert!(cfg.set("announcements.enabled", "loud").is_err());
        assert!(cfg.set("location.timeout_ms", "-3").is_err());
        assert!(cfg.set("coach.walk_interval_miles", "far").is_err());
    }

    #[test]
    fn set_rejects_out_of_range_and_keeps_old_value() {
        let mut cfg = Config::default();
        let err = cfg.set("coach.walk_interval_miles", "1.5").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
        assert_eq!(cfg.coach.walk_interval_miles, 0.1);
        assert!(cfg.set("location.timeout_ms", "0").is_err());
    }

    #[test]
    fn load_from_writes_defaults_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let cfg = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(cfg.coach.walk_interval_miles, 0.1);
    }

    #[test]
    fn save_then_load_preserves_changes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut cfg = Config::default();
        cfg.set("coach.walk_after_first_mile", "false").unwrap();
        cfg.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert!(!loaded.coach.walk_after_first_mile);
        assert!(!loaded.session_rules().walk_after_first_mile);
    }

    #[test]
    fn load_from_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "coach = 3").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::LoadFailed { .. })
        ));
    }

    #[test]
    fn watch_options_mirror_location_section() {
        let cfg = Config::default();
        assert_eq!(cfg.watch_options(), WatchOptions::default());
    }
}
