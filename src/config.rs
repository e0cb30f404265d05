//! Run configuration: loading, validating, and persisting `config.toml`.
//!
//! Three settings, all optional in the file:
//!
//! ```toml
//! # Maximum number of member thumbnails sampled into one collage.
//! max_images_in_collage = 4
//!
//! # Whether the daily scheduled run is enabled.
//! schedule_enabled = true
//!
//! # Time of day for the scheduled run, 24-hour HH:MM.
//! # Unparsable values fall back to 03:00.
//! schedule_time_of_day = "03:00"
//! ```
//!
//! Configuration is loaded once at run start and passed into the driver
//! explicitly; nothing reads it mid-run. A missing file means stock
//! defaults. Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    TomlSer(#[from] toml::ser::Error),
    #[error("config validation error: {0}")]
    Validation(String),
}

/// Process-wide settings, read-only for the duration of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Upper bound on sampled images per collage. The grid policy tops
    /// out at 3×3, so values above 9 waste samples but are not rejected.
    pub max_images_in_collage: u32,
    /// Whether the daily run is enabled at all.
    pub schedule_enabled: bool,
    /// 24-hour `HH:MM` time for the daily run.
    pub schedule_time_of_day: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_images_in_collage: 4,
            schedule_enabled: true,
            schedule_time_of_day: "03:00".to_string(),
        }
    }
}

impl Config {
    /// Load from `path`, returning stock defaults when the file is absent.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Persist to `path` as TOML.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        self.validate()?;
        let toml = toml::to_string_pretty(self)?;
        std::fs::write(path, toml)?;
        Ok(())
    }

    /// Check values are within acceptable ranges.
    ///
    /// `schedule_time_of_day` is deliberately not validated here: the
    /// schedule module falls back to 03:00 at parse time, matching the
    /// behavior users of the original tool rely on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_images_in_collage == 0 {
            return Err(ConfigError::Validation(
                "max_images_in_collage must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// A documented stock `config.toml`, printed by `covergrid gen-config`.
pub fn stock_config_toml() -> String {
    let defaults = Config::default();
    format!(
        "\
# covergrid configuration. All keys are optional; defaults shown.

# Maximum number of member thumbnails sampled into one collage.
# The grid tops out at 3x3, so values above 9 gain nothing.
max_images_in_collage = {}

# Whether the daily scheduled run is enabled.
schedule_enabled = {}

# Time of day for the scheduled run, 24-hour HH:MM.
# Unparsable values fall back to \"03:00\".
schedule_time_of_day = \"{}\"
",
        defaults.max_images_in_collage, defaults.schedule_enabled, defaults.schedule_time_of_day
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_match_stock_values() {
        let config = Config::default();
        assert_eq!(config.max_images_in_collage, 4);
        assert!(config.schedule_enabled);
        assert_eq!(config.schedule_time_of_day, "03:00");
    }

    #[test]
    fn missing_file_loads_defaults() {
        let tmp = TempDir::new().unwrap();
        let config = Config::load(&tmp.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "max_images_in_collage = 9\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.max_images_in_collage, 9);
        assert!(config.schedule_enabled);
        assert_eq!(config.schedule_time_of_day, "03:00");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "max_imagez_in_collage = 4\n").unwrap();

        assert!(matches!(Config::load(&path), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn zero_max_images_fails_validation() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "max_images_in_collage = 0\n").unwrap();

        assert!(matches!(
            Config::load(&path),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn save_load_round_trip() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        let config = Config {
            max_images_in_collage: 6,
            schedule_enabled: false,
            schedule_time_of_day: "22:30".into(),
        };

        config.save(&path).unwrap();
        assert_eq!(Config::load(&path).unwrap(), config);
    }

    #[test]
    fn stock_config_parses_to_defaults() {
        let parsed: Config = toml::from_str(&stock_config_toml()).unwrap();
        assert_eq!(parsed, Config::default());
    }
}
