//! User configuration stored as an INI file.
//!
//! The file lives at `~/.config/wayframe/config.ini` (platform equivalent via
//! `dirs`). A missing file yields defaults; unknown sections and keys are
//! ignored.
//!
//! ```ini
//! [routing]
//! base_url = https://router.project-osrm.org
//! profile = driving
//! timeout = 30
//!
//! [playback]
//! follow = false
//! autoplay_interval_ms = 250
//! closed_window = 6
//! open_window = 5
//!
//! [logging]
//! level = info
//! directory = /var/log/wayframe
//! ```

mod keys;

pub use keys::ConfigKey;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use ini::Ini;
use thiserror::Error;
use tracing::debug;

use crate::playback::{PlaybackConfig, DEFAULT_CLOSED_WINDOW, DEFAULT_OPEN_WINDOW};
use crate::routing::{DEFAULT_OSRM_URL, DEFAULT_PROFILE, DEFAULT_TIMEOUT_SECS};

/// Default autoplay step in milliseconds.
pub const DEFAULT_AUTOPLAY_INTERVAL_MS: u64 = 250;

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: ini::Error,
    },

    #[error("Failed to write config file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unknown configuration key '{0}'")]
    UnknownKey(String),

    #[error("Invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
}

/// `[routing]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutingSettings {
    /// Routing server root URL
    pub base_url: String,
    /// Routing profile (driving, foot, ...)
    pub profile: String,
    /// HTTP timeout in seconds
    pub timeout_secs: u64,
}

impl Default for RoutingSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_OSRM_URL.to_string(),
            profile: DEFAULT_PROFILE.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// `[playback]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackSettings {
    pub follow: bool,
    pub autoplay_interval_ms: u64,
    pub closed_window: usize,
    pub open_window: usize,
}

impl PlaybackSettings {
    /// Window sizes for the playback controller.
    pub fn playback_config(&self) -> PlaybackConfig {
        PlaybackConfig {
            closed_window: self.closed_window,
            open_window: self.open_window,
        }
    }

    pub fn autoplay_interval(&self) -> Duration {
        Duration::from_millis(self.autoplay_interval_ms)
    }
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            follow: false,
            autoplay_interval_ms: DEFAULT_AUTOPLAY_INTERVAL_MS,
            closed_window: DEFAULT_CLOSED_WINDOW,
            open_window: DEFAULT_OPEN_WINDOW,
        }
    }
}

/// `[logging]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    /// Default filter level, overridden by `RUST_LOG`
    pub level: String,
    /// Directory for daily log files; stderr only when unset
    pub directory: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            directory: None,
        }
    }
}

/// The whole configuration file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigFile {
    pub routing: RoutingSettings,
    pub playback: PlaybackSettings,
    pub logging: LoggingSettings,
}

impl ConfigFile {
    /// Load from the default location.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&config_file_path())
    }

    /// Load from `path`, falling back to defaults when it does not exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let ini = Ini::load_from_file(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let mut config = Self::default();
        for key in ConfigKey::all() {
            let value = ini
                .section(Some(key.section()))
                .and_then(|section| section.get(key.key_name()));
            if let Some(value) = value {
                key.set(&mut config, value)?;
            }
        }

        debug!(path = %path.display(), "Loaded config file");
        Ok(config)
    }

    /// Save to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&config_file_path())
    }

    /// Save to `path`, creating parent directories. Unset values are omitted.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let write_err = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }

        let mut ini = Ini::new();
        for key in ConfigKey::all() {
            let value = key.get(self);
            if !value.is_empty() {
                ini.with_section(Some(key.section()))
                    .set(key.key_name(), value);
            }
        }

        ini.write_to_file(path).map_err(write_err)
    }
}

/// Default config file location.
pub fn config_file_path() -> PathBuf {
    config_directory().join("config.ini")
}

/// Directory holding wayframe's config.
pub fn config_directory() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("wayframe")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = ConfigFile::load_from(&dir.path().join("absent.ini")).unwrap();
        assert_eq!(config, ConfigFile::default());
    }

    #[test]
    fn test_defaults() {
        let config = ConfigFile::default();
        assert_eq!(config.routing.base_url, "https://router.project-osrm.org");
        assert_eq!(config.routing.profile, "driving");
        assert_eq!(config.routing.timeout_secs, 30);
        assert!(!config.playback.follow);
        assert_eq!(config.playback.autoplay_interval(), Duration::from_millis(250));
        assert_eq!(config.playback.playback_config(), PlaybackConfig::default());
        assert_eq!(config.logging.level, "info");
        assert!(config.logging.directory.is_none());
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.ini");

        let mut config = ConfigFile::default();
        config.routing.base_url = "http://localhost:5000".to_string();
        config.playback.follow = true;
        config.playback.open_window = 3;
        config.logging.directory = Some(dir.path().join("logs"));

        config.save_to(&path).unwrap();
        let loaded = ConfigFile::load_from(&path).unwrap();

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.ini");
        fs::write(&path, "[routing]\nprofile = foot\n\n[unrelated]\nx = 1\n").unwrap();

        let config = ConfigFile::load_from(&path).unwrap();

        assert_eq!(config.routing.profile, "foot");
        assert_eq!(config.routing.base_url, DEFAULT_OSRM_URL);
        assert_eq!(config.playback, PlaybackSettings::default());
    }

    #[test]
    fn test_invalid_value_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.ini");
        fs::write(&path, "[playback]\nautoplay_interval_ms = soon\n").unwrap();

        let result = ConfigFile::load_from(&path);
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_config_file_path_name() {
        let path = config_file_path();
        assert!(path.ends_with("wayframe/config.ini"));
    }
}
