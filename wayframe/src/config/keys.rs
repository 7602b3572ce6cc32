//! Addressable configuration keys (`section.key`).

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use super::{ConfigError, ConfigFile};

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Every setting `config get`/`config set` understand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigKey {
    RoutingBaseUrl,
    RoutingProfile,
    RoutingTimeout,
    PlaybackFollow,
    PlaybackAutoplayIntervalMs,
    PlaybackClosedWindow,
    PlaybackOpenWindow,
    LoggingLevel,
    LoggingDirectory,
}

impl ConfigKey {
    /// All keys, grouped by section in file order.
    pub fn all() -> &'static [ConfigKey] {
        &[
            ConfigKey::RoutingBaseUrl,
            ConfigKey::RoutingProfile,
            ConfigKey::RoutingTimeout,
            ConfigKey::PlaybackFollow,
            ConfigKey::PlaybackAutoplayIntervalMs,
            ConfigKey::PlaybackClosedWindow,
            ConfigKey::PlaybackOpenWindow,
            ConfigKey::LoggingLevel,
            ConfigKey::LoggingDirectory,
        ]
    }

    /// INI section name.
    pub fn section(&self) -> &'static str {
        match self {
            ConfigKey::RoutingBaseUrl | ConfigKey::RoutingProfile | ConfigKey::RoutingTimeout => {
                "routing"
            }
            ConfigKey::PlaybackFollow
            | ConfigKey::PlaybackAutoplayIntervalMs
            | ConfigKey::PlaybackClosedWindow
            | ConfigKey::PlaybackOpenWindow => "playback",
            ConfigKey::LoggingLevel | ConfigKey::LoggingDirectory => "logging",
        }
    }

    /// Key name within the section.
    pub fn key_name(&self) -> &'static str {
        match self {
            ConfigKey::RoutingBaseUrl => "base_url",
            ConfigKey::RoutingProfile => "profile",
            ConfigKey::RoutingTimeout => "timeout",
            ConfigKey::PlaybackFollow => "follow",
            ConfigKey::PlaybackAutoplayIntervalMs => "autoplay_interval_ms",
            ConfigKey::PlaybackClosedWindow => "closed_window",
            ConfigKey::PlaybackOpenWindow => "open_window",
            ConfigKey::LoggingLevel => "level",
            ConfigKey::LoggingDirectory => "directory",
        }
    }

    /// Full `section.key` name.
    pub fn name(&self) -> String {
        format!("{}.{}", self.section(), self.key_name())
    }

    /// Current value as text. Empty when unset.
    pub fn get(&self, config: &ConfigFile) -> String {
        match self {
            ConfigKey::RoutingBaseUrl => config.routing.base_url.clone(),
            ConfigKey::RoutingProfile => config.routing.profile.clone(),
            ConfigKey::RoutingTimeout => config.routing.timeout_secs.to_string(),
            ConfigKey::PlaybackFollow => config.playback.follow.to_string(),
            ConfigKey::PlaybackAutoplayIntervalMs => {
                config.playback.autoplay_interval_ms.to_string()
            }
            ConfigKey::PlaybackClosedWindow => config.playback.closed_window.to_string(),
            ConfigKey::PlaybackOpenWindow => config.playback.open_window.to_string(),
            ConfigKey::LoggingLevel => config.logging.level.clone(),
            ConfigKey::LoggingDirectory => config
                .logging
                .directory
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
        }
    }

    /// Validate and store a value.
    pub fn set(&self, config: &mut ConfigFile, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        let invalid = |reason: &str| ConfigError::InvalidValue {
            key: self.name(),
            value: value.to_string(),
            reason: reason.to_string(),
        };

        match self {
            ConfigKey::RoutingBaseUrl => {
                if !(value.starts_with("http://") || value.starts_with("https://")) {
                    return Err(invalid("must start with http:// or https://"));
                }
                config.routing.base_url = value.trim_end_matches('/').to_string();
            }
            ConfigKey::RoutingProfile => {
                if value.is_empty() || value.contains('/') {
                    return Err(invalid("must be a single path segment"));
                }
                config.routing.profile = value.to_string();
            }
            ConfigKey::RoutingTimeout => {
                config.routing.timeout_secs = parse_positive(value).ok_or_else(|| {
                    invalid("must be a positive number of seconds")
                })?;
            }
            ConfigKey::PlaybackFollow => {
                config.playback.follow = parse_bool(value)
                    .ok_or_else(|| invalid("must be true or false"))?;
            }
            ConfigKey::PlaybackAutoplayIntervalMs => {
                config.playback.autoplay_interval_ms = parse_positive(value)
                    .ok_or_else(|| invalid("must be a positive number of milliseconds"))?;
            }
            ConfigKey::PlaybackClosedWindow => {
                config.playback.closed_window = parse_positive(value)
                    .ok_or_else(|| invalid("must be a positive frame count"))?
                    as usize;
            }
            ConfigKey::PlaybackOpenWindow => {
                config.playback.open_window = parse_positive(value)
                    .ok_or_else(|| invalid("must be a positive frame count"))?
                    as usize;
            }
            ConfigKey::LoggingLevel => {
                let level = value.to_ascii_lowercase();
                if !LOG_LEVELS.contains(&level.as_str()) {
                    return Err(invalid("must be one of trace, debug, info, warn, error"));
                }
                config.logging.level = level;
            }
            ConfigKey::LoggingDirectory => {
                config.logging.directory = (!value.is_empty()).then(|| PathBuf::from(value));
            }
        }
        Ok(())
    }
}

fn parse_positive(value: &str) -> Option<u64> {
    value.parse::<u64>().ok().filter(|v| *v > 0)
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

impl FromStr for ConfigKey {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        ConfigKey::all()
            .iter()
            .copied()
            .find(|key| key.name() == wanted)
            .ok_or_else(|| ConfigError::UnknownKey(s.to_string()))
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.section(), self.key_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_names() {
        assert_eq!(
            "routing.base_url".parse::<ConfigKey>().unwrap(),
            ConfigKey::RoutingBaseUrl
        );
        assert_eq!(
            "Playback.Open_Window".parse::<ConfigKey>().unwrap(),
            ConfigKey::PlaybackOpenWindow
        );
        assert!(matches!(
            "routing.nope".parse::<ConfigKey>(),
            Err(ConfigError::UnknownKey(_))
        ));
    }

    #[test]
    fn test_every_key_round_trips_its_name() {
        for key in ConfigKey::all() {
            assert_eq!(key.name().parse::<ConfigKey>().unwrap(), *key);
            assert_eq!(key.to_string(), key.name());
        }
    }

    #[test]
    fn test_set_and_get() {
        let mut config = ConfigFile::default();

        ConfigKey::RoutingBaseUrl
            .set(&mut config, "http://localhost:5000/")
            .unwrap();
        ConfigKey::PlaybackFollow.set(&mut config, "yes").unwrap();
        ConfigKey::LoggingLevel.set(&mut config, "DEBUG").unwrap();

        assert_eq!(ConfigKey::RoutingBaseUrl.get(&config), "http://localhost:5000");
        assert_eq!(ConfigKey::PlaybackFollow.get(&config), "true");
        assert_eq!(ConfigKey::LoggingLevel.get(&config), "debug");
    }

    #[test]
    fn test_set_rejects_bad_values() {
        let mut config = ConfigFile::default();

        assert!(ConfigKey::RoutingBaseUrl.set(&mut config, "ftp://x").is_err());
        assert!(ConfigKey::RoutingProfile.set(&mut config, "a/b").is_err());
        assert!(ConfigKey::RoutingTimeout.set(&mut config, "0").is_err());
        assert!(ConfigKey::PlaybackFollow.set(&mut config, "maybe").is_err());
        assert!(ConfigKey::PlaybackClosedWindow.set(&mut config, "-1").is_err());
        assert!(ConfigKey::LoggingLevel.set(&mut config, "loud").is_err());

        assert_eq!(config, ConfigFile::default());
    }

    #[test]
    fn test_logging_directory_unset_is_empty() {
        let mut config = ConfigFile::default();
        assert_eq!(ConfigKey::LoggingDirectory.get(&config), "");

        ConfigKey::LoggingDirectory.set(&mut config, "/tmp/logs").unwrap();
        assert_eq!(config.logging.directory, Some(PathBuf::from("/tmp/logs")));

        ConfigKey::LoggingDirectory.set(&mut config, "").unwrap();
        assert!(config.logging.directory.is_none());
    }
}
