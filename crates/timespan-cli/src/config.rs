//! Persisted CLI settings (`config.toml`).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use timespan_core::{CivilZone, Separator, TimespanError};

/// Errors that can occur while loading or saving the config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid TOML in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to write config file at {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error(transparent)]
    Separator(#[from] TimespanError),

    #[error("Invalid value for '{key}': {message}")]
    InvalidValue { key: &'static str, message: String },

    #[error("Unknown config key '{0}' (expected range-separator, timezone or trace)")]
    UnknownKey(String),

    #[error("Could not determine a config directory; pass --config")]
    NoConfigDir,
}

/// Contents of `config.toml`. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct ConfigFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range_separator: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace: Option<bool>,
}

/// `<config_dir>/timespan/config.toml`.
pub fn default_path() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|dir| dir.join("timespan").join("config.toml"))
        .ok_or(ConfigError::NoConfigDir)
}

impl ConfigFile {
    /// Load the config at `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(ConfigFile::default());
        }
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Write the config to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let write_err = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents).map_err(write_err)
    }

    /// The stored separator, validated.
    pub fn separator(&self) -> Result<Option<Separator>, ConfigError> {
        Ok(self
            .range_separator
            .as_deref()
            .map(Separator::new)
            .transpose()?)
    }

    /// The stored time zone, validated.
    pub fn zone(&self) -> Result<Option<CivilZone>, ConfigError> {
        self.timezone
            .as_deref()
            .map(|tz| {
                tz.parse().map_err(|message| ConfigError::InvalidValue {
                    key: "timezone",
                    message,
                })
            })
            .transpose()
    }

    /// Effective value of `key` as shown by `config get`.
    pub fn get(&self, key: &str) -> Result<String, ConfigError> {
        match key {
            "range-separator" => Ok(self.separator()?.unwrap_or_default().to_string()),
            "timezone" => Ok(self.zone()?.unwrap_or_default().to_string()),
            "trace" => Ok(self.trace.unwrap_or(false).to_string()),
            other => Err(ConfigError::UnknownKey(other.to_string())),
        }
    }

    /// Validate and store new values. `None` leaves a key unchanged.
    pub fn apply(
        &mut self,
        range_separator: Option<&str>,
        timezone: Option<&str>,
        trace: Option<bool>,
    ) -> Result<(), ConfigError> {
        if let Some(sep) = range_separator {
            Separator::new(sep)?;
            self.range_separator = Some(sep.to_string());
        }
        if let Some(tz) = timezone {
            let zone: CivilZone = tz.parse().map_err(|message| ConfigError::InvalidValue {
                key: "timezone",
                message,
            })?;
            self.timezone = Some(zone.to_string());
        }
        if let Some(trace) = trace {
            self.trace = Some(trace);
        }
        Ok(())
    }
}

/// Keys accepted by `config get`.
pub const KEYS: [&str; 3] = ["range-separator", "timezone", "trace"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = ConfigFile::load(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(config, ConfigFile::default());
        assert_eq!(config.get("range-separator").unwrap(), "/");
        assert_eq!(config.get("timezone").unwrap(), "local");
        assert_eq!(config.get("trace").unwrap(), "false");
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = ConfigFile::default();
        config.apply(Some("TO"), Some("UTC"), Some(true)).unwrap();
        config.save(&path).unwrap();

        let loaded = ConfigFile::load(&path).unwrap();
        assert_eq!(loaded.range_separator.as_deref(), Some("TO"));
        assert_eq!(loaded.timezone.as_deref(), Some("utc"));
        assert_eq!(loaded.trace, Some(true));
    }

    #[test]
    fn apply_rejects_reserved_separator() {
        let mut config = ConfigFile::default();
        let err = config.apply(Some("T"), None, None).unwrap_err();
        assert!(matches!(err, ConfigError::Separator(_)));
        assert_eq!(config.range_separator, None);
    }

    #[test]
    fn apply_rejects_bad_timezone() {
        let mut config = ConfigFile::default();
        assert!(config.apply(None, Some("Mars/Base"), None).is_err());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "colour = \"red\"\n").unwrap();
        assert!(matches!(
            ConfigFile::load(&path),
            Err(ConfigError::Parse { .. })
        ));
        assert!(matches!(
            ConfigFile::default().get("colour"),
            Err(ConfigError::UnknownKey(_))
        ));
    }

    #[test]
    fn stored_separator_is_revalidated() {
        let config = ConfigFile {
            range_separator: Some("-".to_string()),
            ..Default::default()
        };
        assert!(config.separator().is_err());
    }
}
