//! Application configuration
//!
//! Loaded from a TOML file. Every section and field has a default, so an
//! empty file (or no file at all) yields a runnable configuration.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::application::DispatchMode;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl ConfigError {
    /// The file does not exist, so the service runs on defaults.
    pub fn is_missing_file(&self) -> bool {
        matches!(self, ConfigError::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub events: EventsConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Seconds to wait for in-flight work after a shutdown signal
    pub shutdown_timeout: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            shutdown_timeout: 30,
        }
    }
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive; `RUST_LOG` takes precedence
    pub level: String,
    /// `text` or `json`
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EventsConfig {
    pub dispatch_mode: DispatchMode,
    /// Bounded queue size for `queued` dispatch
    pub queue_capacity: usize,
    /// Entries kept for `/api/v1/events/activity`
    pub activity_log_capacity: usize,
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            dispatch_mode: DispatchMode::Inline,
            queue_capacity: 1024,
            activity_log_capacity: 200,
        }
    }
}

impl AppConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&raw).map_err(|e| match e {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })?;
        Ok(config)
    }

    pub fn from_toml(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw).map_err(|source| ConfigError::Parse {
            path: PathBuf::new(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.events.dispatch_mode == DispatchMode::Queued && self.events.queue_capacity == 0 {
            return Err(ConfigError::Invalid(
                "events.queue_capacity must be positive in queued mode".into(),
            ));
        }
        match self.logging.format.to_lowercase().as_str() {
            "text" | "json" => Ok(()),
            other => Err(ConfigError::Invalid(format!(
                "logging.format must be text or json, got '{}'",
                other
            ))),
        }
    }
}

/// `<config dir>/crux/config.toml`, falling back to the working directory
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .map(|dir| dir.join("crux"))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let config = AppConfig::from_toml("").unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.events.dispatch_mode, DispatchMode::Inline);
    }

    #[test]
    fn partial_sections_fill_in_defaults() {
        let config = AppConfig::from_toml(
            r#"
            [server]
            port = 9100

            [events]
            dispatch_mode = "queued"
            queue_capacity = 64
            "#,
        )
        .unwrap();
        assert_eq!(config.server.address(), "0.0.0.0:9100");
        assert_eq!(config.events.dispatch_mode, DispatchMode::Queued);
        assert_eq!(config.events.queue_capacity, 64);
        assert_eq!(config.events.activity_log_capacity, 200);
    }

    #[test]
    fn rejects_zero_capacity_queue_and_unknown_format() {
        let err = AppConfig::from_toml("[events]\ndispatch_mode = \"queued\"\nqueue_capacity = 0")
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = AppConfig::from_toml("[logging]\nformat = \"xml\"").unwrap_err();
        assert!(err.to_string().contains("xml"));
    }

    #[test]
    fn unknown_dispatch_mode_is_a_parse_error() {
        let err = AppConfig::from_toml("[events]\ndispatch_mode = \"fire-and-forget\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = AppConfig::load("/nonexistent/crux/config.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.is_missing_file());
        assert!(err.to_string().contains("/nonexistent/crux/config.toml"));
    }

    #[test]
    fn only_absent_files_count_as_missing() {
        let err = AppConfig::from_toml("[logging]\nformat = \"xml\"").unwrap_err();
        assert!(!err.is_missing_file());

        let denied = ConfigError::Io {
            path: PathBuf::from("/etc/crux/config.toml"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        };
        assert!(!denied.is_missing_file());
    }

    #[test]
    fn default_path_ends_in_crux_config() {
        assert!(default_config_path().ends_with("crux/config.toml"));
    }
}
