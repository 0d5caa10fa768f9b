//! Configuration loading and typed config structures for Lifeline.
//!
//! The canonical configuration lives in `lifeline-config.yaml` at the project
//! root. This module defines strongly-typed structs that mirror the YAML
//! structure, and provides a loader that reads and validates the file.
//! Every field has a default, so an empty or missing file yields a working
//! configuration with the two seeded clinics and an in-memory store.

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use lifeline_geo::{FacilityDirectory, default_facilities};
use lifeline_store::RetentionPolicy;
use lifeline_types::Facility;
use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// The configuration parsed but a value is unusable.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// Explanation of what is wrong.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level service configuration.
///
/// Mirrors the structure of `lifeline-config.yaml`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LifelineConfig {
    /// Service identity.
    #[serde(default)]
    pub service: ServiceConfig,

    /// Emergency resolver tuning.
    #[serde(default)]
    pub resolver: ResolverConfig,

    /// Log retention applied on every append.
    #[serde(default)]
    pub retention: RetentionPolicy,

    /// Store backend and listener settings.
    #[serde(default)]
    pub infrastructure: InfrastructureConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// The facility directory, in search order.
    #[serde(default = "default_facilities")]
    pub facilities: Vec<Facility>,
}

impl Default for LifelineConfig {
    fn default() -> Self {
        Self {
            service: ServiceConfig::default(),
            resolver: ResolverConfig::default(),
            retention: RetentionPolicy::default(),
            infrastructure: InfrastructureConfig::default(),
            logging: LoggingConfig::default(),
            facilities: default_facilities(),
        }
    }
}

impl LifelineConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override YAML values:
    /// - `DRAGONFLY_URL` overrides `infrastructure.dragonfly_url`
    /// - `LIFELINE_API_PORT` overrides `infrastructure.api_port`
    /// - `LIFELINE_STORE_BACKEND` overrides `infrastructure.store_backend`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value fails validation.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Like [`from_file`](Self::from_file), but a missing file yields the
    /// defaults (still subject to environment overrides).
    ///
    /// # Errors
    ///
    /// Same as [`from_file`](Self::from_file), except for a missing file.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            return Self::from_file(path);
        }
        tracing::info!(path = %path.display(), "Config file not found, using defaults");
        let mut config = Self::default();
        config.infrastructure.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a YAML string.
    ///
    /// An empty string is a valid, all-defaults configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value fails validation.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yml::from_str(yaml)?
        };
        config.infrastructure.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Check values that parse but cannot be used.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first bad value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.resolver.position_timeout_ms == 0 {
            return Err(ConfigError::Invalid {
                reason: "resolver.position_timeout_ms must be at least 1".to_owned(),
            });
        }
        self.retention
            .validate()
            .map_err(|e| ConfigError::Invalid {
                reason: e.to_string(),
            })?;
        self.directory()?;
        Ok(())
    }

    /// Build the facility directory from the `facilities` section.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] on a duplicate id or an
    /// out-of-range location.
    pub fn directory(&self) -> Result<FacilityDirectory, ConfigError> {
        FacilityDirectory::new(self.facilities.clone()).map_err(|e| ConfigError::Invalid {
            reason: e.to_string(),
        })
    }
}

/// Service identity.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServiceConfig {
    /// Name reported by the health endpoint and in logs.
    #[serde(default = "default_service_name")]
    pub name: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: default_service_name(),
        }
    }
}

/// Emergency resolver tuning.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ResolverConfig {
    /// Upper bound on position acquisition, in milliseconds.
    #[serde(default = "default_position_timeout_ms")]
    pub position_timeout_ms: u64,
}

impl ResolverConfig {
    /// The position timeout as a [`Duration`].
    pub const fn position_timeout(&self) -> Duration {
        Duration::from_millis(self.position_timeout_ms)
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            position_timeout_ms: default_position_timeout_ms(),
        }
    }
}

/// Which key-value backend holds the logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// In-process map. Data is lost on restart.
    #[default]
    Memory,
    /// `Dragonfly` (Redis-compatible) at `dragonfly_url`.
    Dragonfly,
}

impl FromStr for StoreBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "dragonfly" | "redis" => Ok(Self::Dragonfly),
            other => Err(ConfigError::Invalid {
                reason: format!("unknown store backend: {other}"),
            }),
        }
    }
}

/// Store backend and listener settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InfrastructureConfig {
    /// Selected store backend.
    #[serde(default)]
    pub store_backend: StoreBackend,

    /// Dragonfly (Redis-compatible) URL.
    #[serde(default = "default_dragonfly_url")]
    pub dragonfly_url: String,

    /// HTTP bind address.
    #[serde(default = "default_api_host")]
    pub api_host: String,

    /// HTTP port.
    #[serde(default = "default_api_port")]
    pub api_port: u16,
}

impl InfrastructureConfig {
    /// Override settings with environment variables when set.
    ///
    /// This allows Docker Compose (or any deployment) to set connection
    /// strings via env vars without modifying the YAML config file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if an override cannot be parsed.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|name| std::env::var(name).ok())
    }

    /// Apply overrides from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if an override cannot be parsed.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup("DRAGONFLY_URL") {
            self.dragonfly_url = val;
        }
        if let Some(val) = lookup("LIFELINE_API_PORT") {
            self.api_port = val.trim().parse().map_err(|e| ConfigError::Invalid {
                reason: format!("LIFELINE_API_PORT is not a port number ({val}): {e}"),
            })?;
        }
        if let Some(val) = lookup("LIFELINE_STORE_BACKEND") {
            self.store_backend = val.parse()?;
        }
        Ok(())
    }
}

impl Default for InfrastructureConfig {
    fn default() -> Self {
        Self {
            store_backend: StoreBackend::default(),
            dragonfly_url: default_dragonfly_url(),
            api_host: default_api_host(),
            api_port: default_api_port(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions for serde
// ---------------------------------------------------------------------------

fn default_service_name() -> String {
    "lifeline".to_owned()
}

const fn default_position_timeout_ms() -> u64 {
    10_000
}

fn default_dragonfly_url() -> String {
    "redis://localhost:6379".to_owned()
}

fn default_api_host() -> String {
    "0.0.0.0".to_owned()
}

const fn default_api_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn default_config_is_valid() {
        let config = LifelineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.resolver.position_timeout_ms, 10_000);
        assert_eq!(config.retention, RetentionPolicy::Unbounded);
        assert_eq!(config.infrastructure.store_backend, StoreBackend::Memory);
        assert_eq!(config.facilities.len(), 2);
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r#"
service:
  name: "lifeline-test"

resolver:
  position_timeout_ms: 2500

retention:
  policy: keep_last
  count: 100

infrastructure:
  store_backend: dragonfly
  dragonfly_url: "redis://testhost:6379"
  api_host: "127.0.0.1"
  api_port: 9090

logging:
  level: "debug"
  json: true

facilities:
  - id: "1"
    name: "Manila General"
    phone: "0281234567"
    location: { latitude: 14.60, longitude: 121.02 }
  - id: "2"
    name: "Carmen Clinic"
    phone: "09171234567"
    location: { latitude: 8.45, longitude: 124.63 }
"#;

        let config: Result<LifelineConfig, _> = serde_yml::from_str(yaml);
        assert!(config.is_ok());
        let config = config.unwrap_or_default();

        assert_eq!(config.service.name, "lifeline-test");
        assert_eq!(config.resolver.position_timeout(), Duration::from_millis(2500));
        assert_eq!(config.retention, RetentionPolicy::KeepLast { count: 100 });
        assert_eq!(config.infrastructure.store_backend, StoreBackend::Dragonfly);
        assert_eq!(config.infrastructure.api_port, 9090);
        assert!(config.logging.json);
        assert_eq!(config.facilities.len(), 2);
        assert_eq!(
            config.facilities.first().map(|f| f.name.as_str()),
            Some("Manila General")
        );
    }

    #[test]
    fn parse_minimal_yaml() {
        let yaml = "resolver:\n  position_timeout_ms: 500\n";
        let config: LifelineConfig = serde_yml::from_str(yaml).unwrap_or_default();

        assert_eq!(config.resolver.position_timeout_ms, 500);
        // Everything else uses defaults
        assert_eq!(config.infrastructure.api_port, 8080);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.facilities.len(), 2);
    }

    #[test]
    fn parse_empty_yaml() {
        let mut infra = InfrastructureConfig::default();
        assert!(infra.apply_overrides(no_env).is_ok());
        assert_eq!(infra, InfrastructureConfig::default());
        let config: Result<LifelineConfig, _> = serde_yml::from_str("{}");
        assert!(config.is_ok_and(|c| c == LifelineConfig::default()));
    }

    #[test]
    fn empty_facility_list_is_allowed() {
        let config: LifelineConfig = serde_yml::from_str("facilities: []\n").unwrap_or_default();
        assert!(config.facilities.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_zero_timeout_and_zero_retention() {
        let mut config = LifelineConfig::default();
        config.resolver.position_timeout_ms = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { .. })));

        let mut config = LifelineConfig::default();
        config.retention = RetentionPolicy::MaxAge { days: 0 };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn rejects_duplicate_facility_ids() {
        let mut config = LifelineConfig::default();
        let duplicate = config.facilities.first().cloned();
        config.facilities.extend(duplicate);
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn env_overrides_replace_yaml_values() {
        let mut infra = InfrastructureConfig::default();
        let result = infra.apply_overrides(|name| match name {
            "DRAGONFLY_URL" => Some("redis://cache:6379".to_owned()),
            "LIFELINE_API_PORT" => Some("3001".to_owned()),
            "LIFELINE_STORE_BACKEND" => Some("Dragonfly".to_owned()),
            _ => None,
        });
        assert!(result.is_ok());
        assert_eq!(infra.dragonfly_url, "redis://cache:6379");
        assert_eq!(infra.api_port, 3001);
        assert_eq!(infra.store_backend, StoreBackend::Dragonfly);
    }

    #[test]
    fn bad_port_override_is_rejected() {
        let mut infra = InfrastructureConfig::default();
        let result = infra.apply_overrides(|name| {
            (name == "LIFELINE_API_PORT").then(|| "eighty".to_owned())
        });
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn load_project_config_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("lifeline-config.yaml");
        if path.exists() {
            let config = LifelineConfig::from_file(&path);
            assert!(config.is_ok(), "Failed to load project config: {config:?}");
        }
    }
}
