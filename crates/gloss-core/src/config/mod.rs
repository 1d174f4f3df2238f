//! Configuration management for Gloss.
//!
//! Configuration is loaded from multiple sources with the following priority:
//! 1. Command-line flags (applied by the CLI)
//! 2. Environment variables
//! 3. Project-local `gloss.yaml` or `config.yaml`
//! 4. User config `~/.config/gloss/config.yaml`
//! 5. Built-in defaults (lowest priority)

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;
use thiserror::Error;

use crate::model::RelationshipType;

mod defaults;

pub use defaults::*;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] serde_yaml::Error),

    #[error("Failed to parse TOML config file: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Remote catalog connection.
    pub atlas: AtlasConfig,

    /// CSV import behaviour.
    pub import: ImportConfig,

    /// Relationship directionality.
    pub relationships: RelationshipsConfig,
}

impl Config {
    /// Load configuration from default locations.
    ///
    /// Searches for config in order:
    /// 1. `./gloss.yaml`, then `./config.yaml` (project local)
    /// 2. `~/.config/gloss/config.yaml` (user config)
    /// 3. Falls back to defaults
    pub fn load() -> Result<Self, ConfigError> {
        for name in LOCAL_CONFIG_FILES {
            if Path::new(name).exists() {
                return Self::from_file(name);
            }
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join(USER_CONFIG_DIR).join(USER_CONFIG_FILE);
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        let mut config = Self::default();
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load configuration from a specific file.
    ///
    /// Files ending in `.toml` are read as TOML, everything else as YAML.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;

        let is_toml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

        let mut config: Config = if is_toml {
            toml::from_str(&content)?
        } else {
            Self::from_yaml_str(&content)?
        };

        config.apply_env_overrides();

        Ok(config)
    }

    /// Parse configuration from YAML text. An empty document yields defaults.
    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) {
        // Atlas overrides
        if let Ok(url) = std::env::var("ATLAS_BASE_URL") {
            self.atlas.base_url = url;
        }
        if let Ok(user) = std::env::var("ATLAS_USERNAME") {
            self.atlas.username = user;
        }
        if let Ok(password) = std::env::var("ATLAS_PASSWORD") {
            self.atlas.password = password;
        }
        if let Ok(verify) = std::env::var("ATLAS_VERIFY_SSL") {
            self.atlas.verify_ssl = verify.eq_ignore_ascii_case("true");
        }
        if let Ok(timeout) = std::env::var("ATLAS_TIMEOUT") {
            if let Ok(n) = timeout.parse() {
                self.atlas.timeout = n;
            }
        }

        // Import overrides
        if let Ok(file) = std::env::var("GLOSS_CSV_FILE") {
            self.import.csv_file = Some(file);
        }
        if let Ok(dry_run) = std::env::var("GLOSS_DRY_RUN") {
            self.import.dry_run = dry_run.eq_ignore_ascii_case("true");
        }
        if let Ok(level) = std::env::var("GLOSS_LOG_LEVEL") {
            self.import.log_level = level;
        }
        if let Ok(file) = std::env::var("GLOSS_LOG_FILE") {
            self.import.log_file = Some(file);
        }
    }

    /// Check the configuration for values the importer cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.atlas.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("atlas.base_url must not be empty".into()));
        }
        if self.atlas.timeout == 0 {
            return Err(ConfigError::Invalid("atlas.timeout must be at least 1 second".into()));
        }
        self.relationships.validate()
    }

    /// Create a default config file content as a string.
    pub fn default_config_string() -> String {
        let config = Config::default();
        serde_yaml::to_string(&config).unwrap_or_default()
    }
}

/// Remote Atlas connection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AtlasConfig {
    /// Base URL of the Atlas server, without the `/api/atlas/v2` suffix.
    pub base_url: String,

    /// User for HTTP basic authentication.
    pub username: String,

    /// Password for HTTP basic authentication.
    #[serde(skip_serializing)]
    pub password: String,

    /// Whether TLS certificates are verified.
    pub verify_ssl: bool,

    /// Per-request timeout in seconds.
    pub timeout: u64,
}

impl Default for AtlasConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_ATLAS_URL.to_string(),
            username: DEFAULT_ATLAS_USERNAME.to_string(),
            password: DEFAULT_ATLAS_PASSWORD.to_string(),
            verify_ssl: true,
            timeout: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// CSV import configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// CSV file to import when none is given on the command line.
    pub csv_file: Option<String>,

    /// Compute and show the calls without sending them.
    pub dry_run: bool,

    /// Log level filter (`error`, `warn`, `info`, `debug`, `trace`).
    pub log_level: String,

    /// Optional file that receives a copy of the log.
    pub log_file: Option<String>,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            csv_file: None,
            dry_run: DEFAULT_DRY_RUN,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            log_file: None,
        }
    }
}

/// Relationship directionality configuration.
///
/// Kinds listed in neither list are treated as unidirectional.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RelationshipsConfig {
    /// Kinds recorded in both directions.
    pub bidirectional_types: Vec<String>,

    /// Kinds recorded only from source to target.
    pub unidirectional_types: Vec<String>,
}

impl Default for RelationshipsConfig {
    fn default() -> Self {
        Self {
            bidirectional_types: DEFAULT_BIDIRECTIONAL_TYPES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            unidirectional_types: DEFAULT_UNIDIRECTIONAL_TYPES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl RelationshipsConfig {
    /// Lowercased names of the bidirectional kinds.
    pub fn bidirectional_set(&self) -> BTreeSet<String> {
        self.bidirectional_types
            .iter()
            .map(|t| t.trim().to_lowercase())
            .collect()
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let mut unknown = Vec::new();
        for name in self.bidirectional_types.iter().chain(&self.unidirectional_types) {
            if name.parse::<RelationshipType>().is_err() {
                unknown.push(name.clone());
            }
        }
        if !unknown.is_empty() {
            return Err(ConfigError::Invalid(format!(
                "unknown relationship types: {}",
                unknown.join(", ")
            )));
        }

        let bidirectional = self.bidirectional_set();
        let both: Vec<_> = self
            .unidirectional_types
            .iter()
            .map(|t| t.trim().to_lowercase())
            .filter(|t| bidirectional.contains(t))
            .collect();
        if !both.is_empty() {
            return Err(ConfigError::Invalid(format!(
                "relationship types listed as both bidirectional and unidirectional: {}",
                both.join(", ")
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.atlas.base_url, DEFAULT_ATLAS_URL);
        assert_eq!(config.atlas.timeout, DEFAULT_TIMEOUT_SECS);
        assert!(config.import.dry_run);
        assert_eq!(config.relationships.bidirectional_types.len(), 4);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_to_yaml_hides_password() {
        let yaml = Config::default_config_string();
        assert!(yaml.contains("atlas:"));
        assert!(yaml.contains("relationships:"));
        assert!(!yaml.contains("password"));
    }

    #[test]
    fn test_config_from_yaml() {
        let yaml = r#"
atlas:
  base_url: https://atlas.example.com
  verify_ssl: false
  timeout: 5
import:
  dry_run: false
relationships:
  bidirectional_types: [synonym]
  unidirectional_types: [is_a]
"#;
        let config = Config::from_yaml_str(yaml).unwrap();
        assert_eq!(config.atlas.base_url, "https://atlas.example.com");
        assert!(!config.atlas.verify_ssl);
        assert_eq!(config.atlas.timeout, 5);
        assert_eq!(config.atlas.username, DEFAULT_ATLAS_USERNAME);
        assert!(!config.import.dry_run);
        assert_eq!(config.relationships.bidirectional_set().len(), 1);
    }

    #[test]
    fn test_validate_rejects_overlapping_kinds() {
        let mut config = Config::default();
        config.relationships.unidirectional_types.push("Synonym".into());
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_validate_rejects_unknown_kind() {
        let mut config = Config::default();
        config.relationships.bidirectional_types.push("cousin".into());
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("cousin"));
    }
}
