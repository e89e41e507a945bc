use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use crate::error::LingoError;

/// Top-level lingo configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub source: SourceConfig,
}

/// Cache engine settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Language consulted when a lookup misses in the requested language.
    #[serde(default = "default_fallback_language")]
    pub fallback_language: String,
    /// What to do when the live-update feed terminates.
    #[serde(default)]
    pub reconnect: ReconnectConfig,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            fallback_language: default_fallback_language(),
            reconnect: ReconnectConfig::default(),
        }
    }
}

/// Reconnect policy for a terminated live-update subscription.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconnectConfig {
    /// "none" (default) or "backoff".
    #[serde(default = "default_reconnect_policy")]
    pub policy: String,
    /// First retry delay for the backoff policy.
    #[serde(default = "default_reconnect_initial_secs")]
    pub initial_secs: u64,
    /// Delay ceiling for the backoff policy.
    #[serde(default = "default_reconnect_max_secs")]
    pub max_secs: u64,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            policy: default_reconnect_policy(),
            initial_secs: default_reconnect_initial_secs(),
            max_secs: default_reconnect_max_secs(),
        }
    }
}

impl ReconnectConfig {
    pub fn is_backoff(&self) -> bool {
        self.policy == "backoff"
    }
}

/// Which translation source to construct.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// "json" or "forge".
    #[serde(default = "default_source_kind")]
    pub kind: String,
    /// Directory of `<lang>.json` files (json source).
    #[serde(default = "default_directory")]
    pub directory: String,
    /// Base URL of the hosted translation service (forge source).
    #[serde(default)]
    pub base_url: String,
    /// Translation-module ID on the service (forge source).
    #[serde(default)]
    pub translation_id: String,
    /// Optional API key for authenticated access (forge source).
    pub api_key: Option<String>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            kind: default_source_kind(),
            directory: default_directory(),
            base_url: String::new(),
            translation_id: String::new(),
            api_key: None,
        }
    }
}

/// Load configuration from a TOML file, falling back to defaults when the
/// file does not exist.
pub fn load(path: &str) -> Result<Config, LingoError> {
    let path = Path::new(path);
    if !path.exists() {
        info!("Config file not found at {}, using defaults", path.display());
        return Ok(Config::default());
    }
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)
        .map_err(|e| LingoError::Config(format!("failed to parse {}: {e}", path.display())))?;
    info!("Loaded config from {}", path.display());
    Ok(config)
}

fn default_fallback_language() -> String {
    "en_US".to_string()
}

fn default_reconnect_policy() -> String {
    "none".to_string()
}

fn default_reconnect_initial_secs() -> u64 {
    1
}

fn default_reconnect_max_secs() -> u64 {
    60
}

fn default_source_kind() -> String {
    "json".to_string()
}

fn default_directory() -> String {
    "translations".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.cache.fallback_language, "en_US");
        assert_eq!(config.cache.reconnect.policy, "none");
        assert!(!config.cache.reconnect.is_backoff());
        assert_eq!(config.source.kind, "json");
        assert_eq!(config.source.directory, "translations");
    }

    #[test]
    fn test_parse_minimal() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.cache.fallback_language, "en_US");
    }

    #[test]
    fn test_parse_forge_source() {
        let toml_str = r#"
            [cache]
            fallback_language = "de_DE"

            [source]
            kind = "forge"
            base_url = "https://forge.example.com/"
            translation_id = "abc123"
            api_key = "secret"
        "#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.cache.fallback_language, "de_DE");
        assert_eq!(config.source.kind, "forge");
        assert_eq!(config.source.base_url, "https://forge.example.com/");
        assert_eq!(config.source.api_key.as_deref(), Some("secret"));
    }

    #[test]
    fn test_parse_backoff_reconnect() {
        let toml_str = r#"
            [cache.reconnect]
            policy = "backoff"
            initial_secs = 2
            max_secs = 30
        "#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert!(config.cache.reconnect.is_backoff());
        assert_eq!(config.cache.reconnect.initial_secs, 2);
        assert_eq!(config.cache.reconnect.max_secs, 30);
    }

    #[test]
    fn test_reconnect_defaults_when_missing() {
        let toml_str = r#"
            [cache]
            fallback_language = "en_GB"
        "#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.cache.reconnect, ReconnectConfig::default());
    }
}
