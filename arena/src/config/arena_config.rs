use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use uttt_common::config::{
    ConfigManager, FileContentConfigProvider, SearchConfig, Validate, YamlConfigSerializer,
};

pub fn get_config_manager(
    path: &Path,
) -> ConfigManager<FileContentConfigProvider, ArenaConfig, YamlConfigSerializer> {
    ConfigManager::from_yaml_file(path)
}

/// What happens when an agent produces no usable move in a live game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FallbackPolicy {
    Random,
    Resign,
}

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct ArenaConfig {
    pub search: SearchConfig,
    pub server_address: String,
    pub request_timeout_ms: u64,
    pub fallback: FallbackPolicy,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            search: SearchConfig::default(),
            server_address: "http://[::1]:5001".to_string(),
            request_timeout_ms: 20_000,
            fallback: FallbackPolicy::Random,
        }
    }
}

impl ArenaConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl Validate for ArenaConfig {
    fn validate(&self) -> Result<(), String> {
        self.search.validate()?;
        if !self.server_address.starts_with("http://") && !self.server_address.starts_with("https://")
        {
            return Err(format!(
                "server_address must start with http:// or https://, got '{}'",
                self.server_address
            ));
        }
        if self.request_timeout_ms == 0 {
            return Err("request_timeout_ms must be greater than 0".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uttt_common::config::ConfigSerializer;

    #[test]
    fn test_default_is_valid() {
        assert!(ArenaConfig::default().validate().is_ok());
    }

    #[test]
    fn test_address_without_scheme_rejected() {
        let config = ArenaConfig {
            server_address: "[::1]:5001".to_string(),
            ..ArenaConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let config = ArenaConfig {
            request_timeout_ms: 0,
            ..ArenaConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_fallback_is_lowercase_in_yaml() {
        let config = ArenaConfig {
            fallback: FallbackPolicy::Resign,
            ..ArenaConfig::default()
        };
        let yaml = YamlConfigSerializer::new().serialize(&config).unwrap();
        assert!(yaml.contains("fallback: resign"));

        let parsed: ArenaConfig = YamlConfigSerializer::new().deserialize(&yaml).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let manager = get_config_manager(&dir.path().join("absent.yaml"));
        assert_eq!(manager.get_config().unwrap(), ArenaConfig::default());
    }
}
