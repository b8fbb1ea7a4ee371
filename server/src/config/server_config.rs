use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use uttt_common::config::{
    ConfigManager, FileContentConfigProvider, SearchConfig, Validate, YamlConfigSerializer,
};

pub const DEFAULT_ADDRESS: &str = "[::1]:5001";
const MAX_TIME_BUDGET_LIMIT_MS: u64 = 600_000;

pub fn get_config_manager(
    path: &Path,
) -> ConfigManager<FileContentConfigProvider, ServerConfig, YamlConfigSerializer> {
    ConfigManager::from_yaml_file(path)
}

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub address: String,
    /// Requests asking for more thinking time are clamped to this.
    pub max_time_budget_ms: u64,
    pub search: SearchConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDRESS.to_string(),
            max_time_budget_ms: 10_000,
            search: SearchConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, String> {
        self.address
            .parse()
            .map_err(|e| format!("Invalid listen address '{}': {}", self.address, e))
    }

    /// Zero means "use the configured default".
    pub fn resolve_time_budget(&self, requested_ms: u32) -> Duration {
        let ms = match requested_ms as u64 {
            0 => self.search.time_budget_ms,
            requested => requested.min(self.max_time_budget_ms),
        };
        Duration::from_millis(ms)
    }
}

impl Validate for ServerConfig {
    fn validate(&self) -> Result<(), String> {
        self.socket_addr()?;
        if self.max_time_budget_ms == 0 || self.max_time_budget_ms > MAX_TIME_BUDGET_LIMIT_MS {
            return Err(format!(
                "max_time_budget_ms must be between 1 and {}, got {}",
                MAX_TIME_BUDGET_LIMIT_MS, self.max_time_budget_ms
            ));
        }
        self.search.validate()?;
        if self.search.time_budget_ms > self.max_time_budget_ms {
            return Err(format!(
                "Default time budget ({} ms) exceeds max_time_budget_ms ({} ms)",
                self.search.time_budget_ms, self.max_time_budget_ms
            ));
        }
        Ok(())
    }
}
