use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use super::{
    ConfigContentProvider, ConfigSerializer, FileContentConfigProvider, Validate,
    YamlConfigSerializer,
};

pub struct ConfigManager<TConfigContentProvider, TConfig, TConfigSerializer = YamlConfigSerializer>
where
    TConfigContentProvider: ConfigContentProvider,
    TConfig: Clone + for<'de> Deserialize<'de> + Serialize + Validate + Default,
    TConfigSerializer: ConfigSerializer<TConfig>,
{
    config_serializer: TConfigSerializer,
    config_content_provider: TConfigContentProvider,
    config: Arc<Mutex<Option<TConfig>>>,
}

impl<TConfig> ConfigManager<FileContentConfigProvider, TConfig, YamlConfigSerializer>
where
    TConfig: Clone + for<'de> Deserialize<'de> + Serialize + Validate + Default,
{
    pub fn new(
        config_content_provider: FileContentConfigProvider,
        config_serializer: YamlConfigSerializer,
    ) -> Self {
        Self {
            config: Arc::new(Mutex::new(None)),
            config_content_provider,
            config_serializer,
        }
    }

    pub fn from_yaml_file(file_path: impl Into<PathBuf>) -> Self {
        Self::new(
            FileContentConfigProvider::new(file_path),
            YamlConfigSerializer::new(),
        )
    }
}

impl<TConfigContentProvider, TConfig, TConfigSerializer>
    ConfigManager<TConfigContentProvider, TConfig, TConfigSerializer>
where
    TConfigContentProvider: ConfigContentProvider,
    TConfig: Clone + for<'de> Deserialize<'de> + Serialize + Validate + Default,
    TConfigSerializer: ConfigSerializer<TConfig>,
{
    /// Loads and caches the config. A missing file yields `TConfig::default()`
    /// without caching, so a file written later is still picked up.
    pub fn get_config(&self) -> Result<TConfig, String> {
        let mut current = self
            .config
            .lock()
            .map_err(|_| "Config lock poisoned".to_string())?;

        if let Some(config) = current.as_ref() {
            return Ok(config.clone());
        }

        let config_data_result = self.config_content_provider.get_config_content()?;
        if let Some(config_data) = config_data_result {
            let config = self.config_serializer.deserialize(&config_data)?;

            config
                .validate()
                .map_err(|e| format!("Config validation error: {}", e))?;

            *current = Some(config.clone());
            return Ok(config);
        }

        Ok(TConfig::default())
    }

    pub fn set_config(&self, config: &TConfig) -> Result<(), String> {
        config
            .validate()
            .map_err(|e| format!("Config validation error: {}", e))?;

        let serialized_config = self.config_serializer.serialize(config)?;

        self.config_content_provider
            .set_config_content(&serialized_config)?;

        let mut current = self
            .config
            .lock()
            .map_err(|_| "Config lock poisoned".to_string())?;
        *current = Some(config.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SearchConfig;

    #[test]
    fn test_missing_file_yields_default() {
        let dir = tempfile::tempdir().unwrap();
        let manager: ConfigManager<_, SearchConfig> =
            ConfigManager::from_yaml_file(dir.path().join("missing.yaml"));

        let config = manager.get_config().unwrap();
        assert_eq!(config.time_budget_ms, SearchConfig::default().time_budget_ms);
    }

    #[test]
    fn test_set_then_get_from_fresh_manager() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("search.yaml");

        let manager: ConfigManager<_, SearchConfig> = ConfigManager::from_yaml_file(&path);
        let mut config = SearchConfig::default();
        config.time_budget_ms = 750;
        config.max_depth = Some(4);
        manager.set_config(&config).unwrap();

        let reloaded: ConfigManager<_, SearchConfig> = ConfigManager::from_yaml_file(&path);
        let loaded = reloaded.get_config().unwrap();
        assert_eq!(loaded.time_budget_ms, 750);
        assert_eq!(loaded.max_depth, Some(4));
    }

    #[test]
    fn test_invalid_config_is_rejected_on_save() {
        let dir = tempfile::tempdir().unwrap();
        let manager: ConfigManager<_, SearchConfig> =
            ConfigManager::from_yaml_file(dir.path().join("search.yaml"));
        let mut config = SearchConfig::default();
        config.time_budget_ms = 0;

        let err = manager.set_config(&config).unwrap_err();
        assert!(err.contains("Config validation error"));
        assert!(!dir.path().join("search.yaml").exists());
    }

    #[test]
    fn test_invalid_file_is_rejected_on_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("search.yaml");
        std::fs::write(&path, "time_budget_ms: 0\n").unwrap();

        let manager: ConfigManager<_, SearchConfig> = ConfigManager::from_yaml_file(&path);
        assert!(manager.get_config().is_err());
    }
}
