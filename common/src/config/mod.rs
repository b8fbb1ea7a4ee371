mod config_content_provider;
mod config_manager;
mod config_serializer;
mod search_config;
mod validate;

pub use config_content_provider::{ConfigContentProvider, FileContentConfigProvider};
pub use config_manager::ConfigManager;
pub use config_serializer::{ConfigSerializer, YamlConfigSerializer};
pub use search_config::SearchConfig;
pub use validate::Validate;
