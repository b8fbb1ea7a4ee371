mod server_config;

pub use server_config::{ServerConfig, get_config_manager};
