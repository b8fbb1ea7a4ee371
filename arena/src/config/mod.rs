mod arena_config;

pub use arena_config::{ArenaConfig, FallbackPolicy, get_config_manager};
