// src/config/mod.rs

pub mod config_manager;

pub use config_manager::{AdapterConfig, ConfigSource, FileConfigSource, DEFAULT_CONFIG_FILE};
