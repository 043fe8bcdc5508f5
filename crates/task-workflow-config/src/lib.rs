//! Configuration and file locations for the task workflow tools
//!
//! This crate provides:
//! - Config and data directory paths
//! - Configuration file loading (TOML)
//! - Application configuration (AppConfig) with environment overrides

pub mod app_config;
pub mod config_file;
pub mod paths;

pub use app_config::{AppConfig, ConfigSource, POLICY_ENV, STORE_ENV};
pub use config_file::load_config_file;
pub use paths::{config_dir, data_dir, default_policy_path, default_store_path};
