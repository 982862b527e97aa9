//! SurfsUp Core Library
//!
//! Shared utilities for the climate API:
//! - Configuration loading (XDG-compliant)
//! - File system utilities

mod config;
pub mod fs;

pub use config::{find_config_file, load_config, ConfigSource};
pub use fs::is_file;

/// Application name used for XDG paths
pub const APP_NAME: &str = "surfsup";

/// Default API port
pub const DEFAULT_PORT: u16 = 5000;

/// Default directory holding the dataset files
pub const DEFAULT_DATA_DIR: &str = "./Resources";
