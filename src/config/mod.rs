//! Configuration module for dbdump-manager
//!
//! This module handles loading, validating, and resolving configuration from TOML files.
//!
//! ## Configuration Inheritance
//!
//! Settings are applied in this order (later overrides earlier):
//! 1. Global defaults
//! 2. Container-level settings
//!
//! ## Example Usage
//!
//! ```no_run
//! use dbdump_manager::config;
//!
//! let config = config::load_config("dbdump-manager.toml")?;
//! let containers = config::resolve_all_containers(&config)?;
//!
//! for container in containers {
//!     println!("Container: {}, retention: {} days", container.name, container.retention_days);
//! }
//! # Ok::<(), config::ConfigError>(())
//! ```

mod loader;
mod types;

pub use loader::{load_config, resolve_all_containers, resolve_container, ConfigError, Result};
pub use types::*;

/// Expand tilde (~) in path
pub fn expand_tilde(path: &std::path::Path) -> std::path::PathBuf {
    if let Ok(stripped) = path.strip_prefix("~") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    path.to_path_buf()
}
