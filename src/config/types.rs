use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub global: GlobalConfig,
    pub containers: Vec<ContainerConfig>,
}

/// Global configuration settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GlobalConfig {
    /// Days to keep dump files before rotation deletes them
    #[serde(default = "default_retention_days")]
    pub retention_days: u32,

    /// Timeout settings
    #[serde(default = "default_docker_timeout")]
    pub docker_timeout_seconds: u64,
    #[serde(default = "default_dump_timeout")]
    pub dump_timeout_seconds: u64,

    /// Exit nonzero when any container fails (opt-in)
    #[serde(default)]
    pub strict: bool,

    /// Cron schedule used by the setup command
    #[serde(default = "default_schedule")]
    pub schedule: String,

    /// Logging configuration
    #[serde(default = "default_log_directory")]
    pub log_directory: PathBuf,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_log_max_files")]
    pub log_max_files: u32,
    #[serde(default = "default_log_max_size_mb")]
    pub log_max_size_mb: u64,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            retention_days: default_retention_days(),
            docker_timeout_seconds: default_docker_timeout(),
            dump_timeout_seconds: default_dump_timeout(),
            strict: false,
            schedule: default_schedule(),
            log_directory: default_log_directory(),
            log_level: default_log_level(),
            log_max_files: default_log_max_files(),
            log_max_size_mb: default_log_max_size_mb(),
        }
    }
}

/// Per-container configuration (raw, before merging with global defaults)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ContainerConfig {
    /// Docker container name (exact match)
    pub name: String,

    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Retention override
    #[serde(default)]
    pub retention_days: Option<u32>,

    /// Dump timeout override
    #[serde(default)]
    pub dump_timeout_seconds: Option<u64>,

    /// Host-side dump directory override; when unset the directory is
    /// resolved from the container's /backup mount
    #[serde(default)]
    pub backup_dir: Option<PathBuf>,
}

/// Resolved container configuration (after merging with global defaults)
#[derive(Debug, Clone)]
pub struct ResolvedContainerConfig {
    pub name: String,
    pub enabled: bool,
    pub retention_days: u32,
    pub dump_timeout_seconds: u64,
    pub backup_dir: Option<PathBuf>,
}

// Default value functions

fn default_retention_days() -> u32 { 14 }
fn default_docker_timeout() -> u64 { 30 }
fn default_dump_timeout() -> u64 { 600 }
fn default_schedule() -> String { "0 2 * * *".to_string() }
fn default_log_directory() -> PathBuf { PathBuf::from("~/logs") }
fn default_log_level() -> String { "info".to_string() }
fn default_log_max_files() -> u32 { 10 }
fn default_log_max_size_mb() -> u64 { 10 }
fn default_enabled() -> bool { true }
