use super::types::*;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Duplicate container name: {0}")]
    DuplicateContainer(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Load and validate configuration from a TOML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let contents = fs::read_to_string(path)?;
    let config: Config = toml::from_str(&contents)?;
    validate_config(&config)?;
    Ok(config)
}

/// Validate the configuration
fn validate_config(config: &Config) -> Result<()> {
    if config.containers.is_empty() {
        return Err(ConfigError::ValidationError(
            "No containers defined".to_string(),
        ));
    }

    if config.global.retention_days == 0 {
        return Err(ConfigError::ValidationError(
            "global retention_days must be at least 1".to_string(),
        ));
    }

    // Cron schedule format (basic check, 5 fields)
    if config.global.schedule.split_whitespace().count() != 5 {
        return Err(ConfigError::ValidationError(format!(
            "invalid cron schedule format (expected 5 fields): {}",
            config.global.schedule
        )));
    }

    let mut seen = HashSet::new();
    for container in &config.containers {
        validate_container(container)?;
        if !seen.insert(container.name.as_str()) {
            return Err(ConfigError::DuplicateContainer(container.name.clone()));
        }
    }

    Ok(())
}

fn validate_container(container: &ContainerConfig) -> Result<()> {
    if container.name.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "container name must not be empty".to_string(),
        ));
    }

    if container.retention_days == Some(0) {
        return Err(ConfigError::ValidationError(format!(
            "container '{}': retention_days must be at least 1",
            container.name
        )));
    }

    Ok(())
}

/// Resolve a container configuration by merging with global defaults
pub fn resolve_container(container: &ContainerConfig, config: &Config) -> ResolvedContainerConfig {
    ResolvedContainerConfig {
        name: container.name.clone(),
        enabled: container.enabled,
        retention_days: container
            .retention_days
            .unwrap_or(config.global.retention_days),
        dump_timeout_seconds: container
            .dump_timeout_seconds
            .unwrap_or(config.global.dump_timeout_seconds),
        backup_dir: container.backup_dir.as_deref().map(super::expand_tilde),
    }
}

/// Resolve all containers in the configuration, preserving file order
pub fn resolve_all_containers(config: &Config) -> Result<Vec<ResolvedContainerConfig>> {
    Ok(config
        .containers
        .iter()
        .map(|c| resolve_container(c, config))
        .collect())
}
