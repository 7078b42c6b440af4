//! Docker container introspection and in-container command execution
//!
//! All queries shell out to the `docker` CLI. Query failures are surfaced as
//! errors and are distinct from a container or mount simply being absent.

use super::command::{run_command, run_command_stdout};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

/// Mount destination every managed container is expected to provide
pub const BACKUP_MOUNT_DESTINATION: &str = "/backup";

/// List the names of all running containers
pub fn running_containers(timeout: Duration) -> Result<Vec<String>> {
    let output = run_command_stdout(
        "docker",
        &["ps", "--format", "{{.Names}}"],
        Some(timeout),
    )?;

    Ok(output.lines().map(|s| s.to_string()).collect())
}

/// Check if a running container with the given name exists (exact match)
pub fn container_running(name: &str, timeout: Duration) -> Result<bool> {
    let containers = running_containers(timeout)?;
    Ok(containers.iter().any(|c| c == name))
}

/// Read a container's environment as a key/value snapshot
///
/// Docker reports the environment as a list of KEY=VALUE strings; the first
/// entry wins when a key appears more than once.
pub fn env_vars(name: &str, timeout: Duration) -> Result<HashMap<String, String>> {
    let output = run_command_stdout(
        "docker",
        &["inspect", "--format", "{{json .Config.Env}}", name],
        Some(timeout),
    )?;

    let entries: Option<Vec<String>> = serde_json::from_str(output.trim())
        .context(format!("Failed to parse environment of container '{}'", name))?;

    let mut env = HashMap::new();
    for entry in entries.unwrap_or_default() {
        if let Some((key, value)) = entry.split_once('=') {
            env.entry(key.to_string()).or_insert_with(|| value.to_string());
        }
    }

    Ok(env)
}

/// Look up a single environment variable; absence is not an error
pub fn env_var(name: &str, key: &str, timeout: Duration) -> Result<Option<String>> {
    let env = env_vars(name, timeout)?;
    Ok(env.get(key).cloned())
}

#[derive(Debug, Deserialize)]
struct MountInfo {
    #[serde(rename = "Source", default)]
    source: String,
    #[serde(rename = "Destination", default)]
    destination: String,
}

/// Resolve the host-side source of the container's /backup mount
pub fn backup_mount(name: &str, timeout: Duration) -> Result<Option<PathBuf>> {
    let output = run_command_stdout(
        "docker",
        &["inspect", "--format", "{{json .Mounts}}", name],
        Some(timeout),
    )?;

    let mounts: Option<Vec<MountInfo>> = serde_json::from_str(output.trim())
        .context(format!("Failed to parse mounts of container '{}'", name))?;

    let source = mounts.unwrap_or_default().into_iter().find_map(|m| {
        (m.destination == BACKUP_MOUNT_DESTINATION && !m.source.is_empty())
            .then(|| PathBuf::from(m.source))
    });

    Ok(source)
}

/// Execute a command inside a running container, propagating its exit status
///
/// The command is passed as a structured argument vector; no shell string is
/// built on the way to the container.
pub fn exec(name: &str, argv: &[String], timeout: Duration) -> Result<()> {
    let mut args: Vec<&str> = vec!["exec", name];
    args.extend(argv.iter().map(String::as_str));

    debug!("Executing in container '{}': {}", name, argv.join(" "));

    run_command("docker", &args, Some(timeout))
        .context(format!("Command failed inside container '{}'", name))?;

    Ok(())
}
