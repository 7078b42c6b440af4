//! Cron job management utilities

use anyhow::{Context, Result};
use std::env;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{info, warn};

const CRON_MARKER: &str = "# Dbdump Manager - periodic run";

/// Get the path to the dbdump-manager binary
pub fn get_binary_path() -> Result<PathBuf> {
    env::current_exe().context("Failed to get current executable path")
}

/// Get the current crontab
pub fn get_crontab() -> Result<String> {
    let output = Command::new("crontab")
        .arg("-l")
        .output()
        .context("Failed to execute crontab -l")?;

    if !output.status.success() {
        // Empty crontab returns non-zero, check stderr
        let stderr = String::from_utf8_lossy(&output.stderr);
        if stderr.contains("no crontab") {
            return Ok(String::new());
        }
        anyhow::bail!("Failed to read crontab: {}", stderr);
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

/// Set the crontab content
pub fn set_crontab(content: &str) -> Result<()> {
    use std::io::Write;

    let mut child = Command::new("crontab")
        .arg("-")
        .stdin(std::process::Stdio::piped())
        .stdout(std::process::Stdio::piped())
        .stderr(std::process::Stdio::piped())
        .spawn()
        .context("Failed to spawn crontab")?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin
            .write_all(content.as_bytes())
            .context("Failed to write to crontab stdin")?;
    } else {
        anyhow::bail!("Failed to open crontab stdin");
    }

    let output = child
        .wait_with_output()
        .context("Failed to wait for crontab")?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        anyhow::bail!("Crontab command failed: {}", stderr);
    }

    info!("Crontab updated successfully");
    Ok(())
}

/// Install the cron job for the periodic batch run
pub fn add_cron_job(schedule: &str, config_path: &Path, dry_run: bool) -> Result<()> {
    let binary_path = get_binary_path()?;
    let log_file = "/var/log/dbdump-manager/run.log";

    // Build the cron command
    let cron_command = format!(
        "{} --config {} run >> {} 2>&1",
        binary_path.display(),
        config_path.display(),
        log_file
    );

    // Build the cron entry
    let cron_entry = format!("{}\n{} {}", CRON_MARKER, schedule, cron_command);

    if dry_run {
        println!("  [DRY RUN] Would add cron job:");
        println!("    {}", cron_entry.replace('\n', "\n    "));
        return Ok(());
    }

    // Get existing crontab
    let existing = get_crontab()?;

    // Check if job already exists
    if existing.contains(CRON_MARKER) {
        warn!("Cron job already exists, updating...");
        let new_content = strip_managed_entry(&existing) + &cron_entry + "\n";
        set_crontab(&new_content)?;
    } else {
        // Add new entry
        let new_content = if existing.is_empty() {
            cron_entry + "\n"
        } else {
            existing + "\n" + &cron_entry + "\n"
        };

        set_crontab(&new_content)?;
    }

    info!("Installed cron job ({})", schedule);
    Ok(())
}

/// Remove the cron job for the periodic batch run
pub fn remove_cron_job() -> Result<()> {
    let existing = get_crontab()?;

    if !existing.contains(CRON_MARKER) {
        warn!("No dbdump-manager cron job found");
        return Ok(());
    }

    set_crontab(&strip_managed_entry(&existing))?;

    info!("Removed cron job");
    Ok(())
}

/// Remove the managed marker line and the schedule line following it
fn strip_managed_entry(crontab: &str) -> String {
    let mut new_lines = Vec::new();
    let mut skip_next = false;

    for line in crontab.lines() {
        if line.contains(CRON_MARKER) {
            skip_next = true;
            continue;
        }
        if skip_next {
            skip_next = false;
            continue;
        }
        new_lines.push(line);
    }

    if new_lines.is_empty() {
        String::new()
    } else {
        new_lines.join("\n") + "\n"
    }
}

/// Validate cron schedule syntax
pub fn validate_cron_schedule(schedule: &str) -> bool {
    // Basic validation: should have 5 fields
    schedule.split_whitespace().count() == 5
}

/// List the managed cron entry lines, if installed
pub fn list_cron_jobs() -> Result<Vec<String>> {
    let existing = get_crontab()?;
    let mut jobs = Vec::new();

    for line in existing.lines() {
        if line.contains(CRON_MARKER) {
            jobs.push(line.to_string());
        }
    }

    Ok(jobs)
}
