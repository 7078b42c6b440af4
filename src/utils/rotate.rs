//! Retention rotation for dump files

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use std::time::{Duration, SystemTime};
use tracing::debug;

const SECONDS_PER_DAY: u64 = 86_400;

/// Delete `.sql` files in the top level of `dir` older than `retention_days`
///
/// Returns the basenames of the deleted files. Subdirectories are never
/// entered and files are only deleted after matching both the name suffix
/// and the age threshold.
pub fn rotate(dir: &Path, retention_days: u32) -> Result<Vec<String>> {
    let cutoff = SystemTime::now()
        .checked_sub(Duration::from_secs(u64::from(retention_days) * SECONDS_PER_DAY))
        .unwrap_or(SystemTime::UNIX_EPOCH);

    rotate_older_than(dir, cutoff)
}

/// Delete `.sql` files in the top level of `dir` modified before `cutoff`
pub fn rotate_older_than(dir: &Path, cutoff: SystemTime) -> Result<Vec<String>> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("Failed to read dump directory: {:?}", dir))?;

    let mut deleted = Vec::new();

    for entry in entries {
        let entry = entry?;

        if !entry.file_type()?.is_file() {
            continue;
        }

        let file_name = entry.file_name();
        let Some(name) = file_name.to_str() else {
            continue;
        };
        if !name.ends_with(".sql") {
            continue;
        }

        let modified = entry
            .metadata()
            .and_then(|m| m.modified())
            .with_context(|| format!("Failed to read modification time of {:?}", entry.path()))?;
        if modified >= cutoff {
            continue;
        }

        fs::remove_file(entry.path())
            .with_context(|| format!("Failed to delete expired dump: {:?}", entry.path()))?;
        debug!("Deleted expired dump: {:?}", entry.path());
        deleted.push(name.to_string());
    }

    Ok(deleted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::TempDir;

    fn future_cutoff() -> SystemTime {
        SystemTime::now() + Duration::from_secs(3600)
    }

    fn past_cutoff() -> SystemTime {
        SystemTime::now() - Duration::from_secs(3600)
    }

    #[test]
    fn test_deletes_expired_sql_files() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("db1_20250101000000.sql"), "dump").unwrap();
        fs::write(temp_dir.path().join("db2_20250101000000.sql"), "dump").unwrap();

        // Every file is older than a cutoff in the future
        let mut deleted = rotate_older_than(temp_dir.path(), future_cutoff()).unwrap();
        deleted.sort();

        assert_eq!(
            deleted,
            vec!["db1_20250101000000.sql", "db2_20250101000000.sql"]
        );
        assert!(!temp_dir.path().join("db1_20250101000000.sql").exists());
    }

    #[test]
    fn test_keeps_recent_files() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("new.sql"), "dump").unwrap();

        // Nothing is older than a cutoff in the past
        let deleted = rotate_older_than(temp_dir.path(), past_cutoff()).unwrap();

        assert!(deleted.is_empty());
        assert!(temp_dir.path().join("new.sql").exists());
    }

    #[test]
    fn test_ignores_non_sql_files() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("notes.txt"), "keep").unwrap();
        fs::write(temp_dir.path().join("dump.sql.gz"), "keep").unwrap();

        let deleted = rotate_older_than(temp_dir.path(), future_cutoff()).unwrap();

        assert!(deleted.is_empty());
        assert!(temp_dir.path().join("notes.txt").exists());
        assert!(temp_dir.path().join("dump.sql.gz").exists());
    }

    #[test]
    fn test_ignores_subdirectories() {
        let temp_dir = TempDir::new().unwrap();
        // A directory whose name matches the suffix must not be touched
        fs::create_dir(temp_dir.path().join("archive.sql")).unwrap();
        fs::create_dir(temp_dir.path().join("nested")).unwrap();
        fs::write(temp_dir.path().join("nested").join("old.sql"), "dump").unwrap();

        let deleted = rotate_older_than(temp_dir.path(), future_cutoff()).unwrap();

        assert!(deleted.is_empty());
        assert!(temp_dir.path().join("archive.sql").exists());
        assert!(temp_dir.path().join("nested").join("old.sql").exists());
    }

    #[test]
    fn test_returns_basenames_only() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("db1_20250101000000.sql"), "dump").unwrap();

        let deleted = rotate_older_than(temp_dir.path(), future_cutoff()).unwrap();

        assert_eq!(deleted, vec!["db1_20250101000000.sql"]);
        assert!(!deleted[0].contains('/'));
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("does-not-exist");

        assert!(rotate_older_than(&missing, future_cutoff()).is_err());
    }

    #[test]
    fn test_rotate_with_retention_window() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("fresh.sql"), "dump").unwrap();

        // A freshly written file is well within a 14 day window
        let deleted = rotate(temp_dir.path(), 14).unwrap();
        assert!(deleted.is_empty());
        assert!(temp_dir.path().join("fresh.sql").exists());
    }
}
