// Integration tests for configuration loading and validation

use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
fn test_valid_config_loads() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.toml");

    let config_content = r#"
[global]
retention_days = 21
strict = true

[[containers]]
name = "db1"

[[containers]]
name = "db2"
enabled = false
retention_days = 7
backup_dir = "/srv/backups/db2"
"#;

    fs::write(&config_path, config_content).unwrap();

    let config = dbdump_manager::config::load_config(&config_path).unwrap();
    assert_eq!(config.global.retention_days, 21);
    assert!(config.global.strict);

    let containers = dbdump_manager::config::resolve_all_containers(&config).unwrap();
    assert_eq!(containers.len(), 2);

    // Order follows the file
    assert_eq!(containers[0].name, "db1");
    assert!(containers[0].enabled);
    assert_eq!(containers[0].retention_days, 21);
    assert!(containers[0].backup_dir.is_none());

    assert_eq!(containers[1].name, "db2");
    assert!(!containers[1].enabled);
    assert_eq!(containers[1].retention_days, 7);
    assert_eq!(
        containers[1].backup_dir,
        Some(PathBuf::from("/srv/backups/db2"))
    );
}

#[test]
fn test_minimal_config_uses_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.toml");

    // No [global] table at all
    let config_content = r#"
[[containers]]
name = "db1"
"#;

    fs::write(&config_path, config_content).unwrap();

    let config = dbdump_manager::config::load_config(&config_path).unwrap();
    assert_eq!(config.global.retention_days, 14);
    assert_eq!(config.global.docker_timeout_seconds, 30);
    assert_eq!(config.global.dump_timeout_seconds, 600);
    assert!(!config.global.strict);
    assert_eq!(config.global.schedule, "0 2 * * *");
}

#[test]
fn test_config_validation_no_containers() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.toml");

    fs::write(&config_path, "containers = []\n").unwrap();

    // This should fail because no containers are defined
    let result = dbdump_manager::config::load_config(&config_path);
    assert!(result.is_err());
}

#[test]
fn test_config_validation_duplicate_names() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.toml");

    let config_content = r#"
[[containers]]
name = "db1"

[[containers]]
name = "db1"
"#;

    fs::write(&config_path, config_content).unwrap();

    let result = dbdump_manager::config::load_config(&config_path);
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("Duplicate"));
}

#[test]
fn test_config_validation_zero_retention() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.toml");

    let config_content = r#"
[global]
retention_days = 0

[[containers]]
name = "db1"
"#;

    fs::write(&config_path, config_content).unwrap();

    let result = dbdump_manager::config::load_config(&config_path);
    assert!(result.is_err());
}

#[test]
fn test_config_validation_invalid_cron() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.toml");

    let config_content = r#"
[global]
schedule = "invalid cron"

[[containers]]
name = "db1"
"#;

    fs::write(&config_path, config_content).unwrap();

    // This should fail because cron schedule is invalid
    let result = dbdump_manager::config::load_config(&config_path);
    assert!(result.is_err());
}

#[test]
fn test_config_missing_file() {
    let temp_dir = TempDir::new().unwrap();
    let result =
        dbdump_manager::config::load_config(temp_dir.path().join("does-not-exist.toml"));
    assert!(result.is_err());
}
