//! Docker operations abstraction for testability
//!
//! This module provides a trait-based abstraction for Docker operations,
//! enabling dependency injection and mocking for tests.

use anyhow::Result;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

/// Abstraction for Docker operations, enabling mocking in tests
pub trait DockerOperations: Send + Sync {
    /// Check if a running container with the given name exists (exact match)
    fn container_running(&self, name: &str, timeout: Duration) -> Result<bool>;

    /// Read a container's environment as a key/value snapshot
    fn env_vars(&self, name: &str, timeout: Duration) -> Result<HashMap<String, String>>;

    /// Resolve the host-side source of the container's /backup mount
    fn backup_mount(&self, name: &str, timeout: Duration) -> Result<Option<PathBuf>>;

    /// Execute a command inside a running container
    fn exec(&self, name: &str, argv: &[String], timeout: Duration) -> Result<()>;
}

/// Default implementation using real Docker CLI calls
#[derive(Debug, Clone, Default)]
pub struct RealDockerOps;

impl RealDockerOps {
    pub fn new() -> Self {
        Self
    }
}

impl DockerOperations for RealDockerOps {
    fn container_running(&self, name: &str, timeout: Duration) -> Result<bool> {
        super::docker::container_running(name, timeout)
    }

    fn env_vars(&self, name: &str, timeout: Duration) -> Result<HashMap<String, String>> {
        super::docker::env_vars(name, timeout)
    }

    fn backup_mount(&self, name: &str, timeout: Duration) -> Result<Option<PathBuf>> {
        super::docker::backup_mount(name, timeout)
    }

    fn exec(&self, name: &str, argv: &[String], timeout: Duration) -> Result<()> {
        super::docker::exec(name, argv, timeout)
    }
}

/// Mock implementation for testing
/// Available for use in external test crates
pub mod mock {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Recorded Docker operation call
    #[derive(Clone, Debug)]
    pub enum DockerCall {
        ContainerRunning { name: String },
        EnvVars { name: String },
        BackupMount { name: String },
        Exec { name: String, argv: Vec<String> },
    }

    /// Mock Docker operations for testing
    #[derive(Clone, Default)]
    pub struct MockDockerOps {
        /// Recorded operation calls
        pub calls: Arc<Mutex<Vec<DockerCall>>>,
        /// Names of containers considered running
        pub containers: Arc<Mutex<Vec<String>>>,
        /// Pre-configured environment per container
        pub env: Arc<Mutex<HashMap<String, HashMap<String, String>>>>,
        /// Pre-configured /backup mount source per container
        pub mounts: Arc<Mutex<HashMap<String, PathBuf>>>,
        /// Whether exec should fail
        pub should_fail_exec: Arc<Mutex<bool>>,
        /// Whether introspection queries should fail
        pub should_fail_query: Arc<Mutex<bool>>,
    }

    impl MockDockerOps {
        pub fn new() -> Self {
            Self::default()
        }

        /// Mark a container as running
        pub fn with_container(self, name: &str) -> Self {
            self.containers.lock().unwrap().push(name.to_string());
            self
        }

        /// Configure an environment variable for a container
        pub fn with_env_var(self, container: &str, key: &str, value: &str) -> Self {
            self.env
                .lock()
                .unwrap()
                .entry(container.to_string())
                .or_default()
                .insert(key.to_string(), value.to_string());
            self
        }

        /// Configure the /backup mount source for a container
        pub fn with_backup_mount(self, container: &str, source: &std::path::Path) -> Self {
            self.mounts
                .lock()
                .unwrap()
                .insert(container.to_string(), source.to_path_buf());
            self
        }

        /// Configure exec to fail
        pub fn with_failing_exec(self) -> Self {
            *self.should_fail_exec.lock().unwrap() = true;
            self
        }

        /// Configure introspection queries to fail
        pub fn with_failing_query(self) -> Self {
            *self.should_fail_query.lock().unwrap() = true;
            self
        }

        /// Get all recorded calls
        pub fn get_calls(&self) -> Vec<DockerCall> {
            self.calls.lock().unwrap().clone()
        }

        /// Check if exec was called
        pub fn exec_called(&self) -> bool {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .any(|c| matches!(c, DockerCall::Exec { .. }))
        }

        /// Get the argv of exec calls against a specific container
        pub fn exec_calls_for(&self, container: &str) -> Vec<Vec<String>> {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .filter_map(|c| match c {
                    DockerCall::Exec { name, argv } if name == container => Some(argv.clone()),
                    _ => None,
                })
                .collect()
        }

        fn record_call(&self, call: DockerCall) {
            self.calls.lock().unwrap().push(call);
        }

        fn check_query(&self) -> Result<()> {
            if *self.should_fail_query.lock().unwrap() {
                anyhow::bail!("Mock docker query failure");
            }
            Ok(())
        }
    }

    impl DockerOperations for MockDockerOps {
        fn container_running(&self, name: &str, _timeout: Duration) -> Result<bool> {
            self.record_call(DockerCall::ContainerRunning {
                name: name.to_string(),
            });
            self.check_query()?;
            // Exact match, not substring
            Ok(self.containers.lock().unwrap().iter().any(|c| c == name))
        }

        fn env_vars(&self, name: &str, _timeout: Duration) -> Result<HashMap<String, String>> {
            self.record_call(DockerCall::EnvVars {
                name: name.to_string(),
            });
            self.check_query()?;
            Ok(self
                .env
                .lock()
                .unwrap()
                .get(name)
                .cloned()
                .unwrap_or_default())
        }

        fn backup_mount(&self, name: &str, _timeout: Duration) -> Result<Option<PathBuf>> {
            self.record_call(DockerCall::BackupMount {
                name: name.to_string(),
            });
            self.check_query()?;
            Ok(self.mounts.lock().unwrap().get(name).cloned())
        }

        fn exec(&self, name: &str, argv: &[String], _timeout: Duration) -> Result<()> {
            self.record_call(DockerCall::Exec {
                name: name.to_string(),
                argv: argv.to_vec(),
            });
            if *self.should_fail_exec.lock().unwrap() {
                anyhow::bail!("Mock exec failure in container {}", name);
            }
            Ok(())
        }
    }
}
