pub mod command;
pub mod cron;
pub mod docker;
pub mod locker;
pub mod rotate;

// Trait-based abstraction for testability
pub mod docker_ops;

// Re-export commonly used types and traits
#[allow(unused_imports)]
pub use docker_ops::{DockerOperations, RealDockerOps};
