pub mod config;
pub mod container;
pub mod errors;
pub mod testing;

// Re-export key types for convenience
pub use config::{ConfigError, ContainerConfig, DuplicatePolicy};
pub use container::{
    Arguments, Container, ContainerBuilder, ContainerProtocol, Registration, ServiceKey,
    ServiceRegistry, ServiceScope,
};
pub use errors::ContainerError;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get crate version
pub fn version() -> &'static str {
    VERSION
}
