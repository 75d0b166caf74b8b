use crate::config::ConfigError;
use thiserror::Error;

/// Error type for service registration and resolution
#[derive(Debug, Error)]
pub enum ContainerError {
    #[error("Service not found: {service}")]
    ServiceNotFound { service: String },

    #[error("Service already registered: {service}")]
    DuplicateRegistration { service: String },

    #[error("Type mismatch for '{service}': expected {expected}, found {actual}")]
    TypeMismatch {
        service: String,
        expected: String,
        actual: String,
    },

    #[error("Missing argument: {argument}")]
    MissingArgument { argument: String },

    #[error("Invalid argument '{argument}': expected {expected}")]
    InvalidArgument { argument: String, expected: String },

    #[error("Invalid overrides for '{service}': {message}")]
    InvalidOverrides { service: String, message: String },

    #[error("Service initialization failed for '{service}': {source}")]
    ServiceInitializationFailed {
        service: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Alias cycle detected at {alias}")]
    AliasCycle { alias: String },

    #[error("Lock error on resource: {resource}")]
    LockError { resource: String },

    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),
}

impl ContainerError {
    /// Create a new service not found error
    pub fn service_not_found(service: impl Into<String>) -> Self {
        Self::ServiceNotFound {
            service: service.into(),
        }
    }

    /// Create a new duplicate registration error
    pub fn duplicate_registration(service: impl Into<String>) -> Self {
        Self::DuplicateRegistration {
            service: service.into(),
        }
    }

    /// Create a new type mismatch error
    pub fn type_mismatch(
        service: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::TypeMismatch {
            service: service.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Create a new missing argument error
    pub fn missing_argument(argument: impl Into<String>) -> Self {
        Self::MissingArgument {
            argument: argument.into(),
        }
    }

    /// Create a new invalid argument error
    pub fn invalid_argument(argument: impl Into<String>, expected: impl Into<String>) -> Self {
        Self::InvalidArgument {
            argument: argument.into(),
            expected: expected.into(),
        }
    }

    /// Create a new invalid overrides error
    pub fn invalid_overrides(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidOverrides {
            service: service.into(),
            message: message.into(),
        }
    }

    /// Wrap a construction failure
    pub fn initialization_failed(
        service: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::ServiceInitializationFailed {
            service: service.into(),
            source: source.into(),
        }
    }

    /// Create a new alias cycle error
    pub fn alias_cycle(alias: impl Into<String>) -> Self {
        Self::AliasCycle {
            alias: alias.into(),
        }
    }

    pub(crate) fn lock(resource: &str) -> Self {
        Self::LockError {
            resource: resource.to_string(),
        }
    }

    /// Check if the error reports an unconfigured service
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ServiceNotFound { .. })
    }

    /// Check if the error reports a duplicate registration
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::DuplicateRegistration { .. })
    }

    /// Check if the error reports a type mismatch
    pub fn is_type_mismatch(&self) -> bool {
        matches!(self, Self::TypeMismatch { .. })
    }

    /// Check if the error comes from a failing factory
    pub fn is_initialization(&self) -> bool {
        matches!(self, Self::ServiceInitializationFailed { .. })
    }
}
