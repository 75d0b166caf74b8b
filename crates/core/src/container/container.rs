use crate::config::ContainerConfig;
use crate::container::{Arguments, ContainerProtocol, Registration, ServiceKey, ServiceRegistry};
use crate::errors::ContainerError;
use std::sync::Arc;
use uuid::Uuid;

/// Reference dependency injection container
///
/// Implements [`ContainerProtocol`] on top of a [`ServiceRegistry`]. Only
/// registered keys are configured; nothing is resolved implicitly.
pub struct Container {
    id: Uuid,
    config: ContainerConfig,
    registry: ServiceRegistry,
}

impl Container {
    /// Create a new container with the default configuration
    pub fn new() -> Self {
        Self::with_config(ContainerConfig::default())
    }

    /// Create a container using `config` as given
    pub fn with_config(config: ContainerConfig) -> Self {
        Self {
            id: Uuid::new_v4(),
            config,
            registry: ServiceRegistry::new(),
        }
    }

    /// Create a container after validating `config`
    pub fn from_config(config: ContainerConfig) -> Result<Self, ContainerError> {
        config.validate()?;
        Ok(Self::with_config(config))
    }

    /// Get the unique id of this container instance
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Get the configured container name
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Get the configuration the container was created with
    pub fn config(&self) -> &ContainerConfig {
        &self.config
    }

    /// Register a ready-made value under its type
    pub fn add_instance<T>(&mut self, value: T) -> Result<(), ContainerError>
    where
        T: Send + Sync + 'static,
    {
        self.register(ServiceKey::of::<T>(), Registration::instance(value))
    }

    /// Register a lazily constructed, shared service under its type
    pub fn add_singleton<T, F>(&mut self, factory: F) -> Result<(), ContainerError>
    where
        T: Send + Sync + 'static,
        F: Fn(&Arguments) -> Result<T, ContainerError> + Send + Sync + 'static,
    {
        self.register(ServiceKey::of::<T>(), Registration::factory(factory).singleton())
    }

    /// Register a service constructed on every resolution under its type
    pub fn add_transient<T, F>(&mut self, factory: F) -> Result<(), ContainerError>
    where
        T: Send + Sync + 'static,
        F: Fn(&Arguments) -> Result<T, ContainerError> + Send + Sync + 'static,
    {
        self.register(ServiceKey::of::<T>(), Registration::factory(factory).transient())
    }

    /// Make the name `alias` resolve through `target`
    pub fn add_alias(
        &mut self,
        alias: impl Into<String>,
        target: impl Into<ServiceKey>,
    ) -> Result<(), ContainerError> {
        self.registry
            .register_alias(
                ServiceKey::Name(alias.into()),
                target.into(),
                self.config.duplicate_policy,
            )
            .map(|_| ())
    }

    /// Remove a registration or alias; returns whether anything was removed
    pub fn unregister(&mut self, key: impl Into<ServiceKey>) -> Result<bool, ContainerError> {
        self.registry.remove(&key.into())
    }

    /// Get the number of registrations and aliases
    pub fn service_count(&self) -> usize {
        self.registry.service_count()
    }

    /// Get every registered key, aliases included
    pub fn registered_keys(&self) -> Vec<ServiceKey> {
        self.registry.registered_keys()
    }

    /// Check if the container is consistent
    pub fn validate(&self) -> Result<(), ContainerError> {
        self.registry.validate()
    }
}

impl ContainerProtocol for Container {
    type Registration = Registration;
    type Arguments = Arguments;
    type Error = ContainerError;

    fn register(
        &mut self,
        key: impl Into<ServiceKey>,
        registration: Registration,
    ) -> Result<(), ContainerError> {
        let scope = registration.scope().unwrap_or(self.config.default_scope);
        self.registry
            .register(key.into(), registration, scope, self.config.duplicate_policy)
            .map(|_| ())
    }

    fn resolve<T>(&self, key: impl Into<ServiceKey>, arguments: Arguments) -> Result<Arc<T>, ContainerError>
    where
        T: Send + Sync + 'static,
    {
        self.registry.resolve::<T>(&key.into(), &arguments)
    }

    fn contains(&self, key: impl Into<ServiceKey>) -> bool {
        self.registry.contains(&key.into())
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Container {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Container")
            .field("id", &self.id)
            .field("name", &self.config.name)
            .field("service_count", &self.service_count())
            .field("default_scope", &self.config.default_scope)
            .field("duplicate_policy", &self.config.duplicate_policy)
            .finish()
    }
}
