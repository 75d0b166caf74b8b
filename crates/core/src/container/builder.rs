use crate::config::{ContainerConfig, DuplicatePolicy};
use crate::container::{Arguments, Container, ContainerProtocol, Registration, ServiceKey, ServiceScope};
use crate::errors::ContainerError;

enum PendingEntry {
    Service(ServiceKey, Registration),
    Alias(String, ServiceKey),
}

/// Builder for constructing containers with services
///
/// Registrations are collected and replayed in order by [`ContainerBuilder::build`],
/// which is where registration errors surface.
pub struct ContainerBuilder {
    config: ContainerConfig,
    entries: Vec<PendingEntry>,
}

impl ContainerBuilder {
    /// Create a new container builder
    pub fn new() -> Self {
        Self {
            config: ContainerConfig::default(),
            entries: Vec::new(),
        }
    }

    /// Replace the whole configuration
    pub fn with_config(mut self, config: ContainerConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the container name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.config.name = name.into();
        self
    }

    /// Set the default scope for services
    pub fn with_scope(mut self, scope: ServiceScope) -> Self {
        self.config.default_scope = scope;
        self
    }

    /// Set what happens when a key is registered twice
    pub fn with_duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.config.duplicate_policy = policy;
        self
    }

    /// Add a registration under any key
    pub fn register(mut self, key: impl Into<ServiceKey>, registration: Registration) -> Self {
        self.entries.push(PendingEntry::Service(key.into(), registration));
        self
    }

    /// Add a ready-made value under its type
    pub fn add_instance<T>(self, value: T) -> Self
    where
        T: Send + Sync + 'static,
    {
        self.register(ServiceKey::of::<T>(), Registration::instance(value))
    }

    /// Add a singleton service with factory
    pub fn add_singleton<T, F>(self, factory: F) -> Self
    where
        T: Send + Sync + 'static,
        F: Fn(&Arguments) -> Result<T, ContainerError> + Send + Sync + 'static,
    {
        self.register(ServiceKey::of::<T>(), Registration::factory(factory).singleton())
    }

    /// Add a transient service with factory
    pub fn add_transient<T, F>(self, factory: F) -> Self
    where
        T: Send + Sync + 'static,
        F: Fn(&Arguments) -> Result<T, ContainerError> + Send + Sync + 'static,
    {
        self.register(ServiceKey::of::<T>(), Registration::factory(factory).transient())
    }

    /// Add an alias; the target must be registered earlier in the builder
    pub fn add_alias(mut self, alias: impl Into<String>, target: impl Into<ServiceKey>) -> Self {
        self.entries.push(PendingEntry::Alias(alias.into(), target.into()));
        self
    }

    /// Configure the builder from a configuration closure
    pub fn configure<F>(self, configure: F) -> Self
    where
        F: FnOnce(Self) -> Self,
    {
        configure(self)
    }

    /// Build the container
    pub fn build(self) -> Result<Container, ContainerError> {
        let mut container = Container::from_config(self.config)?;

        for entry in self.entries {
            match entry {
                PendingEntry::Service(key, registration) => container.register(key, registration)?,
                PendingEntry::Alias(alias, target) => container.add_alias(alias, target)?,
            }
        }

        tracing::info!(
            "Built container '{}' with {} services",
            container.name(),
            container.service_count()
        );

        Ok(container)
    }
}

impl Default for ContainerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
