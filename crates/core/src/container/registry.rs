use crate::config::DuplicatePolicy;
use crate::container::registration::{Activation, ServiceFactory, SharedInstance};
use crate::container::{Arguments, Registration, ServiceKey, ServiceScope};
use crate::errors::ContainerError;
use std::any::TypeId;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Entry in the registry
#[derive(Debug)]
pub enum ServiceEntry {
    /// A construction strategy with its effective scope
    Registered {
        registration: Registration,
        scope: ServiceScope,
        /// Distinguishes this registration from earlier ones under the same key
        generation: u64,
    },
    /// Another key this one resolves through
    Alias(ServiceKey),
}

/// Singleton built from the registration with the same generation
#[derive(Debug)]
struct CachedInstance {
    generation: u64,
    instance: SharedInstance,
}

/// Registration reached by following a key's alias chain
struct Located<'a> {
    target: &'a ServiceKey,
    registration: &'a Registration,
    scope: ServiceScope,
    generation: u64,
}

type ServiceMap = HashMap<ServiceKey, ServiceEntry>;
type InstanceMap = HashMap<ServiceKey, CachedInstance>;

/// Thread-safe registration table with a singleton instance cache
///
/// Singletons are cached under the key they were registered with, so every
/// alias of a key shares the same instance. A cached instance is only handed
/// out while the registration that built it is still the one in the table.
#[derive(Debug, Default)]
pub struct ServiceRegistry {
    services: RwLock<ServiceMap>,
    instances: RwLock<InstanceMap>,
    next_generation: AtomicU64,
}

impl ServiceRegistry {
    /// Create a new service registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a registration, returning whether an existing entry was replaced
    pub fn register(
        &self,
        key: ServiceKey,
        registration: Registration,
        scope: ServiceScope,
        policy: DuplicatePolicy,
    ) -> Result<bool, ContainerError> {
        if let Some(type_id) = key.as_type_id() {
            if type_id != registration.produced_type_id() {
                return Err(ContainerError::type_mismatch(
                    key.to_string(),
                    key.to_string(),
                    registration.produced_type_name(),
                ));
            }
        }

        let mut services = self.write_services()?;
        let replaced = Self::check_duplicate(&services, &key, policy)?;

        if replaced {
            Self::check_type_aliases(&services, &key, &registration)?;
            tracing::debug!("Replacing service {} ({})", key, scope);
        } else {
            tracing::debug!("Registering service {} ({})", key, scope);
        }

        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
        services.insert(
            key.clone(),
            ServiceEntry::Registered {
                registration,
                scope,
                generation,
            },
        );
        drop(services);

        if replaced {
            self.write_instances()?.remove(&key);
        }

        Ok(replaced)
    }

    /// Make `alias` resolve through `target`
    pub fn register_alias(
        &self,
        alias: ServiceKey,
        target: ServiceKey,
        policy: DuplicatePolicy,
    ) -> Result<bool, ContainerError> {
        let mut services = self.write_services()?;

        let located = Self::lookup(&services, &target)
            .ok_or_else(|| ContainerError::service_not_found(target.to_string()))?;

        if let Some(type_id) = alias.as_type_id() {
            if type_id != located.registration.produced_type_id() {
                return Err(ContainerError::type_mismatch(
                    alias.to_string(),
                    alias.to_string(),
                    located.registration.produced_type_name(),
                ));
            }
        }

        let mut current = &target;
        loop {
            if current == &alias {
                return Err(ContainerError::alias_cycle(alias.to_string()));
            }
            match services.get(current) {
                Some(ServiceEntry::Alias(next)) => current = next,
                _ => break,
            }
        }

        let replaced = Self::check_duplicate(&services, &alias, policy)?;
        tracing::debug!("Aliasing {} to {}", alias, target);

        services.insert(alias.clone(), ServiceEntry::Alias(target));
        drop(services);

        if replaced {
            self.write_instances()?.remove(&alias);
        }

        Ok(replaced)
    }

    /// Resolve an instance of `T` registered under `key`
    pub fn resolve<T>(&self, key: &ServiceKey, overrides: &Arguments) -> Result<Arc<T>, ContainerError>
    where
        T: Send + Sync + 'static,
    {
        // Copy what we need out of the table so factories run without the lock held.
        let (target, registration, scope, generation) = {
            let services = self.read_services()?;
            match Self::lookup(&services, key) {
                Some(located) => (
                    located.target.clone(),
                    located.registration.clone(),
                    located.scope,
                    located.generation,
                ),
                None => {
                    tracing::debug!("Service {} is not registered", key);
                    return Err(ContainerError::service_not_found(key.to_string()));
                }
            }
        };

        if registration.produced_type_id() != TypeId::of::<T>() {
            return Err(ContainerError::type_mismatch(
                key.to_string(),
                std::any::type_name::<T>(),
                registration.produced_type_name(),
            ));
        }

        let instance = match registration.activation() {
            Activation::Instance(instance) => {
                if !overrides.is_empty() {
                    return Err(ContainerError::invalid_overrides(
                        key.to_string(),
                        "instance registrations take no arguments",
                    ));
                }
                instance.clone()
            }
            Activation::Factory(factory) if scope.is_singleton() && overrides.is_empty() => {
                self.singleton(&target, generation, factory, registration.defaults())?
            }
            Activation::Factory(factory) => {
                Self::construct(key, factory, &registration.defaults().merged_with(overrides))?
            }
        };

        instance.downcast::<T>().map_err(|_| {
            ContainerError::type_mismatch(
                key.to_string(),
                std::any::type_name::<T>(),
                registration.produced_type_name(),
            )
        })
    }

    /// Check if `key` resolves to a registration
    pub fn contains(&self, key: &ServiceKey) -> bool {
        self.services
            .read()
            .map(|services| Self::lookup(&services, key).is_some())
            .unwrap_or(false)
    }

    /// Remove a registration or alias; returns whether anything was removed
    pub fn remove(&self, key: &ServiceKey) -> Result<bool, ContainerError> {
        let removed = self.write_services()?.remove(key).is_some();
        self.write_instances()?.remove(key);

        if removed {
            tracing::debug!("Removed service {}", key);
        }

        Ok(removed)
    }

    /// Get the number of registrations and aliases
    pub fn service_count(&self) -> usize {
        self.services
            .read()
            .map(|services| services.len())
            .unwrap_or(0)
    }

    /// Get the number of singletons constructed so far
    pub fn cached_instance_count(&self) -> usize {
        self.instances
            .read()
            .map(|instances| instances.len())
            .unwrap_or(0)
    }

    /// Get every registered key, aliases included
    pub fn registered_keys(&self) -> Vec<ServiceKey> {
        self.services
            .read()
            .map(|services| services.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Check the locks are healthy and every alias still reaches a registration
    pub fn validate(&self) -> Result<(), ContainerError> {
        let services = self.read_services()?;
        let _instances = self.read_instances()?;

        for (key, entry) in services.iter() {
            if let ServiceEntry::Alias(target) = entry {
                if Self::lookup(&services, key).is_none() {
                    tracing::warn!("Alias {} points at missing service {}", key, target);
                    return Err(ContainerError::service_not_found(target.to_string()));
                }
            }
        }

        Ok(())
    }

    fn singleton(
        &self,
        target: &ServiceKey,
        generation: u64,
        factory: &ServiceFactory,
        defaults: &Arguments,
    ) -> Result<SharedInstance, ContainerError> {
        let cached = self
            .read_instances()?
            .get(target)
            .filter(|cached| cached.generation == generation)
            .map(|cached| cached.instance.clone());
        if let Some(instance) = cached {
            return Ok(instance);
        }

        tracing::debug!("Constructing singleton {}", target);
        let instance = Self::construct(target, factory, defaults)?;

        // Lock order is services before instances, as in `validate`.
        let services = self.read_services()?;
        let current = matches!(
            services.get(target),
            Some(ServiceEntry::Registered { generation: g, .. }) if *g == generation
        );
        if !current {
            tracing::debug!("Registration of {} changed during construction, not caching", target);
            return Ok(instance);
        }

        // Concurrent first resolutions may both construct; the first stored wins.
        let mut instances = self.write_instances()?;
        match instances.get(target) {
            Some(cached) if cached.generation == generation => Ok(cached.instance.clone()),
            _ => {
                instances.insert(
                    target.clone(),
                    CachedInstance {
                        generation,
                        instance: instance.clone(),
                    },
                );
                Ok(instance)
            }
        }
    }

    fn construct(
        key: &ServiceKey,
        factory: &ServiceFactory,
        arguments: &Arguments,
    ) -> Result<SharedInstance, ContainerError> {
        factory(arguments).map_err(|error| match error {
            ContainerError::ServiceInitializationFailed { .. } => error,
            other => ContainerError::initialization_failed(key.to_string(), other),
        })
    }

    fn lookup<'a>(services: &'a ServiceMap, key: &'a ServiceKey) -> Option<Located<'a>> {
        let mut current = key;
        // Alias chains are acyclic, so a chain never exceeds the table size.
        for _ in 0..=services.len() {
            match services.get(current)? {
                ServiceEntry::Registered {
                    registration,
                    scope,
                    generation,
                } => {
                    return Some(Located {
                        target: current,
                        registration,
                        scope: *scope,
                        generation: *generation,
                    })
                }
                ServiceEntry::Alias(next) => current = next,
            }
        }
        None
    }

    /// Refuse a replacement that would leave a type-keyed alias chain ending
    /// at `key` with a different produced type
    fn check_type_aliases(
        services: &ServiceMap,
        key: &ServiceKey,
        registration: &Registration,
    ) -> Result<(), ContainerError> {
        for (alias, entry) in services.iter() {
            let (Some(type_id), ServiceEntry::Alias(_)) = (alias.as_type_id(), entry) else {
                continue;
            };
            if type_id != registration.produced_type_id() && Self::chain_reaches(services, alias, key) {
                return Err(ContainerError::type_mismatch(
                    alias.to_string(),
                    alias.to_string(),
                    registration.produced_type_name(),
                ));
            }
        }
        Ok(())
    }

    fn chain_reaches(services: &ServiceMap, from: &ServiceKey, to: &ServiceKey) -> bool {
        let mut current = from;
        for _ in 0..=services.len() {
            if current == to {
                return true;
            }
            match services.get(current) {
                Some(ServiceEntry::Alias(next)) => current = next,
                _ => return false,
            }
        }
        false
    }

    fn check_duplicate(
        services: &ServiceMap,
        key: &ServiceKey,
        policy: DuplicatePolicy,
    ) -> Result<bool, ContainerError> {
        if !services.contains_key(key) {
            return Ok(false);
        }

        match policy {
            DuplicatePolicy::Replace => Ok(true),
            DuplicatePolicy::Reject => {
                tracing::warn!("Rejected duplicate registration of {}", key);
                Err(ContainerError::duplicate_registration(key.to_string()))
            }
        }
    }

    fn read_services(&self) -> Result<RwLockReadGuard<'_, ServiceMap>, ContainerError> {
        self.services
            .read()
            .map_err(|_| ContainerError::lock("service_registry"))
    }

    fn write_services(&self) -> Result<RwLockWriteGuard<'_, ServiceMap>, ContainerError> {
        self.services
            .write()
            .map_err(|_| ContainerError::lock("service_registry"))
    }

    fn read_instances(&self) -> Result<RwLockReadGuard<'_, InstanceMap>, ContainerError> {
        self.instances
            .read()
            .map_err(|_| ContainerError::lock("service_instances"))
    }

    fn write_instances(&self) -> Result<RwLockWriteGuard<'_, InstanceMap>, ContainerError> {
        self.instances
            .write()
            .map_err(|_| ContainerError::lock("service_instances"))
    }
}
