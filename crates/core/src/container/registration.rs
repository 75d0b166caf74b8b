use crate::container::{Arguments, ServiceScope};
use crate::errors::ContainerError;
use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

pub(crate) type SharedInstance = Arc<dyn Any + Send + Sync>;

/// Type-erased factory; receives the merged construction arguments
pub(crate) type ServiceFactory =
    Arc<dyn Fn(&Arguments) -> Result<SharedInstance, ContainerError> + Send + Sync>;

/// How instances of a registration come into existence
#[derive(Clone)]
pub(crate) enum Activation {
    /// A ready-made instance, shared by every resolution
    Instance(SharedInstance),
    /// Built on demand from the merged arguments
    Factory(ServiceFactory),
}

impl fmt::Debug for Activation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Activation::Instance(_) => f.debug_tuple("Instance").field(&"<instance>").finish(),
            Activation::Factory(_) => f.debug_tuple("Factory").field(&"<factory>").finish(),
        }
    }
}

/// Construction strategy handed to [`Container::register`](crate::Container)
///
/// A registration records the type it produces, so the container can refuse
/// to hand out an instance under the wrong type. Scope is optional; when left
/// unset the container's configured default applies. Instances are always
/// shared and ignore scope.
#[derive(Debug, Clone)]
pub struct Registration {
    activation: Activation,
    scope: Option<ServiceScope>,
    defaults: Arguments,
    type_id: TypeId,
    type_name: &'static str,
}

impl Registration {
    /// Register a ready-made value
    pub fn instance<T: Send + Sync + 'static>(value: T) -> Self {
        Self::shared(Arc::new(value))
    }

    /// Register a value that is already behind an `Arc`
    pub fn shared<T: Send + Sync + 'static>(value: Arc<T>) -> Self {
        Self {
            activation: Activation::Instance(value),
            scope: Some(ServiceScope::Singleton),
            defaults: Arguments::new(),
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
        }
    }

    /// Register a factory producing `T` from construction arguments
    pub fn factory<T, F>(factory: F) -> Self
    where
        T: Send + Sync + 'static,
        F: Fn(&Arguments) -> Result<T, ContainerError> + Send + Sync + 'static,
    {
        let factory: ServiceFactory =
            Arc::new(move |arguments: &Arguments| Ok(Arc::new(factory(arguments)?) as SharedInstance));

        Self {
            activation: Activation::Factory(factory),
            scope: None,
            defaults: Arguments::new(),
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
        }
    }

    /// Register `T::default()` as the construction strategy
    pub fn default_constructed<T: Default + Send + Sync + 'static>() -> Self {
        Self::factory(|_| Ok(T::default()))
    }

    /// Share one lazily constructed instance across resolutions
    pub fn singleton(self) -> Self {
        self.with_scope(ServiceScope::Singleton)
    }

    /// Construct a new instance on every resolution
    pub fn transient(self) -> Self {
        self.with_scope(ServiceScope::Transient)
    }

    /// Set the scope explicitly
    pub fn with_scope(mut self, scope: ServiceScope) -> Self {
        self.scope = Some(scope);
        self
    }

    /// Add a default positional construction argument
    pub fn with_arg<V: Any + Send + Sync>(mut self, value: V) -> Self {
        self.defaults.push(value);
        self
    }

    /// Add a default named construction argument
    pub fn with_named_arg<V: Any + Send + Sync>(mut self, name: impl Into<String>, value: V) -> Self {
        self.defaults.insert(name, value);
        self
    }

    /// Replace the default construction arguments
    pub fn with_arguments(mut self, arguments: Arguments) -> Self {
        self.defaults = arguments;
        self
    }

    /// Scope chosen by this registration, if any
    pub fn scope(&self) -> Option<ServiceScope> {
        self.scope
    }

    /// Default construction arguments
    pub fn defaults(&self) -> &Arguments {
        &self.defaults
    }

    /// TypeId of the instances this registration produces
    pub fn produced_type_id(&self) -> TypeId {
        self.type_id
    }

    /// Type name of the instances this registration produces
    pub fn produced_type_name(&self) -> &'static str {
        self.type_name
    }

    /// Check if this registration holds a ready-made value
    pub fn is_instance(&self) -> bool {
        matches!(self.activation, Activation::Instance(_))
    }

    pub(crate) fn activation(&self) -> &Activation {
        &self.activation
    }
}
