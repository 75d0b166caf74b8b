use crate::errors::ContainerError;
use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

type ArgumentValue = Arc<dyn Any + Send + Sync>;

/// Positional and named construction arguments
///
/// Registrations carry a set of default arguments; callers of `resolve` pass
/// overrides. Factories read them back with typed accessors. Values are shared,
/// so merging and cloning never copy the underlying data.
#[derive(Clone, Default)]
pub struct Arguments {
    positional: Vec<ArgumentValue>,
    named: BTreeMap<String, ArgumentValue>,
}

impl Arguments {
    /// Create an empty argument set
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a positional argument
    pub fn push<V: Any + Send + Sync>(&mut self, value: V) {
        self.positional.push(Arc::new(value));
    }

    /// Builder form of [`Arguments::push`]
    pub fn with<V: Any + Send + Sync>(mut self, value: V) -> Self {
        self.push(value);
        self
    }

    /// Set a named argument, replacing any previous value
    pub fn insert<V: Any + Send + Sync>(&mut self, name: impl Into<String>, value: V) {
        self.named.insert(name.into(), Arc::new(value));
    }

    /// Builder form of [`Arguments::insert`]
    pub fn with_named<V: Any + Send + Sync>(mut self, name: impl Into<String>, value: V) -> Self {
        self.insert(name, value);
        self
    }

    /// Positional argument at `index`, if present and of type `V`
    pub fn get<V: Any>(&self, index: usize) -> Option<&V> {
        self.positional.get(index)?.downcast_ref::<V>()
    }

    /// Named argument, if present and of type `V`
    pub fn named<V: Any>(&self, name: &str) -> Option<&V> {
        self.named.get(name)?.downcast_ref::<V>()
    }

    /// Positional argument at `index`, failing when absent or mistyped
    pub fn require<V: Any>(&self, index: usize) -> Result<&V, ContainerError> {
        let argument = format!("#{}", index);
        let value = self
            .positional
            .get(index)
            .ok_or_else(|| ContainerError::missing_argument(argument.as_str()))?;

        value
            .downcast_ref::<V>()
            .ok_or_else(|| ContainerError::invalid_argument(argument, std::any::type_name::<V>()))
    }

    /// Named argument, failing when absent or mistyped
    pub fn require_named<V: Any>(&self, name: &str) -> Result<&V, ContainerError> {
        let value = self
            .named
            .get(name)
            .ok_or_else(|| ContainerError::missing_argument(name))?;

        value
            .downcast_ref::<V>()
            .ok_or_else(|| ContainerError::invalid_argument(name, std::any::type_name::<V>()))
    }

    /// Overlay `overrides` on top of these arguments
    ///
    /// Positional overrides replace values at the same index and extend the
    /// list past its end; named overrides replace values with the same name.
    pub fn merged_with(&self, overrides: &Arguments) -> Arguments {
        let mut merged = self.clone();

        for (index, value) in overrides.positional.iter().enumerate() {
            match merged.positional.get_mut(index) {
                Some(slot) => *slot = value.clone(),
                None => merged.positional.push(value.clone()),
            }
        }

        for (name, value) in &overrides.named {
            merged.named.insert(name.clone(), value.clone());
        }

        merged
    }

    /// Get the number of positional arguments
    pub fn positional_len(&self) -> usize {
        self.positional.len()
    }

    /// Check if a named argument is present
    pub fn contains_named(&self, name: &str) -> bool {
        self.named.contains_key(name)
    }

    /// Total number of positional and named arguments
    pub fn len(&self) -> usize {
        self.positional.len() + self.named.len()
    }

    /// Check if there are no arguments at all
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for Arguments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Arguments")
            .field("positional", &self.positional.len())
            .field("named", &self.named.keys().collect::<Vec<_>>())
            .finish()
    }
}
