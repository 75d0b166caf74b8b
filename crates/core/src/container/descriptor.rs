use std::any::TypeId;
use std::fmt;

/// Identifier a service is registered, resolved and looked up under
///
/// A key is either a concrete type or a string name. The two forms never
/// alias each other: a service registered under `ServiceKey::of::<Db>()` is
/// not reachable through the name `"Db"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ServiceKey {
    /// Keyed by a Rust type
    Type {
        type_id: TypeId,
        type_name: &'static str,
    },
    /// Keyed by a string name
    Name(String),
}

impl ServiceKey {
    /// Create a key for a type
    pub fn of<T: 'static + ?Sized>() -> Self {
        Self::Type {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
        }
    }

    /// Create a key for a string name
    pub fn named(name: impl Into<String>) -> Self {
        Self::Name(name.into())
    }

    /// TypeId of a type key
    pub fn as_type_id(&self) -> Option<TypeId> {
        match self {
            Self::Type { type_id, .. } => Some(*type_id),
            Self::Name(_) => None,
        }
    }

    /// Name of a string key
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Type { .. } => None,
            Self::Name(name) => Some(name),
        }
    }

    /// Check if this key identifies `T`
    pub fn is_type<T: 'static + ?Sized>(&self) -> bool {
        self.as_type_id() == Some(TypeId::of::<T>())
    }
}

impl fmt::Display for ServiceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Type { type_name, .. } => write!(f, "{}", type_name),
            Self::Name(name) => write!(f, "\"{}\"", name),
        }
    }
}

impl From<&str> for ServiceKey {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for ServiceKey {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl From<&String> for ServiceKey {
    fn from(name: &String) -> Self {
        Self::Name(name.clone())
    }
}

impl From<&ServiceKey> for ServiceKey {
    fn from(key: &ServiceKey) -> Self {
        key.clone()
    }
}
