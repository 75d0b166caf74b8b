//! Container-agnostic dependency injection contract
//!
//! Code that needs "a container" takes a generic `C: ContainerProtocol` and
//! drives it through three operations: register a service under a key,
//! resolve an instance for a key, and ask whether a key is configured.
//!
//! ## Contract
//!
//! - Before `register(key, ..)` (and absent any implicit resolution policy of
//!   the implementation) `contains(key)` is `false`.
//! - After a successful `register(key, ..)`, `contains(key)` is `true` and
//!   `resolve(key, ..)` succeeds, barring implementation-specific errors.
//! - `resolve` for an unconfigured key returns an error. It never hands back a
//!   default or an instance of some other service.
//! - The key used to register is usable, in the same form, to resolve and to
//!   test membership.
//!
//! What the registration payload and the per-call arguments look like, whether
//! a second registration of the same key replaces or fails, and whether
//! resolution builds a fresh instance or reuses one, are all decided by the
//! implementation.
//!
//! ## Usage
//!
//! ```rust
//! use servicekit_core::{Arguments, Container, ContainerProtocol, Registration};
//!
//! struct Database {
//!     url: String,
//! }
//!
//! fn wire<C>(container: &mut C) -> Result<(), C::Error>
//! where
//!     C: ContainerProtocol<Registration = Registration>,
//! {
//!     container.register(
//!         "db",
//!         Registration::factory(|_: &Arguments| Ok(Database { url: "postgres://localhost".into() })),
//!     )
//! }
//!
//! let mut container = Container::new();
//! wire(&mut container).unwrap();
//!
//! assert!(container.contains("db"));
//! let db = container.resolve::<Database>("db", Arguments::new()).unwrap();
//! assert_eq!(db.url, "postgres://localhost");
//! assert!(container.resolve::<Database>("cache", Arguments::new()).is_err());
//! ```

use crate::container::ServiceKey;
use std::sync::Arc;

/// Minimal operation set of a dependency injection container
pub trait ContainerProtocol {
    /// Construction strategy accepted by `register`
    type Registration;

    /// Per-call construction overrides accepted by `resolve`
    type Arguments: Default;

    /// Error reported by `register` and `resolve`
    type Error: std::error::Error + Send + Sync + 'static;

    /// Register a service under `key`
    ///
    /// On success `key` is configured. Duplicate handling is up to the
    /// implementation.
    fn register(
        &mut self,
        key: impl Into<ServiceKey>,
        registration: Self::Registration,
    ) -> Result<(), Self::Error>;

    /// Produce an instance of `T` for `key`
    ///
    /// Fails when `key` is not configured or does not produce a `T`.
    fn resolve<T>(
        &self,
        key: impl Into<ServiceKey>,
        arguments: Self::Arguments,
    ) -> Result<Arc<T>, Self::Error>
    where
        T: Send + Sync + 'static;

    /// Check whether `key` is configured. Has no side effects.
    fn contains(&self, key: impl Into<ServiceKey>) -> bool;

    /// Resolve the service keyed by the type `T` with default arguments
    fn resolve_type<T>(&self) -> Result<Arc<T>, Self::Error>
    where
        T: Send + Sync + 'static,
    {
        self.resolve::<T>(ServiceKey::of::<T>(), Self::Arguments::default())
    }

    /// Resolve with default arguments, returning `None` on any error
    fn try_resolve<T>(&self, key: impl Into<ServiceKey>) -> Option<Arc<T>>
    where
        T: Send + Sync + 'static,
    {
        self.resolve::<T>(key, Self::Arguments::default()).ok()
    }

    /// Check whether the type `T` is configured under its type key
    fn contains_type<T: ?Sized + 'static>(&self) -> bool {
        self.contains(ServiceKey::of::<T>())
    }
}
