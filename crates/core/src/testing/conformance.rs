use crate::container::{ContainerProtocol, ServiceKey};
use std::sync::Arc;
use thiserror::Error;

/// A broken property of the container contract
#[derive(Debug, Error)]
pub enum ContractViolation {
    #[error("{key} is configured before it was registered")]
    PresentBeforeRegistration { key: String },

    #[error("{key} is configured although it was never registered")]
    PresentWhenUnregistered { key: String },

    #[error("registering {key} failed: {message}")]
    RegistrationFailed { key: String, message: String },

    #[error("{key} is not configured after registration")]
    MissingAfterRegistration { key: String },

    #[error("resolving configured {key} failed: {message}")]
    ResolutionFailed { key: String, message: String },

    #[error("{key} resolved although it is not configured")]
    ResolvedUnconfigured { key: String },
}

/// Register `key` and check the membership and resolution guarantees
///
/// `key` must not be configured beforehand. On success the resolved instance
/// is returned so callers can make further assertions about it.
pub fn check_registration<C, T>(
    container: &mut C,
    key: impl Into<ServiceKey>,
    registration: C::Registration,
) -> Result<Arc<T>, ContractViolation>
where
    C: ContainerProtocol,
    T: Send + Sync + 'static,
{
    let key = key.into();

    if container.contains(&key) {
        return Err(ContractViolation::PresentBeforeRegistration {
            key: key.to_string(),
        });
    }

    container
        .register(&key, registration)
        .map_err(|error| ContractViolation::RegistrationFailed {
            key: key.to_string(),
            message: error.to_string(),
        })?;

    if !container.contains(&key) {
        return Err(ContractViolation::MissingAfterRegistration {
            key: key.to_string(),
        });
    }

    container
        .resolve::<T>(&key, C::Arguments::default())
        .map_err(|error| ContractViolation::ResolutionFailed {
            key: key.to_string(),
            message: error.to_string(),
        })
}

/// Check that an unconfigured `key` reports absence and fails to resolve
pub fn check_unregistered<C, T>(container: &C, key: impl Into<ServiceKey>) -> Result<(), ContractViolation>
where
    C: ContainerProtocol,
    T: Send + Sync + 'static,
{
    let key = key.into();

    if container.contains(&key) {
        return Err(ContractViolation::PresentWhenUnregistered {
            key: key.to_string(),
        });
    }

    match container.resolve::<T>(&key, C::Arguments::default()) {
        Ok(_) => Err(ContractViolation::ResolvedUnconfigured {
            key: key.to_string(),
        }),
        Err(_) => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::{Arguments, Container, Registration};
    use crate::errors::ContainerError;
    use std::collections::HashSet;

    #[derive(Debug, PartialEq)]
    struct Database {
        url: &'static str,
    }

    #[test]
    fn test_reference_container_conforms() {
        let mut container = Container::new();

        let db = check_registration::<_, Database>(
            &mut container,
            "db",
            Registration::factory(|_: &Arguments| Ok(Database { url: "postgres://db" })),
        )
        .unwrap();
        assert_eq!(db.url, "postgres://db");

        check_registration::<_, u32>(&mut container, ServiceKey::of::<u32>(), Registration::instance(7u32))
            .unwrap();
        check_unregistered::<_, Database>(&container, "unregistered").unwrap();
    }

    #[test]
    fn test_already_registered_key_is_reported() {
        let mut container = Container::new();
        container.add_instance(1u8).unwrap();

        let violation = check_registration::<_, u8>(
            &mut container,
            ServiceKey::of::<u8>(),
            Registration::instance(2u8),
        )
        .unwrap_err();
        assert!(matches!(violation, ContractViolation::PresentBeforeRegistration { .. }));
    }

    /// Claims every key is configured and hands out defaults for anything
    struct Lenient {
        keys: HashSet<ServiceKey>,
    }

    impl ContainerProtocol for Lenient {
        type Registration = ();
        type Arguments = ();
        type Error = ContainerError;

        fn register(&mut self, key: impl Into<ServiceKey>, _: ()) -> Result<(), ContainerError> {
            self.keys.insert(key.into());
            Ok(())
        }

        fn resolve<T>(&self, _: impl Into<ServiceKey>, _: ()) -> Result<Arc<T>, ContainerError>
        where
            T: Send + Sync + 'static,
        {
            Err(ContainerError::service_not_found("anything"))
        }

        fn contains(&self, _: impl Into<ServiceKey>) -> bool {
            !self.keys.is_empty()
        }
    }

    #[test]
    fn test_violations_are_detected() {
        let mut lenient = Lenient {
            keys: HashSet::new(),
        };

        let violation = check_registration::<_, u8>(&mut lenient, "a", ()).unwrap_err();
        assert!(matches!(violation, ContractViolation::ResolutionFailed { .. }));

        let violation = check_unregistered::<_, u8>(&lenient, "b").unwrap_err();
        assert!(matches!(violation, ContractViolation::PresentWhenUnregistered { .. }));
        assert_eq!(
            violation.to_string(),
            "\"b\" is configured although it was never registered"
        );
    }
}
