//! Integration tests for the container contract
//!
//! Drives the reference container and an independent implementation through
//! the same container-agnostic code to check they are interchangeable.

use servicekit_core::testing::{check_registration, check_unregistered};
use servicekit_core::{
    Arguments, Container, ContainerBuilder, ContainerConfig, ContainerError, ContainerProtocol,
    DuplicatePolicy, Registration, ServiceKey,
};
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

/// Notification service trait
trait Notifier: Send + Sync {
    fn notify(&self, message: &str) -> String;
}

struct EmailNotifier {
    sender: String,
}

impl Notifier for EmailNotifier {
    fn notify(&self, message: &str) -> String {
        format!("{} -> {}", self.sender, message)
    }
}

#[derive(Debug, PartialEq)]
struct DatabaseConnection {
    url: String,
}

/// Minimal name-only container holding ready-made values
#[derive(Default)]
struct StaticContainer {
    values: HashMap<ServiceKey, Arc<dyn Any + Send + Sync>>,
}

impl ContainerProtocol for StaticContainer {
    type Registration = Arc<dyn Any + Send + Sync>;
    type Arguments = ();
    type Error = ContainerError;

    fn register(
        &mut self,
        key: impl Into<ServiceKey>,
        registration: Self::Registration,
    ) -> Result<(), Self::Error> {
        let key = key.into();
        if self.values.contains_key(&key) {
            return Err(ContainerError::duplicate_registration(key.to_string()));
        }
        self.values.insert(key, registration);
        Ok(())
    }

    fn resolve<T>(&self, key: impl Into<ServiceKey>, _: ()) -> Result<Arc<T>, Self::Error>
    where
        T: Send + Sync + 'static,
    {
        let key = key.into();
        let value = self
            .values
            .get(&key)
            .cloned()
            .ok_or_else(|| ContainerError::service_not_found(key.to_string()))?;

        value.downcast::<T>().map_err(|_| {
            ContainerError::type_mismatch(key.to_string(), std::any::type_name::<T>(), "unknown")
        })
    }

    fn contains(&self, key: impl Into<ServiceKey>) -> bool {
        self.values.contains_key(&key.into())
    }
}

/// Container-agnostic consumer: only needs something that can resolve "db"
fn describe_database<C: ContainerProtocol>(container: &C) -> Result<String, C::Error> {
    let db = container.resolve::<DatabaseConnection>("db", C::Arguments::default())?;
    Ok(format!("connected to {}", db.url))
}

fn database() -> DatabaseConnection {
    DatabaseConnection {
        url: "postgres://localhost/app".to_string(),
    }
}

#[test]
fn test_register_db_factory_then_resolve() {
    let mut container = Container::new();
    container
        .register("db", Registration::factory(|_: &Arguments| Ok(database())))
        .unwrap();

    assert!(container.contains("db"));
    let db = container.resolve::<DatabaseConnection>("db", Arguments::new()).unwrap();
    assert_eq!(*db, database());
}

#[test]
fn test_resolve_unregistered_fails() {
    let container = Container::new();

    assert!(!container.contains("unregistered"));
    let error = container
        .resolve::<DatabaseConnection>("unregistered", Arguments::new())
        .unwrap_err();
    assert!(error.is_not_found());
    assert_eq!(error.to_string(), "Service not found: \"unregistered\"");
}

#[test]
fn test_both_implementations_satisfy_the_contract() {
    let mut reference = Container::new();
    check_registration::<_, DatabaseConnection>(
        &mut reference,
        "db",
        Registration::instance(database()),
    )
    .unwrap();
    check_unregistered::<_, DatabaseConnection>(&reference, "cache").unwrap();

    let mut minimal = StaticContainer::default();
    let value: Arc<dyn Any + Send + Sync> = Arc::new(database());
    check_registration::<_, DatabaseConnection>(&mut minimal, "db", value).unwrap();
    check_unregistered::<_, DatabaseConnection>(&minimal, "cache").unwrap();

    assert_eq!(
        describe_database(&reference).unwrap(),
        describe_database(&minimal).unwrap()
    );
}

#[test]
fn test_generic_consumer_propagates_errors() {
    assert!(describe_database(&Container::new()).unwrap_err().is_not_found());
    assert!(describe_database(&StaticContainer::default())
        .unwrap_err()
        .is_not_found());
}

#[test]
fn test_type_and_name_keys_are_distinct() {
    let mut container = Container::new();
    container.add_instance(database()).unwrap();

    assert!(container.contains_type::<DatabaseConnection>());
    assert!(!container.contains("db"));
    assert!(!container.contains("DatabaseConnection"));
    assert!(container.resolve_type::<DatabaseConnection>().is_ok());
}

#[test]
fn test_trait_object_services() {
    let mut container = Container::new();
    let notifier: Arc<dyn Notifier> = Arc::new(EmailNotifier {
        sender: "noreply@example.com".to_string(),
    });
    container
        .register(ServiceKey::of::<Arc<dyn Notifier>>(), Registration::instance(notifier))
        .unwrap();

    let resolved = container.resolve_type::<Arc<dyn Notifier>>().unwrap();
    assert_eq!(resolved.notify("hello"), "noreply@example.com -> hello");
}

#[test]
fn test_per_call_overrides() {
    let mut container = Container::new();
    container
        .register(
            "db",
            Registration::factory(|args: &Arguments| {
                Ok(DatabaseConnection {
                    url: format!(
                        "{}://{}",
                        args.require_named::<&'static str>("scheme")?,
                        args.require::<String>(0)?
                    ),
                })
            })
            .transient()
            .with_arg("localhost".to_string())
            .with_named_arg("scheme", "postgres"),
        )
        .unwrap();

    let default = container.resolve::<DatabaseConnection>("db", Arguments::new()).unwrap();
    let replica = container
        .resolve::<DatabaseConnection>("db", Arguments::new().with("replica.internal".to_string()))
        .unwrap();
    let mysql = container
        .resolve::<DatabaseConnection>("db", Arguments::new().with_named("scheme", "mysql"))
        .unwrap();

    assert_eq!(default.url, "postgres://localhost");
    assert_eq!(replica.url, "postgres://replica.internal");
    assert_eq!(mysql.url, "mysql://localhost");

    let error = container
        .resolve::<DatabaseConnection>("db", Arguments::new().with(5432u16))
        .unwrap_err();
    assert!(error.is_initialization());
}

#[test]
fn test_configured_container_from_yaml() {
    let config = ContainerConfig::from_yaml_str(
        "name: billing\ndefault_scope: transient\nduplicate_policy: reject\n",
    )
    .unwrap();

    let mut container = ContainerBuilder::new()
        .with_config(config)
        .register("db", Registration::factory(|_: &Arguments| Ok(database())))
        .build()
        .unwrap();

    assert_eq!(container.config().duplicate_policy, DuplicatePolicy::Reject);
    assert!(!Arc::ptr_eq(
        &container.resolve::<DatabaseConnection>("db", Arguments::new()).unwrap(),
        &container.resolve::<DatabaseConnection>("db", Arguments::new()).unwrap()
    ));
    assert!(container
        .register("db", Registration::instance(database()))
        .unwrap_err()
        .is_duplicate());
}
