//! Example: wiring services through the container contract
//!
//! Run with `RUST_LOG=debug` to see registration and resolution events.

use servicekit_core::{
    Arguments, ContainerBuilder, ContainerError, ContainerProtocol, Registration, ServiceScope,
};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

trait Greeter: Send + Sync {
    fn greet(&self, name: &str) -> String;
}

struct FormalGreeter {
    salutation: String,
}

impl Greeter for FormalGreeter {
    fn greet(&self, name: &str) -> String {
        format!("{}, {}.", self.salutation, name)
    }
}

#[derive(Debug)]
struct RequestId(u64);

/// Works with any container implementation
fn greet_with<C>(container: &C, name: &str) -> Result<String, C::Error>
where
    C: ContainerProtocol,
{
    let greeter = container.resolve::<Arc<dyn Greeter>>("greeter", C::Arguments::default())?;
    Ok(greeter.greet(name))
}

fn main() -> Result<(), ContainerError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let container = ContainerBuilder::new()
        .with_name("tour")
        .with_scope(ServiceScope::Transient)
        .register(
            "greeter",
            Registration::factory(|args: &Arguments| {
                let greeter: Arc<dyn Greeter> = Arc::new(FormalGreeter {
                    salutation: args.require::<String>(0)?.clone(),
                });
                Ok(greeter)
            })
            .singleton()
            .with_arg("Good evening".to_string()),
        )
        .add_transient(|args: &Arguments| Ok(RequestId(*args.named::<u64>("id").unwrap_or(&0))))
        .build()?;

    println!("{}", greet_with(&container, "Ada")?);

    let request = container.resolve::<RequestId>(
        servicekit_core::ServiceKey::of::<RequestId>(),
        Arguments::new().with_named("id", 7u64),
    )?;
    println!("handling {:?}", request);

    match container.resolve::<RequestId>("request", Arguments::new()) {
        Ok(_) => println!("unexpected"),
        Err(error) => println!("as expected: {}", error),
    }

    Ok(())
}
