pub mod arguments;
pub mod builder;
#[allow(clippy::module_inception)]
pub mod container;
pub mod descriptor;
pub mod protocol;
pub mod registration;
pub mod registry;
pub mod scope;

pub use arguments::Arguments;
pub use builder::ContainerBuilder;
pub use container::Container;
pub use descriptor::ServiceKey;
pub use protocol::ContainerProtocol;
pub use registration::Registration;
pub use registry::{ServiceEntry, ServiceRegistry};
pub use scope::ServiceScope;
