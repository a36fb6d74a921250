// Gateway bus SDK - main library exports
pub mod message;
pub mod message_bus;
pub mod module;
pub mod module_registry;
pub mod config;
pub mod scenario;

// Flattened re-exports
pub use self::message::{Field, Message};
pub use self::message_bus::{BusEvent, Cascade, MessageBus, ModuleId, Publication, Receipt, Rejection, Subscriber};
pub use self::module::{Module, Reaction};
pub use self::module_registry::ModuleRegistry;
pub use self::scenario::Scenario;
