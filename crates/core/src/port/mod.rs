// Port Layer - Interfaces between the registry and its adapters

pub mod message_broker;
pub mod time_provider;

// Re-exports
pub use message_broker::MessageBroker;
pub use time_provider::TimeProvider;
