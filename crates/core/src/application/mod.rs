// Application Layer - Queue registry use cases

pub mod registry;

// Re-exports
pub use registry::{BoundedQueue, QueueRegistry, RegistryConfig};
