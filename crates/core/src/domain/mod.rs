// Domain Layer - Queue names, payloads and wait policies

pub mod error;
pub mod queue;
pub mod wait;

// Re-exports
pub use error::DomainError;
pub use queue::{check_payload_size, Ack, Payload, QueueName, QueueSnapshot};
pub use wait::{cancel_pair, CancelSource, CancelToken, WaitPolicy};
