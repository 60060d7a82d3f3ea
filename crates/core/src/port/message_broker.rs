// Message Broker Port (Interface)

use crate::domain::{Ack, Payload, QueueSnapshot, WaitPolicy};
use crate::error::Result;
use async_trait::async_trait;

/// Named-queue operations exposed to request handlers.
///
/// Implemented by `QueueRegistry`; adapters hold it as `Arc<dyn MessageBroker>`
/// so they never touch process-wide state directly.
#[async_trait]
pub trait MessageBroker: Send + Sync {
    /// Append a payload to the tail of `queue`, waiting for a free slot
    /// when the queue is full
    async fn put(&self, queue: &str, payload: Payload, wait: WaitPolicy) -> Result<Ack>;

    /// Remove the oldest payload of `queue`, waiting for one when empty
    async fn pop(&self, queue: &str, wait: WaitPolicy) -> Result<Payload>;

    /// Create `queue` if absent. Returns true if this call created it
    async fn declare(&self, queue: &str) -> Result<bool>;

    /// Snapshot of every queue, sorted by name
    async fn snapshot(&self) -> Vec<QueueSnapshot>;
}
