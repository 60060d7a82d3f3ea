// Queue Registry - name -> bounded queue, created once per name

mod bounded_queue;
pub mod config;
pub mod constants;
mod wait;

pub use bounded_queue::BoundedQueue;
pub use config::RegistryConfig;

use crate::domain::{check_payload_size, Ack, Payload, QueueName, QueueSnapshot, WaitPolicy};
use crate::error::{AppError, Result};
use crate::port::{MessageBroker, TimeProvider};
use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};
use wait::wait_with;

/// Owns every named queue of the process.
///
/// Constructed once by the composition root and shared as
/// `Arc<QueueRegistry>` (or `Arc<dyn MessageBroker>`). Lookups and first-time
/// creation only take the map's per-shard lock for the check-and-insert;
/// all blocking happens inside the resolved `BoundedQueue`, so queues never
/// contend with each other.
pub struct QueueRegistry {
    queues: DashMap<QueueName, Arc<BoundedQueue>>,
    // Tracked separately: DashMap::len would lock every shard while we
    // hold one of them in `create`
    queue_count: AtomicUsize,
    config: RegistryConfig,
    time_provider: Arc<dyn TimeProvider>,
}

impl QueueRegistry {
    pub fn new(config: RegistryConfig, time_provider: Arc<dyn TimeProvider>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            queues: DashMap::new(),
            queue_count: AtomicUsize::new(0),
            config,
            time_provider,
        })
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    pub fn queue_count(&self) -> usize {
        self.queue_count.load(Ordering::SeqCst)
    }

    /// Look up an existing queue without creating it
    pub fn get(&self, name: &str) -> Option<Arc<BoundedQueue>> {
        self.queues.get(name).map(|q| Arc::clone(q.value()))
    }

    /// Resolve the queue for `name`, creating it on first reference when
    /// auto-creation is enabled.
    ///
    /// Concurrent first-time callers for one name all receive the same
    /// instance.
    pub fn ensure_queue(&self, name: &str) -> Result<Arc<BoundedQueue>> {
        let name = QueueName::parse(name, self.config.max_name_len)?;

        if let Some(queue) = self.queues.get(name.as_str()) {
            return Ok(Arc::clone(queue.value()));
        }
        if !self.config.auto_create {
            return Err(AppError::QueueNotFound(name.to_string()));
        }

        self.create(name).map(|(queue, _)| queue)
    }

    /// Create `name` if absent, regardless of `auto_create`.
    /// Returns true if this call created the queue.
    pub fn declare(&self, name: &str) -> Result<bool> {
        let name = QueueName::parse(name, self.config.max_name_len)?;
        self.create(name).map(|(_, created)| created)
    }

    /// Append `payload` to `name`, blocking while the queue is full
    pub async fn put(&self, name: &str, payload: Payload, wait: WaitPolicy) -> Result<Ack> {
        check_payload_size(&payload, self.config.max_payload_bytes).map_err(|e| {
            warn!(queue = %name, size = payload.len(), "Payload rejected");
            e
        })?;

        let queue = self.ensure_queue(name)?;
        wait_with(&wait, queue.name(), queue.push(payload)).await??;

        Ok(Ack {
            queue: queue.name().clone(),
        })
    }

    /// Remove the oldest payload of `name`, blocking while the queue is empty
    pub async fn pop(&self, name: &str, wait: WaitPolicy) -> Result<Payload> {
        let queue = self.ensure_queue(name)?;
        wait_with(&wait, queue.name(), queue.pop()).await?
    }

    /// Snapshot of every queue, sorted by name
    pub fn snapshot(&self) -> Vec<QueueSnapshot> {
        let mut queues: Vec<QueueSnapshot> =
            self.queues.iter().map(|q| q.value().snapshot()).collect();
        queues.sort_by(|a, b| a.name.cmp(&b.name));
        queues
    }

    fn create(&self, name: QueueName) -> Result<(Arc<BoundedQueue>, bool)> {
        match self.queues.entry(name) {
            Entry::Occupied(entry) => Ok((Arc::clone(entry.get()), false)),
            Entry::Vacant(entry) => {
                self.reserve_slot()?;
                let queue = Arc::new(BoundedQueue::new(
                    entry.key().clone(),
                    self.config.queue_capacity,
                    self.time_provider.now_millis(),
                ));
                debug!(
                    queue = %queue.name(),
                    capacity = self.config.queue_capacity,
                    "Queue created"
                );
                entry.insert(Arc::clone(&queue));
                Ok((queue, true))
            }
        }
    }

    fn reserve_slot(&self) -> Result<()> {
        let max = self.config.max_queues;
        self.queue_count
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |count| {
                (count < max).then_some(count + 1)
            })
            .map(|_| ())
            .map_err(|_| {
                warn!(max_queues = max, "Queue limit reached, rejecting new queue");
                AppError::QueueLimitReached { max }
            })
    }
}

#[async_trait]
impl MessageBroker for QueueRegistry {
    async fn put(&self, queue: &str, payload: Payload, wait: WaitPolicy) -> Result<Ack> {
        QueueRegistry::put(self, queue, payload, wait).await
    }

    async fn pop(&self, queue: &str, wait: WaitPolicy) -> Result<Payload> {
        QueueRegistry::pop(self, queue, wait).await
    }

    async fn declare(&self, queue: &str) -> Result<bool> {
        QueueRegistry::declare(self, queue)
    }

    async fn snapshot(&self) -> Vec<QueueSnapshot> {
        QueueRegistry::snapshot(self)
    }
}

#[cfg(test)]
mod registry_test;
