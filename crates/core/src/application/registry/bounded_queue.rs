// Bounded FIFO buffer behind one queue name

use crate::domain::{Payload, QueueName, QueueSnapshot};
use crate::error::{AppError, Result};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, Mutex};
use tracing::debug;

/// Counters for one queue
#[derive(Debug, Default)]
struct QueueStats {
    enqueued_total: AtomicU64,
    dequeued_total: AtomicU64,
    producer_waits: AtomicU64,
}

/// Bounded multi-producer, multi-consumer FIFO.
///
/// Producers share the channel's permit semaphore, so a full queue parks
/// them in arrival order. Consumers take turns on a fair mutex around the
/// single receiver: the first consumer to arrive holds the receiver and gets
/// the next message, the rest wait in line. Each message is therefore
/// handed to exactly one consumer.
#[derive(Debug)]
pub struct BoundedQueue {
    name: QueueName,
    capacity: usize,
    tx: mpsc::Sender<Payload>,
    rx: Mutex<mpsc::Receiver<Payload>>,
    stats: QueueStats,
    created_at: i64,
}

impl BoundedQueue {
    /// Create an empty queue. `capacity` must be non-zero.
    pub fn new(name: QueueName, capacity: usize, created_at: i64) -> Self {
        let (tx, rx) = mpsc::channel(capacity);
        Self {
            name,
            capacity,
            tx,
            rx: Mutex::new(rx),
            stats: QueueStats::default(),
            created_at,
        }
    }

    /// Append a payload, waiting for a free slot if the queue is full.
    ///
    /// Cancel-safe: if the future is dropped before completing, nothing
    /// was inserted.
    pub async fn push(&self, payload: Payload) -> Result<()> {
        let permit = match self.tx.try_reserve() {
            Ok(permit) => permit,
            Err(TrySendError::Full(())) => {
                self.stats.producer_waits.fetch_add(1, Ordering::Relaxed);
                debug!(queue = %self.name, capacity = self.capacity, "Queue full, producer waiting");
                self.tx.reserve().await.map_err(|_| self.closed())?
            }
            Err(TrySendError::Closed(())) => return Err(self.closed()),
        };

        self.stats.enqueued_total.fetch_add(1, Ordering::Relaxed);
        permit.send(payload);
        Ok(())
    }

    /// Remove the oldest payload, waiting for one if the queue is empty.
    ///
    /// Cancel-safe: if the future is dropped before completing, no message
    /// was consumed.
    pub async fn pop(&self) -> Result<Payload> {
        let mut rx = self.rx.lock().await;
        let payload = rx.recv().await.ok_or_else(|| self.closed())?;
        self.stats.dequeued_total.fetch_add(1, Ordering::Relaxed);
        Ok(payload)
    }

    pub fn name(&self) -> &QueueName {
        &self.name
    }

    /// Messages accepted but not yet delivered (slots held by producers
    /// mid-insert count as used)
    pub fn depth(&self) -> usize {
        self.capacity - self.tx.capacity()
    }

    pub fn snapshot(&self) -> QueueSnapshot {
        QueueSnapshot {
            name: self.name.clone(),
            capacity: self.capacity,
            depth: self.depth(),
            enqueued_total: self.stats.enqueued_total.load(Ordering::Relaxed),
            dequeued_total: self.stats.dequeued_total.load(Ordering::Relaxed),
            producer_waits: self.stats.producer_waits.load(Ordering::Relaxed),
            created_at: self.created_at,
        }
    }

    // The queue owns both channel ends, so this only fires on a broken invariant
    fn closed(&self) -> AppError {
        AppError::Internal(format!("queue {} channel closed", self.name))
    }
}
