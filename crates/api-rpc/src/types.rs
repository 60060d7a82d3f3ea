//! RPC Request/Response Types
//!
//! Defines the JSON-RPC method parameters and results.

use mqueue_core::domain::QueueSnapshot;
use serde::{Deserialize, Serialize};

/// mq.put.v1 - Append a payload to a queue
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PutRequest {
    pub queue: String,
    pub payload: Vec<u8>,
    /// Give up after this many milliseconds while the queue is full
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PutResponse {
    pub queue: String,
    pub status: String,
}

/// mq.pop.v1 - Remove the oldest payload of a queue
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PopRequest {
    pub queue: String,
    /// Give up after this many milliseconds while the queue is empty
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PopResponse {
    pub queue: String,
    pub payload: Vec<u8>,
}

/// mq.declare.v1 - Create a queue ahead of use
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeclareRequest {
    pub queue: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeclareResponse {
    pub queue: String,
    pub created: bool,
}

/// admin.stats.v1 - Per-queue counters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatsRequest {
    // No parameters needed
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueStats {
    pub name: String,
    pub capacity: usize,
    pub depth: usize,
    pub enqueued_total: u64,
    pub dequeued_total: u64,
    pub producer_waits: u64,
    pub created_at: i64,
}

impl From<QueueSnapshot> for QueueStats {
    fn from(s: QueueSnapshot) -> Self {
        Self {
            name: s.name.to_string(),
            capacity: s.capacity,
            depth: s.depth,
            enqueued_total: s.enqueued_total,
            dequeued_total: s.dequeued_total,
            producer_waits: s.producer_waits,
            created_at: s.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsResponse {
    pub queue_count: usize,
    pub queues: Vec<QueueStats>,
    pub uptime_seconds: i64,
}
