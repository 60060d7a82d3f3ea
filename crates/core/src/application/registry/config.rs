// Registry Configuration

use super::constants::*;
use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};

/// Limits and creation policy for a `QueueRegistry`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Slots per queue, fixed at creation
    pub queue_capacity: usize,
    pub max_queues: usize,
    pub max_payload_bytes: usize,
    pub max_name_len: usize,
    /// Create unknown queues on first reference. When false, only
    /// declared queues can be used and unknown names fail with
    /// `QueueNotFound`.
    pub auto_create: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            max_queues: DEFAULT_MAX_QUEUES,
            max_payload_bytes: DEFAULT_MAX_PAYLOAD_BYTES,
            max_name_len: DEFAULT_MAX_NAME_LEN,
            auto_create: true,
        }
    }
}

impl RegistryConfig {
    pub fn validate(&self) -> Result<()> {
        let zero = [
            ("queue_capacity", self.queue_capacity),
            ("max_queues", self.max_queues),
            ("max_payload_bytes", self.max_payload_bytes),
            ("max_name_len", self.max_name_len),
        ]
        .into_iter()
        .find(|(_, value)| *value == 0);

        if let Some((field, _)) = zero {
            return Err(AppError::Config(format!("{} must be at least 1", field)));
        }
        if self.queue_capacity > MAX_QUEUE_CAPACITY {
            return Err(AppError::Config(format!(
                "queue_capacity must be at most {} (got {})",
                MAX_QUEUE_CAPACITY, self.queue_capacity
            )));
        }
        Ok(())
    }
}
