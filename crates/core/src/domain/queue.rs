// Queue Domain Model

use super::error::{DomainError, Result};
use serde::Serialize;
use std::borrow::Borrow;
use std::fmt;

/// Opaque message body. The registry never inspects it.
pub type Payload = Vec<u8>;

/// Validated queue name (non-empty, case-sensitive, bounded length)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct QueueName(String);

impl QueueName {
    /// Parse a raw name, rejecting empty names, names longer than
    /// `max_len` bytes and names containing control characters.
    pub fn parse(raw: &str, max_len: usize) -> Result<Self> {
        if raw.is_empty() {
            return Err(DomainError::InvalidQueueName(
                "queue name cannot be empty".to_string(),
            ));
        }
        if raw.len() > max_len {
            return Err(DomainError::InvalidQueueName(format!(
                "queue name too long: {} bytes (max {})",
                raw.len(),
                max_len
            )));
        }
        if raw.chars().any(char::is_control) {
            return Err(DomainError::InvalidQueueName(
                "queue name contains control characters".to_string(),
            ));
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QueueName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for QueueName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Reject payloads above the configured byte limit
pub fn check_payload_size(payload: &[u8], limit: usize) -> Result<()> {
    if payload.len() > limit {
        return Err(DomainError::PayloadTooLarge {
            size: payload.len(),
            limit,
        });
    }
    Ok(())
}

/// Acknowledgment returned once a payload is accepted into a queue
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ack {
    pub queue: QueueName,
}

/// Point-in-time view of one queue (for admin stats)
#[derive(Debug, Clone, Serialize)]
pub struct QueueSnapshot {
    pub name: QueueName,
    pub capacity: usize,
    pub depth: usize,
    pub enqueued_total: u64,
    pub dequeued_total: u64,
    pub producer_waits: u64,
    pub created_at: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rejects_empty() {
        let err = QueueName::parse("", 255).unwrap_err();
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn test_parse_rejects_too_long() {
        let err = QueueName::parse(&"q".repeat(9), 8).unwrap_err();
        assert!(err.to_string().contains("too long"));
        assert!(QueueName::parse(&"q".repeat(8), 8).is_ok());
    }

    #[test]
    fn test_parse_rejects_control_chars() {
        assert!(QueueName::parse("orders\n", 255).is_err());
    }

    #[test]
    fn test_names_are_case_sensitive() {
        let lower = QueueName::parse("orders", 255).unwrap();
        let upper = QueueName::parse("Orders", 255).unwrap();
        assert_ne!(lower, upper);
    }

    #[test]
    fn test_payload_size_limit() {
        assert!(check_payload_size(&[0u8; 16], 16).is_ok());
        assert_eq!(
            check_payload_size(&[0u8; 17], 16),
            Err(DomainError::PayloadTooLarge { size: 17, limit: 16 })
        );
    }
}
