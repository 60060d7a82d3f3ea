// Central Error Type for the Application

use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Domain error: {0}")]
    Domain(#[from] crate::domain::DomainError),

    #[error("Queue not found: {0}")]
    QueueNotFound(String),

    #[error("Queue limit reached: {max} queues already exist")]
    QueueLimitReached { max: usize },

    #[error("Wait cancelled on queue {0}")]
    Cancelled(String),

    #[error("Deadline exceeded after {timeout_ms}ms on queue {queue}")]
    DeadlineExceeded { queue: String, timeout_ms: u64 },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;
