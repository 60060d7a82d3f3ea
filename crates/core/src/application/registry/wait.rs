// Bounded waiting for queue operations

use crate::domain::{QueueName, WaitPolicy};
use crate::error::{AppError, Result};
use std::future::{pending, Future};
use tokio::time::sleep;
use tracing::debug;

/// Drive `op` until it completes, the policy's token fires or its timeout
/// elapses, whichever comes first.
///
/// `op` is polled before the interrupts, so a zero timeout behaves as a
/// non-blocking attempt. Dropping `op` must leave the queue untouched; both
/// `BoundedQueue::push` and `BoundedQueue::pop` guarantee that.
pub(crate) async fn wait_with<F>(policy: &WaitPolicy, queue: &QueueName, op: F) -> Result<F::Output>
where
    F: Future,
{
    if policy.cancel_token().is_some_and(|t| t.is_cancelled()) {
        return Err(AppError::Cancelled(queue.to_string()));
    }

    let cancelled = async {
        match policy.cancel_token() {
            Some(token) => token.cancelled().await,
            None => pending().await,
        }
    };
    let deadline = async {
        match policy.timeout_duration() {
            Some(timeout) => sleep(timeout).await,
            None => pending().await,
        }
    };

    tokio::select! {
        biased;
        out = op => Ok(out),
        _ = cancelled => {
            debug!(queue = %queue, "Wait cancelled");
            Err(AppError::Cancelled(queue.to_string()))
        }
        _ = deadline => {
            let timeout_ms = policy
                .timeout_duration()
                .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
                .unwrap_or_default();
            debug!(queue = %queue, timeout_ms, "Wait deadline exceeded");
            Err(AppError::DeadlineExceeded {
                queue: queue.to_string(),
                timeout_ms,
            })
        }
    }
}
