// Wait Policy & Cancellation Token

use std::time::Duration;
use tokio::sync::watch;

/// Cancellation signal observed by blocking queue operations
#[derive(Debug, Clone)]
pub struct CancelToken {
    rx: watch::Receiver<bool>,
}

impl CancelToken {
    /// Check if cancellation was requested
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Wait for the cancellation signal.
    ///
    /// Never completes if the source is dropped without cancelling.
    pub async fn cancelled(&self) {
        let mut rx = self.rx.clone();
        if rx.wait_for(|cancelled| *cancelled).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

/// Cancellation sender
#[derive(Debug)]
pub struct CancelSource {
    tx: watch::Sender<bool>,
}

impl CancelSource {
    /// Fire the signal for every token derived from this source
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    /// Derive another token bound to this source
    pub fn token(&self) -> CancelToken {
        CancelToken {
            rx: self.tx.subscribe(),
        }
    }
}

/// Create a cancellation pair
pub fn cancel_pair() -> (CancelSource, CancelToken) {
    let (tx, rx) = watch::channel(false);
    (CancelSource { tx }, CancelToken { rx })
}

/// How long a put or pop may stay suspended.
///
/// The default waits forever, which matches the plain blocking behaviour.
#[derive(Debug, Clone, Default)]
pub struct WaitPolicy {
    timeout: Option<Duration>,
    cancel: Option<CancelToken>,
}

impl WaitPolicy {
    /// Block until space or data is available, however long it takes
    pub fn forever() -> Self {
        Self::default()
    }

    /// Give up with a deadline error after `timeout`
    pub fn timeout(timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
            cancel: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn timeout_duration(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn cancel_token(&self) -> Option<&CancelToken> {
        self.cancel.as_ref()
    }
}
