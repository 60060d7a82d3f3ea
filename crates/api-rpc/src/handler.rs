//! RPC Method Handlers
//!
//! Translates JSON-RPC parameters into registry calls.

use crate::error::to_rpc_error;
use crate::types::{
    DeclareRequest, DeclareResponse, PopRequest, PopResponse, PutRequest, PutResponse,
    QueueStats, StatsRequest, StatsResponse,
};
use jsonrpsee::types::ErrorObjectOwned;
use mqueue_core::domain::{CancelToken, WaitPolicy};
use mqueue_core::port::MessageBroker;
use std::sync::Arc;
use std::time::Duration;

/// RPC Handler with injected dependencies
pub struct RpcHandler {
    broker: Arc<dyn MessageBroker>,
    shutdown: CancelToken,
    start_time: std::time::Instant,
}

impl RpcHandler {
    /// `shutdown` is attached to every blocking call so pending puts and
    /// pops return `Cancelled` when the server stops.
    pub fn new(broker: Arc<dyn MessageBroker>, shutdown: CancelToken) -> Self {
        Self {
            broker,
            shutdown,
            start_time: std::time::Instant::now(),
        }
    }

    fn wait_policy(&self, timeout_ms: Option<u64>) -> WaitPolicy {
        let policy = WaitPolicy::forever().with_cancel(self.shutdown.clone());
        match timeout_ms {
            Some(ms) => policy.with_timeout(Duration::from_millis(ms)),
            None => policy,
        }
    }

    /// mq.put.v1
    pub async fn put(&self, params: PutRequest) -> Result<PutResponse, ErrorObjectOwned> {
        let wait = self.wait_policy(params.timeout_ms);
        let ack = self
            .broker
            .put(&params.queue, params.payload, wait)
            .await
            .map_err(to_rpc_error)?;

        Ok(PutResponse {
            queue: ack.queue.to_string(),
            status: "OK".to_string(),
        })
    }

    /// mq.pop.v1
    pub async fn pop(&self, params: PopRequest) -> Result<PopResponse, ErrorObjectOwned> {
        let wait = self.wait_policy(params.timeout_ms);
        let payload = self
            .broker
            .pop(&params.queue, wait)
            .await
            .map_err(to_rpc_error)?;

        Ok(PopResponse {
            queue: params.queue,
            payload,
        })
    }

    /// mq.declare.v1
    pub async fn declare(
        &self,
        params: DeclareRequest,
    ) -> Result<DeclareResponse, ErrorObjectOwned> {
        let created = self
            .broker
            .declare(&params.queue)
            .await
            .map_err(to_rpc_error)?;

        Ok(DeclareResponse {
            queue: params.queue,
            created,
        })
    }

    /// admin.stats.v1
    pub async fn stats(&self, _params: StatsRequest) -> Result<StatsResponse, ErrorObjectOwned> {
        let queues: Vec<QueueStats> = self
            .broker
            .snapshot()
            .await
            .into_iter()
            .map(QueueStats::from)
            .collect();

        Ok(StatsResponse {
            queue_count: queues.len(),
            queues,
            uptime_seconds: self.start_time.elapsed().as_secs() as i64,
        })
    }
}
