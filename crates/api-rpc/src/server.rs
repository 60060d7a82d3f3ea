//! JSON-RPC Server
//!
//! Serves the queue methods over HTTP on a local TCP port.

use crate::handler::RpcHandler;
use crate::types::{DeclareRequest, PopRequest, PutRequest, StatsRequest};
use jsonrpsee::server::{Server, ServerHandle};
use jsonrpsee::RpcModule;
use mqueue_core::domain::CancelToken;
use mqueue_core::port::MessageBroker;
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

const DEFAULT_RPC_HOST: &str = "127.0.0.1";
const DEFAULT_RPC_PORT: u16 = 9637;

/// RPC Server Configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RpcServerConfig {
    pub host: String,
    /// 0 binds an ephemeral port
    pub port: u16,
}

impl Default for RpcServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_RPC_HOST.to_string(),
            port: DEFAULT_RPC_PORT,
        }
    }
}

/// RPC Server
pub struct RpcServer {
    config: RpcServerConfig,
    handler: Arc<RpcHandler>,
}

impl RpcServer {
    pub fn new(
        config: RpcServerConfig,
        broker: Arc<dyn MessageBroker>,
        shutdown: CancelToken,
    ) -> Self {
        Self {
            config,
            handler: Arc::new(RpcHandler::new(broker, shutdown)),
        }
    }

    /// Start the JSON-RPC server, returning its handle and bound address
    pub async fn start(self) -> Result<(ServerHandle, SocketAddr), String> {
        let addr = format!("{}:{}", self.config.host, self.config.port);

        let server = Server::builder()
            .build(&addr)
            .await
            .map_err(|e| format!("Failed to build server on {}: {}", addr, e))?;
        let local_addr = server
            .local_addr()
            .map_err(|e| format!("Failed to read bound address: {}", e))?;

        info!(addr = %local_addr, "Starting JSON-RPC server");

        let mut module = RpcModule::new(());

        let handler = self.handler.clone();
        module
            .register_async_method("mq.put.v1", move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: PutRequest = params.parse()?;
                    handler.put(req).await
                }
            })
            .map_err(|e| e.to_string())?;

        let handler = self.handler.clone();
        module
            .register_async_method("mq.pop.v1", move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: PopRequest = params.parse()?;
                    handler.pop(req).await
                }
            })
            .map_err(|e| e.to_string())?;

        let handler = self.handler.clone();
        module
            .register_async_method("mq.declare.v1", move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: DeclareRequest = params.parse()?;
                    handler.declare(req).await
                }
            })
            .map_err(|e| e.to_string())?;

        let handler = self.handler.clone();
        module
            .register_async_method("admin.stats.v1", move |params, _, _| {
                let handler = handler.clone();
                async move {
                    // Parameters are optional for stats
                    let req: Option<StatsRequest> = params.parse()?;
                    handler.stats(req.unwrap_or_default()).await
                }
            })
            .map_err(|e| e.to_string())?;

        let handle = server.start(module);
        info!("JSON-RPC server started successfully");
        Ok((handle, local_addr))
    }
}
