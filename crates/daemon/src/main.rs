//! mqueue - Main Entry Point
//! Named in-memory queues served over JSON-RPC

mod logging;
mod settings;

use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use mqueue_api_rpc::RpcServer;
use mqueue_core::application::QueueRegistry;
use mqueue_core::domain::cancel_pair;
use mqueue_core::port::time_provider::SystemTimeProvider;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Load configuration (file + environment)
    let config = settings::load()?;

    // 2. Initialize logging
    logging::init(config.log_format)?;
    info!("mqueue v{} starting...", VERSION);

    // 3. Build the registry (the only owner of queue state)
    let registry = Arc::new(QueueRegistry::new(
        config.registry,
        Arc::new(SystemTimeProvider),
    )?);
    let limits = registry.config();
    info!(
        queue_capacity = limits.queue_capacity,
        max_queues = limits.max_queues,
        max_payload_bytes = limits.max_payload_bytes,
        auto_create = limits.auto_create,
        "Queue registry ready"
    );

    // 4. Start JSON-RPC server (blocking calls observe the shutdown token)
    let (shutdown_tx, shutdown_token) = cancel_pair();
    let rpc_server = RpcServer::new(config.rpc, registry, shutdown_token);
    let (rpc_handle, addr) = rpc_server
        .start()
        .await
        .map_err(|e| anyhow::anyhow!("RPC server start failed: {}", e))?;

    info!(addr = %addr, "System ready. Waiting for requests...");
    info!("Press Ctrl+C to shutdown");

    // 5. Wait for shutdown signal
    tokio::signal::ctrl_c().await?;

    info!("Shutdown signal received. Exiting gracefully...");

    // 6. Release blocked callers, then stop the server
    shutdown_tx.cancel();
    rpc_handle
        .stop()
        .map_err(|e| anyhow::anyhow!("RPC server stop failed: {}", e))?;
    if tokio::time::timeout(SHUTDOWN_GRACE, rpc_handle.stopped())
        .await
        .is_err()
    {
        warn!(
            grace_secs = SHUTDOWN_GRACE.as_secs(),
            "RPC server did not stop within grace period"
        );
    }

    info!("Shutdown complete.");

    Ok(())
}
