//! Daemon configuration
//!
//! Layers an optional TOML file under `MQUEUE_*` environment variables.
//! Nested keys use `__`, e.g. `MQUEUE_REGISTRY__QUEUE_CAPACITY=128`.

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use mqueue_api_rpc::RpcServerConfig;
use mqueue_core::application::RegistryConfig;
use serde::Deserialize;

const DEFAULT_CONFIG_PATH: &str = "~/.mqueue/mqueue.toml";
const CONFIG_PATH_ENV: &str = "MQUEUE_CONFIG";
const ENV_PREFIX: &str = "MQUEUE";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DaemonConfig {
    pub log_format: LogFormat,
    pub rpc: RpcServerConfig,
    pub registry: RegistryConfig,
}

/// Load configuration from `$MQUEUE_CONFIG` (or the default path) and the
/// process environment
pub fn load() -> Result<DaemonConfig> {
    let path = std::env::var(CONFIG_PATH_ENV)
        .unwrap_or_else(|_| shellexpand::tilde(DEFAULT_CONFIG_PATH).into_owned());
    load_from(&path, Environment::with_prefix(ENV_PREFIX))
}

fn load_from(path: &str, env: Environment) -> Result<DaemonConfig> {
    let settings = Config::builder()
        .add_source(File::with_name(path).required(false))
        .add_source(env.prefix_separator("_").separator("__").try_parsing(true))
        .build()
        .with_context(|| format!("Failed to read configuration from {}", path))?;

    let config: DaemonConfig = settings
        .try_deserialize()
        .context("Invalid configuration")?;
    config.registry.validate()?;

    Ok(config)
}
