//! Lifeline server binary.
//!
//! Wires the configuration, the store backend, the facility directory and
//! the emergency resolver together behind the HTTP API.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `lifeline-config.yaml` (or `LIFELINE_CONFIG`)
//! 2. Initialize structured logging (tracing)
//! 3. Connect the store backend (in-memory or Dragonfly)
//! 4. Build the facility directory and the resolver
//! 5. Serve the API until `Ctrl-C`

mod error;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use lifeline_api::{AppState, ServerConfig};
use lifeline_core::config::LoggingConfig;
use lifeline_core::{EmergencyResolver, LifelineConfig, StoreBackend};
use lifeline_store::{AnyKv, DragonflyKv, EventLogStore, MemoryKv};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::ServerError;

/// Default configuration file, relative to the working directory.
const DEFAULT_CONFIG_PATH: &str = "lifeline-config.yaml";

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration, the store connection, or the HTTP
/// server fails.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Load configuration.
    let config_path = config_path();
    let config = LifelineConfig::load_or_default(&config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;

    // 2. Initialize structured logging.
    init_tracing(&config.logging);
    info!(
        service = config.service.name,
        config = %config_path.display(),
        position_timeout_ms = config.resolver.position_timeout_ms,
        retention = ?config.retention,
        facilities = config.facilities.len(),
        "lifeline-server starting"
    );

    // 3. Connect the store backend.
    let kv = connect_store(&config).await.context("connecting store backend")?;
    info!(backend = kv.backend_name(), "Store backend ready");

    // 4. Build the resolver.
    let directory = config.directory().map_err(ServerError::from)?;
    if directory.is_empty() {
        tracing::warn!("Facility directory is empty; every SOS will be rejected");
    }
    let store = EventLogStore::new(kv).with_retention(config.retention);
    let resolver = EmergencyResolver::new(directory, store)
        .with_position_timeout(config.resolver.position_timeout());

    // 5. Serve.
    let state = Arc::new(AppState::new(resolver).with_service_name(config.service.name.clone()));
    let server_config = ServerConfig {
        host: config.infrastructure.api_host.clone(),
        port: config.infrastructure.api_port,
    };
    lifeline_api::start_server(&server_config, state)
        .await
        .map_err(ServerError::from)
        .context("running HTTP server")?;

    info!("lifeline-server exited cleanly");
    Ok(())
}

fn config_path() -> PathBuf {
    std::env::var_os("LIFELINE_CONFIG")
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from)
}

/// `RUST_LOG` wins over the configured level.
fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);
    if logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn connect_store(config: &LifelineConfig) -> Result<AnyKv, ServerError> {
    match config.infrastructure.store_backend {
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; logs are lost on restart");
            Ok(AnyKv::from(MemoryKv::new()))
        }
        StoreBackend::Dragonfly => {
            let url = &config.infrastructure.dragonfly_url;
            info!(url = %url, "Connecting to Dragonfly");
            let kv = DragonflyKv::connect(url).await?;
            Ok(AnyKv::from(kv))
        }
    }
}
