//! Binding and serving the API.
//!
//! [`start_server`] stops on `Ctrl-C`. [`serve_until`] takes any shutdown
//! future, which the tests use to stop a server bound to an ephemeral port.
//! Either way the listener drains in-flight requests before returning, so a
//! response is never dropped after its append was acknowledged.

use std::future::Future;
use std::net::{AddrParseError, SocketAddr};
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use crate::router::build_router;
use crate::state::AppState;

/// Listen address of the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Interface to bind, as an IP literal.
    pub host: String,
    /// TCP port; `0` picks a free one.
    pub port: u16,
}

impl ServerConfig {
    /// The parsed `host:port` pair.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Address`] if `host` is not an IP literal.
    pub fn socket_addr(&self) -> Result<SocketAddr, ServerError> {
        let ip = self.host.parse().map_err(|source| ServerError::Address {
            host: self.host.clone(),
            source,
        })?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: String::from("0.0.0.0"),
            port: 8080,
        }
    }
}

/// Serve the API until `Ctrl-C`.
///
/// # Errors
///
/// See [`serve_until`].
pub async fn start_server(config: &ServerConfig, state: Arc<AppState>) -> Result<(), ServerError> {
    serve_until(config, state, ctrl_c()).await
}

/// Serve the API until `shutdown` resolves.
///
/// # Errors
///
/// Returns [`ServerError::Address`] for an unparsable host,
/// [`ServerError::Bind`] if the port is taken, or [`ServerError::Serve`]
/// if accepting connections fails.
pub async fn serve_until<F>(
    config: &ServerConfig,
    state: Arc<AppState>,
    shutdown: F,
) -> Result<(), ServerError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = config.socket_addr()?;
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;
    let local = listener.local_addr().unwrap_or(addr);
    info!(
        addr = %local,
        backend = state.resolver.store().kv().backend_name(),
        "Lifeline API listening"
    );

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(ServerError::Serve)?;

    info!(addr = %local, "Lifeline API stopped");
    Ok(())
}

async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Ctrl-C handler unavailable; stopping now");
    }
}

/// Failures while starting or running the API listener.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// `host` is not an IP address.
    #[error("invalid listen host {host:?}: {source}")]
    Address {
        /// The configured host.
        host: String,
        /// Parse failure.
        source: AddrParseError,
    },

    /// The listener could not bind.
    #[error("cannot bind {addr}: {source}")]
    Bind {
        /// Address that was requested.
        addr: SocketAddr,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Accepting or serving connections failed.
    #[error("serving failed: {0}")]
    Serve(std::io::Error),
}

#[cfg(test)]
mod tests {
    use lifeline_core::EmergencyResolver;
    use lifeline_geo::FacilityDirectory;
    use lifeline_store::{AnyKv, EventLogStore, MemoryKv};

    use super::*;

    #[test]
    fn hostname_is_rejected() {
        let config = ServerConfig {
            host: String::from("localhost"),
            port: 8080,
        };
        assert!(matches!(config.socket_addr(), Err(ServerError::Address { .. })));
    }

    #[test]
    fn default_listens_on_all_interfaces() {
        let addr = ServerConfig::default().socket_addr().ok();
        assert_eq!(addr.map(|a| a.port()), Some(8080));
        assert!(addr.is_some_and(|a| a.ip().is_unspecified()));
    }

    #[tokio::test]
    async fn stops_when_shutdown_resolves() {
        let resolver = EmergencyResolver::new(
            FacilityDirectory::default_clinics(),
            EventLogStore::new(AnyKv::from(MemoryKv::new())),
        );
        let config = ServerConfig {
            host: String::from("127.0.0.1"),
            port: 0,
        };
        let served = serve_until(&config, Arc::new(AppState::new(resolver)), async {}).await;
        assert!(served.is_ok());
    }
}
