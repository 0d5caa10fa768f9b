//! Shared application state for the request API.
//!
//! [`AppState`] holds the resolver (which owns the facility directory and
//! the event log store) and the dialer used to confirm dispatches.

use std::sync::Arc;

use lifeline_core::{Dialer, EmergencyResolver, TracingDialer};
use lifeline_store::{AnyKv, ProfileStore};

/// Shared state for the Axum application.
///
/// Wrapped in [`Arc`] and injected via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// The SOS and fall resolver.
    pub resolver: Arc<EmergencyResolver<AnyKv>>,
    /// Receives the facility number once a dispatch is persisted.
    pub dialer: Arc<dyn Dialer>,
    /// Name reported by `GET /health`.
    pub service_name: String,
}

impl AppState {
    /// Create state around a resolver, dialing through the log.
    pub fn new(resolver: EmergencyResolver<AnyKv>) -> Self {
        Self {
            resolver: Arc::new(resolver),
            dialer: Arc::new(TracingDialer),
            service_name: String::from("lifeline"),
        }
    }

    /// Replace the dialer.
    #[must_use]
    pub fn with_dialer(mut self, dialer: Arc<dyn Dialer>) -> Self {
        self.dialer = dialer;
        self
    }

    /// Set the service name.
    #[must_use]
    pub fn with_service_name(mut self, name: impl Into<String>) -> Self {
        self.service_name = name.into();
        self
    }

    /// Profile access over the resolver's backend.
    pub fn profiles(&self) -> ProfileStore<'_, AnyKv> {
        ProfileStore::new(self.resolver.store().kv())
    }
}
