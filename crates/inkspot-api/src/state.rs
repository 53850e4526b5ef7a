//! Application state shared across all route handlers.

use std::time::Instant;

use inkspot_core::config::ApiConfig;

use crate::backend::MockBackend;

/// Shared application state, passed to handlers via axum's State extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The mock backend. Cloning shares its data.
    pub backend: MockBackend,
    /// Port the server is reachable on, used for CORS origins.
    pub port: u16,
    /// Server start time for uptime calculation.
    pub start_time: Instant,
}

impl AppState {
    pub fn new(backend: MockBackend, port: u16) -> Self {
        Self {
            backend,
            port,
            start_time: Instant::now(),
        }
    }

    /// A freshly seeded backend configured from `[api]`.
    pub fn from_config(config: &ApiConfig) -> Self {
        Self::new(MockBackend::from_config(config), config.port)
    }
}
