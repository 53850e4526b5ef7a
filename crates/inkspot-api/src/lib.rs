//! Inkspot API crate - mock notary backend and its axum HTTP surface.
//!
//! Provides an in-memory stand-in for the site's backend (accounts,
//! appointment scheduling, contact leads, pricing) with simulated network
//! latency, plus the router that exposes it over JSON.

pub mod backend;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;
pub mod types;

pub use backend::MockBackend;
pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;
