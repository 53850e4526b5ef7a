//! Router setup with all API routes and middleware.

use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use inkspot_core::config::ApiConfig;
use inkspot_core::InkspotError;

use crate::handlers;
use crate::state::AppState;

/// Request bodies are small form submissions.
const BODY_LIMIT: usize = 64 * 1024;

/// Create the axum Router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // Allow the site itself, served from the same port, on either loopback name.
    let origins: Vec<HeaderValue> = [
        format!("http://127.0.0.1:{}", state.port),
        format!("http://localhost:{}", state.port),
    ]
    .iter()
    .filter_map(|origin| origin.parse::<HeaderValue>().ok())
    .collect();

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    let api_routes = Router::new()
        .route("/auth/login", post(handlers::login))
        .route("/auth/signup", post(handlers::signup))
        .route("/auth/logout", post(handlers::logout))
        .route("/slots", get(handlers::slots))
        .route(
            "/appointments",
            get(handlers::list_appointments).post(handlers::book_appointment),
        )
        .route("/contact", post(handlers::contact))
        .route("/pricing", get(handlers::pricing));

    Router::new()
        .route("/health", get(handlers::health))
        .nest("/api", api_routes)
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Start the HTTP server on the configured address and serve until it fails.
pub async fn start_server(config: &ApiConfig, state: AppState) -> Result<(), InkspotError> {
    let addr = format!("{}:{}", config.bind_address, config.port);
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| InkspotError::Api(format!("Failed to bind {}: {}", addr, e)))?;

    tracing::info!(
        addr = %addr,
        simulate_latency = config.simulate_latency,
        "Mock API server listening"
    );

    axum::serve(listener, router)
        .await
        .map_err(|e| InkspotError::Api(format!("Server error: {}", e)))?;

    Ok(())
}
