//! Route handler functions for all API endpoints.
//!
//! Handlers unwrap their extractors themselves so that malformed bodies and
//! queries are reported in the same `{"success": false, ...}` shape as every
//! other failure.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::state::AppState;
use crate::types::{
    Appointment, BookingRequest, ContactRequest, LoginRequest, PricingPlan, SignupRequest,
    UserProfile,
};

// =============================================================================
// Query parameter types
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct SlotsParams {
    pub date: Option<String>,
}

// =============================================================================
// Response types
// =============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
    pub appointments: usize,
    pub simulate_latency: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub success: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub success: bool,
    pub token: String,
    pub user: UserProfile,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SlotsResponse {
    pub success: bool,
    pub date: String,
    pub slots: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BookingResponse {
    pub success: bool,
    pub appointment: Appointment,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AppointmentsResponse {
    pub success: bool,
    pub appointments: Vec<Appointment>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ContactResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PricingResponse {
    pub success: bool,
    pub plans: Vec<PricingPlan>,
}

fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))
}

// =============================================================================
// Health
// =============================================================================

/// GET /health - health check.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        appointments: state.backend.appointment_count(),
        simulate_latency: state.backend.simulates_latency(),
    })
}

// =============================================================================
// Auth
// =============================================================================

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, ApiError> {
    let req = json_body(payload)?;
    let session = state.backend.login(&req.email, &req.password).await?;
    Ok(Json(AuthResponse {
        success: true,
        token: session.token,
        user: session.user,
    }))
}

/// POST /api/auth/signup
pub async fn signup(
    State(state): State<AppState>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, ApiError> {
    let req = json_body(payload)?;
    let session = state
        .backend
        .signup(&req.name, &req.email, &req.password)
        .await?;
    Ok(Json(AuthResponse {
        success: true,
        token: session.token,
        user: session.user,
    }))
}

/// POST /api/auth/logout
pub async fn logout(State(state): State<AppState>) -> Json<StatusResponse> {
    state.backend.logout().await;
    Json(StatusResponse { success: true })
}

// =============================================================================
// Scheduling
// =============================================================================

/// GET /api/slots?date=YYYY-MM-DD
pub async fn slots(
    State(state): State<AppState>,
    params: Result<Query<SlotsParams>, QueryRejection>,
) -> Result<Json<SlotsResponse>, ApiError> {
    let Query(params) = params.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let date = params
        .date
        .filter(|d| !d.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("date is required".to_string()))?;

    let slots = state.backend.get_available_slots(&date).await?;
    Ok(Json(SlotsResponse {
        success: true,
        date,
        slots,
    }))
}

/// GET /api/appointments
pub async fn list_appointments(State(state): State<AppState>) -> Json<AppointmentsResponse> {
    Json(AppointmentsResponse {
        success: true,
        appointments: state.backend.get_appointments().await,
    })
}

/// POST /api/appointments
pub async fn book_appointment(
    State(state): State<AppState>,
    payload: Result<Json<BookingRequest>, JsonRejection>,
) -> Result<Json<BookingResponse>, ApiError> {
    let req = json_body(payload)?;
    let appointment = state.backend.book_appointment(req).await?;
    Ok(Json(BookingResponse {
        success: true,
        appointment,
    }))
}

// =============================================================================
// Leads and pricing
// =============================================================================

/// POST /api/contact
pub async fn contact(
    State(state): State<AppState>,
    payload: Result<Json<ContactRequest>, JsonRejection>,
) -> Result<Json<ContactResponse>, ApiError> {
    let req = json_body(payload)?;
    let message = state.backend.submit_contact(req).await?;
    Ok(Json(ContactResponse {
        success: true,
        message,
    }))
}

/// GET /api/pricing
pub async fn pricing(State(state): State<AppState>) -> Json<PricingResponse> {
    Json(PricingResponse {
        success: true,
        plans: state.backend.get_pricing().await,
    })
}
