//! In-memory mock of the notary backend.
//!
//! Every operation waits out a fixed simulated round-trip before touching
//! state, so front ends see realistic loading states. Turning latency off
//! makes every call resolve immediately.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{Datelike, NaiveDate};
use rand::Rng;

use inkspot_core::config::ApiConfig;
use inkspot_core::safety::{
    require, sanitize_input, sanitize_optional, validate_email, validate_phone,
};

use crate::error::ApiError;
use crate::types::{
    Appointment, AppointmentStatus, AuthSession, BookingRequest, ContactRequest, PricingPlan,
    TokenClaims, User, UserProfile,
};

/// Bookable times offered every day, before filtering.
const DAILY_SLOTS: [&str; 7] = [
    "9:00 AM", "10:00 AM", "11:00 AM", "1:00 PM", "2:00 PM", "3:00 PM", "4:00 PM",
];

const CODE_ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const CODE_PREFIX: &str = "NTR-";
const CODE_LEN: usize = 6;

pub const INVALID_CREDENTIALS: &str = "Invalid email or password";
pub const EMAIL_TAKEN: &str = "Email already registered";
pub const CONTACT_THANKS: &str = "Thank you! We'll be in touch within 24 hours.";

// =============================================================================
// Latency
// =============================================================================

/// Backend calls with a simulated round-trip time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Login,
    Signup,
    Logout,
    Slots,
    Book,
    Appointments,
    Contact,
    Pricing,
}

impl Operation {
    pub fn latency(self) -> Duration {
        let ms = match self {
            Operation::Login => 600,
            Operation::Signup => 800,
            Operation::Logout => 200,
            Operation::Slots => 400,
            Operation::Book => 1000,
            Operation::Appointments => 500,
            Operation::Contact => 700,
            Operation::Pricing => 300,
        };
        Duration::from_millis(ms)
    }
}

// =============================================================================
// State
// =============================================================================

#[derive(Debug)]
struct BackendState {
    users: Vec<User>,
    appointments: Vec<Appointment>,
    auth: Option<AuthSession>,
    next_appointment_id: u64,
}

impl BackendState {
    fn seeded() -> Self {
        let seed_appointment = |id, date: &str, time: &str, service: &str, status| Appointment {
            id,
            date: date.to_string(),
            time: time.to_string(),
            service: service.to_string(),
            name: None,
            email: None,
            phone: None,
            notes: None,
            status,
            confirmation_code: None,
        };

        Self {
            users: vec![User {
                id: 1,
                email: "demo@notary.com".to_string(),
                password: "demo123".to_string(),
                name: "Jane Smith".to_string(),
            }],
            appointments: vec![
                seed_appointment(
                    1,
                    "2026-02-03",
                    "10:00 AM",
                    "Real Estate Closing",
                    AppointmentStatus::Confirmed,
                ),
                seed_appointment(
                    2,
                    "2026-02-05",
                    "2:00 PM",
                    "Power of Attorney",
                    AppointmentStatus::Pending,
                ),
            ],
            auth: None,
            next_appointment_id: 3,
        }
    }
}

/// Shared handle to the mock backend. Clones see the same data.
#[derive(Debug, Clone)]
pub struct MockBackend {
    state: Arc<Mutex<BackendState>>,
    simulate_latency: bool,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new(true)
    }
}

impl MockBackend {
    /// A freshly seeded backend.
    pub fn new(simulate_latency: bool) -> Self {
        Self {
            state: Arc::new(Mutex::new(BackendState::seeded())),
            simulate_latency,
        }
    }

    pub fn from_config(config: &ApiConfig) -> Self {
        Self::new(config.simulate_latency)
    }

    pub fn simulates_latency(&self) -> bool {
        self.simulate_latency
    }

    // =========================================================================
    // Auth
    // =========================================================================

    /// Sign in with an exact email/password match and remember the session.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthSession, ApiError> {
        self.pause(Operation::Login).await;

        let mut state = self.lock_state();
        let Some(user) = state
            .users
            .iter()
            .find(|u| u.email == email && u.password == password)
            .cloned()
        else {
            tracing::warn!(email = %email, "Login rejected");
            return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        };

        let session = issue_session(&user)?;
        state.auth = Some(session.clone());
        tracing::info!(user_id = user.id, "User logged in");
        Ok(session)
    }

    /// Register a new account and sign it in.
    pub async fn signup(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, ApiError> {
        self.pause(Operation::Signup).await;

        require("name", name)?;
        require("email", email)?;
        require("password", password)?;
        validate_email("email", email)?;

        let name = name.trim();
        let email = email.trim();

        let mut state = self.lock_state();
        if state.users.iter().any(|u| u.email == email) {
            tracing::warn!(email = %email, "Signup rejected: email taken");
            return Err(ApiError::Conflict(EMAIL_TAKEN.to_string()));
        }

        let user = User {
            id: state.users.len() as u64 + 1,
            email: email.to_string(),
            password: password.to_string(),
            name: name.to_string(),
        };
        let session = issue_session(&user)?;
        tracing::info!(user_id = user.id, "User registered");
        state.users.push(user);
        state.auth = Some(session.clone());
        Ok(session)
    }

    /// Forget the current session. Succeeds even when nobody is signed in.
    pub async fn logout(&self) {
        self.pause(Operation::Logout).await;
        if self.lock_state().auth.take().is_some() {
            tracing::info!("User logged out");
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.lock_state().auth.is_some()
    }

    pub fn current_user(&self) -> Option<UserProfile> {
        self.lock_state().auth.as_ref().map(|a| a.user.clone())
    }

    // =========================================================================
    // Scheduling
    // =========================================================================

    /// Open slots for a `YYYY-MM-DD` date.
    ///
    /// Slot `i` is taken when `(i + day_of_month) % 3 == 0`, so the same date
    /// always yields the same slots.
    pub async fn get_available_slots(&self, date: &str) -> Result<Vec<String>, ApiError> {
        self.pause(Operation::Slots).await;

        let parsed = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
            .map_err(|_| ApiError::BadRequest(format!("Invalid date: {}", date)))?;
        let day = parsed.day() as usize;

        Ok(DAILY_SLOTS
            .iter()
            .enumerate()
            .filter(|(i, _)| (i + day) % 3 != 0)
            .map(|(_, slot)| slot.to_string())
            .collect())
    }

    /// Book an appointment. Every text field is stored sanitized.
    pub async fn book_appointment(&self, request: BookingRequest) -> Result<Appointment, ApiError> {
        self.pause(Operation::Book).await;

        require("date", &request.date)?;
        require("time", &request.time)?;
        require("service", &request.service)?;
        require("name", &request.name)?;
        validate_email("email", &request.email)?;
        validate_phone("phone", request.phone.as_deref().unwrap_or(""))?;

        let mut state = self.lock_state();
        let appointment = Appointment {
            id: state.next_appointment_id,
            date: sanitize_input(&request.date),
            time: sanitize_input(&request.time),
            service: sanitize_input(&request.service),
            name: Some(sanitize_input(&request.name)),
            email: Some(sanitize_input(&request.email)),
            phone: sanitize_optional(request.phone.as_deref()),
            notes: sanitize_optional(request.notes.as_deref()),
            status: AppointmentStatus::Confirmed,
            confirmation_code: Some(confirmation_code()),
        };
        state.next_appointment_id += 1;
        state.appointments.push(appointment.clone());

        tracing::info!(
            appointment_id = appointment.id,
            date = %appointment.date,
            time = %appointment.time,
            "Appointment booked"
        );
        Ok(appointment)
    }

    /// Every appointment, seeded ones first.
    pub async fn get_appointments(&self) -> Vec<Appointment> {
        self.pause(Operation::Appointments).await;
        self.lock_state().appointments.clone()
    }

    pub fn appointment_count(&self) -> usize {
        self.lock_state().appointments.len()
    }

    // =========================================================================
    // Leads and pricing
    // =========================================================================

    /// Accept a contact-form lead and return the acknowledgement shown to the visitor.
    pub async fn submit_contact(&self, request: ContactRequest) -> Result<String, ApiError> {
        self.pause(Operation::Contact).await;

        validate_email("email", &request.email)?;
        validate_phone("phone", request.phone.as_deref().unwrap_or(""))?;

        let name = sanitize_input(&request.name);
        let email = sanitize_input(&request.email);
        let phone = sanitize_optional(request.phone.as_deref());
        let message = sanitize_input(&request.message);
        tracing::info!(
            name = %name,
            email = %email,
            phone = phone.as_deref().unwrap_or(""),
            message_len = message.len(),
            "Contact form received"
        );

        Ok(CONTACT_THANKS.to_string())
    }

    pub async fn get_pricing(&self) -> Vec<PricingPlan> {
        self.pause(Operation::Pricing).await;
        pricing_plans()
    }

    // =========================================================================
    // Internals
    // =========================================================================

    async fn pause(&self, operation: Operation) {
        if self.simulate_latency {
            tokio::time::sleep(operation.latency()).await;
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, BackendState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn issue_session(user: &User) -> Result<AuthSession, ApiError> {
    let token = TokenClaims {
        id: user.id,
        email: user.email.clone(),
    }
    .encode()?;
    Ok(AuthSession {
        token,
        user: user.profile(),
    })
}

/// `NTR-` followed by six characters from `[0-9A-Z]`.
fn confirmation_code() -> String {
    let mut rng = rand::rng();
    let suffix: String = (0..CODE_LEN)
        .map(|_| CODE_ALPHABET[rng.random_range(0..CODE_ALPHABET.len())] as char)
        .collect();
    format!("{}{}", CODE_PREFIX, suffix)
}

fn pricing_plans() -> Vec<PricingPlan> {
    vec![
        PricingPlan::new(
            "standard",
            "Standard",
            25,
            "per signature",
            &[
                "Single document notarization",
                "In-office appointments",
                "Standard processing",
                "Email confirmation",
            ],
        ),
        PricingPlan::new(
            "mobile",
            "Mobile",
            75,
            "per visit",
            &[
                "We come to you in Charlotte",
                "Up to 5 signatures",
                "Same-day availability",
                "Priority scheduling",
                "Document review included",
            ],
        )
        .featured(),
        PricingPlan::new(
            "business",
            "Business",
            199,
            "per month",
            &[
                "Unlimited notarizations",
                "Dedicated notary assigned",
                "On-site or remote",
                "Bulk document handling",
                "Monthly invoicing",
                "24/7 support",
            ],
        ),
    ]
}

// =============================================================================
// Tests
// =============================================================================
