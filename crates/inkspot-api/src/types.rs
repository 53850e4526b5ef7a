//! Records held by the mock backend and the request bodies it accepts.

use serde::{Deserialize, Serialize};

use crate::error::ApiError;

// =============================================================================
// Accounts
// =============================================================================

/// A registered account. Never serialized: the password stays in memory.
#[derive(Debug, Clone)]
pub struct User {
    pub id: u64,
    pub email: String,
    pub password: String,
    pub name: String,
}

impl User {
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            name: self.name.clone(),
            email: self.email.clone(),
        }
    }
}

/// The public part of an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    pub email: String,
}

/// The signed-in visitor: an opaque token plus their profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    pub token: String,
    pub user: UserProfile,
}

/// Claims carried inside a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    pub id: u64,
    pub email: String,
}

impl TokenClaims {
    /// Hex-encoded JSON of the claims.
    pub fn encode(&self) -> Result<String, ApiError> {
        let json = serde_json::to_vec(self).map_err(|e| ApiError::Internal(e.to_string()))?;
        Ok(hex::encode(json))
    }

    pub fn decode(token: &str) -> Result<Self, ApiError> {
        let bytes =
            hex::decode(token).map_err(|_| ApiError::Unauthorized("Malformed token".to_string()))?;
        serde_json::from_slice(&bytes)
            .map_err(|_| ApiError::Unauthorized("Malformed token".to_string()))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

// =============================================================================
// Appointments
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Confirmed,
    Pending,
}

/// A booked (or seeded) appointment. Contact fields are absent on seed data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: u64,
    pub date: String,
    pub time: String,
    pub service: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub status: AppointmentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirmation_code: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BookingRequest {
    pub date: String,
    pub time: String,
    pub service: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub notes: Option<String>,
}

// =============================================================================
// Leads and pricing
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: String,
}

/// One column of the pricing table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingPlan {
    pub id: String,
    pub name: String,
    /// Whole US dollars.
    pub price: u32,
    pub per: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub featured: bool,
    pub features: Vec<String>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl PricingPlan {
    pub(crate) fn new(id: &str, name: &str, price: u32, per: &str, features: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            price,
            per: per.to_string(),
            featured: false,
            features: features.iter().map(|f| f.to_string()).collect(),
        }
    }

    pub(crate) fn featured(mut self) -> Self {
        self.featured = true;
        self
    }
}
