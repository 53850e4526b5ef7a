//! Input safety for untrusted text.
//!
//! Everything a visitor types is untrusted: it is escaped before it reaches a
//! markup surface, and form fields are checked with the same rules the site's
//! forms use.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{InkspotError, Result};

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Invalid email regex"));

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\d\s\-\(\)\+]{7,}$").expect("Invalid phone regex"));

/// Escape the five HTML-significant characters.
///
/// `&` is handled in the same single pass as the others, so existing entities
/// are escaped again rather than passed through.
pub fn escape_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape and trim a form field.
pub fn sanitize_input(text: &str) -> String {
    escape_markup(text).trim().to_string()
}

/// Sanitize an optional form field, keeping `None` as `None`.
pub fn sanitize_optional(text: Option<&str>) -> Option<String> {
    text.map(sanitize_input)
}

/// Returns whether `email` looks like `local@domain.tld`.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Returns whether `phone` is at least seven digits, spaces, dashes,
/// parentheses or plus signs.
pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_RE.is_match(phone)
}

/// Validate an email field, naming it in the error.
pub fn validate_email(field: &str, email: &str) -> Result<()> {
    if is_valid_email(email.trim()) {
        Ok(())
    } else {
        Err(InkspotError::Validation(format!(
            "{} must be a valid email address",
            field
        )))
    }
}

/// Validate a phone field. An empty value is accepted since phone is optional
/// on every form.
pub fn validate_phone(field: &str, phone: &str) -> Result<()> {
    let phone = phone.trim();
    if phone.is_empty() || is_valid_phone(phone) {
        Ok(())
    } else {
        Err(InkspotError::Validation(format!(
            "{} must be a valid phone number",
            field
        )))
    }
}

/// Require a non-blank field.
pub fn require(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        Err(InkspotError::Validation(format!("{} is required", field)))
    } else {
        Ok(())
    }
}
