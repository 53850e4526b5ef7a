use thiserror::Error;

/// Top-level error type for the Ink Spot system.
///
/// Subsystem crates define their own error types and implement
/// `From<InkspotError>` (or the reverse) so that `?` works across crate
/// boundaries.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum InkspotError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for InkspotError {
    fn from(err: toml::de::Error) -> Self {
        InkspotError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for InkspotError {
    fn from(err: toml::ser::Error) -> Self {
        InkspotError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for InkspotError {
    fn from(err: serde_json::Error) -> Self {
        InkspotError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for Ink Spot operations.
pub type Result<T> = std::result::Result<T, InkspotError>;
