//! Error types for the chat widget engine.

use inkspot_core::error::InkspotError;

use crate::catalog::Topic;

/// Errors from the chat engine.
///
/// Catalog and index defects surface here when they are built, never while
/// matching a message.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("topic '{0}' is declared more than once")]
    DuplicateTopic(Topic),
    #[error("topic '{0}' has no reply in the catalog")]
    MissingReply(Topic),
    #[error("topic '{0}' has no trigger phrases")]
    MissingKeywords(Topic),
    #[error("invalid trigger {trigger:?} for topic '{topic}': {reason}")]
    InvalidTrigger {
        topic: Topic,
        trigger: String,
        reason: &'static str,
    },
    #[error("quick reply {index} does not exist ({len} available)")]
    QuickReplyOutOfRange { index: usize, len: usize },
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<InkspotError> for ChatError {
    fn from(err: InkspotError) -> Self {
        ChatError::Config(err.to_string())
    }
}
