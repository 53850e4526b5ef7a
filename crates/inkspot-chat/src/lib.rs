//! Chat widget engine for The Ink Spot.
//!
//! Matches visitor messages to canned replies by keyword and runs the widget
//! session: open/closed state, message history, quick replies, and the
//! simulated typing delay before each reply.

pub mod catalog;
pub mod error;
pub mod matcher;
mod notary;
pub mod render;
pub mod session;
pub mod types;

pub use catalog::{KeywordIndex, QuickReply, Reply, ResponseCatalog, Topic};
pub use error::ChatError;
pub use matcher::Matcher;
pub use session::{ReplyDelay, SessionController};
pub use types::{Message, Sender, SessionEvent, SessionSnapshot, WidgetState};
