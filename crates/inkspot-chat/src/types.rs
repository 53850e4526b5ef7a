use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::{QuickReply, Reply};

/// Who posted a message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    User,
    Bot,
}

/// One entry in the session history.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub text: String,
    pub sender: Sender,
    /// Only developer-authored bot content may carry this flag.
    pub render_as_markup: bool,
    pub sent_at: DateTime<Utc>,
    /// For bot replies, the user message being answered.
    pub in_reply_to: Option<Uuid>,
}

impl Message {
    /// A visitor's message. Never rendered as markup.
    pub fn user(text: impl Into<String>) -> Self {
        Self::build(text.into(), Sender::User, false, None)
    }

    /// A plain-text bot message, such as the welcome greeting.
    pub fn bot(text: impl Into<String>) -> Self {
        Self::build(text.into(), Sender::Bot, false, None)
    }

    /// A bot reply to a user message, carrying the reply's markup flag.
    pub fn bot_reply(reply: &Reply, in_reply_to: Uuid) -> Self {
        Self::build(reply.text.clone(), Sender::Bot, reply.markup, Some(in_reply_to))
    }

    fn build(text: String, sender: Sender, render_as_markup: bool, in_reply_to: Option<Uuid>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text,
            sender,
            render_as_markup,
            sent_at: Utc::now(),
            in_reply_to,
        }
    }
}

/// Whether the chat window is shown.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WidgetState {
    Closed,
    Open,
}

impl WidgetState {
    pub fn toggled(self) -> Self {
        match self {
            WidgetState::Closed => WidgetState::Open,
            WidgetState::Open => WidgetState::Closed,
        }
    }
}

impl fmt::Display for WidgetState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WidgetState::Closed => write!(f, "Closed"),
            WidgetState::Open => write!(f, "Open"),
        }
    }
}

/// Notifications for a rendering collaborator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    MessageAppended { message: Message },
    TypingStarted,
    TypingStopped,
    /// `focus_input` is set when the window opens.
    Toggled { state: WidgetState, focus_input: bool },
    QuickRepliesHidden,
}

/// Serializable copy of a session's state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub id: Uuid,
    pub state: WidgetState,
    pub quick_replies_visible: bool,
    pub quick_replies: Vec<QuickReply>,
    /// Replies scheduled but not yet posted (typing indicators shown).
    pub awaiting_replies: usize,
    pub input: String,
    pub history: Vec<Message>,
}
