//! Rendering of session history for display surfaces.
//!
//! Visitor text is always escaped. Bot text is emitted raw only when the
//! message is flagged as markup, which only catalog replies can be.

use std::sync::LazyLock;

use regex::Regex;

use inkspot_core::safety::escape_markup;

use crate::catalog::QuickReply;
use crate::types::{Message, Sender};

static ANCHOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<a\s[^>]*?href\s*=\s*"([^"]*)"[^>]*>(.*?)</a\s*>"#)
        .expect("Invalid anchor regex")
});

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("Invalid tag regex"));

const TYPING_INDICATOR_HTML: &str = "<div class=\"chat-msg chat-msg--typing\">\
    <div class=\"chat-typing-dots\"><span></span><span></span><span></span></div></div>";

/// Markup shown while a reply is pending.
pub fn render_typing() -> &'static str {
    TYPING_INDICATOR_HTML
}

/// Render one message as an HTML element.
pub fn render_html(message: &Message) -> String {
    let (class, body) = match message.sender {
        Sender::User => ("user", escape_markup(&message.text)),
        Sender::Bot if message.render_as_markup => ("bot", message.text.clone()),
        Sender::Bot => ("bot", escape_markup(&message.text)),
    };
    format!("<div class=\"chat-msg chat-msg--{}\">{}</div>", class, body)
}

/// Render a history in order, followed by one typing indicator per pending reply.
pub fn render_history_html(history: &[Message], awaiting_replies: usize) -> String {
    let mut out: String = history.iter().map(render_html).collect();
    for _ in 0..awaiting_replies {
        out.push_str(render_typing());
    }
    out
}

/// Render the quick-reply buttons.
pub fn render_quick_replies_html(quick_replies: &[QuickReply]) -> String {
    quick_replies
        .iter()
        .map(|q| {
            format!(
                "<button class=\"chat-quick-reply\" data-value=\"{}\">{}</button>",
                escape_markup(&q.trigger_text),
                escape_markup(&q.label)
            )
        })
        .collect()
}

/// Render a message for a plain-text terminal.
///
/// Markup replies lose their tags; links become `label (href)`.
pub fn render_plain(message: &Message) -> String {
    if message.sender == Sender::Bot && message.render_as_markup {
        let linked = ANCHOR_RE.replace_all(&message.text, "$2 ($1)");
        TAG_RE.replace_all(&linked, "").into_owned()
    } else {
        message.text.clone()
    }
}
