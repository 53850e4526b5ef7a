//! Topics, canned replies, and the trigger phrases that select them.
//!
//! Both the [`ResponseCatalog`] and the [`KeywordIndex`] are validated when
//! they are built: every [`Topic`] must have exactly one reply and at least
//! one lowercase trigger. After construction neither can fail.

use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ChatError;

// Opening or closing tag such as `<a href="...">` or `</a>`.
static MARKUP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"</?[a-zA-Z][^<>]*>").expect("Invalid markup regex"));

// =============================================================================
// Topic
// =============================================================================

/// A subject the chat widget can recognise.
///
/// Declaration order is the match priority: when a message contains triggers
/// for several topics, the one declared first wins.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    Pricing,
    Hours,
    Location,
    Documents,
    Mobile,
    Book,
    Services,
    Contact,
    Loan,
}

impl Topic {
    /// Every topic, in match priority order.
    pub const ALL: [Topic; 9] = [
        Topic::Pricing,
        Topic::Hours,
        Topic::Location,
        Topic::Documents,
        Topic::Mobile,
        Topic::Book,
        Topic::Services,
        Topic::Contact,
        Topic::Loan,
    ];

    /// Position of this topic in [`Topic::ALL`].
    pub fn priority(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Topic::Pricing => "pricing",
            Topic::Hours => "hours",
            Topic::Location => "location",
            Topic::Documents => "documents",
            Topic::Mobile => "mobile",
            Topic::Book => "book",
            Topic::Services => "services",
            Topic::Contact => "contact",
            Topic::Loan => "loan",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Reply
// =============================================================================

/// Developer-authored reply content.
///
/// `markup` is true when the text carries inline tags (links to site pages)
/// and may be rendered as markup.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    pub text: String,
    pub markup: bool,
}

impl Reply {
    /// Build a reply, flagging it as markup when the text contains a tag.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let markup = MARKUP_RE.is_match(&text);
        Self { text, markup }
    }
}

// =============================================================================
// ResponseCatalog
// =============================================================================

/// One reply per topic plus the fallback for unmatched input.
#[derive(Clone, Debug)]
pub struct ResponseCatalog {
    // Indexed by `Topic::priority`.
    replies: Vec<Reply>,
    fallback: Reply,
}

impl ResponseCatalog {
    /// Build a catalog, rejecting duplicated or missing topics.
    pub fn new(
        entries: impl IntoIterator<Item = (Topic, Reply)>,
        fallback: Reply,
    ) -> Result<Self, ChatError> {
        let mut by_topic: HashMap<Topic, Reply> = HashMap::new();
        for (topic, reply) in entries {
            if by_topic.insert(topic, reply).is_some() {
                return Err(ChatError::DuplicateTopic(topic));
            }
        }

        let mut replies = Vec::with_capacity(Topic::ALL.len());
        for topic in Topic::ALL {
            let reply = by_topic
                .remove(&topic)
                .ok_or(ChatError::MissingReply(topic))?;
            replies.push(reply);
        }

        Ok(Self { replies, fallback })
    }

    /// The built-in Ink Spot catalog.
    pub fn notary() -> Result<Self, ChatError> {
        Self::new(
            crate::notary::REPLIES
                .iter()
                .map(|(topic, text)| (*topic, Reply::new(*text))),
            Reply::new(crate::notary::FALLBACK),
        )
    }

    pub fn reply(&self, topic: Topic) -> &Reply {
        &self.replies[topic.priority()]
    }

    pub fn fallback(&self) -> &Reply {
        &self.fallback
    }
}

// =============================================================================
// KeywordIndex
// =============================================================================

/// Trigger phrases per topic, stored in topic priority order.
#[derive(Clone, Debug)]
pub struct KeywordIndex {
    // Indexed by `Topic::priority`.
    triggers: Vec<Vec<String>>,
}

impl KeywordIndex {
    /// Build an index, rejecting duplicated topics, topics with no triggers,
    /// and blank or non-lowercase triggers (input is lowercased before
    /// matching, so an uppercase trigger could never fire).
    ///
    /// A trigger listed under two topics is allowed; only the earlier topic
    /// can ever match it, which is logged as a warning.
    pub fn new<S: Into<String>>(
        entries: impl IntoIterator<Item = (Topic, Vec<S>)>,
    ) -> Result<Self, ChatError> {
        let mut by_topic: HashMap<Topic, Vec<String>> = HashMap::new();
        for (topic, phrases) in entries {
            let phrases: Vec<String> = phrases.into_iter().map(Into::into).collect();
            for phrase in &phrases {
                validate_trigger(topic, phrase)?;
            }
            if by_topic.insert(topic, phrases).is_some() {
                return Err(ChatError::DuplicateTopic(topic));
            }
        }

        let mut triggers = Vec::with_capacity(Topic::ALL.len());
        for topic in Topic::ALL {
            match by_topic.remove(&topic) {
                Some(phrases) if !phrases.is_empty() => triggers.push(phrases),
                _ => return Err(ChatError::MissingKeywords(topic)),
            }
        }

        let index = Self { triggers };
        for (trigger, winner, shadowed) in index.shared_triggers() {
            tracing::warn!(
                trigger = %trigger,
                winner = %winner,
                shadowed = %shadowed,
                "Trigger listed under two topics; the earlier topic always wins"
            );
        }
        Ok(index)
    }

    /// The built-in Ink Spot keyword lists.
    pub fn notary() -> Result<Self, ChatError> {
        Self::new(
            crate::notary::KEYWORDS
                .iter()
                .map(|(topic, phrases)| (*topic, phrases.to_vec())),
        )
    }

    pub fn triggers(&self, topic: Topic) -> &[String] {
        &self.triggers[topic.priority()]
    }

    /// Topics with their triggers, in priority order.
    pub fn iter(&self) -> impl Iterator<Item = (Topic, &[String])> + '_ {
        Topic::ALL
            .into_iter()
            .zip(self.triggers.iter().map(Vec::as_slice))
    }

    /// Triggers that appear under more than one topic, as
    /// `(trigger, earlier topic, later topic)`.
    pub fn shared_triggers(&self) -> Vec<(String, Topic, Topic)> {
        let mut first_seen: HashMap<&str, Topic> = HashMap::new();
        let mut shared = Vec::new();
        for (topic, phrases) in self.iter() {
            for phrase in phrases {
                match first_seen.get(phrase.as_str()) {
                    Some(&winner) if winner != topic => {
                        shared.push((phrase.clone(), winner, topic));
                    }
                    Some(_) => {}
                    None => {
                        first_seen.insert(phrase.as_str(), topic);
                    }
                }
            }
        }
        shared
    }
}

fn validate_trigger(topic: Topic, trigger: &str) -> Result<(), ChatError> {
    let reason = if trigger.trim().is_empty() {
        "triggers must not be blank"
    } else if trigger.to_lowercase() != trigger {
        "triggers must be lowercase"
    } else {
        return Ok(());
    };
    Err(ChatError::InvalidTrigger {
        topic,
        trigger: trigger.to_string(),
        reason,
    })
}

// =============================================================================
// QuickReply
// =============================================================================

/// A one-tap suggestion shown until the visitor sends their first message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickReply {
    pub label: String,
    pub trigger_text: String,
}

impl QuickReply {
    pub fn new(label: impl Into<String>, trigger_text: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            trigger_text: trigger_text.into(),
        }
    }

    /// The built-in Ink Spot quick replies.
    pub fn notary_defaults() -> Vec<QuickReply> {
        crate::notary::QUICK_REPLIES
            .iter()
            .map(|(label, text)| QuickReply::new(*label, *text))
            .collect()
    }
}

// =============================================================================
// Tests
// =============================================================================
