//! Keyword matcher: picks the canned reply for a visitor's message.
//!
//! The message is lowercased, then topics are checked in priority order and
//! the first topic with any trigger occurring as a substring wins. Nothing
//! matched means the fallback reply.

use std::sync::Arc;

use crate::catalog::{KeywordIndex, Reply, ResponseCatalog, Topic};
use crate::error::ChatError;

/// Stateless lookup from message text to reply.
///
/// Cheap to clone; the catalog and index are shared.
#[derive(Clone, Debug)]
pub struct Matcher {
    catalog: Arc<ResponseCatalog>,
    index: Arc<KeywordIndex>,
}

impl Matcher {
    pub fn new(catalog: Arc<ResponseCatalog>, index: Arc<KeywordIndex>) -> Self {
        Self { catalog, index }
    }

    /// Matcher over the built-in Ink Spot catalog and keywords.
    pub fn notary() -> Result<Self, ChatError> {
        Ok(Self::new(
            Arc::new(ResponseCatalog::notary()?),
            Arc::new(KeywordIndex::notary()?),
        ))
    }

    /// The topic a message resolves to, if any.
    pub fn classify(&self, message: &str) -> Option<Topic> {
        let lower = message.to_lowercase();
        self.index
            .iter()
            .find(|(_, triggers)| triggers.iter().any(|t| lower.contains(t.as_str())))
            .map(|(topic, _)| topic)
    }

    /// The reply for a message: its topic's catalog entry, or the fallback.
    pub fn reply_for(&self, message: &str) -> &Reply {
        match self.classify(message) {
            Some(topic) => {
                tracing::debug!(topic = %topic, "Chat message matched topic");
                self.catalog.reply(topic)
            }
            None => {
                tracing::debug!("Chat message matched no topic, using fallback");
                self.catalog.fallback()
            }
        }
    }

    pub fn catalog(&self) -> &ResponseCatalog {
        &self.catalog
    }

    pub fn index(&self) -> &KeywordIndex {
        &self.index
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn matcher() -> Matcher {
        Matcher::notary().unwrap()
    }

    fn reply_text(topic: Topic) -> String {
        matcher().catalog().reply(topic).text.clone()
    }

    // ---- Scenarios ----

    #[test]
    fn test_prices_question_matches_pricing() {
        let m = matcher();
        assert_eq!(m.reply_for("What are your prices?").text, reply_text(Topic::Pricing));
    }

    #[test]
    fn test_serve_question_matches_location() {
        let m = matcher();
        assert_eq!(m.classify("Do you serve Matthews?"), Some(Topic::Location));
        assert_eq!(m.reply_for("Do you serve Matthews?").text, reply_text(Topic::Location));
    }

    #[test]
    fn test_gibberish_falls_back() {
        let m = matcher();
        assert_eq!(m.classify("asdkfj"), None);
        assert_eq!(m.reply_for("asdkfj"), m.catalog().fallback());
    }

    #[test]
    fn test_quick_reply_texts_match_expected_topics() {
        let m = matcher();
        assert_eq!(m.classify("What are your prices?"), Some(Topic::Pricing));
        assert_eq!(m.classify("How do I book an appointment?"), Some(Topic::Book));
        assert_eq!(m.classify("What services do you offer?"), Some(Topic::Services));
        assert_eq!(m.classify("What are your hours?"), Some(Topic::Hours));
    }

    #[test]
    fn test_each_topic_reachable() {
        let m = matcher();
        let cases = [
            ("HOW MUCH is it", Topic::Pricing),
            ("are you open saturday", Topic::Hours),
            ("what's your address", Topic::Location),
            ("what should I bring", Topic::Documents),
            ("can you come to me", Topic::Mobile),
            ("grab a slot", Topic::Book),
            ("can you notarize a will", Topic::Services),
            ("can I talk to a human", Topic::Contact),
            ("refinance paperwork", Topic::Loan),
        ];
        for (message, expected) in cases {
            assert_eq!(m.classify(message), Some(expected), "message: {}", message);
        }
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        let m = matcher();
        assert_eq!(m.classify("MORTGAGE"), Some(Topic::Loan));
        assert_eq!(m.classify("Mortgage"), Some(Topic::Loan));
    }

    #[test]
    fn test_matching_is_substring_based() {
        // "fees" inside "coffees" still counts.
        assert_eq!(matcher().classify("coffees"), Some(Topic::Pricing));
    }

    // ---- Tie-break ----

    #[test]
    fn test_shared_trigger_resolves_to_earlier_topic() {
        let m = matcher();
        // "schedule" is listed under both hours and book.
        assert_eq!(m.classify("schedule"), Some(Topic::Hours));
        // "travel" is listed under both location and mobile.
        assert_eq!(m.classify("travel"), Some(Topic::Location));
    }

    #[test]
    fn test_multiple_topics_earliest_wins() {
        let m = matcher();
        // Contains "loan" (loan) and "price" (pricing); pricing comes first.
        assert_eq!(m.classify("loan price"), Some(Topic::Pricing));
        // Contains "book" (book) and "mortgage" (loan); book comes first.
        assert_eq!(m.classify("book a mortgage closing"), Some(Topic::Book));
    }

    #[test]
    fn test_custom_catalog_priority_independent_of_entry_order() {
        let replies: Vec<(Topic, Reply)> = Topic::ALL
            .iter()
            .rev()
            .map(|t| (*t, Reply::new(t.as_str())))
            .collect();
        let keywords: Vec<(Topic, Vec<&str>)> = Topic::ALL
            .iter()
            .rev()
            .map(|t| (*t, vec!["shared"]))
            .collect();
        let m = Matcher::new(
            Arc::new(ResponseCatalog::new(replies, Reply::new("none")).unwrap()),
            Arc::new(KeywordIndex::new(keywords).unwrap()),
        );
        assert_eq!(m.classify("shared"), Some(Topic::Pricing));
        assert_eq!(m.reply_for("shared").text, "pricing");
        assert_eq!(m.reply_for("other").text, "none");
    }

    // ---- Purity ----

    #[test]
    fn test_repeated_calls_are_identical() {
        let m = matcher();
        let first = m.reply_for("Where are you located?").clone();
        let _ = m.reply_for("asdkfj");
        let _ = m.reply_for("book now");
        let again = m.reply_for("Where are you located?").clone();
        assert_eq!(first, again);
    }

    #[test]
    fn test_empty_message_falls_back() {
        let m = matcher();
        assert_eq!(m.classify(""), None);
    }

    // Characters that cannot spell any built-in trigger.
    const NO_TRIGGER_CHARS: &str = "[xzqjk0-9 !?.,]{0,40}";

    proptest! {
        #[test]
        fn prop_text_without_triggers_falls_back(s in NO_TRIGGER_CHARS) {
            let m = matcher();
            prop_assert_eq!(m.classify(&s), None);
            prop_assert_eq!(m.reply_for(&s), m.catalog().fallback());
        }

        #[test]
        fn prop_match_is_deterministic(s in ".{0,60}") {
            let m = matcher();
            prop_assert_eq!(m.reply_for(&s), m.reply_for(&s));
        }

        #[test]
        fn prop_trigger_padded_with_noise_selects_its_topic(
            prefix in NO_TRIGGER_CHARS,
            suffix in NO_TRIGGER_CHARS,
            pick in 0usize..Topic::ALL.len(),
        ) {
            let m = matcher();
            let topic = Topic::ALL[pick];
            // The first trigger of each built-in topic is unique to it and
            // contains no trigger of an earlier topic.
            let trigger = &m.index().triggers(topic)[0];
            let message = format!("{} {} {}", prefix, trigger, suffix);
            prop_assert_eq!(m.classify(&message), Some(topic));
            prop_assert_eq!(m.reply_for(&message), m.catalog().reply(topic));
        }
    }
}
