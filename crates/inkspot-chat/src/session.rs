//! Chat session controller: widget state, history, and delayed bot replies.
//!
//! The widget is either `Closed` or `Open`; `toggle` is the only transition
//! between the two. Every accepted message puts the session into an
//! awaiting-reply sub-state until its reply is posted:
//! - sendMessage: append user message, clear input, hide quick replies,
//!   show a typing indicator, schedule the reply
//! - reply fires: drop one typing indicator, append the matched reply
//!
//! Replies run as independent tokio tasks. Two quick messages each get their
//! own task and the replies land in whichever order their delays expire.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use rand::Rng;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use uuid::Uuid;

use inkspot_core::config::ChatConfig;

use crate::catalog::QuickReply;
use crate::error::ChatError;
use crate::matcher::Matcher;
use crate::types::{Message, SessionEvent, SessionSnapshot, WidgetState};

/// Buffered events per subscriber before the slowest one starts lagging.
const EVENT_CAPACITY: usize = 64;

// =============================================================================
// ReplyDelay
// =============================================================================

/// Simulated typing time: `base` plus a uniform random share of `jitter`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReplyDelay {
    pub base: Duration,
    pub jitter: Duration,
}

impl ReplyDelay {
    pub fn new(base: Duration, jitter: Duration) -> Self {
        Self { base, jitter }
    }

    pub fn from_config(config: &ChatConfig) -> Self {
        Self::new(
            Duration::from_millis(config.reply_delay_base_ms),
            Duration::from_millis(config.reply_delay_jitter_ms),
        )
    }

    /// Draw a delay in `[base, base + jitter)`, or exactly `base` without jitter.
    pub fn sample(&self) -> Duration {
        let jitter_ms = self.jitter.as_millis() as u64;
        if jitter_ms == 0 {
            return self.base;
        }
        self.base + Duration::from_millis(rand::rng().random_range(0..jitter_ms))
    }

    /// Longest delay `sample` can return.
    pub fn max(&self) -> Duration {
        self.base + self.jitter
    }
}

impl Default for ReplyDelay {
    fn default() -> Self {
        Self::from_config(&ChatConfig::default())
    }
}

// =============================================================================
// SessionController
// =============================================================================

struct SessionState {
    id: Uuid,
    widget: WidgetState,
    quick_replies_visible: bool,
    awaiting_replies: usize,
    input: String,
    history: Vec<Message>,
}

/// Drives one chat widget for the lifetime of a page.
///
/// Clones share the same session. Methods that schedule replies must be
/// called from within a tokio runtime.
#[derive(Clone)]
pub struct SessionController {
    state: Arc<Mutex<SessionState>>,
    matcher: Matcher,
    quick_replies: Arc<[QuickReply]>,
    delay: ReplyDelay,
    events: broadcast::Sender<SessionEvent>,
}

impl std::fmt::Debug for SessionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = lock_state(&self.state);
        f.debug_struct("SessionController")
            .field("id", &state.id)
            .field("widget", &state.widget)
            .field("history_len", &state.history.len())
            .field("awaiting_replies", &state.awaiting_replies)
            .field("delay", &self.delay)
            .finish()
    }
}

impl SessionController {
    /// Create a closed widget whose history holds only the welcome message.
    pub fn new(
        matcher: Matcher,
        quick_replies: Vec<QuickReply>,
        delay: ReplyDelay,
        welcome_message: &str,
    ) -> Self {
        let id = Uuid::new_v4();
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let state = SessionState {
            id,
            widget: WidgetState::Closed,
            quick_replies_visible: true,
            awaiting_replies: 0,
            input: String::new(),
            history: vec![Message::bot(welcome_message)],
        };
        tracing::info!(session_id = %id, "Chat session created");

        Self {
            state: Arc::new(Mutex::new(state)),
            matcher,
            quick_replies: quick_replies.into(),
            delay,
            events,
        }
    }

    /// Create a session with the built-in quick replies and the configured
    /// welcome message and reply delay.
    pub fn from_config(matcher: Matcher, config: &ChatConfig) -> Result<Self, ChatError> {
        config.validate()?;
        Ok(Self::new(
            matcher,
            QuickReply::notary_defaults(),
            ReplyDelay::from_config(config),
            &config.welcome_message,
        ))
    }

    /// Receive events for everything that happens after this call.
    ///
    /// Events are published under the session lock, so they arrive in the
    /// same order as the changes they describe land in `history()`.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Open a closed widget or close an open one. Returns the new state.
    pub fn toggle(&self) -> WidgetState {
        let new_state = {
            let mut state = self.lock();
            state.widget = state.widget.toggled();
            self.emit(SessionEvent::Toggled {
                state: state.widget,
                focus_input: state.widget == WidgetState::Open,
            });
            state.widget
        };
        tracing::debug!(state = %new_state, "Chat widget toggled");
        new_state
    }

    /// Replace the contents of the input box.
    pub fn set_input(&self, text: &str) {
        self.lock().input = text.to_string();
    }

    /// Send whatever is in the input box.
    pub fn submit_input(&self) -> Option<JoinHandle<()>> {
        let input = self.lock().input.clone();
        self.send_message(&input)
    }

    /// Send a visitor message and schedule the bot's reply.
    ///
    /// Blank input is ignored and returns `None`. Otherwise the returned
    /// handle completes once the reply has been appended.
    pub fn send_message(&self, text: &str) -> Option<JoinHandle<()>> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        let user_message = Message::user(text);
        let user_id = user_message.id;
        {
            let mut state = self.lock();
            state.history.push(user_message.clone());
            state.input.clear();
            state.awaiting_replies += 1;
            let was_showing_quick_replies =
                std::mem::replace(&mut state.quick_replies_visible, false);

            self.emit(SessionEvent::MessageAppended {
                message: user_message,
            });
            if was_showing_quick_replies {
                self.emit(SessionEvent::QuickRepliesHidden);
            }
            self.emit(SessionEvent::TypingStarted);
        }

        let delay = self.delay.sample();
        tracing::debug!(
            message_id = %user_id,
            delay_ms = delay.as_millis() as u64,
            "Chat message received, reply scheduled"
        );

        Some(tokio::spawn(deliver_reply(
            Arc::clone(&self.state),
            self.matcher.clone(),
            self.events.clone(),
            text.to_string(),
            user_id,
            delay,
        )))
    }

    /// Activate a quick reply; identical to sending its trigger text.
    pub fn activate_quick_reply(&self, index: usize) -> Result<Option<JoinHandle<()>>, ChatError> {
        let quick_reply = self
            .quick_replies
            .get(index)
            .ok_or(ChatError::QuickReplyOutOfRange {
                index,
                len: self.quick_replies.len(),
            })?;
        tracing::debug!(label = %quick_reply.label, "Quick reply activated");
        Ok(self.send_message(&quick_reply.trigger_text))
    }

    pub fn id(&self) -> Uuid {
        self.lock().id
    }

    pub fn widget_state(&self) -> WidgetState {
        self.lock().widget
    }

    pub fn is_open(&self) -> bool {
        self.widget_state() == WidgetState::Open
    }

    pub fn quick_replies_visible(&self) -> bool {
        self.lock().quick_replies_visible
    }

    pub fn quick_replies(&self) -> &[QuickReply] {
        &self.quick_replies
    }

    /// Whether at least one reply is still being "typed".
    pub fn is_awaiting_reply(&self) -> bool {
        self.awaiting_replies() > 0
    }

    pub fn awaiting_replies(&self) -> usize {
        self.lock().awaiting_replies
    }

    pub fn input(&self) -> String {
        self.lock().input.clone()
    }

    /// Copy of the history, oldest first.
    pub fn history(&self) -> Vec<Message> {
        self.lock().history.clone()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.lock();
        SessionSnapshot {
            id: state.id,
            state: state.widget,
            quick_replies_visible: state.quick_replies_visible,
            quick_replies: self.quick_replies.to_vec(),
            awaiting_replies: state.awaiting_replies,
            input: state.input.clone(),
            history: state.history.clone(),
        }
    }

    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    pub fn reply_delay(&self) -> ReplyDelay {
        self.delay
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        lock_state(&self.state)
    }

    /// Callers hold the session lock so event order matches history order.
    fn emit(&self, event: SessionEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }
}

/// Wait out the typing delay, then post the matched reply.
async fn deliver_reply(
    state: Arc<Mutex<SessionState>>,
    matcher: Matcher,
    events: broadcast::Sender<SessionEvent>,
    text: String,
    in_reply_to: Uuid,
    delay: Duration,
) {
    tokio::time::sleep(delay).await;

    let reply = Message::bot_reply(matcher.reply_for(&text), in_reply_to);
    let reply_id = reply.id;
    {
        let mut state = lock_state(&state);
        state.awaiting_replies = state.awaiting_replies.saturating_sub(1);
        state.history.push(reply.clone());
        let _ = events.send(SessionEvent::TypingStopped);
        let _ = events.send(SessionEvent::MessageAppended { message: reply });
    }
    tracing::debug!(message_id = %reply_id, in_reply_to = %in_reply_to, "Chat reply posted");
}

// A panic while holding the lock cannot leave the history half-written, so a
// poisoned mutex is still safe to read.
fn lock_state(state: &Mutex<SessionState>) -> MutexGuard<'_, SessionState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Topic;
    use crate::types::Sender;
    use tokio::time::Instant;

    const WELCOME: &str = "Hi there! Welcome to The Ink Spot. How can I help you today?";

    fn controller() -> SessionController {
        SessionController::new(
            Matcher::notary().unwrap(),
            QuickReply::notary_defaults(),
            ReplyDelay::default(),
            WELCOME,
        )
    }

    fn topic_reply(c: &SessionController, topic: Topic) -> String {
        c.matcher().catalog().reply(topic).text.clone()
    }

    // ---- ReplyDelay ----

    #[test]
    fn test_default_delay_bounds() {
        let delay = ReplyDelay::default();
        assert_eq!(delay.base, Duration::from_millis(800));
        assert_eq!(delay.max(), Duration::from_millis(1400));
    }

    #[test]
    fn test_delay_samples_stay_in_range() {
        let delay = ReplyDelay::default();
        for _ in 0..1000 {
            let d = delay.sample();
            assert!(d >= Duration::from_millis(800));
            assert!(d < Duration::from_millis(1400));
        }
    }

    #[test]
    fn test_delay_without_jitter_is_fixed() {
        let delay = ReplyDelay::new(Duration::from_millis(250), Duration::ZERO);
        assert_eq!(delay.sample(), Duration::from_millis(250));
    }

    // ---- Construction ----

    #[test]
    fn test_new_session_has_exactly_one_welcome_message() {
        let c = controller();
        let history = c.history();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].sender, Sender::Bot);
        assert_eq!(history[0].text, WELCOME);
        assert!(!history[0].render_as_markup);
    }

    #[test]
    fn test_new_session_starts_closed_with_quick_replies() {
        let c = controller();
        assert_eq!(c.widget_state(), WidgetState::Closed);
        assert!(c.quick_replies_visible());
        assert_eq!(c.quick_replies().len(), 4);
        assert!(!c.is_awaiting_reply());
        assert_eq!(c.input(), "");
    }

    #[test]
    fn test_from_config_rejects_blank_welcome() {
        let config = ChatConfig {
            welcome_message: String::new(),
            ..ChatConfig::default()
        };
        let err = SessionController::from_config(Matcher::notary().unwrap(), &config).unwrap_err();
        assert!(matches!(err, ChatError::Config(_)));
    }

    #[test]
    fn test_from_config_uses_configured_welcome_and_delay() {
        let config = ChatConfig {
            reply_delay_base_ms: 10,
            reply_delay_jitter_ms: 5,
            welcome_message: "Welcome!".to_string(),
        };
        let c = SessionController::from_config(Matcher::notary().unwrap(), &config).unwrap();
        assert_eq!(c.history()[0].text, "Welcome!");
        assert_eq!(c.reply_delay().max(), Duration::from_millis(15));
    }

    // ---- Toggle ----

    #[tokio::test]
    async fn test_toggle_opens_and_closes() {
        let c = controller();
        let mut events = c.subscribe();

        assert_eq!(c.toggle(), WidgetState::Open);
        assert!(c.is_open());
        assert_eq!(c.toggle(), WidgetState::Closed);
        assert!(!c.is_open());

        assert_eq!(
            events.recv().await.unwrap(),
            SessionEvent::Toggled {
                state: WidgetState::Open,
                focus_input: true
            }
        );
        assert_eq!(
            events.recv().await.unwrap(),
            SessionEvent::Toggled {
                state: WidgetState::Closed,
                focus_input: false
            }
        );
    }

    #[tokio::test]
    async fn test_toggle_does_not_touch_history() {
        let c = controller();
        c.toggle();
        c.toggle();
        assert_eq!(c.history().len(), 1);
        assert!(c.quick_replies_visible());
    }

    // ---- sendMessage ----

    #[tokio::test(start_paused = true)]
    async fn test_blank_messages_are_ignored() {
        let c = controller();
        assert!(c.send_message("").is_none());
        assert!(c.send_message("   \t\n ").is_none());
        assert_eq!(c.history().len(), 1);
        assert!(c.quick_replies_visible());
        assert!(!c.is_awaiting_reply());

        // Nothing was scheduled.
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(c.history().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_send_appends_user_message_immediately() {
        let c = controller();
        c.set_input("  What are your prices?  ");
        let handle = c.submit_input().unwrap();

        let history = c.history();
        assert_eq!(history.len(), 2);
        assert_eq!(history[1].sender, Sender::User);
        assert_eq!(history[1].text, "What are your prices?");
        assert_eq!(c.input(), "");
        assert!(!c.quick_replies_visible());
        assert_eq!(c.awaiting_replies(), 1);

        handle.await.unwrap();

        let history = c.history();
        assert_eq!(history.len(), 3);
        assert_eq!(history[2].sender, Sender::Bot);
        assert_eq!(history[2].text, topic_reply(&c, Topic::Pricing));
        assert!(history[2].render_as_markup);
        assert_eq!(history[2].in_reply_to, Some(history[1].id));
        assert!(!c.is_awaiting_reply());
    }

    #[tokio::test(start_paused = true)]
    async fn test_reply_arrives_within_delay_window() {
        let c = controller();
        let start = Instant::now();
        c.send_message("hours?").unwrap().await.unwrap();
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(800), "elapsed {:?}", elapsed);
        assert!(elapsed < Duration::from_millis(1400), "elapsed {:?}", elapsed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_reply_before_base_delay() {
        let c = controller();
        let _handle = c.send_message("hours?").unwrap();
        tokio::time::sleep(Duration::from_millis(799)).await;
        assert_eq!(c.history().len(), 2);
        assert!(c.is_awaiting_reply());
    }

    #[tokio::test(start_paused = true)]
    async fn test_quick_replies_stay_hidden() {
        let c = controller();
        c.send_message("hello").unwrap().await.unwrap();
        assert!(!c.quick_replies_visible());

        assert!(c.send_message("").is_none());
        assert!(!c.quick_replies_visible());

        c.send_message("still here").unwrap().await.unwrap();
        assert!(!c.quick_replies_visible());
    }

    #[tokio::test(start_paused = true)]
    async fn test_unmatched_message_gets_fallback() {
        let c = controller();
        c.send_message("asdkfj").unwrap().await.unwrap();
        let last = c.history().pop().unwrap();
        assert_eq!(&last.text, &c.matcher().catalog().fallback().text);
    }

    #[tokio::test(start_paused = true)]
    async fn test_user_markup_is_stored_as_text() {
        let c = controller();
        c.send_message("<img src=x onerror=alert(1)>").unwrap().await.unwrap();
        let history = c.history();
        assert_eq!(history[1].text, "<img src=x onerror=alert(1)>");
        assert!(!history[1].render_as_markup);
    }

    // ---- Quick replies ----

    #[tokio::test(start_paused = true)]
    async fn test_book_now_quick_reply_equals_typed_message() {
        let quick = controller();
        assert_eq!(quick.quick_replies()[1].label, "Book Now");
        quick.activate_quick_reply(1).unwrap().unwrap().await.unwrap();

        let typed = controller();
        typed
            .send_message("How do I book an appointment?")
            .unwrap()
            .await
            .unwrap();

        let quick_history = quick.history();
        let typed_history = typed.history();
        assert_eq!(quick_history.len(), 3);
        assert_eq!(quick_history[1].text, typed_history[1].text);
        assert_eq!(quick_history[2].text, typed_history[2].text);
        assert_eq!(quick_history[2].text, topic_reply(&quick, Topic::Book));
        assert!(!quick.quick_replies_visible());
    }

    #[test]
    fn test_quick_reply_out_of_range() {
        let c = controller();
        let err = c.activate_quick_reply(9).unwrap_err();
        assert!(matches!(err, ChatError::QuickReplyOutOfRange { index: 9, len: 4 }));
        assert_eq!(c.history().len(), 1);
    }

    // ---- Overlapping replies ----

    #[tokio::test(start_paused = true)]
    async fn test_two_rapid_messages_each_get_a_reply() {
        let c = controller();
        let start = Instant::now();

        let first = c.send_message("What are your prices?").unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;
        let second = c.send_message("Do you serve Matthews?").unwrap();

        // Both user messages are in before either reply.
        assert_eq!(c.history().len(), 3);
        assert_eq!(c.awaiting_replies(), 2);

        first.await.unwrap();
        second.await.unwrap();
        assert!(start.elapsed() <= Duration::from_millis(1405));

        let history = c.history();
        assert_eq!(history.len(), 5);
        assert!(!c.is_awaiting_reply());

        let user_ids: Vec<Uuid> = history[1..3].iter().map(|m| m.id).collect();
        let mut answered: Vec<Uuid> = history[3..]
            .iter()
            .map(|m| {
                assert_eq!(m.sender, Sender::Bot);
                m.in_reply_to.unwrap()
            })
            .collect();
        answered.sort();
        let mut expected = user_ids.clone();
        expected.sort();
        assert_eq!(answered, expected);

        for reply in &history[3..] {
            let parent = history.iter().position(|m| Some(m.id) == reply.in_reply_to).unwrap();
            let own = history.iter().position(|m| m.id == reply.id).unwrap();
            assert!(parent < own);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_fixed_delay_replies_keep_send_order() {
        let c = SessionController::new(
            Matcher::notary().unwrap(),
            QuickReply::notary_defaults(),
            ReplyDelay::new(Duration::from_millis(100), Duration::ZERO),
            WELCOME,
        );
        let a = c.send_message("price").unwrap();
        tokio::time::sleep(Duration::from_millis(1)).await;
        let b = c.send_message("mortgage").unwrap();
        a.await.unwrap();
        b.await.unwrap();

        let history = c.history();
        assert_eq!(history[3].text, topic_reply(&c, Topic::Pricing));
        assert_eq!(history[4].text, topic_reply(&c, Topic::Loan));
    }

    // ---- Events & snapshot ----

    #[tokio::test(start_paused = true)]
    async fn test_event_sequence_for_one_message() {
        let c = controller();
        let mut events = c.subscribe();

        let handle = c.send_message("price").unwrap();
        handle.await.unwrap();

        match events.recv().await.unwrap() {
            SessionEvent::MessageAppended { message } => assert_eq!(message.sender, Sender::User),
            other => panic!("Expected user MessageAppended, got {:?}", other),
        }
        assert_eq!(events.recv().await.unwrap(), SessionEvent::QuickRepliesHidden);
        assert_eq!(events.recv().await.unwrap(), SessionEvent::TypingStarted);
        assert_eq!(events.recv().await.unwrap(), SessionEvent::TypingStopped);
        match events.recv().await.unwrap() {
            SessionEvent::MessageAppended { message } => assert_eq!(message.sender, Sender::Bot),
            other => panic!("Expected bot MessageAppended, got {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_message_does_not_rehide_quick_replies() {
        let c = controller();
        c.send_message("one").unwrap().await.unwrap();

        let mut events = c.subscribe();
        c.send_message("two").unwrap().await.unwrap();
        assert!(matches!(events.recv().await.unwrap(), SessionEvent::MessageAppended { .. }));
        assert_eq!(events.recv().await.unwrap(), SessionEvent::TypingStarted);
    }

    #[tokio::test(start_paused = true)]
    async fn test_snapshot_reflects_state() {
        let c = controller();
        c.toggle();
        c.set_input("draft");
        let snap = c.snapshot();
        assert_eq!(snap.id, c.id());
        assert_eq!(snap.state, WidgetState::Open);
        assert!(snap.quick_replies_visible);
        assert_eq!(snap.input, "draft");
        assert_eq!(snap.history.len(), 1);

        let _pending = c.submit_input().unwrap();
        let snap = c.snapshot();
        assert_eq!(snap.awaiting_replies, 1);
        assert_eq!(snap.input, "");
        assert!(!snap.quick_replies_visible);
        assert_eq!(snap.history.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_clones_share_session() {
        let a = controller();
        let b = a.clone();
        a.toggle();
        b.send_message("price").unwrap().await.unwrap();
        assert!(b.is_open());
        assert_eq!(a.history().len(), 3);
    }

    // ---- Event ordering ----

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_events_follow_history_order_under_concurrent_replies() {
        let c = SessionController::new(
            Matcher::notary().unwrap(),
            QuickReply::notary_defaults(),
            ReplyDelay::new(Duration::ZERO, Duration::ZERO),
            WELCOME,
        );
        let mut events = c.subscribe();

        let handles: Vec<_> = [
            "price", "hours", "where", "documents", "mobile", "book", "services", "contact",
            "loan", "asdkfj",
        ]
        .iter()
        .map(|text| c.send_message(text).unwrap())
        .collect();
        for handle in handles {
            handle.await.unwrap();
        }

        let mut appended = Vec::new();
        while let Ok(event) = events.try_recv() {
            if let SessionEvent::MessageAppended { message } = event {
                appended.push(message.id);
            }
        }

        let history: Vec<Uuid> = c.history().iter().skip(1).map(|m| m.id).collect();
        assert_eq!(history.len(), 20);
        assert_eq!(appended, history);
    }
}
