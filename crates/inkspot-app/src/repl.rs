//! Terminal front end for the chat widget.
//!
//! Session events are printed by a background task as they arrive, so a
//! reply shows up on its own once the typing delay has passed.

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

use inkspot_chat::render::render_plain;
use inkspot_chat::{QuickReply, Sender, SessionController, SessionEvent, WidgetState};

const HELP: &str = "Type a message and press Enter. Commands: /toggle, /help, /quit";
const CLOSED_HINT: &str = "(the chat is closed, /toggle opens it)";

/// One line of terminal input.
#[derive(Debug, PartialEq, Eq)]
pub enum ReplCommand {
    Blank,
    Quit,
    Toggle,
    Help,
    /// Zero-based quick-reply index.
    QuickReply(usize),
    Send(String),
}

/// Interpret a line. A bare number picks a quick reply only while
/// `visible_quick_replies` of them are on screen.
pub fn parse_command(line: &str, visible_quick_replies: usize) -> ReplCommand {
    let line = line.trim();
    match line {
        "" => ReplCommand::Blank,
        "/quit" | "/exit" => ReplCommand::Quit,
        "/toggle" => ReplCommand::Toggle,
        "/help" => ReplCommand::Help,
        _ => match line.parse::<usize>() {
            Ok(n) if (1..=visible_quick_replies).contains(&n) => ReplCommand::QuickReply(n - 1),
            _ => ReplCommand::Send(line.to_string()),
        },
    }
}

/// Terminal line for an event, if it has one. Visitor messages are not
/// echoed since the visitor just typed them.
pub fn format_event(event: &SessionEvent) -> Option<String> {
    match event {
        SessionEvent::MessageAppended { message } if message.sender == Sender::Bot => {
            Some(format!("bot> {}", render_plain(message)))
        }
        SessionEvent::TypingStarted => Some("bot is typing...".to_string()),
        SessionEvent::Toggled { state, .. } => Some(match state {
            WidgetState::Open => "[chat opened]".to_string(),
            WidgetState::Closed => "[chat closed]".to_string(),
        }),
        _ => None,
    }
}

pub fn format_quick_replies(quick_replies: &[QuickReply]) -> String {
    quick_replies
        .iter()
        .enumerate()
        .map(|(i, q)| format!("  [{}] {}", i + 1, q.label))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Run the chat until `/quit` or end of input.
///
/// At end of input, replies still pending are waited for and printed.
pub async fn run(session: SessionController) -> Result<(), Box<dyn std::error::Error>> {
    let mut events = session.subscribe();
    let printer = tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => {
                    if let Some(line) = format_event(&event) {
                        println!("{}", line);
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Chat output fell behind");
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    session.toggle();
    for message in session.history() {
        println!("bot> {}", render_plain(&message));
    }
    println!("{}", format_quick_replies(session.quick_replies()));
    println!("{}", HELP);

    let mut pending: Vec<JoinHandle<()>> = Vec::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        let visible = if session.quick_replies_visible() {
            session.quick_replies().len()
        } else {
            0
        };

        let handle = match parse_command(&line, visible) {
            ReplCommand::Blank => None,
            ReplCommand::Help => {
                println!("{}", HELP);
                None
            }
            ReplCommand::Toggle => {
                session.toggle();
                None
            }
            ReplCommand::Quit => {
                printer.abort();
                return Ok(());
            }
            ReplCommand::QuickReply(_) | ReplCommand::Send(_) if !session.is_open() => {
                println!("{}", CLOSED_HINT);
                None
            }
            ReplCommand::QuickReply(index) => session.activate_quick_reply(index)?,
            ReplCommand::Send(text) => session.send_message(&text),
        };

        pending.retain(|h| !h.is_finished());
        pending.extend(handle);
    }

    for handle in pending {
        if let Err(e) = handle.await {
            tracing::warn!(error = %e, "Reply task failed");
        }
    }
    // Dropping the session closes the event channel so the printer drains and exits.
    drop(session);
    if let Err(e) = printer.await {
        tracing::warn!(error = %e, "Chat printer task failed");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkspot_chat::{Matcher, Message, Reply, ReplyDelay};

    fn bot_reply(text: &str) -> Message {
        let parent = Message::user("question");
        Message::bot_reply(&Reply::new(text), parent.id)
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_command("   ", 4), ReplCommand::Blank);
        assert_eq!(parse_command("/quit", 4), ReplCommand::Quit);
        assert_eq!(parse_command("/exit", 0), ReplCommand::Quit);
        assert_eq!(parse_command(" /toggle ", 4), ReplCommand::Toggle);
        assert_eq!(parse_command("/help", 4), ReplCommand::Help);
        assert_eq!(
            parse_command("  how much? ", 4),
            ReplCommand::Send("how much?".to_string())
        );
    }

    #[test]
    fn test_numbers_pick_visible_quick_replies_only() {
        assert_eq!(parse_command("1", 4), ReplCommand::QuickReply(0));
        assert_eq!(parse_command("4", 4), ReplCommand::QuickReply(3));
        assert_eq!(parse_command("5", 4), ReplCommand::Send("5".to_string()));
        assert_eq!(parse_command("0", 4), ReplCommand::Send("0".to_string()));
        assert_eq!(parse_command("2", 0), ReplCommand::Send("2".to_string()));
    }

    #[test]
    fn test_format_bot_message_as_plain_text() {
        let msg = bot_reply(r#"Call or use our <a href="index.html#contact">contact form</a>."#);
        assert_eq!(
            format_event(&SessionEvent::MessageAppended { message: msg }).as_deref(),
            Some("bot> Call or use our contact form (index.html#contact).")
        );
    }

    #[test]
    fn test_user_messages_not_echoed() {
        let event = SessionEvent::MessageAppended {
            message: Message::user("hi"),
        };
        assert!(format_event(&event).is_none());
        assert!(format_event(&SessionEvent::QuickRepliesHidden).is_none());
        assert!(format_event(&SessionEvent::TypingStopped).is_none());
    }

    #[test]
    fn test_format_toggle_and_typing() {
        let opened = SessionEvent::Toggled {
            state: WidgetState::Open,
            focus_input: true,
        };
        assert_eq!(format_event(&opened).as_deref(), Some("[chat opened]"));
        assert_eq!(
            format_event(&SessionEvent::TypingStarted).as_deref(),
            Some("bot is typing...")
        );
    }

    #[test]
    fn test_format_quick_replies_numbered() {
        let text = format_quick_replies(&QuickReply::notary_defaults());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("  [1] "));
        assert!(text.contains("Book Now"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_quick_reply_through_session() {
        let matcher = Matcher::notary().unwrap();
        let session = SessionController::new(
            matcher,
            QuickReply::notary_defaults(),
            ReplyDelay::default(),
            "Hi!",
        );
        session.toggle();
        let count = session.quick_replies().len();
        let ReplCommand::QuickReply(index) = parse_command("1", count) else {
            panic!("expected a quick reply");
        };
        session.activate_quick_reply(index).unwrap().unwrap().await.unwrap();
        assert_eq!(session.history().len(), 3);
        assert!(!session.quick_replies_visible());
    }
}
