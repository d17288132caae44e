//! Line-oriented console over an [`InboxHandle`].
//!
//! Slash commands drive the inbox; any other line is sent as a message to
//! the selected conversation. Finished assist jobs are announced as soon as
//! their result is published.

use crate::error::ConsoleError;
use omnichat_assist::{AssistMode, AssistResult, AssistSession, Tone};
use omnichat_conversation::Sender;
use omnichat_core::{ConversationId, Result};
use omnichat_inbox::{InboxHandle, InboxSnapshot, Intent, MessageView};
use std::fmt::{self, Write as _};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::debug;

/// Help text printed by `/help`.
pub const HELP: &str = "\
/list                              list conversations
/select <id>                       open a conversation
/reply <n>|none                    quote message #n of the open conversation
/assist open|close|reset|run|accept
/mode analyze|summarize|generate
/tone professional|casual|detailed
/state                             print the full state as JSON
/quit
anything else is sent to the open conversation";

/// Assist panel actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssistAction {
    Open,
    Close,
    Reset,
    Run,
    Accept,
}

/// A parsed console line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List,
    Select(ConversationId),
    /// 1-based message number, or `None` to clear.
    Reply(Option<usize>),
    Assist(AssistAction),
    Mode(AssistMode),
    Tone(Tone),
    State,
    Help,
    Quit,
    /// Plain text to send.
    Say(String),
}

/// A console line that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseCommandError {
    /// The command name is not known.
    UnknownCommand { name: String },
    /// The command needs an argument.
    MissingArgument { command: &'static str },
    /// The argument is not one the command accepts.
    InvalidArgument {
        command: &'static str,
        value: String,
    },
}

impl fmt::Display for ParseCommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownCommand { name } => write!(f, "unknown command '/{name}', try /help"),
            Self::MissingArgument { command } => write!(f, "/{command} needs an argument"),
            Self::InvalidArgument { command, value } => {
                write!(f, "/{command} does not accept '{value}'")
            }
        }
    }
}

impl std::error::Error for ParseCommandError {}

/// Parses one input line. Blank lines yield `None`.
///
/// # Errors
///
/// Returns a [`ParseCommandError`] for malformed slash commands.
pub fn parse(line: &str) -> std::result::Result<Option<Command>, ParseCommandError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let Some(rest) = line.strip_prefix('/') else {
        return Ok(Some(Command::Say(line.to_string())));
    };

    let mut words = rest.split_whitespace();
    let name = words.next().unwrap_or_default();
    let arg = words.next();

    let command = match name {
        "list" => Command::List,
        "state" => Command::State,
        "help" => Command::Help,
        "quit" | "exit" => Command::Quit,
        "select" => {
            let id = arg.ok_or(ParseCommandError::MissingArgument { command: "select" })?;
            Command::Select(ConversationId::new(id))
        }
        "reply" => match arg.ok_or(ParseCommandError::MissingArgument { command: "reply" })? {
            "none" => Command::Reply(None),
            n => match n.parse::<usize>() {
                Ok(n) if n > 0 => Command::Reply(Some(n)),
                _ => return Err(invalid("reply", n)),
            },
        },
        "assist" => {
            let action = arg.ok_or(ParseCommandError::MissingArgument { command: "assist" })?;
            let action = match action {
                "open" => AssistAction::Open,
                "close" => AssistAction::Close,
                "reset" => AssistAction::Reset,
                "run" => AssistAction::Run,
                "accept" => AssistAction::Accept,
                other => return Err(invalid("assist", other)),
            };
            Command::Assist(action)
        }
        "mode" => {
            let value = arg.ok_or(ParseCommandError::MissingArgument { command: "mode" })?;
            Command::Mode(value.parse().map_err(|_| invalid("mode", value))?)
        }
        "tone" => {
            let value = arg.ok_or(ParseCommandError::MissingArgument { command: "tone" })?;
            Command::Tone(value.parse().map_err(|_| invalid("tone", value))?)
        }
        other => {
            return Err(ParseCommandError::UnknownCommand {
                name: other.to_string(),
            });
        }
    };
    Ok(Some(command))
}

fn invalid(command: &'static str, value: &str) -> ParseCommandError {
    ParseCommandError::InvalidArgument {
        command,
        value: value.to_string(),
    }
}

/// Runs the console until `/quit` or end of input.
///
/// # Errors
///
/// Returns an error if reading input or writing output fails. Rejected
/// intents are printed and do not end the session.
pub async fn run<R, W>(
    handle: &InboxHandle,
    input: R,
    output: &mut W,
) -> Result<(), ConsoleError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    let mut snapshots = handle.subscribe();
    let mut result_shown = snapshots.borrow_and_update().assist.result().is_some();

    emit(output, &render_conversations(&handle.snapshot())).await?;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let line = line.map_err(|e| ConsoleError::Input {
                    details: e.to_string(),
                })?;
                let Some(line) = line else {
                    break;
                };
                match parse(&line) {
                    Ok(None) => {}
                    Ok(Some(Command::Quit)) => break,
                    Ok(Some(command)) => {
                        let text = execute(handle, command).await?;
                        emit(output, &text).await?;
                    }
                    Err(err) => emit(output, &format!("error: {err}")).await?,
                }
            }
            changed = snapshots.changed() => {
                if changed.is_err() {
                    debug!("inbox closed, leaving console");
                    break;
                }
                let ready = snapshots
                    .borrow_and_update()
                    .assist
                    .result()
                    .map(AssistResult::text);
                match ready {
                    Some(text) if !result_shown => {
                        result_shown = true;
                        emit(output, &format!("assist result ready:\n{text}")).await?;
                    }
                    Some(_) => {}
                    None => result_shown = false,
                }
            }
        }
    }
    Ok(())
}

/// Runs one command and renders what changed.
async fn execute(
    handle: &InboxHandle,
    command: Command,
) -> Result<String, ConsoleError> {
    let intents = match command {
        Command::List => return Ok(render_conversations(&handle.snapshot())),
        Command::State => return render_state(&handle.snapshot()),
        Command::Help => return Ok(HELP.to_string()),
        Command::Quit => return Ok(String::new()),
        Command::Select(id) => vec![Intent::SelectConversation { id }],
        Command::Reply(None) => vec![Intent::SetReplyTarget { message_id: None }],
        Command::Reply(Some(n)) => {
            let snapshot = handle.snapshot();
            let Some(view) = snapshot.messages.get(n - 1) else {
                return Ok(format!("error: no message #{n}"));
            };
            vec![Intent::SetReplyTarget {
                message_id: Some(view.message.id),
            }]
        }
        Command::Assist(action) => vec![match action {
            AssistAction::Open => Intent::OpenAssist,
            AssistAction::Close => Intent::CloseAssist,
            AssistAction::Reset => Intent::ResetAssist,
            AssistAction::Run => Intent::StartAssistAction,
            AssistAction::Accept => Intent::AcceptAssistResult,
        }],
        Command::Mode(mode) => vec![Intent::SelectAssistMode { mode }],
        Command::Tone(tone) => vec![Intent::SelectTone { tone }],
        Command::Say(text) => vec![Intent::SetDraft { text }, Intent::Send],
    };

    let mut snapshot = None;
    for intent in intents {
        let is_assist = !matches!(
            intent,
            Intent::SelectConversation { .. }
                | Intent::SetDraft { .. }
                | Intent::SetReplyTarget { .. }
                | Intent::Send
        );
        match handle.dispatch(intent).await {
            Ok(next) => snapshot = Some((next, is_assist)),
            Err(err) => return Ok(format!("error: {err}")),
        }
    }

    Ok(match snapshot {
        Some((snapshot, true)) => render_assist(&snapshot.assist),
        Some((snapshot, false)) => render_thread(&snapshot),
        None => String::new(),
    })
}

async fn emit<W>(output: &mut W, text: &str) -> Result<(), ConsoleError>
where
    W: AsyncWrite + Unpin,
{
    if text.is_empty() {
        return Ok(());
    }
    let failed = |e: std::io::Error| ConsoleError::Output {
        details: e.to_string(),
    };
    output.write_all(text.as_bytes()).await.map_err(failed)?;
    output.write_all(b"\n").await.map_err(failed)?;
    output.flush().await.map_err(failed)?;
    Ok(())
}

/// One line per conversation, most recent first. `*` marks the open one.
#[must_use]
pub fn render_conversations(snapshot: &InboxSnapshot) -> String {
    let mut out = String::new();
    for conversation in &snapshot.conversations {
        let marker = if snapshot.active_conversation.as_ref() == Some(&conversation.id) {
            '*'
        } else {
            ' '
        };
        let unread = match conversation.unread_count {
            0 => String::new(),
            n => format!(" ({n})"),
        };
        let _ = writeln!(
            out,
            "{marker} {:<4} {:<9} {}{unread}  {}",
            conversation.id,
            conversation.platform.label(),
            conversation.display_name,
            conversation.preview_text
        );
    }
    out.pop();
    out
}

/// Numbered messages of the open conversation with reply quotes and the
/// pending draft state.
#[must_use]
pub fn render_thread(snapshot: &InboxSnapshot) -> String {
    let Some(active) = &snapshot.active_conversation else {
        return "no conversation selected".to_string();
    };
    let title = snapshot
        .conversation(active)
        .map_or_else(|| active.to_string(), |c| c.display_name.clone());

    let mut out = format!("== {title} ==\n");
    for (i, view) in snapshot.messages.iter().enumerate() {
        render_message(&mut out, i + 1, view);
    }
    if let Some(target) = snapshot.compose.as_ref().and_then(|c| c.reply_target()) {
        let name = author(target.sender, target.sender_display_name.as_deref());
        let _ = writeln!(out, "(replying to {name})");
    }
    out.pop();
    out
}

fn render_message(out: &mut String, number: usize, view: &MessageView) {
    if let Some(quote) = &view.reply_preview {
        let _ = writeln!(
            out,
            "     > {}: {}",
            author(quote.sender, quote.sender_display_name.as_deref()),
            quote.excerpt
        );
    }
    let message = &view.message;
    let _ = writeln!(
        out,
        "#{number:<3} {} [{}] {}",
        author(message.sender, message.sender_display_name.as_deref()),
        message.timestamp.format("%H:%M"),
        message.content
    );
}

fn author(sender: Sender, name: Option<&str>) -> &str {
    match sender {
        Sender::Local => "You",
        Sender::Remote => name.unwrap_or("?"),
    }
}

/// The assist panel phase, followed by the result once one is ready.
#[must_use]
pub fn render_assist(session: &AssistSession) -> String {
    match session.result() {
        Some(result) => format!("assist: {}\n{}", session.phase_label(), result.text()),
        None => format!("assist: {}", session.phase_label()),
    }
}

fn render_state(snapshot: &InboxSnapshot) -> Result<String, ConsoleError> {
    let json = serde_json::to_string_pretty(snapshot).map_err(|e| ConsoleError::Render {
        details: e.to_string(),
    })?;
    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use omnichat_assist::{AssistConfig, CannedProvider};
    use omnichat_inbox::{Dispatcher, InboxService};
    use std::sync::Arc;

    fn demo_service() -> InboxHandle {
        let (handle, _task) = InboxService::spawn(
            Dispatcher::with_demo_data(Utc::now()),
            Arc::new(CannedProvider),
            AssistConfig::default().with_latency_ms(10),
        );
        handle
    }

    #[test]
    fn plain_text_is_sent() {
        assert_eq!(
            parse("  hello there "),
            Ok(Some(Command::Say("hello there".to_string())))
        );
        assert_eq!(parse("   "), Ok(None));
    }

    #[test]
    fn slash_commands_parse() {
        assert_eq!(
            parse("/select 3"),
            Ok(Some(Command::Select(ConversationId::new("3"))))
        );
        assert_eq!(parse("/reply 2"), Ok(Some(Command::Reply(Some(2)))));
        assert_eq!(parse("/reply none"), Ok(Some(Command::Reply(None))));
        assert_eq!(
            parse("/assist accept"),
            Ok(Some(Command::Assist(AssistAction::Accept)))
        );
        assert_eq!(
            parse("/mode Generate"),
            Ok(Some(Command::Mode(AssistMode::Generate)))
        );
        assert_eq!(parse("/tone casual"), Ok(Some(Command::Tone(Tone::Casual))));
        assert_eq!(parse("/quit"), Ok(Some(Command::Quit)));
    }

    #[test]
    fn malformed_commands_are_rejected() {
        assert_eq!(
            parse("/select"),
            Err(ParseCommandError::MissingArgument { command: "select" })
        );
        assert_eq!(parse("/reply 0"), Err(invalid("reply", "0")));
        assert_eq!(parse("/tone grumpy"), Err(invalid("tone", "grumpy")));
        assert!(matches!(
            parse("/dance"),
            Err(ParseCommandError::UnknownCommand { .. })
        ));
    }

    #[test]
    fn conversation_list_marks_active_and_unread() {
        let mut dispatcher = Dispatcher::with_demo_data(Utc::now());
        dispatcher
            .select_conversation(&ConversationId::new("2"))
            .expect("select");
        let rendered = render_conversations(&dispatcher.snapshot());

        let lines: Vec<_> = rendered.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[0].starts_with("  1"));
        assert!(lines[0].contains("Alex Johnson (2)"));
        let squad = lines.iter().find(|l| l.contains("Gaming Squad")).expect("listed");
        assert!(squad.starts_with("* 2"));
        assert!(squad.contains("Gaming Squad (5)"));
    }

    #[test]
    fn thread_shows_quotes() {
        let mut dispatcher = Dispatcher::with_demo_data(Utc::now());
        let id = ConversationId::new("1");
        dispatcher.select_conversation(&id).expect("select");
        let question = dispatcher.messages(&id)[2].id;
        dispatcher.set_reply_target(Some(question)).expect("reply");
        dispatcher.set_draft("Sending now".to_string()).expect("draft");
        dispatcher.send_draft().expect("send");

        let rendered = render_thread(&dispatcher.snapshot());
        assert!(rendered.starts_with("== Alex Johnson =="));
        assert!(rendered.contains("     > Alex Johnson: That's great! Can you send me the projec…"));
        assert!(rendered.contains("You"));
        assert!(rendered.ends_with("Sending now"));
    }

    #[tokio::test(start_paused = true)]
    async fn scripted_session_sends_and_quits() {
        let handle = demo_service();
        let input: &[u8] = b"/select 1\nhello there\n/reply 9\n/bogus\n/quit\nnot sent\n";
        let mut output = Vec::new();

        run(&handle, input, &mut output).await.expect("console");

        let text = String::from_utf8(output).expect("utf-8");
        assert!(text.contains("== Alex Johnson =="));
        assert!(text.contains("hello there"));
        assert!(text.contains("error: no message #9"));
        assert!(text.contains("unknown command '/bogus'"));
        let snapshot = handle.snapshot();
        assert_eq!(snapshot.messages.len(), 6);
        assert_eq!(
            snapshot.last_message().map(|m| m.content.as_str()),
            Some("hello there")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn assist_commands_render_panel() {
        let handle = demo_service();
        let opened = execute(&handle, Command::Assist(AssistAction::Open))
            .await
            .expect("open");
        assert_eq!(opened, "assist: idle (analyze)");

        let refused = execute(&handle, Command::Assist(AssistAction::Accept))
            .await
            .expect("accept");
        assert!(refused.starts_with("error: "));
    }
}
