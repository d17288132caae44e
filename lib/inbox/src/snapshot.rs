//! Read-only state handed to the presentation layer after every mutation.

use omnichat_assist::AssistSession;
use omnichat_conversation::{ComposeSession, Conversation, Message, Sender};
use omnichat_core::{ConversationId, MessageId};
use serde::Serialize;

/// Characters of the quoted message shown above a reply.
pub const REPLY_EXCERPT_CHARS: usize = 40;

/// Quoted excerpt of the message a reply points to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplyPreview {
    /// The quoted message.
    pub message_id: MessageId,
    /// Who wrote it.
    pub sender: Sender,
    /// Display name of its author, for remote messages.
    pub sender_display_name: Option<String>,
    /// Start of its content.
    pub excerpt: String,
}

impl ReplyPreview {
    pub(crate) fn of(message: &Message) -> Self {
        let mut excerpt: String = message.content.chars().take(REPLY_EXCERPT_CHARS).collect();
        if message.content.chars().count() > REPLY_EXCERPT_CHARS {
            excerpt.push('…');
        }
        Self {
            message_id: message.id,
            sender: message.sender,
            sender_display_name: message.sender_display_name.clone(),
            excerpt,
        }
    }
}

/// A message together with its resolved reply link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageView {
    /// The stored message.
    #[serde(flatten)]
    pub message: Message,
    /// The quoted message, if `reply_to` is set and still resolves.
    pub reply_preview: Option<ReplyPreview>,
}

/// Complete inbox state for rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InboxSnapshot {
    /// All conversations, most recent activity first.
    pub conversations: Vec<Conversation>,
    /// The selected conversation, if any.
    pub active_conversation: Option<ConversationId>,
    /// Messages of the selected conversation, in order.
    pub messages: Vec<MessageView>,
    /// Draft of the selected conversation.
    pub compose: Option<ComposeSession>,
    /// The assist panel.
    pub assist: AssistSession,
}

impl InboxSnapshot {
    /// Looks up a conversation in the list.
    #[must_use]
    pub fn conversation(&self, id: &ConversationId) -> Option<&Conversation> {
        self.conversations.iter().find(|c| &c.id == id)
    }

    /// The last message of the selected conversation.
    #[must_use]
    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last().map(|view| &view.message)
    }
}
