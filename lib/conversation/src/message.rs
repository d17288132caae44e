//! Message types for conversations.

use crate::platform::Platform;
use chrono::{DateTime, Utc};
use omnichat_core::{ConversationId, MessageId};
use serde::{Deserialize, Serialize};

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    /// The account owner using the inbox.
    Local,
    /// The other party of the conversation.
    Remote,
}

/// A stored message.
///
/// Messages are created only by [`MessageStore::append`](crate::MessageStore::append)
/// and never change afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Unique identifier within the owning conversation.
    pub id: MessageId,
    /// The conversation this message belongs to.
    pub conversation_id: ConversationId,
    /// Message text, never empty.
    pub content: String,
    /// Who sent the message.
    pub sender: Sender,
    /// Platform the message travelled through.
    pub platform: Platform,
    /// Display name of the remote sender; `None` for local messages.
    pub sender_display_name: Option<String>,
    /// When the message was stored.
    pub timestamp: DateTime<Utc>,
    /// Message this one replies to. A lookup key, not an ownership edge.
    pub reply_to: Option<MessageId>,
}

impl Message {
    /// Returns true if the message was written by the other party.
    #[must_use]
    pub fn is_remote(&self) -> bool {
        self.sender == Sender::Remote
    }
}

/// A message that has not been stored yet.
///
/// The store assigns an id and a timestamp unless the caller already
/// provided them (for example when replaying platform history).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMessage {
    /// Preassigned id, if any.
    pub id: Option<MessageId>,
    /// Message text.
    pub content: String,
    /// Who sent the message.
    pub sender: Sender,
    /// Platform the message travelled through.
    pub platform: Platform,
    /// Display name of the remote sender.
    pub sender_display_name: Option<String>,
    /// Preassigned timestamp, if any.
    pub timestamp: Option<DateTime<Utc>>,
    /// Message being replied to.
    pub reply_to: Option<MessageId>,
}

impl NewMessage {
    /// Creates a message authored by the inbox owner.
    #[must_use]
    pub fn local(content: impl Into<String>, platform: Platform) -> Self {
        Self {
            id: None,
            content: content.into(),
            sender: Sender::Local,
            platform,
            sender_display_name: None,
            timestamp: None,
            reply_to: None,
        }
    }

    /// Creates a message received from the other party.
    #[must_use]
    pub fn remote(
        content: impl Into<String>,
        platform: Platform,
        sender_display_name: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            content: content.into(),
            sender: Sender::Remote,
            platform,
            sender_display_name: Some(sender_display_name.into()),
            timestamp: None,
            reply_to: None,
        }
    }

    /// Marks the message as a reply to an earlier one.
    #[must_use]
    pub fn with_reply_to(mut self, reply_to: Option<MessageId>) -> Self {
        self.reply_to = reply_to;
        self
    }

    /// Uses a preassigned id.
    #[must_use]
    pub fn with_id(mut self, id: MessageId) -> Self {
        self.id = Some(id);
        self
    }

    /// Uses a preassigned timestamp.
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}
