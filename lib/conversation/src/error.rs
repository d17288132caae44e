//! Error types for the conversation crate.
//!
//! These are plain domain errors; the inbox layer wraps them into
//! rootcause reports when they cross into the dispatcher.

use omnichat_core::{ConversationId, MessageId};
use std::fmt;

/// Errors from the registry, the message store and compose sessions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversationError {
    /// No conversation is registered under this id.
    ConversationNotFound { id: ConversationId },
    /// A conversation with this id is already registered.
    DuplicateConversation { id: ConversationId },
    /// The message does not exist in the given conversation.
    MessageNotFound {
        conversation_id: ConversationId,
        message_id: MessageId,
    },
    /// A message with this id already exists in the conversation.
    DuplicateMessage {
        conversation_id: ConversationId,
        message_id: MessageId,
    },
    /// Message content was empty after trimming.
    EmptyContent,
    /// The draft was empty after trimming.
    EmptyDraft,
    /// A remote message was appended without a sender display name.
    MissingSenderName,
    /// The reply target does not resolve within the conversation.
    ReplyTargetMissing {
        conversation_id: ConversationId,
        message_id: MessageId,
    },
}

impl ConversationError {
    /// Returns true for errors caused by referencing an unknown id.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::ConversationNotFound { .. }
                | Self::MessageNotFound { .. }
                | Self::ReplyTargetMissing { .. }
        )
    }
}

impl fmt::Display for ConversationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConversationNotFound { id } => write!(f, "conversation not found: {id}"),
            Self::DuplicateConversation { id } => {
                write!(f, "conversation already registered: {id}")
            }
            Self::MessageNotFound {
                conversation_id,
                message_id,
            } => write!(f, "message {message_id} not found in conversation {conversation_id}"),
            Self::DuplicateMessage {
                conversation_id,
                message_id,
            } => write!(
                f,
                "message {message_id} already exists in conversation {conversation_id}"
            ),
            Self::EmptyContent => write!(f, "message content is empty"),
            Self::EmptyDraft => write!(f, "draft is empty"),
            Self::MissingSenderName => write!(f, "remote message has no sender name"),
            Self::ReplyTargetMissing {
                conversation_id,
                message_id,
            } => write!(
                f,
                "reply target {message_id} does not exist in conversation {conversation_id}"
            ),
        }
    }
}

impl std::error::Error for ConversationError {}
