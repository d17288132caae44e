//! Conversation metadata for the unified inbox list.

use crate::error::ConversationError;
use crate::platform::Platform;
use chrono::{DateTime, Utc};
use omnichat_core::ConversationId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Maximum number of characters kept in a conversation preview.
pub const PREVIEW_MAX_CHARS: usize = 60;

/// One conversation as shown in the inbox list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    /// Platform-assigned identifier.
    pub id: ConversationId,
    /// Name of the counterpart (person, group or channel).
    pub display_name: String,
    /// Platform the conversation lives on.
    pub platform: Platform,
    /// Remote messages received since the conversation was last opened.
    pub unread_count: u32,
    /// Excerpt of the latest message.
    pub preview_text: String,
    /// Time of the latest message, if any.
    pub preview_timestamp: Option<DateTime<Utc>>,
}

impl Conversation {
    /// Creates a conversation with no activity yet.
    #[must_use]
    pub fn new(
        id: impl Into<ConversationId>,
        display_name: impl Into<String>,
        platform: Platform,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            platform,
            unread_count: 0,
            preview_text: String::new(),
            preview_timestamp: None,
        }
    }

    /// Sets the preview shown before any message is loaded.
    #[must_use]
    pub fn with_preview(mut self, text: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        self.preview_text = preview_of(&text.into());
        self.preview_timestamp = Some(timestamp);
        self
    }

    /// Sets the initial unread count.
    #[must_use]
    pub fn with_unread(mut self, unread_count: u32) -> Self {
        self.unread_count = unread_count;
        self
    }
}

/// Truncates message content to a single preview line.
#[must_use]
pub fn preview_of(content: &str) -> String {
    let line = content.lines().next().unwrap_or_default().trim();
    if line.chars().count() <= PREVIEW_MAX_CHARS && !content.trim().contains('\n') {
        return line.to_string();
    }
    let mut preview: String = line.chars().take(PREVIEW_MAX_CHARS - 1).collect();
    preview.push('…');
    preview
}

/// Holds the metadata of every known conversation.
///
/// Conversations are registered once at load time and never removed.
#[derive(Debug, Default)]
pub struct ConversationRegistry {
    conversations: Vec<Conversation>,
    index: HashMap<ConversationId, usize>,
}

impl ConversationRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry from a list, skipping repeated ids.
    #[must_use]
    pub fn load(conversations: impl IntoIterator<Item = Conversation>) -> Self {
        let mut registry = Self::new();
        for conversation in conversations {
            // first registration wins
            if let Err(err) = registry.register(conversation) {
                debug!(error = %err, "skipping conversation");
            }
        }
        registry
    }

    /// Adds a conversation.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateConversation` if the id is already registered.
    pub fn register(&mut self, conversation: Conversation) -> Result<(), ConversationError> {
        if self.index.contains_key(&conversation.id) {
            return Err(ConversationError::DuplicateConversation {
                id: conversation.id,
            });
        }
        self.index
            .insert(conversation.id.clone(), self.conversations.len());
        self.conversations.push(conversation);
        Ok(())
    }

    /// Returns all conversations, most recent activity first.
    ///
    /// Conversations with equal activity keep their load order; those
    /// without any activity come last.
    #[must_use]
    pub fn list(&self) -> Vec<Conversation> {
        let mut list = self.conversations.clone();
        list.sort_by(|a, b| b.preview_timestamp.cmp(&a.preview_timestamp));
        list
    }

    /// Looks up a conversation.
    ///
    /// # Errors
    ///
    /// Returns `ConversationNotFound` for unknown ids.
    pub fn get(&self, id: &ConversationId) -> Result<&Conversation, ConversationError> {
        self.index
            .get(id)
            .map(|&i| &self.conversations[i])
            .ok_or_else(|| ConversationError::ConversationNotFound { id: id.clone() })
    }

    /// Updates the preview after a message was appended.
    ///
    /// # Errors
    ///
    /// Returns `ConversationNotFound` for unknown ids.
    pub fn record_activity(
        &mut self,
        id: &ConversationId,
        preview_text: &str,
        timestamp: DateTime<Utc>,
    ) -> Result<(), ConversationError> {
        let conversation = self.get_mut(id)?;
        conversation.preview_text = preview_of(preview_text);
        conversation.preview_timestamp = Some(timestamp);
        Ok(())
    }

    /// Updates the preview for a message from the other party and counts
    /// it as unread.
    ///
    /// # Errors
    ///
    /// Returns `ConversationNotFound` for unknown ids.
    pub fn record_incoming(
        &mut self,
        id: &ConversationId,
        preview_text: &str,
        timestamp: DateTime<Utc>,
    ) -> Result<(), ConversationError> {
        self.record_activity(id, preview_text, timestamp)?;
        let conversation = self.get_mut(id)?;
        conversation.unread_count = conversation.unread_count.saturating_add(1);
        Ok(())
    }

    /// Number of registered conversations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.conversations.len()
    }

    /// Returns true if no conversation is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.conversations.is_empty()
    }

    fn get_mut(&mut self, id: &ConversationId) -> Result<&mut Conversation, ConversationError> {
        match self.index.get(id) {
            Some(&i) => Ok(&mut self.conversations[i]),
            None => Err(ConversationError::ConversationNotFound { id: id.clone() }),
        }
    }
}
