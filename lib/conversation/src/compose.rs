//! Draft state for the message being composed in a conversation.

use crate::error::ConversationError;
use crate::message::Message;
use serde::Serialize;

/// A validated draft, ready to be appended as a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComposeDraft {
    /// Trimmed draft text, never empty.
    pub text: String,
    /// Remote message being replied to.
    pub reply_target: Option<Message>,
}

/// Transient compose state of one conversation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ComposeSession {
    draft_text: String,
    reply_target: Option<Message>,
}

impl ComposeSession {
    /// Creates an empty session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current draft text, as typed.
    #[must_use]
    pub fn draft_text(&self) -> &str {
        &self.draft_text
    }

    /// Current reply target, if any.
    #[must_use]
    pub fn reply_target(&self) -> Option<&Message> {
        self.reply_target.as_ref()
    }

    /// Replaces the draft text.
    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft_text = text.into();
    }

    /// Quotes a message from the other party.
    ///
    /// Local messages cannot be replied to; the call is ignored for them.
    /// Returns whether the target was applied.
    pub fn set_reply_target(&mut self, message: &Message) -> bool {
        if !message.is_remote() {
            return false;
        }
        self.reply_target = Some(message.clone());
        true
    }

    /// Drops the reply target, keeping the text.
    pub fn clear_reply_target(&mut self) {
        self.reply_target = None;
    }

    /// Resets text and reply target.
    pub fn clear(&mut self) {
        self.draft_text.clear();
        self.reply_target = None;
    }

    /// Returns true when nothing has been typed or quoted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.draft_text.is_empty() && self.reply_target.is_none()
    }

    /// Validates the draft without consuming it.
    ///
    /// # Errors
    ///
    /// Returns `EmptyDraft` when the text is blank after trimming.
    pub fn prepare(&self) -> Result<ComposeDraft, ConversationError> {
        let text = self.draft_text.trim();
        if text.is_empty() {
            return Err(ConversationError::EmptyDraft);
        }
        Ok(ComposeDraft {
            text: text.to_string(),
            reply_target: self.reply_target.clone(),
        })
    }

    /// Takes the draft and clears the session.
    ///
    /// # Errors
    ///
    /// Returns `EmptyDraft` when the text is blank; the session is left
    /// untouched in that case.
    pub fn send(&mut self) -> Result<ComposeDraft, ConversationError> {
        let draft = self.prepare()?;
        self.clear();
        Ok(draft)
    }
}
