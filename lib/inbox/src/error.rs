//! Error types for the inbox crate.
//!
//! `DispatchError` is the taxonomy the presentation layer sees. Lower-level
//! errors are kept as the source of each variant.

use omnichat_assist::AssistError;
use omnichat_conversation::ConversationError;
use std::fmt;

/// Errors from dispatching an intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// An id did not resolve. The dispatcher absorbs these as no-ops.
    NotFound(ConversationError),
    /// An assist operation was invoked from an incompatible phase.
    InvalidTransition(AssistError),
    /// Input was rejected; nothing changed.
    ValidationFailed(ConversationError),
    /// The intent needs an active conversation and none is selected.
    NoActiveConversation,
    /// The inbox actor is no longer running.
    ServiceStopped,
}

impl From<ConversationError> for DispatchError {
    fn from(err: ConversationError) -> Self {
        if err.is_not_found() {
            Self::NotFound(err)
        } else {
            Self::ValidationFailed(err)
        }
    }
}

impl From<AssistError> for DispatchError {
    fn from(err: AssistError) -> Self {
        Self::InvalidTransition(err)
    }
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(err) => write!(f, "not found: {err}"),
            Self::InvalidTransition(err) => write!(f, "invalid transition: {err}"),
            Self::ValidationFailed(err) => write!(f, "validation failed: {err}"),
            Self::NoActiveConversation => write!(f, "no conversation selected"),
            Self::ServiceStopped => write!(f, "inbox service stopped"),
        }
    }
}

impl std::error::Error for DispatchError {}
