//! Conversation state for the omnichat unified inbox.
//!
//! This crate provides:
//!
//! - **Conversation Registry**: per-conversation metadata (name, platform, unread, preview)
//! - **Message Store**: append-only message logs with reply links
//! - **Compose Session**: the draft being written and its reply target

pub mod compose;
pub mod error;
pub mod fixtures;
pub mod message;
pub mod platform;
pub mod registry;
pub mod store;

pub use compose::{ComposeDraft, ComposeSession};
pub use error::ConversationError;
pub use message::{Message, NewMessage, Sender};
pub use platform::Platform;
pub use registry::{Conversation, ConversationRegistry, preview_of};
pub use store::MessageStore;
