//! Unified inbox state for omnichat.
//!
//! This crate ties the conversation and assist crates together:
//!
//! - [`Dispatcher`]: applies [`Intent`]s to the registry, the message store,
//!   per-conversation compose drafts and the assist panel
//! - [`InboxService`]: a tokio actor that owns a dispatcher, runs assist jobs
//!   in the background and publishes an [`InboxSnapshot`] after each change
//!
//! All message writes go through the dispatcher, whether they come from a
//! send, an accepted assist result or a remote platform.

pub mod dispatcher;
pub mod error;
pub mod intent;
pub mod service;
pub mod snapshot;

pub use dispatcher::Dispatcher;
pub use error::DispatchError;
pub use intent::Intent;
pub use service::{InboxHandle, InboxService};
pub use snapshot::{InboxSnapshot, MessageView, REPLY_EXCERPT_CHARS, ReplyPreview};
