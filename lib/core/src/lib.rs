//! Core types shared by every omnichat crate.
//!
//! This crate provides the strongly-typed identifiers used across the
//! unified inbox and the `Result` alias used for layered error reports.

pub mod error;
pub mod id;

pub use error::Result;
pub use id::{ConversationId, JobToken, MessageId, ParseIdError};
