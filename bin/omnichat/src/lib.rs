//! Console front end for the omnichat unified inbox.

pub mod config;
pub mod console;
pub mod error;
