//! Source platforms a conversation can originate from.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The external messaging service a conversation or message belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Telegram chats and groups.
    Telegram,
    /// Discord direct messages and channels.
    Discord,
}

impl Platform {
    /// Human-readable platform name.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Telegram => "Telegram",
            Self::Discord => "Discord",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
