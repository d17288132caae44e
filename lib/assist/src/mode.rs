//! Assist modes, tones and the request they combine into.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which assist feature the panel is showing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssistMode {
    /// Sentiment, topics and urgency of the conversation.
    #[default]
    Analyze,
    /// Narrative summary with action items.
    Summarize,
    /// Reply suggestion in a chosen tone.
    Generate,
}

impl AssistMode {
    /// Returns the mode name as shown to users.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Analyze => "analyze",
            Self::Summarize => "summarize",
            Self::Generate => "generate",
        }
    }

    /// Returns true if a tone must be chosen before a job can start.
    #[must_use]
    pub fn needs_tone(&self) -> bool {
        matches!(self, Self::Generate)
    }
}

impl fmt::Display for AssistMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tone of a generated reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    /// Polite and concise.
    Professional,
    /// Relaxed and friendly.
    Casual,
    /// Thorough and explicit.
    Detailed,
}

impl Tone {
    /// All tones, in the order they are offered.
    pub const ALL: [Tone; 3] = [Self::Professional, Self::Casual, Self::Detailed];

    /// Returns the tone name as shown to users.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Professional => "professional",
            Self::Casual => "casual",
            Self::Detailed => "detailed",
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a mode or tone name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseAssistError {
    /// What was being parsed ("mode" or "tone").
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

impl fmt::Display for ParseAssistError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown assist {}: {}", self.kind, self.value)
    }
}

impl std::error::Error for ParseAssistError {}

impl FromStr for AssistMode {
    type Err = ParseAssistError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "analyze" => Ok(Self::Analyze),
            "summarize" => Ok(Self::Summarize),
            "generate" => Ok(Self::Generate),
            _ => Err(ParseAssistError {
                kind: "mode",
                value: s.to_string(),
            }),
        }
    }
}

impl FromStr for Tone {
    type Err = ParseAssistError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "professional" => Ok(Self::Professional),
            "casual" => Ok(Self::Casual),
            "detailed" => Ok(Self::Detailed),
            _ => Err(ParseAssistError {
                kind: "tone",
                value: s.to_string(),
            }),
        }
    }
}

/// The work an assist job performs.
///
/// A Generate request always carries its tone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "mode", content = "tone", rename_all = "lowercase")]
pub enum AssistRequest {
    /// Analyze the conversation.
    Analyze,
    /// Summarize the conversation.
    Summarize,
    /// Draft a reply in the given tone.
    Generate(Tone),
}

impl AssistRequest {
    /// The mode this request belongs to.
    #[must_use]
    pub fn mode(&self) -> AssistMode {
        match self {
            Self::Analyze => AssistMode::Analyze,
            Self::Summarize => AssistMode::Summarize,
            Self::Generate(_) => AssistMode::Generate,
        }
    }
}
