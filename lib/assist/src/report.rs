//! Results produced by assist jobs.

use crate::mode::{AssistMode, Tone};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// How soon the conversation needs attention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    /// Can wait.
    Low,
    /// Should be handled today.
    Medium,
    /// Needs an answer now.
    High,
}

impl Urgency {
    fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

/// Output of the Analyze mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Overall sentiment label.
    pub sentiment: String,
    /// Confidence in the sentiment label, 0-100.
    pub confidence_pct: u8,
    /// Main topics discussed.
    pub topics: Vec<String>,
    /// Urgency estimate.
    pub urgency: Urgency,
    /// Free-form observation.
    pub commentary: String,
}

/// Output of the Summarize mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryReport {
    /// Short narrative of the conversation.
    pub narrative: String,
    /// Numbered main points.
    pub key_points: Vec<String>,
    /// Follow-ups for the inbox owner.
    pub action_items: Vec<String>,
}

/// The result held by a finished assist session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AssistResult {
    /// Analyze mode result.
    Analysis(AnalysisReport),
    /// Summarize mode result.
    Summary(SummaryReport),
    /// Generate mode result.
    Reply {
        /// Tone the reply was written in.
        tone: Tone,
        /// Suggested reply text.
        text: String,
    },
}

impl AssistResult {
    /// The mode that produced this result.
    #[must_use]
    pub fn mode(&self) -> AssistMode {
        match self {
            Self::Analysis(_) => AssistMode::Analyze,
            Self::Summary(_) => AssistMode::Summarize,
            Self::Reply { .. } => AssistMode::Generate,
        }
    }

    /// Renders the result as the text that would be sent as a message.
    ///
    /// Reports render to markdown; replies are returned verbatim.
    #[must_use]
    pub fn text(&self) -> String {
        match self {
            Self::Analysis(report) => render_analysis(report),
            Self::Summary(report) => render_summary(report),
            Self::Reply { text, .. } => text.clone(),
        }
    }
}

fn render_analysis(report: &AnalysisReport) -> String {
    let mut out = format!(
        "**Sentiment Analysis:** {} ({}%)\n\n**Key Topics:**\n",
        report.sentiment, report.confidence_pct
    );
    for topic in &report.topics {
        let _ = writeln!(out, "- {topic}");
    }
    let _ = write!(
        out,
        "\n**Urgency Level:** {}\n\n{}",
        report.urgency.label(),
        report.commentary
    );
    out
}

fn render_summary(report: &SummaryReport) -> String {
    let mut out = format!(
        "**Conversation Summary:**\n\n{} The main points were:\n\n",
        report.narrative
    );
    for (i, point) in report.key_points.iter().enumerate() {
        let _ = writeln!(out, "{}. {point}", i + 1);
    }
    let _ = write!(out, "\nAction items: {}.", report.action_items.join(", "));
    out
}
