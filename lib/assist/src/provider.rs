//! Result producers for assist jobs.
//!
//! The session state machine never builds results itself; it asks an
//! [`AnalysisProvider`]. A real inference engine plugs in here.

use crate::mode::{AssistRequest, Tone};
use crate::report::{AnalysisReport, AssistResult, SummaryReport, Urgency};
use async_trait::async_trait;

/// Produces the result of an assist request.
#[async_trait]
pub trait AnalysisProvider: Send + Sync {
    /// Runs the request to completion.
    async fn produce(&self, request: AssistRequest) -> AssistResult;

    /// Short provider name for logs.
    fn name(&self) -> &str;
}

/// Provider returning fixed reports, independent of conversation content.
#[derive(Debug, Clone, Copy, Default)]
pub struct CannedProvider;

impl CannedProvider {
    /// Synchronous form of [`AnalysisProvider::produce`].
    #[must_use]
    pub fn result_for(request: AssistRequest) -> AssistResult {
        match request {
            AssistRequest::Analyze => AssistResult::Analysis(analysis_report()),
            AssistRequest::Summarize => AssistResult::Summary(summary_report()),
            AssistRequest::Generate(tone) => AssistResult::Reply {
                tone,
                text: reply_for(tone).to_string(),
            },
        }
    }
}

#[async_trait]
impl AnalysisProvider for CannedProvider {
    async fn produce(&self, request: AssistRequest) -> AssistResult {
        Self::result_for(request)
    }

    fn name(&self) -> &str {
        "canned"
    }
}

fn analysis_report() -> AnalysisReport {
    AnalysisReport {
        sentiment: "Positive".to_string(),
        confidence_pct: 85,
        topics: vec![
            "Project updates".to_string(),
            "Meeting scheduling".to_string(),
            "Deadline discussion".to_string(),
        ],
        urgency: Urgency::Medium,
        commentary: "The conversation shows collaborative tone with focus on upcoming deliverables."
            .to_string(),
    }
}

fn summary_report() -> SummaryReport {
    SummaryReport {
        narrative: "Alex discussed the project timeline and requested a meeting next week."
            .to_string(),
        key_points: vec![
            "Phase 1 completion expected by Friday".to_string(),
            "Need to review design mockups".to_string(),
            "Budget approval pending".to_string(),
        ],
        action_items: vec![
            "Schedule review meeting".to_string(),
            "prepare presentation".to_string(),
        ],
    }
}

fn reply_for(tone: Tone) -> &'static str {
    match tone {
        Tone::Professional => {
            "Thanks for the update! I'll review the documents and get back to you by EOD tomorrow."
        }
        Tone::Casual => "Sounds good! Let me take a look and we can sync up later.",
        Tone::Detailed => {
            "I appreciate you sharing this. I'll thoroughly review the materials and prepare my feedback for our next meeting."
        }
    }
}
