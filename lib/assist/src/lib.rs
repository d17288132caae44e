//! Assist workflow for the omnichat inbox.
//!
//! The assist panel offers three modes on top of the active conversation:
//!
//! - **Analyze**: sentiment, topics and urgency report
//! - **Summarize**: narrative summary with action items
//! - **Generate**: a reply suggestion in a chosen tone
//!
//! [`AssistSession`] is the state machine behind the panel. Results come
//! from an [`AnalysisProvider`]; the bundled [`CannedProvider`] returns
//! fixed reports.

pub mod config;
pub mod error;
pub mod mode;
pub mod provider;
pub mod report;
pub mod session;

pub use config::AssistConfig;
pub use error::AssistError;
pub use mode::{AssistMode, AssistRequest, ParseAssistError, Tone};
pub use provider::{AnalysisProvider, CannedProvider};
pub use report::{AnalysisReport, AssistResult, SummaryReport, Urgency};
pub use session::{AssistJob, AssistPhase, AssistSession, Completion};
