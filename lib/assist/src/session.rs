//! Assist session state machine.
//!
//! ```text
//! Closed --open--> Idle(Analyze)
//! any open --select_mode(Analyze|Summarize)--> Idle(mode)
//! any open --select_mode(Generate)--> AwaitingTone
//! Idle(Analyze|Summarize) --start--> Processing(token)
//! AwaitingTone|Processing|ResultReady --select_tone (Generate)--> Processing(token)
//! Processing(token) --complete(token)--> ResultReady
//! any open --reset--> Idle(mode) | AwaitingTone
//! any --close--> Closed
//! ```
//!
//! Jobs are never cancelled. Every start issues a fresh [`JobToken`] and a
//! completion is applied only if it carries the token the session is
//! currently waiting for; anything else is stale and dropped.

use crate::error::AssistError;
use crate::mode::{AssistMode, AssistRequest, Tone};
use crate::report::AssistResult;
use omnichat_core::JobToken;
use serde::Serialize;
use tracing::debug;

/// Where the assist workflow currently is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum AssistPhase {
    /// The panel is closed.
    Closed,
    /// Waiting for the user to start an Analyze or Summarize job.
    Idle,
    /// Generate mode, waiting for a tone.
    AwaitingTone,
    /// A job is running.
    Processing {
        /// Token of the job the session waits for.
        token: JobToken,
        /// What the job computes.
        request: AssistRequest,
    },
    /// A result is available.
    ResultReady {
        /// The finished result.
        result: AssistResult,
    },
}

/// A job the caller must run and report back through [`AssistSession::complete`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssistJob {
    /// Token identifying this job.
    pub token: JobToken,
    /// What to compute.
    pub request: AssistRequest,
}

/// A finished job, delivered back to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    /// Token of the job that finished.
    pub token: JobToken,
    /// What it produced.
    pub result: AssistResult,
}

/// The state behind one assist panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssistSession {
    mode: AssistMode,
    tone: Option<Tone>,
    #[serde(flatten)]
    phase: AssistPhase,
}

impl Default for AssistSession {
    fn default() -> Self {
        Self::new()
    }
}

impl AssistSession {
    /// Creates a closed session.
    #[must_use]
    pub fn new() -> Self {
        Self {
            mode: AssistMode::default(),
            tone: None,
            phase: AssistPhase::Closed,
        }
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> &AssistPhase {
        &self.phase
    }

    /// Current mode. Meaningless while closed.
    #[must_use]
    pub fn mode(&self) -> AssistMode {
        self.mode
    }

    /// Tone of the latest Generate job, if one was started.
    #[must_use]
    pub fn tone(&self) -> Option<Tone> {
        self.tone
    }

    /// Returns true unless the panel is closed.
    #[must_use]
    pub fn is_open(&self) -> bool {
        !matches!(self.phase, AssistPhase::Closed)
    }

    /// Token of the job in flight, if any.
    #[must_use]
    pub fn pending_token(&self) -> Option<JobToken> {
        match self.phase {
            AssistPhase::Processing { token, .. } => Some(token),
            _ => None,
        }
    }

    /// The finished result, if any.
    #[must_use]
    pub fn result(&self) -> Option<&AssistResult> {
        match &self.phase {
            AssistPhase::ResultReady { result } => Some(result),
            _ => None,
        }
    }

    /// Short description of the phase, used in errors.
    #[must_use]
    pub fn phase_label(&self) -> &'static str {
        match (&self.phase, self.mode) {
            (AssistPhase::Closed, _) => "closed",
            (AssistPhase::Idle, AssistMode::Analyze) => "idle (analyze)",
            (AssistPhase::Idle, AssistMode::Summarize) => "idle (summarize)",
            (AssistPhase::Idle, AssistMode::Generate) => "idle (generate)",
            (AssistPhase::AwaitingTone, _) => "awaiting tone",
            (AssistPhase::Processing { .. }, _) => "processing",
            (AssistPhase::ResultReady { .. }, _) => "result ready",
        }
    }

    /// Opens the panel in Analyze mode.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` if the panel is already open.
    pub fn open(&mut self) -> Result<(), AssistError> {
        if self.is_open() {
            return Err(self.invalid("open"));
        }
        self.mode = AssistMode::Analyze;
        self.tone = None;
        self.phase = AssistPhase::Idle;
        Ok(())
    }

    /// Switches mode, discarding any result and orphaning any running job.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` if the panel is closed.
    pub fn select_mode(&mut self, mode: AssistMode) -> Result<(), AssistError> {
        if !self.is_open() {
            return Err(self.invalid("select mode"));
        }
        if let Some(token) = self.pending_token() {
            debug!(%token, %mode, "mode switch orphans running assist job");
        }
        self.mode = mode;
        self.restart();
        Ok(())
    }

    /// Starts an Analyze job.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless idle in Analyze mode.
    pub fn start_analysis(&mut self) -> Result<AssistJob, AssistError> {
        self.start_from_idle(AssistMode::Analyze, AssistRequest::Analyze, "start analysis")
    }

    /// Starts a Summarize job.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless idle in Summarize mode.
    pub fn start_summary(&mut self) -> Result<AssistJob, AssistError> {
        self.start_from_idle(AssistMode::Summarize, AssistRequest::Summarize, "start summary")
    }

    /// Starts the job of the current mode.
    ///
    /// Generate mode has no tone-less job, so it is rejected there.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless idle in Analyze or Summarize mode.
    pub fn start(&mut self) -> Result<AssistJob, AssistError> {
        match self.mode {
            AssistMode::Analyze => self.start_analysis(),
            AssistMode::Summarize => self.start_summary(),
            AssistMode::Generate => Err(self.invalid("start without a tone")),
        }
    }

    /// Starts a Generate job in the given tone.
    ///
    /// Also accepted while a Generate job is running or finished; the new
    /// job supersedes the earlier one.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` outside Generate mode or while closed.
    pub fn select_tone(&mut self, tone: Tone) -> Result<AssistJob, AssistError> {
        let allowed = self.mode == AssistMode::Generate
            && matches!(
                self.phase,
                AssistPhase::AwaitingTone
                    | AssistPhase::Processing { .. }
                    | AssistPhase::ResultReady { .. }
            );
        if !allowed {
            return Err(self.invalid("select tone"));
        }
        self.tone = Some(tone);
        Ok(self.issue(AssistRequest::Generate(tone)))
    }

    /// Delivers a finished job.
    ///
    /// Returns true if the result was applied, false if the completion was
    /// stale and dropped without any state change.
    pub fn complete(&mut self, completion: Completion) -> bool {
        match self.phase {
            AssistPhase::Processing { token, .. } if token == completion.token => {
                self.phase = AssistPhase::ResultReady {
                    result: completion.result,
                };
                true
            }
            _ => {
                debug!(
                    token = %completion.token,
                    phase = self.phase_label(),
                    "discarding stale assist completion"
                );
                false
            }
        }
    }

    /// Returns to the start of the current mode, discarding any result.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` if the panel is closed.
    pub fn reset(&mut self) -> Result<(), AssistError> {
        if !self.is_open() {
            return Err(self.invalid("reset"));
        }
        self.restart();
        Ok(())
    }

    /// Closes the panel and forgets everything, including running jobs.
    pub fn close(&mut self) {
        *self = Self::new();
    }

    fn restart(&mut self) {
        self.tone = None;
        self.phase = if self.mode.needs_tone() {
            AssistPhase::AwaitingTone
        } else {
            AssistPhase::Idle
        };
    }

    fn start_from_idle(
        &mut self,
        mode: AssistMode,
        request: AssistRequest,
        operation: &'static str,
    ) -> Result<AssistJob, AssistError> {
        if self.mode != mode || self.phase != AssistPhase::Idle {
            return Err(self.invalid(operation));
        }
        Ok(self.issue(request))
    }

    fn issue(&mut self, request: AssistRequest) -> AssistJob {
        let token = JobToken::new();
        self.phase = AssistPhase::Processing { token, request };
        AssistJob { token, request }
    }

    fn invalid(&self, operation: &'static str) -> AssistError {
        AssistError::InvalidTransition {
            phase: self.phase_label(),
            operation,
        }
    }
}
