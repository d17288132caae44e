//! Error types for the assist crate.

use std::fmt;

/// Errors from the assist session state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssistError {
    /// The operation is not allowed in the current phase or mode.
    ///
    /// The session is left unchanged.
    InvalidTransition {
        /// Phase the session was in.
        phase: &'static str,
        /// Operation that was attempted.
        operation: &'static str,
    },
}

impl fmt::Display for AssistError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTransition { phase, operation } => {
                write!(f, "cannot {operation} while assist session is {phase}")
            }
        }
    }
}

impl std::error::Error for AssistError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_transition_display() {
        let err = AssistError::InvalidTransition {
            phase: "closed",
            operation: "select tone",
        };
        assert_eq!(
            err.to_string(),
            "cannot select tone while assist session is closed"
        );
    }
}
