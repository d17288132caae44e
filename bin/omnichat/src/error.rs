//! Console errors.

use std::fmt;

/// Errors that end a console session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleError {
    /// Reading a line failed.
    Input { details: String },
    /// Writing to the terminal failed.
    Output { details: String },
    /// The state could not be rendered.
    Render { details: String },
}

impl fmt::Display for ConsoleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Input { details } => write!(f, "failed to read input: {details}"),
            Self::Output { details } => write!(f, "failed to write output: {details}"),
            Self::Render { details } => write!(f, "failed to render state: {details}"),
        }
    }
}

impl std::error::Error for ConsoleError {}
