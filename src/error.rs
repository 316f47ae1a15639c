//! Errors surfaced to the user by console actions.
//!
//! Every variant ends the current action. Nothing is retried.

use std::time::Duration;

use thiserror::Error;

use crate::import::ImportError;
use crate::task::TaskError;

#[derive(Debug, Error)]
pub enum ConsoleError {
    /// Bulk-import text is not a valid task batch; the store is untouched.
    #[error(transparent)]
    ImportParse(#[from] ImportError),

    /// Analysis requested with nothing to analyze; no request was sent.
    #[error("Please add some tasks first.")]
    EmptyInput,

    #[error("Failed to analyze tasks: {message}")]
    AnalysisRequest { message: String },

    #[error("Failed to get suggestions: {message}")]
    SuggestionRequest { message: String },

    #[error("{operation} timed out after {}s", .after.as_secs())]
    Timeout {
        operation: &'static str,
        after: Duration,
    },

    /// Another request is still running.
    #[error("A request is already in progress; wait for it to finish")]
    RequestInFlight,

    #[error(transparent)]
    InvalidTask(#[from] TaskError),
}
