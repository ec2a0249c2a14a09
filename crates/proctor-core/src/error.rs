//! Session error types.
//!
//! These are the domain failures surfaced to the candidate-facing layer.
//! Storage and IO failures travel as `anyhow::Error` instead and are
//! degraded to empty collections before they reach a session.

use thiserror::Error;

use crate::engine::SessionPhase;

/// Errors produced by the session surface and the report lookup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// The requested test id does not resolve. Terminal for the session.
    #[error("test not found: {0}")]
    TestNotFound(String),

    /// The option index is outside the question's option range.
    #[error("invalid option {option_index} for question {question_id} ({option_count} options)")]
    InvalidOption {
        question_id: String,
        option_index: usize,
        option_count: usize,
    },

    /// The question id is not part of the loaded test.
    #[error("unknown question: {0}")]
    UnknownQuestion(String),

    /// The operation requires an active session.
    #[error("session is not active (phase: {phase})")]
    SessionNotActive { phase: SessionPhase },

    /// No submission has been archived for the test yet.
    #[error("results not found for test {0}")]
    SubmissionNotFound(String),
}

impl SessionError {
    /// Returns `true` if the session cannot continue after this error.
    pub fn is_fatal(&self) -> bool {
        matches!(self, SessionError::TestNotFound(_))
    }
}
