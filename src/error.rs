//! Error types for the gerrit-cl CLI.
//!
//! Uses thiserror for derive macros and provides user-actionable error messages.

use crate::exit_codes;
use thiserror::Error;

/// Main error type for gerrit-cl operations.
///
/// Each variant maps to a specific exit code.
#[derive(Error, Debug)]
pub enum ClError {
    /// The repository is in a state the requested command cannot work with.
    #[error("{0}")]
    UserError(String),

    /// Configuration file or remote setup is invalid.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The review system returned more than one change for a single Change-Id.
    #[error(
        "Multiple review changes found for commit {sha}: {title}.\n\
         Each local commit must map to at most one remote change; resolve the duplicates on the review server."
    )]
    ReviewLookupConflict { sha: String, title: String },

    /// The review system could not be queried or returned malformed data.
    #[error("Review system request failed: {0}")]
    ReviewError(String),

    /// Git operation failed.
    #[error("Git operation failed: {0}")]
    GitError(String),

    /// Local I/O failed (terminal output, hook installation).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ClError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            ClError::UserError(_) => exit_codes::USER_ERROR,
            ClError::ConfigError(_) => exit_codes::USER_ERROR,
            ClError::ReviewLookupConflict { .. } => exit_codes::REVIEW_FAILURE,
            ClError::ReviewError(_) => exit_codes::REVIEW_FAILURE,
            ClError::GitError(_) => exit_codes::GIT_FAILURE,
            ClError::Io(_) => exit_codes::USER_ERROR,
        }
    }
}

/// Result type alias for gerrit-cl operations.
pub type Result<T> = std::result::Result<T, ClError>;
