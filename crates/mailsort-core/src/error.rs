//! Error types for the core library.

use thiserror::Error;

/// Errors that abort a run.
///
/// Per-message failures are not errors at this level; they end up in the
/// [`RunReport`](crate::RunReport).
#[derive(Debug, Error)]
pub enum Error {
    /// The root or container folder is missing or cannot be created.
    #[error("Structural error: {0}")]
    Structural(String),

    /// The mail server could not be reached or refused a run-level step.
    #[error("Transport error: {0}")]
    Transport(#[from] mailsort_imap::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
