//! Error handling for the combinaut CLI.
//!
//! Structured error types using `thiserror`, distinguishing the fatal
//! conditions the orchestrator can hit from the recoverable ones (which are
//! logged and skipped rather than surfaced here).

use thiserror::Error;

/// Top-level error type for combinaut.
#[derive(Error, Debug)]
pub enum CombError {
    /// A rule line failed to parse.
    #[error("rule parse error at line {line}: {message}")]
    RuleParse { line: u64, message: String },

    /// An invalid combination of CLI flags was supplied.
    #[error("invalid flags: {0}")]
    InvalidFlags(String),

    /// Configuration file could not be loaded or parsed.
    #[error("configuration error: {0}")]
    Config(String),

    /// Underlying I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using [`CombError`].
pub type Result<T> = std::result::Result<T, CombError>;
