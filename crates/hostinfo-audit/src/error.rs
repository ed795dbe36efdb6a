//! Error types for the population audit.
//!
//! Data problems are never errors here: a bad value is a violation and an
//! unreadable record is skipped. Only a sink that cannot accept output stops
//! an audit.

use thiserror::Error;

/// Errors that can end an audit.
#[derive(Debug, Error)]
pub enum AuditError {
    /// The violation sink failed to write.
    #[error("violation sink failed: {0}")]
    Sink(#[from] std::io::Error),
}

impl From<serde_json::Error> for AuditError {
    fn from(err: serde_json::Error) -> Self {
        AuditError::Sink(err.into())
    }
}

/// Result type for audit operations.
pub type Result<T> = std::result::Result<T, AuditError>;
