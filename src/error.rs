//! Unified error hierarchy for TrainLog
//!
//! Only structurally invalid input is an error here. A comparison that lacks
//! samples is a normal outcome and is modelled with `Option`/enum variants in
//! the analysis modules instead.

use std::path::PathBuf;
use thiserror::Error;

use crate::export::ExportError;

/// Top-level error type for all TrainLog operations
#[derive(Debug, Error)]
pub enum TrainLogError {
    /// Malformed date, pace or duration text
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// Entry store failures
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Export failures
    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    /// Entry violates a data model invariant
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Errors raised while parsing the text forms used by entries
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Date is not a valid `YYYY-MM-DD` calendar date
    #[error("Invalid date '{input}': expected YYYY-MM-DD")]
    InvalidDate { input: String },

    /// Pace is not a valid `M:SS` value
    #[error("Invalid pace '{input}': {reason}")]
    InvalidPace { input: String, reason: String },

    /// Finish time is not a valid `H:MM:SS` value
    #[error("Invalid duration '{input}': expected H:MM:SS")]
    InvalidDuration { input: String },

    /// Distance and finish time do not give a usable pace
    #[error("Cannot compute pace: {reason}")]
    InvalidRun { reason: String },
}

/// Entry store errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// Backing file could not be read
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Backing file could not be written
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Backing file is not a valid entry list
    #[error("Malformed entry file {path}: {reason}")]
    Malformed { path: PathBuf, reason: String },

    /// A stored record breaks an entry invariant
    #[error("Invalid record at index {index}: {reason}")]
    InvalidRecord { index: usize, reason: String },
}

/// Result type alias for TrainLog operations
pub type Result<T> = std::result::Result<T, TrainLogError>;

impl TrainLogError {
    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            TrainLogError::Parse(_) => ErrorSeverity::Warning,
            TrainLogError::Validation(_) => ErrorSeverity::Warning,
            TrainLogError::Store(StoreError::Malformed { .. }) => ErrorSeverity::Critical,
            TrainLogError::Store(StoreError::InvalidRecord { .. }) => ErrorSeverity::Critical,
            _ => ErrorSeverity::Error,
        }
    }

    /// Get user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            TrainLogError::Parse(ParseError::InvalidPace { input, .. }) => {
                format!("'{}' is not a pace. Use minutes:seconds per mile, e.g. 7:45", input)
            }
            TrainLogError::Parse(ParseError::InvalidDate { input }) => {
                format!("'{}' is not a date. Use YYYY-MM-DD, e.g. 2024-03-18", input)
            }
            TrainLogError::Store(StoreError::Malformed { path, .. }) => {
                format!(
                    "Training data in {} could not be read. Fix or move the file and try again.",
                    path.display()
                )
            }
            _ => self.to_string(),
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Stored data is unusable
    Critical,
    /// Operation failed
    Error,
    /// Input was rejected and can be re-entered
    Warning,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_severity() {
        let err = TrainLogError::Parse(ParseError::InvalidDate {
            input: "2024-13-01".to_string(),
        });
        assert_eq!(err.severity(), ErrorSeverity::Warning);

        let err = TrainLogError::Store(StoreError::Malformed {
            path: PathBuf::from("training_data.json"),
            reason: "expected array".to_string(),
        });
        assert_eq!(err.severity(), ErrorSeverity::Critical);
    }

    #[test]
    fn test_user_messages() {
        let err = TrainLogError::Parse(ParseError::InvalidPace {
            input: "1:07:30".to_string(),
            reason: "expected M:SS".to_string(),
        });
        assert!(err.user_message().contains("minutes:seconds"));

        let err = TrainLogError::Validation("rpe out of range".to_string());
        assert_eq!(err.user_message(), "Validation error: rpe out of range");
    }
}
