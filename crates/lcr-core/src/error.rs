//! Error types for lcr operations.
//!
//! This module provides the error hierarchy used by the scheduling engine and
//! the stores, with structured error codes and suggestions for resolution.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use thiserror::Error;

/// Result type alias for lcr operations.
pub type LcrResult<T> = Result<T, LcrError>;

/// Main error type for all lcr operations.
#[derive(Error, Debug)]
pub enum LcrError {
    /// Input validation failed.
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        code: ErrorCode,
        details: HashMap<String, String>,
        suggestion: Option<String>,
    },

    /// Problem, review or session not found.
    #[error("Not found: {message}")]
    NotFound {
        message: String,
        code: ErrorCode,
        problem_id: Option<String>,
    },

    /// A timer is already running for the problem.
    #[error("Session already active for problem '{problem_id}' (started at {started_at})")]
    DuplicateSession {
        problem_id: String,
        started_at: DateTime<Utc>,
    },

    /// A chain invariant was violated. Indicates a bug or corrupted data.
    #[error("Consistency error: {message}")]
    Consistency {
        message: String,
        code: ErrorCode,
        chain_id: Option<String>,
    },

    /// Database operation failed.
    #[error("Database error: {message}")]
    Database {
        message: String,
        code: ErrorCode,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Parse error.
    #[error("Parse error: {message}")]
    Parse { message: String, code: ErrorCode },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Error codes for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Validation (VAL_xxx)
    ValInvalidInput,
    ValInvalidCount,
    ValInvalidIntervals,
    ValInvalidRandomization,
    ValInvalidDate,
    ValInvalidProblemInput,
    ValReviewAlreadyCompleted,

    // Not found (NF_xxx)
    NfProblem,
    NfSession,
    NfReview,

    // Session (SES_xxx)
    SesDuplicate,

    // Consistency (CON_xxx)
    ConDuplicateIteration,
    ConChainMismatch,
    ConInvalidState,

    // Database (DB_xxx)
    DbConnectionFailed,
    DbOperationFailed,

    // Parse (PARSE_xxx)
    ParseInvalidColumn,
    ParseInvalidJson,

    // Configuration and IO failures
    Internal,
}

impl ErrorCode {
    /// Get the string representation of the error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ValInvalidInput => "VAL_001",
            ErrorCode::ValInvalidCount => "VAL_002",
            ErrorCode::ValInvalidIntervals => "VAL_003",
            ErrorCode::ValInvalidRandomization => "VAL_004",
            ErrorCode::ValInvalidDate => "VAL_005",
            ErrorCode::ValInvalidProblemInput => "VAL_006",
            ErrorCode::ValReviewAlreadyCompleted => "VAL_007",
            ErrorCode::NfProblem => "NF_001",
            ErrorCode::NfSession => "NF_003",
            ErrorCode::NfReview => "NF_004",
            ErrorCode::SesDuplicate => "SES_001",
            ErrorCode::ConDuplicateIteration => "CON_001",
            ErrorCode::ConChainMismatch => "CON_002",
            ErrorCode::ConInvalidState => "CON_003",
            ErrorCode::DbConnectionFailed => "DB_001",
            ErrorCode::DbOperationFailed => "DB_002",
            ErrorCode::ParseInvalidColumn => "PARSE_001",
            ErrorCode::ParseInvalidJson => "PARSE_002",
            ErrorCode::Internal => "INT_001",
        }
    }
}

impl LcrError {
    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::validation_code(ErrorCode::ValInvalidInput, message)
    }

    /// Create a validation error with a specific code.
    pub fn validation_code(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            code,
            details: HashMap::new(),
            suggestion: None,
        }
    }

    /// Create a validation error with suggestion.
    pub fn validation_with_suggestion(
        code: ErrorCode,
        message: impl Into<String>,
        suggestion: impl Into<String>,
    ) -> Self {
        Self::Validation {
            message: message.into(),
            code,
            details: HashMap::new(),
            suggestion: Some(suggestion.into()),
        }
    }

    /// Create a not found error for a problem.
    pub fn problem_not_found(problem_id: impl Into<String>, operation: &str) -> Self {
        let id = problem_id.into();
        Self::NotFound {
            message: format!("Problem '{}' not found ({})", id, operation),
            code: ErrorCode::NfProblem,
            problem_id: Some(id),
        }
    }

    /// Create a not found error for a missing active session.
    pub fn session_not_found(problem_id: impl Into<String>) -> Self {
        let id = problem_id.into();
        Self::NotFound {
            message: format!("No active session for problem '{}'", id),
            code: ErrorCode::NfSession,
            problem_id: Some(id),
        }
    }

    /// Create a not found error for a review.
    pub fn not_found(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
            code,
            problem_id: None,
        }
    }

    /// Create a consistency error.
    pub fn consistency(code: ErrorCode, chain_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Consistency {
            message: message.into(),
            code,
            chain_id: Some(chain_id.into()),
        }
    }

    /// Create a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            code: ErrorCode::ParseInvalidColumn,
        }
    }

    /// Create a database error.
    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
            code: ErrorCode::DbOperationFailed,
            source: None,
        }
    }

    /// Get the error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Validation { code, .. } => *code,
            Self::NotFound { code, .. } => *code,
            Self::DuplicateSession { .. } => ErrorCode::SesDuplicate,
            Self::Consistency { code, .. } => *code,
            Self::Database { code, .. } => *code,
            Self::Parse { code, .. } => *code,
            Self::Serialization(_) => ErrorCode::ParseInvalidJson,
            _ => ErrorCode::Internal,
        }
    }

    /// Get a user-friendly suggestion for resolving this error.
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            Self::Validation { suggestion, .. } => suggestion.as_deref(),
            Self::NotFound {
                code: ErrorCode::NfProblem,
                ..
            } => Some("Register the problem first with `lcr add <id>`"),
            Self::NotFound {
                code: ErrorCode::NfSession,
                ..
            } => Some("Start a timer first with `lcr start <id>`"),
            Self::DuplicateSession { .. } => Some("End the running timer with `lcr end <id>` first"),
            Self::Consistency { .. } => Some("The review chain is inconsistent; please report this as a bug"),
            Self::Configuration(_) => Some("Check your .lcrrc or ~/.config/lcr/config.yaml"),
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for LcrError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Database {
            message: err.to_string(),
            code: ErrorCode::DbOperationFailed,
            source: Some(Box::new(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error() {
        let err = LcrError::validation_code(ErrorCode::ValInvalidCount, "count must be at least 1");
        assert_eq!(err.code(), ErrorCode::ValInvalidCount);
        assert!(err.to_string().contains("count must be at least 1"));
    }

    #[test]
    fn test_problem_not_found_error() {
        let err = LcrError::problem_not_found("42", "checkin");
        assert_eq!(err.code(), ErrorCode::NfProblem);
        assert!(err.to_string().contains("'42'"));
        assert!(err.to_string().contains("checkin"));
        assert!(err.suggestion().is_some());
    }

    #[test]
    fn test_duplicate_session_code() {
        let err = LcrError::DuplicateSession {
            problem_id: "1".to_string(),
            started_at: Utc::now(),
        };
        assert_eq!(err.code(), ErrorCode::SesDuplicate);
        assert!(err.suggestion().is_some());
    }

    #[test]
    fn test_uncoded_errors_map_to_internal() {
        let err = LcrError::Configuration("bad".to_string());
        assert_eq!(err.code(), ErrorCode::Internal);
        assert!(err.suggestion().is_some());

        let err = LcrError::from(std::io::Error::new(std::io::ErrorKind::Other, "disk"));
        assert_eq!(err.code(), ErrorCode::Internal);
    }

    #[test]
    fn test_error_code_as_str() {
        assert_eq!(ErrorCode::ValInvalidInput.as_str(), "VAL_001");
        assert_eq!(ErrorCode::NfProblem.as_str(), "NF_001");
        assert_eq!(ErrorCode::ConDuplicateIteration.as_str(), "CON_001");
    }
}
