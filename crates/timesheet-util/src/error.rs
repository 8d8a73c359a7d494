//! Error types shared across the timesheet crates

use thiserror::Error;

/// Error type for parsing and validating shared value types
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimesheetError {
    #[error("Invalid time of day '{value}': {message}")]
    InvalidTime { value: String, message: String },

    #[error("Invalid day of week: {0}")]
    InvalidDay(String),

    #[error("Invalid session token: {0}")]
    InvalidSessionToken(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl TimesheetError {
    pub fn invalid_time(value: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidTime {
            value: value.into(),
            message: message.into(),
        }
    }

    pub fn invalid_day(value: impl Into<String>) -> Self {
        Self::InvalidDay(value.into())
    }

    pub fn session_token(msg: impl Into<String>) -> Self {
        Self::InvalidSessionToken(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, TimesheetError>;
