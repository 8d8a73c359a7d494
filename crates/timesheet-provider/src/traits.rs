//! Provider trait and errors

use async_trait::async_trait;
use thiserror::Error;
use timesheet_api::{TimesheetRequest, TimesheetResult};

/// Transport-level failures.
///
/// A provider that answers "student not found" is not an error: that comes
/// back as a [`TimesheetResult`] with `success == false`.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid base URL '{value}': {message}")]
    InvalidUrl { value: String, message: String },

    #[error("Unexpected HTTP status: {0}")]
    Status(u16),

    #[error("Invalid response body: {0}")]
    Decode(String),

    #[error("Simulated network failure")]
    Simulated,
}

pub type ProviderResult<T> = Result<T, ProviderError>;

/// Source of timesheets, implemented by the mock and remote providers
#[async_trait]
pub trait TimesheetProvider: Send + Sync {
    /// Short name for logs
    fn name(&self) -> &'static str;

    /// Fetch the timesheet for `request.student_id`
    async fn fetch(&self, request: &TimesheetRequest) -> ProviderResult<TimesheetResult>;
}
