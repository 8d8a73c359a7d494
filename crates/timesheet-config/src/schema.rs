//! Raw configuration schema (as parsed from TOML)

use serde::{Deserialize, Serialize};
use timesheet_api::{ScheduleEntry, Student};

/// Raw configuration as parsed from TOML
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawConfig {
    /// Config schema version
    pub config_version: u32,

    /// Where timesheets come from
    #[serde(default)]
    pub provider: RawProviderConfig,

    /// Periodic task intervals
    #[serde(default)]
    pub refresh: RawRefreshConfig,

    /// Replacement dataset for the mock provider
    #[serde(default)]
    pub mock: Option<RawMockData>,
}

/// Provider settings
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawProviderConfig {
    /// "mock" (default) or "remote"
    pub kind: Option<String>,

    /// Base URL of the remote service, e.g. `https://timetable.example.edu`
    pub base_url: Option<String>,

    /// Remote request timeout
    pub timeout_seconds: Option<u64>,

    /// Simulated latency of the mock provider
    pub mock_latency_ms: Option<u64>,
}

/// Refresh intervals
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawRefreshConfig {
    /// How often the current class is re-derived (default 60)
    pub current_class_seconds: Option<u64>,

    /// How often the displayed clock ticks (default 1)
    pub clock_seconds: Option<u64>,
}

/// Mock roster and class list.
///
/// Classes use the same field names as the remote JSON (`className`,
/// `startTime`, ...), so times and days are checked while parsing.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawMockData {
    #[serde(default)]
    pub students: Vec<Student>,

    #[serde(default)]
    pub classes: Vec<ScheduleEntry>,
}
