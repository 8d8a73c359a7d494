//! Validated settings

use crate::schema::{RawConfig, RawMockData, RawProviderConfig, RawRefreshConfig};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use timesheet_api::{ScheduleEntry, Student};

/// Default remote request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default simulated latency of the mock provider
pub const DEFAULT_MOCK_LATENCY: Duration = Duration::from_millis(500);

/// Default interval for re-deriving the current class
pub const DEFAULT_CURRENT_CLASS_INTERVAL: Duration = Duration::from_secs(60);

/// Default interval of the displayed clock
pub const DEFAULT_CLOCK_INTERVAL: Duration = Duration::from_secs(1);

/// Validated settings ready for use by the front end
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub provider: ProviderSettings,
    pub refresh: RefreshSettings,
    /// Replacement mock dataset; `None` means the built-in one
    pub mock: Option<MockData>,
}

impl Settings {
    /// Convert from raw config (after validation)
    pub fn from_raw(raw: RawConfig) -> Self {
        Self {
            provider: ProviderSettings::from_raw(raw.provider),
            refresh: RefreshSettings::from_raw(raw.refresh),
            mock: raw.mock.map(MockData::from_raw),
        }
    }
}

/// Which provider implementation serves timesheets
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProviderKind {
    #[default]
    Mock,
    Remote,
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderKind::Mock => f.write_str("mock"),
            ProviderKind::Remote => f.write_str("remote"),
        }
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mock" => Ok(ProviderKind::Mock),
            "remote" | "api" => Ok(ProviderKind::Remote),
            other => Err(format!("Unknown provider kind: {}", other)),
        }
    }
}

/// Provider configuration
#[derive(Debug, Clone)]
pub struct ProviderSettings {
    pub kind: ProviderKind,
    pub base_url: Option<String>,
    pub timeout: Duration,
    pub mock_latency: Duration,
}

impl ProviderSettings {
    fn from_raw(raw: RawProviderConfig) -> Self {
        Self {
            kind: raw
                .kind
                .as_deref()
                .and_then(|k| k.parse().ok())
                .unwrap_or_default(),
            base_url: raw.base_url,
            timeout: raw
                .timeout_seconds
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_TIMEOUT),
            mock_latency: raw
                .mock_latency_ms
                .map(Duration::from_millis)
                .unwrap_or(DEFAULT_MOCK_LATENCY),
        }
    }
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            kind: ProviderKind::Mock,
            base_url: None,
            timeout: DEFAULT_TIMEOUT,
            mock_latency: DEFAULT_MOCK_LATENCY,
        }
    }
}

/// Periodic task intervals
#[derive(Debug, Clone)]
pub struct RefreshSettings {
    pub current_class: Duration,
    pub clock: Duration,
}

impl RefreshSettings {
    fn from_raw(raw: RawRefreshConfig) -> Self {
        Self {
            current_class: raw
                .current_class_seconds
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_CURRENT_CLASS_INTERVAL),
            clock: raw
                .clock_seconds
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_CLOCK_INTERVAL),
        }
    }
}

impl Default for RefreshSettings {
    fn default() -> Self {
        Self {
            current_class: DEFAULT_CURRENT_CLASS_INTERVAL,
            clock: DEFAULT_CLOCK_INTERVAL,
        }
    }
}

/// Roster and shared class list served by the mock provider
#[derive(Debug, Clone, Default)]
pub struct MockData {
    pub students: Vec<Student>,
    pub classes: Vec<ScheduleEntry>,
}

impl MockData {
    fn from_raw(raw: RawMockData) -> Self {
        Self {
            students: raw.students,
            classes: raw.classes,
        }
    }
}
