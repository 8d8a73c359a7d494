//! Time utilities for the timesheet workspace
//!
//! Provides the wall-clock time of day used by schedule entries, weekday
//! names, and an injectable [`Clock`] so evaluation and timers can be driven
//! without waiting on the real wall clock.
//!
//! # Mock Time for Development
//!
//! In debug builds, the `TIMESHEET_MOCK_TIME` environment variable can be set
//! to override the system time seen by [`SystemClock`]. Mock time then advances
//! at the same rate as real time, which makes it easy to watch the current
//! class move along a known schedule.
//!
//! Format: `YYYY-MM-DD HH:MM:SS` (e.g., `2025-01-13 09:30:00`)
//!
//! Example:
//! ```bash
//! TIMESHEET_MOCK_TIME="2025-01-13 09:30:00" timesheet 12345 --watch
//! ```

use chrono::{DateTime, Datelike, Local, NaiveDateTime, NaiveTime, TimeZone, Timelike, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::{Mutex, OnceLock};

use crate::{Result, TimesheetError};

/// Environment variable name for mock time (debug builds only)
pub const MOCK_TIME_ENV_VAR: &str = "TIMESHEET_MOCK_TIME";

/// Format accepted by [`MOCK_TIME_ENV_VAR`]
pub const MOCK_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Cached mock time offset from the real time when the process started.
static MOCK_TIME_OFFSET: OnceLock<Option<chrono::Duration>> = OnceLock::new();

fn get_mock_time_offset() -> Option<chrono::Duration> {
    *MOCK_TIME_OFFSET.get_or_init(|| {
        #[cfg(debug_assertions)]
        {
            if let Ok(mock_time_str) = std::env::var(MOCK_TIME_ENV_VAR) {
                return mock_offset_from(&mock_time_str, Local::now());
            }
            None
        }
        #[cfg(not(debug_assertions))]
        {
            None
        }
    })
}

/// Offset between a mock wall time string and `real_now`
#[cfg_attr(not(debug_assertions), allow(dead_code))]
fn mock_offset_from(mock_time_str: &str, real_now: DateTime<Local>) -> Option<chrono::Duration> {
    let Ok(naive_dt) = NaiveDateTime::parse_from_str(mock_time_str, MOCK_TIME_FORMAT) else {
        tracing::warn!(
            mock_time = %mock_time_str,
            expected_format = MOCK_TIME_FORMAT,
            "Invalid mock time format"
        );
        return None;
    };

    match Local.from_local_datetime(&naive_dt).single() {
        Some(mock_dt) => {
            let offset = mock_dt.signed_duration_since(real_now);
            tracing::info!(
                mock_time = %mock_time_str,
                offset_secs = offset.num_seconds(),
                "Mock time enabled"
            );
            Some(offset)
        }
        None => {
            tracing::warn!(
                mock_time = %mock_time_str,
                "Failed to convert mock time to local timezone"
            );
            None
        }
    }
}

/// Returns whether mock time is currently active.
pub fn is_mock_time_active() -> bool {
    get_mock_time_offset().is_some()
}

/// Get the current local time, respecting mock time settings in debug builds.
pub fn now() -> DateTime<Local> {
    let real_now = Local::now();

    if let Some(offset) = get_mock_time_offset() {
        real_now + offset
    } else {
        real_now
    }
}

/// Format a DateTime as `HH:MM`.
pub fn format_clock_time(dt: &DateTime<Local>) -> String {
    dt.format("%H:%M").to_string()
}

/// Format a DateTime with weekday and full date, e.g. `Monday, January 13, 2025`.
pub fn format_date_long(dt: &DateTime<Local>) -> String {
    dt.format("%A, %B %d, %Y").to_string()
}

/// Source of "now" for evaluation and timers
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Local>;
}

/// Clock backed by the system time (honours [`MOCK_TIME_ENV_VAR`])
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        now()
    }
}

/// Clock that only moves when told to
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Local>>,
}

impl ManualClock {
    pub fn new(at: DateTime<Local>) -> Self {
        Self { now: Mutex::new(at) }
    }

    pub fn set(&self, at: DateTime<Local>) {
        *self.now.lock().unwrap() = at;
    }

    pub fn advance(&self, by: chrono::Duration) {
        let mut now = self.now.lock().unwrap();
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Local> {
        *self.now.lock().unwrap()
    }
}

/// Wall-clock time of day with minute resolution.
///
/// Serialized as zero-padded `HH:MM`. Ordering matches the lexicographic
/// ordering of that representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WallClock {
    hour: u8,
    minute: u8,
}

impl WallClock {
    pub fn new(hour: u8, minute: u8) -> Option<Self> {
        if hour < 24 && minute < 60 {
            Some(Self { hour, minute })
        } else {
            None
        }
    }

    /// Time of day `minutes` after midnight, wrapping past 24h
    pub const fn from_minutes(minutes: u32) -> Self {
        let minutes = minutes % (24 * 60);
        Self {
            hour: (minutes / 60) as u8,
            minute: (minutes % 60) as u8,
        }
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }

    /// Time of day of `dt`, truncated to the minute
    pub fn from_datetime(dt: &DateTime<Local>) -> Self {
        Self::from_naive_time(dt.time())
    }

    pub fn from_naive_time(time: NaiveTime) -> Self {
        Self {
            hour: time.hour() as u8,
            minute: time.minute() as u8,
        }
    }

    /// Returns minutes since midnight
    pub fn minutes_from_midnight(&self) -> u32 {
        (self.hour as u32) * 60 + self.minute as u32
    }
}

impl PartialOrd for WallClock {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for WallClock {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.minutes_from_midnight()
            .cmp(&other.minutes_from_midnight())
    }
}

impl fmt::Display for WallClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// Accepts `HH:MM` and `H:MM`; the hour must be below 24 and the minute
/// below 60.
impl FromStr for WallClock {
    type Err = TimesheetError;

    fn from_str(s: &str) -> Result<Self> {
        let (hour_str, minute_str) = s
            .split_once(':')
            .ok_or_else(|| TimesheetError::invalid_time(s, "expected HH:MM"))?;

        let all_digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
        if !all_digits(hour_str) || hour_str.len() > 2 {
            return Err(TimesheetError::invalid_time(s, "hour must be one or two digits"));
        }
        if !all_digits(minute_str) || minute_str.len() != 2 {
            return Err(TimesheetError::invalid_time(s, "minute must be two digits"));
        }

        let hour: u8 = hour_str
            .parse()
            .map_err(|_| TimesheetError::invalid_time(s, "invalid hour"))?;
        let minute: u8 = minute_str
            .parse()
            .map_err(|_| TimesheetError::invalid_time(s, "invalid minute"))?;

        Self::new(hour, minute)
            .ok_or_else(|| TimesheetError::invalid_time(s, "time out of range"))
    }
}

impl TryFrom<String> for WallClock {
    type Error = TimesheetError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<WallClock> for String {
    fn from(value: WallClock) -> Self {
        value.to_string()
    }
}

/// Day of the week, parsed case-insensitively from English names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DayOfWeek(Weekday);

impl DayOfWeek {
    pub const MONDAY: DayOfWeek = DayOfWeek(Weekday::Mon);
    pub const TUESDAY: DayOfWeek = DayOfWeek(Weekday::Tue);
    pub const WEDNESDAY: DayOfWeek = DayOfWeek(Weekday::Wed);
    pub const THURSDAY: DayOfWeek = DayOfWeek(Weekday::Thu);
    pub const FRIDAY: DayOfWeek = DayOfWeek(Weekday::Fri);
    pub const SATURDAY: DayOfWeek = DayOfWeek(Weekday::Sat);
    pub const SUNDAY: DayOfWeek = DayOfWeek(Weekday::Sun);

    /// Weekday of `dt` in its local timezone
    pub fn from_datetime(dt: &DateTime<Local>) -> Self {
        Self(dt.weekday())
    }

    pub fn weekday(&self) -> Weekday {
        self.0
    }

    /// Full English name, e.g. `Monday`
    pub fn name(&self) -> &'static str {
        match self.0 {
            Weekday::Mon => "Monday",
            Weekday::Tue => "Tuesday",
            Weekday::Wed => "Wednesday",
            Weekday::Thu => "Thursday",
            Weekday::Fri => "Friday",
            Weekday::Sat => "Saturday",
            Weekday::Sun => "Sunday",
        }
    }
}

impl From<Weekday> for DayOfWeek {
    fn from(weekday: Weekday) -> Self {
        Self(weekday)
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DayOfWeek {
    type Err = TimesheetError;

    fn from_str(s: &str) -> Result<Self> {
        let weekday = match s.trim().to_ascii_lowercase().as_str() {
            "monday" | "mon" => Weekday::Mon,
            "tuesday" | "tue" => Weekday::Tue,
            "wednesday" | "wed" => Weekday::Wed,
            "thursday" | "thu" => Weekday::Thu,
            "friday" | "fri" => Weekday::Fri,
            "saturday" | "sat" => Weekday::Sat,
            "sunday" | "sun" => Weekday::Sun,
            _ => return Err(TimesheetError::invalid_day(s)),
        };
        Ok(Self(weekday))
    }
}

impl TryFrom<String> for DayOfWeek {
    type Error = TimesheetError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<DayOfWeek> for String {
    fn from(value: DayOfWeek) -> Self {
        value.name().to_string()
    }
}
