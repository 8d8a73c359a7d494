//! Presentation helpers shared by front ends

use chrono::{DateTime, Local};
use timesheet_api::ScheduleEntry;
use timesheet_util::{DayOfWeek, WallClock};

/// 12-hour rendering: `9:00 AM`, `12:30 PM`, `12:05 AM`
pub fn format_time_12h(time: WallClock) -> String {
    let (hour, suffix) = match time.hour() {
        0 => (12, "AM"),
        h @ 1..=11 => (h, "AM"),
        12 => (12, "PM"),
        h => (h - 12, "PM"),
    };
    format!("{}:{:02} {}", hour, time.minute(), suffix)
}

pub fn time_range(start: WallClock, end: WallClock) -> String {
    format!("{} - {}", format_time_12h(start), format_time_12h(end))
}

/// `1h 30m`, `2h`, `45m`; an inverted range is `0m`
pub fn duration_label(start: WallClock, end: WallClock) -> String {
    let minutes = end
        .minutes_from_midnight()
        .saturating_sub(start.minutes_from_midnight());

    match (minutes / 60, minutes % 60) {
        (0, m) => format!("{}m", m),
        (h, 0) => format!("{}h", h),
        (h, m) => format!("{}h {}m", h, m),
    }
}

/// Sum of credits; entries without credits count as zero
pub fn total_credits(entries: &[ScheduleEntry]) -> u64 {
    entries.iter().filter_map(|e| e.credits).map(u64::from).sum()
}

/// Number of entries on today's weekday
pub fn today_count(entries: &[ScheduleEntry], now: &DateTime<Local>) -> usize {
    let today = DayOfWeek::from_datetime(now);
    entries.iter().filter(|e| e.is_on(today)).count()
}
