//! Schedule-status evaluation
//!
//! Pure functions classifying a schedule entry relative to a point in time.
//! Only entries on today's weekday can be current, next, upcoming or
//! completed; everything else is scheduled.

use chrono::{DateTime, Local};
use timesheet_api::{ClassStatus, ScheduleEntry};
use timesheet_util::{DayOfWeek, WallClock};

/// Weekday and minute-truncated time of day of an instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Moment {
    pub day: DayOfWeek,
    pub clock: WallClock,
}

impl Moment {
    pub fn from_datetime(now: &DateTime<Local>) -> Self {
        Self {
            day: DayOfWeek::from_datetime(now),
            clock: WallClock::from_datetime(now),
        }
    }
}

/// Classify `entry` against the student's full list of entries at `now`
pub fn classify(
    entry: &ScheduleEntry,
    entries: &[ScheduleEntry],
    now: &DateTime<Local>,
) -> ClassStatus {
    classify_at(entry, entries, Moment::from_datetime(now))
}

pub fn classify_at(entry: &ScheduleEntry, entries: &[ScheduleEntry], at: Moment) -> ClassStatus {
    if !entry.is_on(at.day) {
        return ClassStatus::Scheduled;
    }

    // Inclusive on both ends; an inverted range never contains anything
    if entry.start_time <= at.clock && at.clock <= entry.end_time {
        return ClassStatus::Current;
    }

    if at.clock < entry.start_time {
        return match next_class_at(entries, at) {
            Some(next) if next.id == entry.id => ClassStatus::Next,
            _ => ClassStatus::Upcoming,
        };
    }

    if at.clock > entry.end_time {
        return ClassStatus::Completed;
    }

    ClassStatus::Scheduled
}

/// First entry, in provider order, that classifies as current
pub fn current_class<'a>(
    entries: &'a [ScheduleEntry],
    now: &DateTime<Local>,
) -> Option<&'a ScheduleEntry> {
    let at = Moment::from_datetime(now);
    entries
        .iter()
        .find(|e| e.is_on(at.day) && e.start_time <= at.clock && at.clock <= e.end_time)
}

/// Earliest entry today that has not started yet
pub fn next_class<'a>(
    entries: &'a [ScheduleEntry],
    now: &DateTime<Local>,
) -> Option<&'a ScheduleEntry> {
    next_class_at(entries, Moment::from_datetime(now))
}

fn next_class_at(entries: &[ScheduleEntry], at: Moment) -> Option<&ScheduleEntry> {
    // min_by_key keeps the first of equal keys, so ties go to provider order
    entries
        .iter()
        .filter(|e| e.is_on(at.day) && e.start_time > at.clock)
        .min_by_key(|e| e.start_time)
}

/// Classify every entry, preserving provider order
pub fn classify_all<'a>(
    entries: &'a [ScheduleEntry],
    now: &DateTime<Local>,
) -> Vec<(&'a ScheduleEntry, ClassStatus)> {
    let at = Moment::from_datetime(now);
    entries
        .iter()
        .map(|e| (e, classify_at(e, entries, at)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;
    use timesheet_util::EntryId;

    fn entry(id: &str, day: DayOfWeek, start: &str, end: &str) -> ScheduleEntry {
        ScheduleEntry {
            id: EntryId::new(id),
            class_name: format!("Class {}", id),
            start_time: start.parse().unwrap(),
            end_time: end.parse().unwrap(),
            day_of_week: day,
            date: String::new(),
            instructor: String::new(),
            room: None,
            credits: None,
        }
    }

    /// 2025-01-13 is a Monday
    fn monday_at(hour: u32, minute: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 1, 13, hour, minute, 0).unwrap()
    }

    fn monday_pair() -> Vec<ScheduleEntry> {
        vec![
            entry("1", DayOfWeek::MONDAY, "09:00", "10:30"),
            entry("2", DayOfWeek::MONDAY, "11:00", "12:30"),
        ]
    }

    #[test]
    fn current_and_next_mid_morning() {
        let entries = monday_pair();
        let now = monday_at(9, 30);

        assert_eq!(classify(&entries[0], &entries, &now), ClassStatus::Current);
        assert_eq!(classify(&entries[1], &entries, &now), ClassStatus::Next);
        assert_eq!(current_class(&entries, &now).map(|e| e.id.as_str()), Some("1"));
        assert_eq!(next_class(&entries, &now).map(|e| e.id.as_str()), Some("2"));
    }

    #[test]
    fn before_first_class() {
        let entries = monday_pair();
        let now = monday_at(8, 0);

        assert_eq!(classify(&entries[0], &entries, &now), ClassStatus::Next);
        assert_eq!(classify(&entries[1], &entries, &now), ClassStatus::Upcoming);
        assert!(current_class(&entries, &now).is_none());
    }

    #[test]
    fn boundaries_are_inclusive() {
        let entries = monday_pair();

        assert_eq!(classify(&entries[0], &entries, &monday_at(9, 0)), ClassStatus::Current);
        assert_eq!(classify(&entries[0], &entries, &monday_at(10, 30)), ClassStatus::Current);
        assert_eq!(classify(&entries[0], &entries, &monday_at(10, 31)), ClassStatus::Completed);
    }

    #[test]
    fn seconds_are_truncated() {
        let entries = monday_pair();
        let now = Local.with_ymd_and_hms(2025, 1, 13, 10, 30, 59).unwrap();

        assert_eq!(classify(&entries[0], &entries, &now), ClassStatus::Current);
    }

    #[test]
    fn other_days_are_scheduled() {
        let entries = vec![
            entry("1", DayOfWeek::TUESDAY, "00:00", "23:59"),
            entry("2", DayOfWeek::MONDAY, "11:00", "12:30"),
        ];
        let now = monday_at(9, 30);

        assert_eq!(classify(&entries[0], &entries, &now), ClassStatus::Scheduled);
        assert_eq!(classify(&entries[1], &entries, &now), ClassStatus::Next);
    }

    #[test]
    fn next_ignores_other_days() {
        // A Tuesday class earlier in the day does not steal Next
        let entries = vec![
            entry("1", DayOfWeek::TUESDAY, "10:00", "11:00"),
            entry("2", DayOfWeek::MONDAY, "14:00", "15:00"),
        ];
        let now = monday_at(9, 0);

        assert_eq!(next_class(&entries, &now).map(|e| e.id.as_str()), Some("2"));
    }

    #[test]
    fn after_last_class_everything_completed() {
        let entries = monday_pair();
        let now = monday_at(18, 0);

        assert!(classify_all(&entries, &now)
            .iter()
            .all(|(_, status)| *status == ClassStatus::Completed));
        assert!(next_class(&entries, &now).is_none());
    }

    #[test]
    fn next_tie_goes_to_provider_order() {
        let entries = vec![
            entry("b", DayOfWeek::MONDAY, "13:00", "14:00"),
            entry("a", DayOfWeek::MONDAY, "13:00", "13:30"),
            entry("c", DayOfWeek::MONDAY, "12:00", "12:30"),
        ];
        let now = monday_at(12, 45);

        let statuses: Vec<_> = classify_all(&entries, &now)
            .into_iter()
            .map(|(_, s)| s)
            .collect();
        assert_eq!(
            statuses,
            vec![ClassStatus::Next, ClassStatus::Upcoming, ClassStatus::Completed]
        );
    }

    #[test]
    fn overlapping_classes_both_current() {
        let entries = vec![
            entry("1", DayOfWeek::MONDAY, "09:00", "11:00"),
            entry("2", DayOfWeek::MONDAY, "10:00", "12:00"),
        ];
        let now = monday_at(10, 15);

        assert_eq!(classify(&entries[0], &entries, &now), ClassStatus::Current);
        assert_eq!(classify(&entries[1], &entries, &now), ClassStatus::Current);
        assert_eq!(current_class(&entries, &now).map(|e| e.id.as_str()), Some("1"));
    }

    #[test]
    fn inverted_range_is_never_current() {
        let entries = vec![entry("1", DayOfWeek::MONDAY, "11:00", "10:00")];

        assert_eq!(classify(&entries[0], &entries, &monday_at(9, 0)), ClassStatus::Next);
        assert_eq!(classify(&entries[0], &entries, &monday_at(10, 30)), ClassStatus::Next);
        assert_eq!(classify(&entries[0], &entries, &monday_at(11, 0)), ClassStatus::Completed);
        assert!(current_class(&entries, &monday_at(10, 30)).is_none());
    }

    #[test]
    fn empty_schedule() {
        let now = monday_at(9, 0);
        assert!(current_class(&[], &now).is_none());
        assert!(next_class(&[], &now).is_none());
        assert!(classify_all(&[], &now).is_empty());
    }

    fn arb_entry() -> impl Strategy<Value = (u8, u32, u32)> {
        (0u8..7, 0u32..1440, 0u32..1440)
    }

    fn build(raw: &[(u8, u32, u32)]) -> Vec<ScheduleEntry> {
        let days = [
            DayOfWeek::MONDAY,
            DayOfWeek::TUESDAY,
            DayOfWeek::WEDNESDAY,
            DayOfWeek::THURSDAY,
            DayOfWeek::FRIDAY,
            DayOfWeek::SATURDAY,
            DayOfWeek::SUNDAY,
        ];
        raw.iter()
            .enumerate()
            .map(|(i, (day, start, end))| ScheduleEntry {
                id: EntryId::new(i.to_string()),
                class_name: String::new(),
                start_time: WallClock::from_minutes(*start),
                end_time: WallClock::from_minutes(*end),
                day_of_week: days[*day as usize],
                date: String::new(),
                instructor: String::new(),
                room: None,
                credits: None,
            })
            .collect()
    }

    proptest! {
        #[test]
        fn classify_is_idempotent(
            raw in proptest::collection::vec(arb_entry(), 0..12),
            minute in 0u32..1440,
        ) {
            let entries = build(&raw);
            let now = monday_at(minute / 60, minute % 60);

            let first = classify_all(&entries, &now);
            let second = classify_all(&entries, &now);
            prop_assert_eq!(first, second);
        }

        #[test]
        fn at_most_one_next(
            raw in proptest::collection::vec(arb_entry(), 0..12),
            minute in 0u32..1440,
        ) {
            let entries = build(&raw);
            let now = monday_at(minute / 60, minute % 60);
            let clock = WallClock::from_minutes(minute);

            let statuses = classify_all(&entries, &now);
            let nexts = statuses.iter().filter(|(_, s)| *s == ClassStatus::Next).count();
            let pending = entries
                .iter()
                .any(|e| e.is_on(DayOfWeek::MONDAY) && e.start_time > clock);

            prop_assert_eq!(nexts, usize::from(pending));
        }

        #[test]
        fn status_matches_window(
            raw in proptest::collection::vec(arb_entry(), 1..12),
            minute in 0u32..1440,
        ) {
            let entries = build(&raw);
            let now = monday_at(minute / 60, minute % 60);
            let clock = WallClock::from_minutes(minute);

            for (entry, status) in classify_all(&entries, &now) {
                let expected_today = entry.is_on(DayOfWeek::MONDAY);
                prop_assert_eq!(status == ClassStatus::Scheduled, !expected_today);
                if !expected_today {
                    continue;
                }

                let inside = entry.start_time <= clock && clock <= entry.end_time;
                prop_assert_eq!(status == ClassStatus::Current, inside);
                if clock < entry.start_time {
                    prop_assert!(matches!(status, ClassStatus::Next | ClassStatus::Upcoming));
                }
            }
        }
    }
}
