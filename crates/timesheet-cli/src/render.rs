//! Plain-text rendering of the store

use chrono::{DateTime, Local};
use std::fmt::Write;
use timesheet_api::{ClassStatus, ScheduleEntry, Student};
use timesheet_core::{
    StorePhase, StoreSnapshot, classify_all, duration_label, format_time_12h, time_range,
    today_count, total_credits,
};
use timesheet_util::{format_clock_time, format_date_long};

/// Render the whole timesheet view for `now`
pub fn render(snapshot: &StoreSnapshot, now: &DateTime<Local>) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{}  {}", format_date_long(now), format_clock_time(now));
    let _ = writeln!(out);

    if snapshot.phase == StorePhase::Loading {
        let _ = writeln!(out, "Loading...");
    }
    if let Some(error) = &snapshot.error {
        let _ = writeln!(out, "Error: {}", error);
    }

    let Some(timesheet) = &snapshot.timesheet else {
        return out;
    };

    write_student(&mut out, &timesheet.student);
    let _ = writeln!(out);

    if timesheet.classes.is_empty() {
        let _ = writeln!(out, "No classes scheduled.");
        return out;
    }

    write_table(&mut out, &timesheet.classes, now);
    let _ = writeln!(out);

    match &snapshot.current_class {
        Some(class) => {
            let _ = writeln!(
                out,
                "Current class: {} until {}{}",
                class.class_name,
                format_time_12h(class.end_time),
                class.room.as_deref().map(|r| format!(" in {}", r)).unwrap_or_default()
            );
        }
        None => {
            let _ = writeln!(out, "Current class: none");
        }
    }
    let _ = writeln!(
        out,
        "Total credits: {}    Classes today: {}",
        total_credits(&timesheet.classes),
        today_count(&timesheet.classes, now)
    );

    out
}

fn write_student(out: &mut String, student: &Student) {
    let _ = writeln!(out, "{} ({})", student.name, student.id);

    let details: Vec<&str> = [student.email.as_deref(), student.department.as_deref()]
        .into_iter()
        .flatten()
        .collect();
    if !details.is_empty() {
        let _ = writeln!(out, "{}", details.join(" | "));
    }
}

fn write_table(out: &mut String, classes: &[ScheduleEntry], now: &DateTime<Local>) {
    let _ = writeln!(
        out,
        "  {:<10} {:<21} {:<8} {:<24} {:<15} {:<8} {:>2}  {}",
        "DAY", "TIME", "LENGTH", "CLASS", "INSTRUCTOR", "ROOM", "CR", "STATUS"
    );

    for (entry, status) in classify_all(classes, now) {
        let _ = writeln!(
            out,
            "{} {:<10} {:<21} {:<8} {:<24} {:<15} {:<8} {:>2}  {}",
            marker(status),
            entry.day_of_week.name(),
            time_range(entry.start_time, entry.end_time),
            duration_label(entry.start_time, entry.end_time),
            entry.class_name,
            entry.instructor,
            entry.room.as_deref().unwrap_or("-"),
            entry.credits.map(|c| c.to_string()).unwrap_or_else(|| "-".into()),
            status
        );
    }
}

fn marker(status: ClassStatus) -> char {
    match status {
        ClassStatus::Current => '>',
        ClassStatus::Next => '+',
        _ => ' ',
    }
}
