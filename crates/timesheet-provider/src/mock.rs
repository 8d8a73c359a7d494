//! In-memory provider for development and testing

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;
use timesheet_api::{ScheduleEntry, Student, TimesheetRequest, TimesheetResult};
use timesheet_util::{DayOfWeek, EntryId, WallClock};
use tracing::debug;

use crate::{ProviderError, ProviderResult, TimesheetProvider};

/// Message returned when the roster has no such student
pub const STUDENT_NOT_FOUND: &str = "Student not found";

/// Message returned alongside a successful mock lookup
pub const TIMESHEET_LOADED: &str = "Timesheet loaded successfully";

/// Latency simulated by [`MockProvider::new`]
pub const MOCK_LATENCY: Duration = Duration::from_millis(500);

/// Provider backed by a fixed roster.
///
/// Every student in the roster gets the same shared class list.
pub struct MockProvider {
    students: Vec<Student>,
    classes: Vec<ScheduleEntry>,
    latency: Duration,
    fetch_count: AtomicU64,
    /// Fetches fail as if the network were down
    fail_transport: AtomicBool,
}

impl MockProvider {
    /// Built-in roster and classes, with the default latency
    pub fn new() -> Self {
        Self::with_dataset(default_students(), default_classes())
    }

    pub fn with_dataset(students: Vec<Student>, classes: Vec<ScheduleEntry>) -> Self {
        Self {
            students,
            classes,
            latency: MOCK_LATENCY,
            fetch_count: AtomicU64::new(0),
            fail_transport: AtomicBool::new(false),
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Simulate transport failures on subsequent fetches
    pub fn set_fail_transport(&self, fail: bool) {
        self.fail_transport.store(fail, Ordering::SeqCst);
    }

    /// Number of fetches served so far
    pub fn fetch_count(&self) -> u64 {
        self.fetch_count.load(Ordering::SeqCst)
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TimesheetProvider for MockProvider {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn fetch(&self, request: &TimesheetRequest) -> ProviderResult<TimesheetResult> {
        self.fetch_count.fetch_add(1, Ordering::SeqCst);

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        if self.fail_transport.load(Ordering::SeqCst) {
            return Err(ProviderError::Simulated);
        }

        let student = self
            .students
            .iter()
            .find(|s| s.id == request.student_id);

        match student {
            Some(student) => {
                debug!(
                    student_id = %request.student_id,
                    classes = self.classes.len(),
                    "Mock timesheet found"
                );
                Ok(TimesheetResult::found(
                    student.clone(),
                    self.classes.clone(),
                    TIMESHEET_LOADED,
                ))
            }
            None => {
                debug!(student_id = %request.student_id, "Mock student not found");
                Ok(TimesheetResult::failure(STUDENT_NOT_FOUND))
            }
        }
    }
}

/// Built-in roster
pub fn default_students() -> Vec<Student> {
    vec![
        Student::new("12345", "John Doe")
            .with_email("john.doe@university.edu")
            .with_department("Computer Science"),
        Student::new("67890", "Jane Smith")
            .with_email("jane.smith@university.edu")
            .with_department("Information Technology"),
    ]
}

/// Built-in class list shared by every student in the roster
pub fn default_classes() -> Vec<ScheduleEntry> {
    vec![
        class("1", "Angular Development", (9, 0), (10, 30), DayOfWeek::MONDAY, "2025-01-15", "Dr. Smith", "CS-101", 3),
        class("2", "Database Systems", (11, 0), (12, 30), DayOfWeek::MONDAY, "2025-01-15", "Prof. Johnson", "CS-102", 4),
        class("3", "Web Development", (14, 0), (15, 30), DayOfWeek::TUESDAY, "2025-01-16", "Dr. Brown", "CS-103", 3),
        class("4", "Software Engineering", (10, 0), (11, 30), DayOfWeek::WEDNESDAY, "2025-01-17", "Prof. Davis", "CS-104", 4),
        class("5", "Mobile App Development", (13, 0), (14, 30), DayOfWeek::FRIDAY, "2025-01-19", "Dr. Wilson", "CS-105", 3),
    ]
}

#[allow(clippy::too_many_arguments)]
fn class(
    id: &str,
    name: &str,
    start: (u32, u32),
    end: (u32, u32),
    day: DayOfWeek,
    date: &str,
    instructor: &str,
    room: &str,
    credits: u32,
) -> ScheduleEntry {
    ScheduleEntry {
        id: EntryId::new(id),
        class_name: name.to_string(),
        start_time: WallClock::from_minutes(start.0 * 60 + start.1),
        end_time: WallClock::from_minutes(end.0 * 60 + end.1),
        day_of_week: day,
        date: date.to_string(),
        instructor: instructor.to_string(),
        room: Some(room.to_string()),
        credits: Some(credits),
    }
}
