//! Shared types for timesheet providers and front ends

use serde::{Deserialize, Serialize};
use std::fmt;
use timesheet_util::{DayOfWeek, EntryId, SessionToken, StudentId, WallClock};

/// A student as known to a timesheet provider
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    /// Business failures may carry an empty student object, so every field
    /// tolerates being absent.
    #[serde(default)]
    pub id: StudentId,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
}

impl Student {
    pub fn new(id: impl Into<StudentId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: None,
            department: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_department(mut self, department: impl Into<String>) -> Self {
        self.department = Some(department.into());
        self
    }
}

/// One weekly class occurrence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEntry {
    pub id: EntryId,
    pub class_name: String,
    pub start_time: WallClock,
    /// Not guaranteed to be after `start_time`
    pub end_time: WallClock,
    #[serde(rename = "day", alias = "dayOfWeek")]
    pub day_of_week: DayOfWeek,
    /// Calendar date as sent by the provider; informational only
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub instructor: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credits: Option<u32>,
}

impl ScheduleEntry {
    pub fn is_on(&self, day: DayOfWeek) -> bool {
        self.day_of_week == day
    }
}

/// Outcome of a timesheet fetch, exactly as a provider reports it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimesheetResult {
    #[serde(default)]
    pub student: Student,
    /// Provider order; not sorted
    #[serde(default)]
    pub classes: Vec<ScheduleEntry>,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl TimesheetResult {
    pub fn found(student: Student, classes: Vec<ScheduleEntry>, message: impl Into<String>) -> Self {
        Self {
            student,
            classes,
            success: true,
            message: Some(message.into()),
        }
    }

    /// Business-level failure: the provider answered but has nothing to show
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            student: Student::default(),
            classes: Vec::new(),
            success: false,
            message: Some(message.into()),
        }
    }
}

/// A request handed to a provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimesheetRequest {
    pub student_id: StudentId,
    /// Correlation tag sent as the `sessionId` header
    pub session_id: SessionToken,
}

impl TimesheetRequest {
    pub fn new(student_id: StudentId, session_id: SessionToken) -> Self {
        Self {
            student_id,
            session_id,
        }
    }

    /// JSON body sent to the remote endpoint
    pub fn body(&self) -> TimesheetRequestBody<'_> {
        TimesheetRequestBody {
            student_id: &self.student_id,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimesheetRequestBody<'a> {
    pub student_id: &'a StudentId,
}

/// Classification of a schedule entry relative to "now"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClassStatus {
    /// Today, and now is within the entry's time range
    Current,
    /// Today, and the earliest entry that has not started yet
    Next,
    /// Today, not started yet, but not the next one
    Upcoming,
    /// Today, already over
    Completed,
    /// Any other day
    Scheduled,
}

impl ClassStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ClassStatus::Current => "Current",
            ClassStatus::Next => "Next",
            ClassStatus::Upcoming => "Upcoming",
            ClassStatus::Completed => "Completed",
            ClassStatus::Scheduled => "Scheduled",
        }
    }

    /// Style class for row highlighting; `Scheduled` rows are not highlighted
    pub fn css_class(&self) -> Option<&'static str> {
        match self {
            ClassStatus::Current => Some("current-class"),
            ClassStatus::Next => Some("next-class"),
            ClassStatus::Completed => Some("completed-class"),
            ClassStatus::Upcoming => Some("upcoming-class"),
            ClassStatus::Scheduled => None,
        }
    }
}

impl fmt::Display for ClassStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schedule_entry_wire_format() {
        let json = r#"{
            "id": "1",
            "className": "Angular Development",
            "startTime": "09:00",
            "endTime": "10:30",
            "day": "monday",
            "date": "2025-01-15",
            "instructor": "Dr. Smith",
            "room": "CS-101",
            "credits": 3
        }"#;

        let entry: ScheduleEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.id.as_str(), "1");
        assert_eq!(entry.start_time.to_string(), "09:00");
        assert_eq!(entry.day_of_week.name(), "Monday");
        assert_eq!(entry.credits, Some(3));

        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["className"], "Angular Development");
        assert_eq!(value["day"], "Monday");
        assert_eq!(value["endTime"], "10:30");
    }

    #[test]
    fn schedule_entry_accepts_day_of_week_alias() {
        let json = r#"{
            "id": "7",
            "className": "Networks",
            "startTime": "8:15",
            "endTime": "09:45",
            "dayOfWeek": "THURSDAY"
        }"#;

        let entry: ScheduleEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.day_of_week.name(), "Thursday");
        assert_eq!(entry.start_time.to_string(), "08:15");
        assert!(entry.room.is_none());
        assert!(entry.instructor.is_empty());
    }

    #[test]
    fn schedule_entry_rejects_bad_time() {
        let json = r#"{
            "id": "1", "className": "X", "startTime": "9h00",
            "endTime": "10:00", "day": "Monday"
        }"#;
        assert!(serde_json::from_str::<ScheduleEntry>(json).is_err());
    }

    #[test]
    fn failure_result_with_empty_student() {
        let json = r#"{
            "student": {},
            "classes": [],
            "success": false,
            "message": "Student not found"
        }"#;

        let result: TimesheetResult = serde_json::from_str(json).unwrap();
        assert!(!result.success);
        assert!(result.student.id.is_empty());
        assert_eq!(result.message.as_deref(), Some("Student not found"));
    }

    #[test]
    fn request_body_uses_camel_case() {
        let request = TimesheetRequest::new(
            StudentId::new("12345"),
            SessionToken::from_encoded("token"),
        );
        let json = serde_json::to_string(&request.body()).unwrap();
        assert_eq!(json, r#"{"studentId":"12345"}"#);
    }

    #[test]
    fn class_status_css_classes() {
        assert_eq!(ClassStatus::Current.css_class(), Some("current-class"));
        assert_eq!(ClassStatus::Next.css_class(), Some("next-class"));
        assert_eq!(ClassStatus::Scheduled.css_class(), None);
        assert_eq!(ClassStatus::Upcoming.to_string(), "Upcoming");
    }
}
