//! Events emitted by the timesheet store

use timesheet_util::{EntryId, StudentId};
use tracing::{debug, info, warn};

/// Store transitions worth telling a front end about
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    /// A fetch was issued
    LoadStarted {
        student_id: StudentId,
        generation: u64,
    },

    /// A fetch succeeded and its result is now shown
    Loaded {
        student_id: StudentId,
        class_count: usize,
    },

    /// A fetch failed; `message` is what the user sees
    LoadFailed { message: String },

    /// The derived current class moved on
    CurrentClassChanged {
        from: Option<EntryId>,
        to: Option<EntryId>,
    },

    /// The store was reset to idle
    Cleared,
}

impl StoreEvent {
    /// Record the event in the log
    pub fn trace(&self) {
        match self {
            StoreEvent::LoadStarted {
                student_id,
                generation,
            } => debug!(student_id = %student_id, generation, "Timesheet load started"),
            StoreEvent::Loaded {
                student_id,
                class_count,
            } => info!(student_id = %student_id, class_count, "Timesheet loaded"),
            StoreEvent::LoadFailed { message } => {
                warn!(message = %message, "Timesheet load failed")
            }
            StoreEvent::CurrentClassChanged { from, to } => info!(
                from = from.as_ref().map(EntryId::as_str),
                to = to.as_ref().map(EntryId::as_str),
                "Current class changed"
            ),
            StoreEvent::Cleared => debug!("Timesheet cleared"),
        }
    }
}
