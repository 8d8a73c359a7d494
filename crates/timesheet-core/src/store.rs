//! Timesheet store
//!
//! Holds the latest loaded timesheet and the class currently in session.
//! Every mutation replaces the published [`StoreSnapshot`] as a whole, so
//! observers never see a half-applied load.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Local};
use thiserror::Error;
use timesheet_api::{ClassStatus, ScheduleEntry, TimesheetRequest, TimesheetResult};
use timesheet_provider::TimesheetProvider;
use timesheet_util::{Clock, EntryId, STUDENT_ID_REQUIRED, StudentId};
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::{StoreEvent, build_session, classify_at, current_class, Moment};

/// Shown when a provider reports failure without a message
pub const LOAD_FAILED: &str = "Failed to load timesheet";

/// Shown for any transport failure; the underlying error is only logged
pub const NETWORK_ERROR: &str = "Network error occurred. Please try again.";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StorePhase {
    #[default]
    Idle,
    Loading,
    Loaded,
    Errored,
}

/// Everything a front end needs to render the store
#[derive(Debug, Clone, Default)]
pub struct StoreSnapshot {
    pub phase: StorePhase,

    /// Student whose timesheet is shown; set only by a successful load
    pub student_id: Option<StudentId>,

    /// Last successfully loaded timesheet. Kept across a failed reload.
    pub timesheet: Option<Arc<TimesheetResult>>,

    pub current_class: Option<ScheduleEntry>,

    /// User-facing message of the last failure
    pub error: Option<String>,
}

impl StoreSnapshot {
    pub fn is_loading(&self) -> bool {
        self.phase == StorePhase::Loading
    }

    pub fn classes(&self) -> &[ScheduleEntry] {
        self.timesheet
            .as_deref()
            .map(|t| t.classes.as_slice())
            .unwrap_or_default()
    }

    fn current_id(&self) -> Option<&EntryId> {
        self.current_class.as_ref().map(|c| &c.id)
    }
}

/// Why a load did not produce a timesheet
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("{0}")]
    Validation(String),

    /// The provider answered but reported failure
    #[error("{0}")]
    Business(String),

    #[error("Network error occurred. Please try again.")]
    Transport { detail: String },

    /// A newer load was issued before this one completed
    #[error("Load superseded by a newer request")]
    Superseded,
}

impl LoadError {
    /// The message the store records for this failure, if any
    pub fn user_message(&self) -> Option<&str> {
        match self {
            LoadError::Validation(msg) | LoadError::Business(msg) => Some(msg),
            LoadError::Transport { .. } => Some(NETWORK_ERROR),
            LoadError::Superseded => None,
        }
    }
}

/// The timesheet store
pub struct TimesheetStore {
    provider: Arc<dyn TimesheetProvider>,
    clock: Arc<dyn Clock>,
    state: watch::Sender<StoreSnapshot>,

    /// Bumped by every issued load and by `clear`; a completion is applied
    /// only if the counter still holds the value its load was issued with.
    generation: AtomicU64,
}

impl TimesheetStore {
    pub fn new(provider: Arc<dyn TimesheetProvider>, clock: Arc<dyn Clock>) -> Self {
        let (state, _) = watch::channel(StoreSnapshot::default());
        Self {
            provider,
            clock,
            state,
            generation: AtomicU64::new(0),
        }
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    pub fn now(&self) -> DateTime<Local> {
        self.clock.now()
    }

    /// Copy of the current state
    pub fn snapshot(&self) -> StoreSnapshot {
        self.state.borrow().clone()
    }

    /// Receive every state change from now on
    pub fn subscribe(&self) -> watch::Receiver<StoreSnapshot> {
        self.state.subscribe()
    }

    /// Load the timesheet of the student identified by `input`.
    ///
    /// Blank input is rejected without touching the phase. Otherwise one
    /// provider fetch is issued with the trimmed id.
    pub async fn load(&self, input: &str) -> Result<Arc<TimesheetResult>, LoadError> {
        let student_id = match StudentId::parse(input) {
            Ok(id) => id,
            Err(_) => {
                self.state
                    .send_modify(|s| s.error = Some(STUDENT_ID_REQUIRED.to_string()));
                return Err(LoadError::Validation(STUDENT_ID_REQUIRED.to_string()));
            }
        };

        let now = self.clock.now();
        let request = TimesheetRequest::new(student_id.clone(), build_session(&student_id, &now));

        let mut generation = 0;
        self.state.send_modify(|s| {
            generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            s.phase = StorePhase::Loading;
            s.error = None;
        });
        StoreEvent::LoadStarted {
            student_id: student_id.clone(),
            generation,
        }
        .trace();

        let outcome = self.provider.fetch(&request).await;

        let mut applied = None;
        self.state.send_if_modified(|s| {
            if self.generation.load(Ordering::SeqCst) != generation {
                return false;
            }
            applied = Some(self.apply(s, &student_id, outcome));
            true
        });

        match applied {
            Some(result) => result,
            None => {
                debug!(student_id = %student_id, generation, "Discarding superseded load");
                Err(LoadError::Superseded)
            }
        }
    }

    fn apply(
        &self,
        state: &mut StoreSnapshot,
        student_id: &StudentId,
        outcome: timesheet_provider::ProviderResult<TimesheetResult>,
    ) -> Result<Arc<TimesheetResult>, LoadError> {
        let result = match outcome {
            Ok(result) if result.success => Arc::new(result),
            Ok(result) => {
                let message = result
                    .message
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| LOAD_FAILED.to_string());
                fail(state, message.clone());
                return Err(LoadError::Business(message));
            }
            Err(e) => {
                warn!(student_id = %student_id, error = %e, "Timesheet fetch failed");
                fail(state, NETWORK_ERROR.to_string());
                return Err(LoadError::Transport {
                    detail: e.to_string(),
                });
            }
        };

        let now = self.clock.now();
        state.phase = StorePhase::Loaded;
        state.student_id = Some(student_id.clone());
        state.current_class = current_class(&result.classes, &now).cloned();
        state.timesheet = Some(result.clone());
        state.error = None;

        StoreEvent::Loaded {
            student_id: student_id.clone(),
            class_count: result.classes.len(),
        }
        .trace();

        Ok(result)
    }

    /// Re-derive the current class from the stored entries without fetching.
    ///
    /// Returns an event only when the current class changed.
    pub fn refresh_current_class(&self) -> Option<StoreEvent> {
        let now = self.clock.now();
        let mut event = None;

        self.state.send_if_modified(|s| {
            let derived = current_class(s.classes(), &now).cloned();
            let to = derived.as_ref().map(|c| c.id.clone());
            if to.as_ref() == s.current_id() {
                return false;
            }

            event = Some(StoreEvent::CurrentClassChanged {
                from: s.current_id().cloned(),
                to,
            });
            s.current_class = derived;
            true
        });

        if let Some(event) = &event {
            event.trace();
        }
        event
    }

    /// Drop everything and go back to idle. In-flight loads are discarded.
    pub fn clear(&self) {
        self.state.send_modify(|s| {
            self.generation.fetch_add(1, Ordering::SeqCst);
            *s = StoreSnapshot::default();
        });
        StoreEvent::Cleared.trace();
    }

    /// Status of `entry` against the stored entries at the current time
    pub fn classify(&self, entry: &ScheduleEntry) -> ClassStatus {
        let at = Moment::from_datetime(&self.clock.now());
        classify_at(entry, self.state.borrow().classes(), at)
    }
}

fn fail(state: &mut StoreSnapshot, message: String) {
    state.phase = StorePhase::Errored;
    state.error = Some(message.clone());
    StoreEvent::LoadFailed { message }.trace();
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::TimeZone;
    use std::time::Duration;
    use timesheet_api::Student;
    use timesheet_provider::{MockProvider, ProviderResult, STUDENT_NOT_FOUND};
    use timesheet_util::ManualClock;

    /// 2025-01-13 is a Monday
    fn monday_at(hour: u32, minute: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 1, 13, hour, minute, 0).unwrap()
    }

    fn store_at(now: DateTime<Local>) -> (TimesheetStore, Arc<MockProvider>, Arc<ManualClock>) {
        let provider = Arc::new(MockProvider::new().with_latency(Duration::ZERO));
        let clock = Arc::new(ManualClock::new(now));
        let store = TimesheetStore::new(provider.clone(), clock.clone());
        (store, provider, clock)
    }

    /// Always answers with the same result
    struct FixedProvider(TimesheetResult);

    #[async_trait]
    impl TimesheetProvider for FixedProvider {
        fn name(&self) -> &'static str {
            "fixed"
        }

        async fn fetch(&self, _request: &TimesheetRequest) -> ProviderResult<TimesheetResult> {
            Ok(self.0.clone())
        }
    }

    #[tokio::test]
    async fn blank_id_is_rejected_without_transition() {
        let (store, provider, _) = store_at(monday_at(9, 30));

        for input in ["", "   ", "\t\n"] {
            let err = store.load(input).await.unwrap_err();
            assert_eq!(err, LoadError::Validation(STUDENT_ID_REQUIRED.into()));
        }

        let snapshot = store.snapshot();
        assert_eq!(snapshot.phase, StorePhase::Idle);
        assert_eq!(snapshot.error.as_deref(), Some(STUDENT_ID_REQUIRED));
        assert_eq!(provider.fetch_count(), 0);
    }

    #[tokio::test]
    async fn blank_id_after_load_keeps_state() {
        let (store, provider, _) = store_at(monday_at(9, 30));
        store.load("12345").await.unwrap();
        let fetches = provider.fetch_count();

        let err = store.load("  ").await.unwrap_err();
        assert_eq!(err, LoadError::Validation(STUDENT_ID_REQUIRED.into()));

        let snapshot = store.snapshot();
        assert_eq!(snapshot.phase, StorePhase::Loaded);
        assert!(snapshot.timesheet.is_some());
        assert!(snapshot.current_class.is_some());
        assert_eq!(snapshot.student_id, Some(StudentId::new("12345")));
        assert_eq!(snapshot.error.as_deref(), Some(STUDENT_ID_REQUIRED));
        assert_eq!(provider.fetch_count(), fetches);
    }

    #[tokio::test]
    async fn successful_load_derives_current_class() {
        let (store, _, _) = store_at(monday_at(9, 30));

        let result = store.load("  12345 ").await.unwrap();
        assert_eq!(result.student.name, "John Doe");

        let snapshot = store.snapshot();
        assert_eq!(snapshot.phase, StorePhase::Loaded);
        assert_eq!(snapshot.student_id, Some(StudentId::new("12345")));
        assert!(snapshot.error.is_none());
        assert_eq!(
            snapshot.current_class.map(|c| c.class_name),
            Some("Angular Development".to_string())
        );
    }

    #[tokio::test]
    async fn unknown_student_is_business_failure() {
        let (store, _, _) = store_at(monday_at(9, 30));

        let err = store.load("99999").await.unwrap_err();
        assert_eq!(err, LoadError::Business(STUDENT_NOT_FOUND.into()));

        let snapshot = store.snapshot();
        assert_eq!(snapshot.phase, StorePhase::Errored);
        assert_eq!(snapshot.error.as_deref(), Some(STUDENT_NOT_FOUND));
        assert!(snapshot.timesheet.is_none());
    }

    #[tokio::test]
    async fn business_failure_without_message_uses_fallback() {
        let mut result = TimesheetResult::failure("");
        result.message = None;
        let store = TimesheetStore::new(
            Arc::new(FixedProvider(result)),
            Arc::new(ManualClock::new(monday_at(9, 30))),
        );

        let err = store.load("12345").await.unwrap_err();
        assert_eq!(err, LoadError::Business(LOAD_FAILED.into()));
        assert_eq!(store.snapshot().error.as_deref(), Some(LOAD_FAILED));
    }

    #[tokio::test]
    async fn transport_failure_uses_generic_message() {
        let (store, provider, _) = store_at(monday_at(9, 30));
        provider.set_fail_transport(true);

        let err = store.load("12345").await.unwrap_err();
        assert!(matches!(err, LoadError::Transport { .. }));
        assert_eq!(err.user_message(), Some(NETWORK_ERROR));
        assert_eq!(err.to_string(), NETWORK_ERROR);

        let snapshot = store.snapshot();
        assert_eq!(snapshot.phase, StorePhase::Errored);
        assert_eq!(snapshot.error.as_deref(), Some(NETWORK_ERROR));
    }

    #[tokio::test]
    async fn failed_reload_keeps_previous_result() {
        let (store, provider, _) = store_at(monday_at(9, 30));
        store.load("12345").await.unwrap();

        provider.set_fail_transport(true);
        store.load("12345").await.unwrap_err();

        let snapshot = store.snapshot();
        assert_eq!(snapshot.phase, StorePhase::Errored);
        assert_eq!(snapshot.classes().len(), 5);

        // Retry by re-submitting
        provider.set_fail_transport(false);
        store.load("12345").await.unwrap();
        let snapshot = store.snapshot();
        assert_eq!(snapshot.phase, StorePhase::Loaded);
        assert!(snapshot.error.is_none());
    }

    #[tokio::test]
    async fn failed_load_keeps_shown_student() {
        let (store, _, _) = store_at(monday_at(9, 30));
        store.load("12345").await.unwrap();
        assert!(store.load("99999").await.is_err());

        let snapshot = store.snapshot();
        assert_eq!(snapshot.phase, StorePhase::Errored);
        assert_eq!(snapshot.student_id, Some(StudentId::new("12345")));
        assert_eq!(
            snapshot.timesheet.map(|t| t.student.name.clone()),
            Some("John Doe".to_string())
        );
    }

    #[tokio::test]
    async fn refresh_reports_only_changes() {
        let (store, _, clock) = store_at(monday_at(9, 30));
        store.load("12345").await.unwrap();

        assert_eq!(store.refresh_current_class(), None);

        clock.set(monday_at(10, 45));
        assert_eq!(
            store.refresh_current_class(),
            Some(StoreEvent::CurrentClassChanged {
                from: Some(EntryId::new("1")),
                to: None,
            })
        );
        assert_eq!(store.refresh_current_class(), None);

        clock.set(monday_at(11, 0));
        assert_eq!(
            store.refresh_current_class(),
            Some(StoreEvent::CurrentClassChanged {
                from: None,
                to: Some(EntryId::new("2")),
            })
        );
        assert_eq!(store.snapshot().current_class.map(|c| c.id), Some(EntryId::new("2")));
    }

    #[tokio::test]
    async fn refresh_without_timesheet_is_noop() {
        let (store, _, _) = store_at(monday_at(9, 30));
        assert_eq!(store.refresh_current_class(), None);
        assert_eq!(store.snapshot().phase, StorePhase::Idle);
    }

    #[tokio::test]
    async fn clear_returns_to_idle() {
        let (store, _, _) = store_at(monday_at(9, 30));
        store.load("12345").await.unwrap();

        store.clear();

        let snapshot = store.snapshot();
        assert_eq!(snapshot.phase, StorePhase::Idle);
        assert!(snapshot.timesheet.is_none());
        assert!(snapshot.current_class.is_none());
        assert!(snapshot.error.is_none());
        assert!(snapshot.student_id.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn superseded_load_is_discarded() {
        let provider = Arc::new(MockProvider::new());
        let store = TimesheetStore::new(provider, Arc::new(ManualClock::new(monday_at(9, 30))));

        let (first, second) = tokio::join!(store.load("12345"), store.load("67890"));

        assert_eq!(first.unwrap_err(), LoadError::Superseded);
        assert_eq!(second.unwrap().student.name, "Jane Smith");

        let snapshot = store.snapshot();
        assert_eq!(snapshot.phase, StorePhase::Loaded);
        assert_eq!(snapshot.student_id, Some(StudentId::new("67890")));
    }

    #[tokio::test(start_paused = true)]
    async fn loading_phase_is_observable() {
        let provider = Arc::new(MockProvider::new());
        let store = Arc::new(TimesheetStore::new(
            provider,
            Arc::new(ManualClock::new(monday_at(9, 30))),
        ));
        let mut rx = store.subscribe();

        let task = tokio::spawn({
            let store = store.clone();
            async move { store.load("12345").await }
        });

        rx.changed().await.unwrap();
        assert!(rx.borrow_and_update().is_loading());

        task.await.unwrap().unwrap();
        assert_eq!(rx.borrow().phase, StorePhase::Loaded);
    }

    #[tokio::test]
    async fn classify_uses_stored_entries() {
        let (store, _, _) = store_at(monday_at(8, 0));
        let result = store.load("12345").await.unwrap();

        let statuses: Vec<_> = result.classes.iter().map(|c| store.classify(c)).collect();
        assert_eq!(
            statuses,
            vec![
                ClassStatus::Next,
                ClassStatus::Upcoming,
                ClassStatus::Scheduled,
                ClassStatus::Scheduled,
                ClassStatus::Scheduled,
            ]
        );
    }

    #[tokio::test]
    async fn success_with_empty_student() {
        let store = TimesheetStore::new(
            Arc::new(FixedProvider(TimesheetResult::found(Student::default(), vec![], "ok"))),
            Arc::new(ManualClock::new(monday_at(9, 30))),
        );

        let result = store.load("12345").await.unwrap();
        assert!(result.classes.is_empty());
        assert!(store.snapshot().current_class.is_none());
    }
}
