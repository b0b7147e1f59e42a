//! Test repositories: mock `EventRepository` and `ViewCounter`
//! implementations for tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use uuid::Uuid;
use vidshare_core::error::DomainError;
use vidshare_core::repository::{EventRepository, StoredEvent, ViewCounter};

/// An event repository that records all `append_events` calls. Returns the
/// configured events from every `load_events` call and always succeeds on
/// `append_events`.
#[derive(Debug)]
pub struct RecordingEventRepository {
    load_result: Mutex<Vec<StoredEvent>>,
    appended: Mutex<Vec<(Uuid, i64, Vec<StoredEvent>)>>,
}

impl RecordingEventRepository {
    /// Create a new recording repository that will return `load_result` from
    /// every `load_events` call.
    #[must_use]
    pub fn new(load_result: Vec<StoredEvent>) -> Self {
        Self {
            load_result: Mutex::new(load_result),
            appended: Mutex::new(Vec::new()),
        }
    }

    /// Returns a snapshot of all events that were appended.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn appended_events(&self) -> Vec<(Uuid, i64, Vec<StoredEvent>)> {
        self.appended.lock().unwrap().clone()
    }
}

#[async_trait]
impl EventRepository for RecordingEventRepository {
    async fn load_events(&self, _aggregate_id: Uuid) -> Result<Vec<StoredEvent>, DomainError> {
        Ok(self.load_result.lock().unwrap().clone())
    }

    async fn append_events(
        &self,
        aggregate_id: Uuid,
        expected_version: i64,
        events: &[StoredEvent],
    ) -> Result<(), DomainError> {
        self.appended
            .lock()
            .unwrap()
            .push((aggregate_id, expected_version, events.to_vec()));
        Ok(())
    }

    async fn list_aggregate_ids(&self) -> Result<Vec<Uuid>, DomainError> {
        let mut ids: Vec<Uuid> = Vec::new();
        for event in self.load_result.lock().unwrap().iter() {
            if !ids.contains(&event.aggregate_id) {
                ids.push(event.aggregate_id);
            }
        }
        Ok(ids)
    }
}

/// An event repository that always returns an empty event list and silently
/// accepts appends. Useful for testing "video not found" scenarios and
/// uploads.
#[derive(Debug)]
pub struct EmptyEventRepository;

#[async_trait]
impl EventRepository for EmptyEventRepository {
    async fn load_events(&self, _aggregate_id: Uuid) -> Result<Vec<StoredEvent>, DomainError> {
        Ok(vec![])
    }

    async fn append_events(
        &self,
        _aggregate_id: Uuid,
        _expected_version: i64,
        _events: &[StoredEvent],
    ) -> Result<(), DomainError> {
        Ok(())
    }

    async fn list_aggregate_ids(&self) -> Result<Vec<Uuid>, DomainError> {
        Ok(vec![])
    }
}

/// An event repository that always returns an infrastructure error. Useful for
/// testing error-handling paths.
#[derive(Debug)]
pub struct FailingEventRepository;

#[async_trait]
impl EventRepository for FailingEventRepository {
    async fn load_events(&self, _aggregate_id: Uuid) -> Result<Vec<StoredEvent>, DomainError> {
        Err(DomainError::Infrastructure(
            "connection refused (10.0.0.5:5432)".into(),
        ))
    }

    async fn append_events(
        &self,
        _aggregate_id: Uuid,
        _expected_version: i64,
        _events: &[StoredEvent],
    ) -> Result<(), DomainError> {
        Err(DomainError::Infrastructure(
            "connection refused (10.0.0.5:5432)".into(),
        ))
    }

    async fn list_aggregate_ids(&self) -> Result<Vec<Uuid>, DomainError> {
        Err(DomainError::Infrastructure(
            "connection refused (10.0.0.5:5432)".into(),
        ))
    }
}

/// An event repository and view counter that sleeps before answering. Wrap
/// it in a timeout decorator to exercise deadline handling.
#[derive(Debug)]
pub struct SlowEventRepository {
    delay: Duration,
}

impl SlowEventRepository {
    /// Creates a repository whose every call takes at least `delay`.
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl EventRepository for SlowEventRepository {
    async fn load_events(&self, _aggregate_id: Uuid) -> Result<Vec<StoredEvent>, DomainError> {
        tokio::time::sleep(self.delay).await;
        Ok(vec![])
    }

    async fn append_events(
        &self,
        _aggregate_id: Uuid,
        _expected_version: i64,
        _events: &[StoredEvent],
    ) -> Result<(), DomainError> {
        tokio::time::sleep(self.delay).await;
        Ok(())
    }

    async fn list_aggregate_ids(&self) -> Result<Vec<Uuid>, DomainError> {
        tokio::time::sleep(self.delay).await;
        Ok(vec![])
    }
}

#[async_trait]
impl ViewCounter for SlowEventRepository {
    async fn record_view(&self, _video_id: Uuid) -> Result<u64, DomainError> {
        tokio::time::sleep(self.delay).await;
        Ok(1)
    }

    async fn view_count(&self, _video_id: Uuid) -> Result<u64, DomainError> {
        tokio::time::sleep(self.delay).await;
        Ok(0)
    }
}

/// A fully functional in-process event store.
///
/// Enforces the same optimistic concurrency contract as the PostgreSQL
/// store: an append succeeds only if `expected_version` equals the current
/// stream length.
#[derive(Debug, Default)]
pub struct InMemoryEventRepository {
    streams: Mutex<Streams>,
}

#[derive(Debug, Default)]
struct Streams {
    by_id: HashMap<Uuid, Vec<StoredEvent>>,
    // Stream ids in order of their first append.
    order: Vec<Uuid>,
}

impl InMemoryEventRepository {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the stream for `aggregate_id`.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn stream(&self, aggregate_id: Uuid) -> Vec<StoredEvent> {
        self.streams
            .lock()
            .unwrap()
            .by_id
            .get(&aggregate_id)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl EventRepository for InMemoryEventRepository {
    async fn load_events(&self, aggregate_id: Uuid) -> Result<Vec<StoredEvent>, DomainError> {
        Ok(self.stream(aggregate_id))
    }

    #[allow(clippy::cast_possible_wrap)]
    async fn append_events(
        &self,
        aggregate_id: Uuid,
        expected_version: i64,
        events: &[StoredEvent],
    ) -> Result<(), DomainError> {
        let mut streams = self.streams.lock().unwrap();
        let actual = streams.by_id.get(&aggregate_id).map_or(0, Vec::len) as i64;
        if actual != expected_version {
            return Err(DomainError::ConcurrencyConflict {
                aggregate_id,
                expected: expected_version,
                actual,
            });
        }
        if events.is_empty() {
            return Ok(());
        }
        if actual == 0 {
            streams.order.push(aggregate_id);
        }
        streams
            .by_id
            .entry(aggregate_id)
            .or_default()
            .extend_from_slice(events);
        Ok(())
    }

    async fn list_aggregate_ids(&self) -> Result<Vec<Uuid>, DomainError> {
        Ok(self.streams.lock().unwrap().order.clone())
    }
}

/// An in-process view counter.
#[derive(Debug, Default)]
pub struct InMemoryViewCounter {
    views: Mutex<HashMap<Uuid, u64>>,
}

impl InMemoryViewCounter {
    /// Creates a counter with no views recorded.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ViewCounter for InMemoryViewCounter {
    async fn record_view(&self, video_id: Uuid) -> Result<u64, DomainError> {
        let mut views = self.views.lock().unwrap();
        let total = views.entry(video_id).or_insert(0);
        *total += 1;
        Ok(*total)
    }

    async fn view_count(&self, video_id: Uuid) -> Result<u64, DomainError> {
        Ok(self.views.lock().unwrap().get(&video_id).copied().unwrap_or(0))
    }
}
