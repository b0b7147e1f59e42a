//! Deadline enforcement for persistence calls.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;
use uuid::Uuid;

use vidshare_core::error::DomainError;
use vidshare_core::repository::{EventRepository, StoredEvent, ViewCounter};

/// Wraps an event repository or view counter and fails any call that runs
/// past `limit` with `DomainError::Timeout`.
///
/// An append that times out is abandoned by dropping its future; for
/// [`PgEventRepository`](crate::pg_event_repository::PgEventRepository)
/// that drops the open transaction, so a timed-out append is rolled back
/// rather than half-applied.
#[derive(Debug, Clone)]
pub struct TimeoutRepository<R> {
    inner: R,
    limit: Duration,
}

impl<R> TimeoutRepository<R> {
    /// Wraps `inner` with a per-call deadline of `limit`.
    #[must_use]
    pub fn new(inner: R, limit: Duration) -> Self {
        Self { inner, limit }
    }

    /// The per-call deadline.
    #[must_use]
    pub fn limit(&self) -> Duration {
        self.limit
    }

    async fn guard<T>(
        &self,
        operation: &'static str,
        aggregate_id: Option<Uuid>,
        call: impl Future<Output = Result<T, DomainError>> + Send,
    ) -> Result<T, DomainError> {
        if let Ok(result) = tokio::time::timeout(self.limit, call).await {
            result
        } else {
            warn!(
                operation,
                aggregate_id = ?aggregate_id,
                limit_ms = u64::try_from(self.limit.as_millis()).unwrap_or(u64::MAX),
                "persistence call timed out"
            );
            Err(DomainError::Timeout {
                operation,
                after: self.limit,
            })
        }
    }
}

#[async_trait]
impl<R: EventRepository> EventRepository for TimeoutRepository<R> {
    async fn load_events(&self, aggregate_id: Uuid) -> Result<Vec<StoredEvent>, DomainError> {
        self.guard(
            "load_events",
            Some(aggregate_id),
            self.inner.load_events(aggregate_id),
        )
        .await
    }

    async fn append_events(
        &self,
        aggregate_id: Uuid,
        expected_version: i64,
        events: &[StoredEvent],
    ) -> Result<(), DomainError> {
        self.guard(
            "append_events",
            Some(aggregate_id),
            self.inner
                .append_events(aggregate_id, expected_version, events),
        )
        .await
    }

    async fn list_aggregate_ids(&self) -> Result<Vec<Uuid>, DomainError> {
        self.guard("list_aggregate_ids", None, self.inner.list_aggregate_ids())
            .await
    }
}

#[async_trait]
impl<R: ViewCounter> ViewCounter for TimeoutRepository<R> {
    async fn record_view(&self, video_id: Uuid) -> Result<u64, DomainError> {
        self.guard("record_view", Some(video_id), self.inner.record_view(video_id))
            .await
    }

    async fn view_count(&self, video_id: Uuid) -> Result<u64, DomainError> {
        self.guard("view_count", Some(video_id), self.inner.view_count(video_id))
            .await
    }
}
