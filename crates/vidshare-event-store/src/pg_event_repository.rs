//! `PostgreSQL` implementation of the `EventRepository` trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use tracing::{debug, warn};
use uuid::Uuid;

use vidshare_core::error::DomainError;
use vidshare_core::repository::{EventRepository, StoredEvent};

/// PostgreSQL-backed event repository.
///
/// Every append runs in one transaction: the stream head is checked against
/// `expected_version` and all events are inserted, or nothing is. The
/// `UNIQUE (aggregate_id, sequence_number)` constraint catches writers that
/// pass the head check concurrently.
#[derive(Debug, Clone)]
pub struct PgEventRepository {
    pool: PgPool,
}

impl PgEventRepository {
    /// Creates a new `PgEventRepository`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn current_version(&self, aggregate_id: Uuid) -> Result<i64, DomainError> {
        sqlx::query_scalar(
            "SELECT COALESCE(MAX(sequence_number), 0) FROM domain_events WHERE aggregate_id = $1",
        )
        .bind(aggregate_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("read stream head", &e))
    }

    async fn insert_all(
        tx: &mut Transaction<'_, Postgres>,
        events: &[StoredEvent],
    ) -> Result<(), sqlx::Error> {
        for event in events {
            sqlx::query(
                "INSERT INTO domain_events \
                 (event_id, aggregate_id, event_type, payload, sequence_number, \
                  correlation_id, causation_id, occurred_at) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
            )
            .bind(event.event_id)
            .bind(event.aggregate_id)
            .bind(&event.event_type)
            .bind(&event.payload)
            .bind(event.sequence_number)
            .bind(event.correlation_id)
            .bind(event.causation_id)
            .bind(event.occurred_at)
            .execute(&mut **tx)
            .await?;
        }
        Ok(())
    }
}

#[derive(Debug, FromRow)]
struct EventRow {
    event_id: Uuid,
    aggregate_id: Uuid,
    event_type: String,
    payload: serde_json::Value,
    sequence_number: i64,
    correlation_id: Uuid,
    causation_id: Uuid,
    occurred_at: DateTime<Utc>,
}

impl From<EventRow> for StoredEvent {
    fn from(row: EventRow) -> Self {
        Self {
            event_id: row.event_id,
            aggregate_id: row.aggregate_id,
            event_type: row.event_type,
            payload: row.payload,
            sequence_number: row.sequence_number,
            correlation_id: row.correlation_id,
            causation_id: row.causation_id,
            occurred_at: row.occurred_at,
        }
    }
}

fn db_error(operation: &str, err: &sqlx::Error) -> DomainError {
    DomainError::Infrastructure(format!("{operation} failed: {err}"))
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

#[async_trait]
impl EventRepository for PgEventRepository {
    async fn load_events(&self, aggregate_id: Uuid) -> Result<Vec<StoredEvent>, DomainError> {
        let rows: Vec<EventRow> = sqlx::query_as(
            "SELECT event_id, aggregate_id, event_type, payload, sequence_number, \
                    correlation_id, causation_id, occurred_at \
             FROM domain_events \
             WHERE aggregate_id = $1 \
             ORDER BY sequence_number ASC",
        )
        .bind(aggregate_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("load events", &e))?;

        debug!(%aggregate_id, events = rows.len(), "loaded event stream");
        Ok(rows.into_iter().map(StoredEvent::from).collect())
    }

    async fn append_events(
        &self,
        aggregate_id: Uuid,
        expected_version: i64,
        events: &[StoredEvent],
    ) -> Result<(), DomainError> {
        if events.is_empty() {
            return Ok(());
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("begin transaction", &e))?;

        let actual: i64 = sqlx::query_scalar(
            "SELECT COALESCE(MAX(sequence_number), 0) FROM domain_events WHERE aggregate_id = $1",
        )
        .bind(aggregate_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| db_error("read stream head", &e))?;

        if actual != expected_version {
            warn!(%aggregate_id, expected_version, actual, "stale append rejected");
            return Err(DomainError::ConcurrencyConflict {
                aggregate_id,
                expected: expected_version,
                actual,
            });
        }

        if let Err(e) = Self::insert_all(&mut tx, events).await {
            drop(tx);
            if is_unique_violation(&e) {
                let actual = self.current_version(aggregate_id).await?;
                warn!(%aggregate_id, expected_version, actual, "concurrent append lost the race");
                return Err(DomainError::ConcurrencyConflict {
                    aggregate_id,
                    expected: expected_version,
                    actual,
                });
            }
            return Err(db_error("insert events", &e));
        }

        tx.commit()
            .await
            .map_err(|e| db_error("commit transaction", &e))?;

        debug!(
            %aggregate_id,
            expected_version,
            appended = events.len(),
            "appended events"
        );
        Ok(())
    }

    async fn list_aggregate_ids(&self) -> Result<Vec<Uuid>, DomainError> {
        sqlx::query_scalar(
            "SELECT aggregate_id FROM domain_events \
             WHERE sequence_number = 1 \
             ORDER BY occurred_at ASC, aggregate_id ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("list streams", &e))
    }
}
