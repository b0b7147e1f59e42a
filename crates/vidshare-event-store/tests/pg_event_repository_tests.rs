//! Integration tests for `PgEventRepository`.

use chrono::{TimeZone, Utc};
use vidshare_core::error::DomainError;
use vidshare_core::repository::{EventRepository, StoredEvent};
use vidshare_event_store::pg_event_repository::PgEventRepository;
use sqlx::PgPool;
use uuid::Uuid;

/// Helper to build a `StoredEvent` with sensible defaults.
///
/// The timestamp is whole-second so it survives `TIMESTAMPTZ` unchanged.
fn make_stored_event(aggregate_id: Uuid, sequence_number: i64) -> StoredEvent {
    StoredEvent {
        event_id: Uuid::new_v4(),
        aggregate_id,
        event_type: "engagement.reaction_changed".to_string(),
        payload: serde_json::json!({
            "ReactionChanged": { "video_id": aggregate_id, "actor_id": "u1", "reaction": "like" }
        }),
        sequence_number,
        correlation_id: Uuid::new_v4(),
        causation_id: Uuid::new_v4(),
        occurred_at: Utc
            .with_ymd_and_hms(2026, 1, 15, 10, 0, 0)
            .unwrap(),
    }
}

// --- load_events ---

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a PostgreSQL database (set DATABASE_URL)"]
async fn test_load_events_returns_empty_vec_for_nonexistent_aggregate(pool: PgPool) {
    let repo = PgEventRepository::new(pool);
    let aggregate_id = Uuid::new_v4();

    let events = repo.load_events(aggregate_id).await.unwrap();

    assert!(events.is_empty());
}

// --- append_events + load_events round-trip ---

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a PostgreSQL database (set DATABASE_URL)"]
async fn test_append_and_load_single_event(pool: PgPool) {
    let repo = PgEventRepository::new(pool);
    let aggregate_id = Uuid::new_v4();
    let event = make_stored_event(aggregate_id, 1);
    let expected_event_id = event.event_id;
    let expected_event_type = event.event_type.clone();
    let expected_payload = event.payload.clone();
    let expected_correlation_id = event.correlation_id;
    let expected_causation_id = event.causation_id;
    let expected_occurred_at = event.occurred_at;

    repo.append_events(aggregate_id, 0, &[event]).await.unwrap();

    let loaded = repo.load_events(aggregate_id).await.unwrap();
    assert_eq!(loaded.len(), 1);

    let e = &loaded[0];
    assert_eq!(e.event_id, expected_event_id);
    assert_eq!(e.aggregate_id, aggregate_id);
    assert_eq!(e.event_type, expected_event_type);
    assert_eq!(e.payload, expected_payload);
    assert_eq!(e.sequence_number, 1);
    assert_eq!(e.correlation_id, expected_correlation_id);
    assert_eq!(e.causation_id, expected_causation_id);
    assert_eq!(e.occurred_at, expected_occurred_at);
}

// --- ordering ---

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a PostgreSQL database (set DATABASE_URL)"]
async fn test_append_multiple_events_preserves_sequence_order(pool: PgPool) {
    let repo = PgEventRepository::new(pool);
    let aggregate_id = Uuid::new_v4();
    let events = vec![
        make_stored_event(aggregate_id, 1),
        make_stored_event(aggregate_id, 2),
        make_stored_event(aggregate_id, 3),
    ];

    repo.append_events(aggregate_id, 0, &events).await.unwrap();

    let loaded = repo.load_events(aggregate_id).await.unwrap();
    assert_eq!(loaded.len(), 3);
    assert_eq!(loaded[0].sequence_number, 1);
    assert_eq!(loaded[1].sequence_number, 2);
    assert_eq!(loaded[2].sequence_number, 3);
}

// --- aggregate isolation ---

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a PostgreSQL database (set DATABASE_URL)"]
async fn test_aggregate_isolation(pool: PgPool) {
    let repo = PgEventRepository::new(pool);
    let agg_a = Uuid::new_v4();
    let agg_b = Uuid::new_v4();

    repo.append_events(agg_a, 0, &[make_stored_event(agg_a, 1)])
        .await
        .unwrap();
    repo.append_events(agg_b, 0, &[make_stored_event(agg_b, 1)])
        .await
        .unwrap();

    let loaded_a = repo.load_events(agg_a).await.unwrap();
    let loaded_b = repo.load_events(agg_b).await.unwrap();

    assert_eq!(loaded_a.len(), 1);
    assert_eq!(loaded_b.len(), 1);
    assert_eq!(loaded_a[0].aggregate_id, agg_a);
    assert_eq!(loaded_b[0].aggregate_id, agg_b);
}

// --- stream listing ---

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a PostgreSQL database (set DATABASE_URL)"]
async fn test_list_aggregate_ids_orders_streams_by_first_event(pool: PgPool) {
    let repo = PgEventRepository::new(pool);
    let older = Uuid::new_v4();
    let newer = Uuid::new_v4();
    let mut newer_first = make_stored_event(newer, 1);
    newer_first.occurred_at = Utc.with_ymd_and_hms(2026, 1, 15, 11, 0, 0).unwrap();
    let mut newer_second = make_stored_event(newer, 2);
    newer_second.occurred_at = Utc.with_ymd_and_hms(2026, 1, 15, 11, 5, 0).unwrap();

    repo.append_events(newer, 0, &[newer_first]).await.unwrap();
    repo.append_events(older, 0, &[make_stored_event(older, 1)])
        .await
        .unwrap();
    repo.append_events(newer, 1, &[newer_second]).await.unwrap();

    let ids = repo.list_aggregate_ids().await.unwrap();

    assert_eq!(ids, vec![older, newer]);
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a PostgreSQL database (set DATABASE_URL)"]
async fn test_list_aggregate_ids_on_empty_store(pool: PgPool) {
    let repo = PgEventRepository::new(pool);

    assert!(repo.list_aggregate_ids().await.unwrap().is_empty());
}

// --- concurrency ---

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a PostgreSQL database (set DATABASE_URL)"]
async fn test_concurrency_conflict_on_duplicate_sequence_number(pool: PgPool) {
    let repo = PgEventRepository::new(pool);
    let aggregate_id = Uuid::new_v4();

    // First append succeeds.
    repo.append_events(aggregate_id, 0, &[make_stored_event(aggregate_id, 1)])
        .await
        .unwrap();

    // Second append with same sequence_number should fail.
    let result = repo
        .append_events(aggregate_id, 0, &[make_stored_event(aggregate_id, 1)])
        .await;

    match result {
        Err(DomainError::ConcurrencyConflict {
            aggregate_id: conflict_agg_id,
            expected,
            actual,
        }) => {
            assert_eq!(conflict_agg_id, aggregate_id);
            assert_eq!(expected, 0);
            assert_eq!(actual, 1);
        }
        other => panic!("expected ConcurrencyConflict, got {other:?}"),
    }
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a PostgreSQL database (set DATABASE_URL)"]
async fn test_stale_expected_version_with_non_overlapping_sequences(pool: PgPool) {
    let repo = PgEventRepository::new(pool);
    let aggregate_id = Uuid::new_v4();

    // Append events 1-2 with expected_version 0.
    repo.append_events(
        aggregate_id,
        0,
        &[
            make_stored_event(aggregate_id, 1),
            make_stored_event(aggregate_id, 2),
        ],
    )
    .await
    .unwrap();

    // Attempt to append events 3-4 with stale expected_version 0 (actual is 2).
    // Sequence numbers don't collide, but the version check must still reject.
    let result = repo
        .append_events(
            aggregate_id,
            0,
            &[
                make_stored_event(aggregate_id, 3),
                make_stored_event(aggregate_id, 4),
            ],
        )
        .await;

    match result {
        Err(DomainError::ConcurrencyConflict {
            aggregate_id: conflict_agg_id,
            expected,
            actual,
        }) => {
            assert_eq!(conflict_agg_id, aggregate_id);
            assert_eq!(expected, 0);
            assert_eq!(actual, 2);
        }
        other => panic!("expected ConcurrencyConflict, got {other:?}"),
    }
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a PostgreSQL database (set DATABASE_URL)"]
async fn test_sequential_appends_with_correct_expected_version(pool: PgPool) {
    let repo = PgEventRepository::new(pool);
    let aggregate_id = Uuid::new_v4();

    // First batch: events 1-2, expected version 0.
    repo.append_events(
        aggregate_id,
        0,
        &[
            make_stored_event(aggregate_id, 1),
            make_stored_event(aggregate_id, 2),
        ],
    )
    .await
    .unwrap();

    // Second batch: events 3-4, expected version 2.
    repo.append_events(
        aggregate_id,
        2,
        &[
            make_stored_event(aggregate_id, 3),
            make_stored_event(aggregate_id, 4),
        ],
    )
    .await
    .unwrap();

    let loaded = repo.load_events(aggregate_id).await.unwrap();
    assert_eq!(loaded.len(), 4);
    for (i, event) in loaded.iter().enumerate() {
        assert_eq!(event.sequence_number, i64::try_from(i + 1).unwrap());
    }
}

// --- edge cases ---

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a PostgreSQL database (set DATABASE_URL)"]
async fn test_append_empty_events_is_noop(pool: PgPool) {
    let repo = PgEventRepository::new(pool);
    let aggregate_id = Uuid::new_v4();

    repo.append_events(aggregate_id, 0, &[]).await.unwrap();

    let loaded = repo.load_events(aggregate_id).await.unwrap();
    assert!(loaded.is_empty());
}

// --- payload serialization ---

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a PostgreSQL database (set DATABASE_URL)"]
async fn test_complex_json_payload_round_trip(pool: PgPool) {
    let repo = PgEventRepository::new(pool);
    let aggregate_id = Uuid::new_v4();
    let complex_payload = serde_json::json!({
        "nested": {"key": "value", "number": 42},
        "array": [1, "two", null, true, false],
        "null_field": null,
        "boolean": true,
        "empty_object": {},
        "empty_array": []
    });

    let mut event = make_stored_event(aggregate_id, 1);
    event.payload = complex_payload.clone();

    repo.append_events(aggregate_id, 0, &[event]).await.unwrap();

    let loaded = repo.load_events(aggregate_id).await.unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].payload, complex_payload);
}

// --- timestamp precision ---

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a PostgreSQL database (set DATABASE_URL)"]
async fn test_timestamp_precision(pool: PgPool) {
    let repo = PgEventRepository::new(pool);
    let aggregate_id = Uuid::new_v4();
    let mut event = make_stored_event(aggregate_id, 1);
    event.occurred_at = Utc.timestamp_micros(1_768_471_200_123_456).unwrap();
    let original_timestamp = event.occurred_at;

    repo.append_events(aggregate_id, 0, &[event]).await.unwrap();

    let loaded = repo.load_events(aggregate_id).await.unwrap();
    assert_eq!(loaded.len(), 1);

    // PostgreSQL TIMESTAMPTZ has microsecond precision.
    let original_micros = original_timestamp.timestamp_micros();
    let loaded_micros = loaded[0].occurred_at.timestamp_micros();
    assert_eq!(original_micros, loaded_micros);
}

// --- racing writers ---

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a PostgreSQL database (set DATABASE_URL)"]
async fn test_racing_appends_at_same_version_admit_exactly_one(pool: PgPool) {
    let repo = PgEventRepository::new(pool);
    let aggregate_id = Uuid::new_v4();
    repo.append_events(aggregate_id, 0, &[make_stored_event(aggregate_id, 1)])
        .await
        .unwrap();

    let first = [make_stored_event(aggregate_id, 2)];
    let second = [make_stored_event(aggregate_id, 2)];
    let (a, b) = tokio::join!(
        repo.append_events(aggregate_id, 1, &first),
        repo.append_events(aggregate_id, 1, &second),
    );

    let outcomes = [a, b];
    let successes = outcomes.iter().filter(|r| r.is_ok()).count();
    let conflicts = outcomes
        .iter()
        .filter(|r| matches!(r, Err(DomainError::ConcurrencyConflict { .. })))
        .count();
    assert_eq!(successes, 1);
    assert_eq!(conflicts, 1);
    assert_eq!(repo.load_events(aggregate_id).await.unwrap().len(), 2);
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a PostgreSQL database (set DATABASE_URL)"]
async fn test_rejected_batch_writes_nothing(pool: PgPool) {
    let repo = PgEventRepository::new(pool);
    let aggregate_id = Uuid::new_v4();
    // The second event collides with the first inside one batch.
    let batch = [
        make_stored_event(aggregate_id, 1),
        make_stored_event(aggregate_id, 1),
    ];

    let result = repo.append_events(aggregate_id, 0, &batch).await;

    assert!(matches!(
        result,
        Err(DomainError::ConcurrencyConflict { actual: 0, .. })
    ));
    assert!(repo.load_events(aggregate_id).await.unwrap().is_empty());
}
