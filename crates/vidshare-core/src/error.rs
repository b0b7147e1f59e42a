//! Domain error types.

use std::time::Duration;

use thiserror::Error;
use uuid::Uuid;

/// Top-level domain error type.
#[derive(Debug, Error)]
pub enum DomainError {
    /// An aggregate was not found (or has been deleted).
    #[error("aggregate not found: {0}")]
    AggregateNotFound(Uuid),

    /// A comment was not found within an existing video.
    #[error("comment {comment_id} not found on video {video_id}")]
    CommentNotFound {
        /// The video that was searched.
        video_id: Uuid,
        /// The comment that was requested.
        comment_id: Uuid,
    },

    /// The acting identity does not own the resource it tried to mutate.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Optimistic concurrency conflict.
    #[error("concurrency conflict on aggregate {aggregate_id}: expected version {expected}, found {actual}")]
    ConcurrencyConflict {
        /// The aggregate that had the conflict.
        aggregate_id: Uuid,
        /// The expected version.
        expected: i64,
        /// The actual version found.
        actual: i64,
    },

    /// A validation error in domain logic.
    #[error("validation error: {0}")]
    Validation(String),

    /// A persistence call did not complete within its deadline.
    #[error("{operation} timed out after {after:?}")]
    Timeout {
        /// The repository operation that timed out.
        operation: &'static str,
        /// The deadline that elapsed.
        after: Duration,
    },

    /// An infrastructure/persistence error.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}
