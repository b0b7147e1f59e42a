//! Command abstractions.

use uuid::Uuid;

/// An intent to change one video, issued on behalf of a request.
pub trait Command: Send + Sync + std::fmt::Debug {
    /// Stable name used in logs, e.g. `engagement.like_video`.
    fn command_type(&self) -> &'static str;

    /// Correlation ID stamped on every event the command produces.
    fn correlation_id(&self) -> Uuid;

    /// The video whose stream the command appends to.
    fn aggregate_id(&self) -> Uuid;
}
