//! Test id generator: predictable `IdGenerator` implementation for tests.

use std::sync::atomic::{AtomicU64, Ordering};

use uuid::Uuid;
use vidshare_core::id::IdGenerator;

/// Hands out `00000000-0000-0000-0000-000000000001`, `...0002`, and so on.
///
/// Every call consumes one value, whether the id ends up on a comment, a
/// video or an event envelope.
#[derive(Debug)]
pub struct SequentialIdGenerator {
    next: AtomicU64,
}

impl SequentialIdGenerator {
    /// Creates a generator whose first id is `start`.
    #[must_use]
    pub fn starting_at(start: u64) -> Self {
        Self {
            next: AtomicU64::new(start),
        }
    }
}

impl Default for SequentialIdGenerator {
    fn default() -> Self {
        Self::starting_at(1)
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&self) -> Uuid {
        Uuid::from_u128(u128::from(self.next.fetch_add(1, Ordering::Relaxed)))
    }
}
