//! Identifier generation abstraction.
//!
//! Video, comment and event identifiers are drawn from an injected generator
//! so that tests and replays can assert on exact identifiers.

use uuid::Uuid;

/// Source of fresh identifiers.
///
/// Implementations must never hand out the same identifier twice within the
/// lifetime of a process.
pub trait IdGenerator: Send + Sync {
    /// Returns a new identifier.
    fn next_id(&self) -> Uuid;
}

/// Production generator producing time-ordered UUID v7 values.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidV7Generator;

impl IdGenerator for UuidV7Generator {
    fn next_id(&self) -> Uuid {
        Uuid::now_v7()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_uuid_v7_generator_produces_distinct_ids() {
        let generator = UuidV7Generator;

        let ids: HashSet<Uuid> = (0..1_000).map(|_| generator.next_id()).collect();

        assert_eq!(ids.len(), 1_000);
        assert!(ids.iter().all(|id| id.get_version_num() == 7));
    }
}
