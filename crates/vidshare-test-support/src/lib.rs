//! Shared test mocks and utilities for the Vidshare backend.

mod clock;
mod id;
mod identity;
mod repository;

pub use clock::{FixedClock, fixed_time};
pub use id::SequentialIdGenerator;
pub use identity::StaticIdentityResolver;
pub use repository::{
    EmptyEventRepository, FailingEventRepository, InMemoryEventRepository, InMemoryViewCounter,
    RecordingEventRepository, SlowEventRepository,
};
