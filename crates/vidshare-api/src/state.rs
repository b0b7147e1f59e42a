//! Shared application state.

use std::sync::Arc;

use vidshare_core::clock::Clock;
use vidshare_core::id::IdGenerator;
use vidshare_core::identity::IdentityResolver;
use vidshare_core::repository::{EventRepository, ViewCounter};

/// Application state shared across all request handlers.
///
/// Every collaborator is constructed once at startup and injected here;
/// handlers hold no other shared state.
#[derive(Clone)]
pub struct AppState {
    /// Clock for command timestamps.
    pub clock: Arc<dyn Clock>,
    /// Source of video, comment and event identifiers.
    pub ids: Arc<dyn IdGenerator>,
    /// The video store.
    pub event_repository: Arc<dyn EventRepository>,
    /// View totals, kept outside the video store.
    pub view_counter: Arc<dyn ViewCounter>,
    /// Bearer-token verifier.
    pub identity_resolver: Arc<dyn IdentityResolver>,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
        event_repository: Arc<dyn EventRepository>,
        view_counter: Arc<dyn ViewCounter>,
        identity_resolver: Arc<dyn IdentityResolver>,
    ) -> Self {
        Self {
            clock,
            ids,
            event_repository,
            view_counter,
            identity_resolver,
        }
    }
}
