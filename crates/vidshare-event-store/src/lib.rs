//! Vidshare Event Store: PostgreSQL persistence for domain event streams and
//! view totals.

pub mod pg_event_repository;
pub mod pg_view_counter;
pub mod timeout;
