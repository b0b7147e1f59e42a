//! Domain model for the Engagement context.

pub mod aggregates;
pub mod commands;
pub mod comments;
pub mod events;
pub mod reactions;
