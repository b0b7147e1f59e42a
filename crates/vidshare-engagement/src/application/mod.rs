//! Application services for the Engagement context.

pub mod command_handlers;
pub mod query_handlers;
