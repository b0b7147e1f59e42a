//! Vidshare Core: shared domain abstractions.
//!
//! This crate defines the traits and types the engagement context and the
//! infrastructure crates agree on: aggregates, events, the event repository,
//! time, identifiers and acting identities. It contains no infrastructure code.

pub mod aggregate;
pub mod clock;
pub mod command;
pub mod error;
pub mod event;
pub mod id;
pub mod identity;
pub mod repository;
