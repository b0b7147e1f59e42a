//! Vidshare: Engagement bounded context.
//!
//! Owns the Video aggregate: its like/dislike reaction sets, its ordered
//! comment ledger, its view counter and the upload/update/delete lifecycle
//! that brackets them.

pub mod application;
pub mod domain;
