//! Vidshare API: axum HTTP server exposing the engagement context.

pub mod auth;
pub mod config;
pub mod error;
pub mod extract;
pub mod routes;
pub mod state;
pub mod telemetry;
