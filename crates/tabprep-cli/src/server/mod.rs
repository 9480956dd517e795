//! HTTP API over independent sessions.

pub mod app;
pub mod error;
pub mod handlers;
pub mod state;
