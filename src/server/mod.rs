//! HTTP and WebSocket surface.
//!
//! - [`api`]: Shared state, router and HTTP handlers
//! - [`ws`]: Live broadcast channel
//! - [`error`]: Error to response mapping

pub mod api;
pub mod error;
pub mod ws;
