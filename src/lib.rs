//! notakers: note-taking backend.
//!
//! Submitted text is run through a language model, formatted into a
//! structured note and appended to a JSON file. Live text typed by clients is
//! fanned out to every open WebSocket connection.

pub mod broadcast;
pub mod config;
pub mod formatter;
pub mod inference;
pub mod metrics;
pub mod server;
pub mod store;
