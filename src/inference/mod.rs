//! Language model access.
//!
//! - [`model`]: The `NoteModel` trait and the in-process echo model
//! - [`remote`]: Client for an OpenAI-compatible inference runtime
//! - [`model_loader`]: Backend selection and startup readiness check
//! - [`engine`]: Worker that serializes inference jobs

pub mod engine;
pub mod model;
pub mod model_loader;
pub mod remote;
