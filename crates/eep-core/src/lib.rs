//! Domain layer of the EEP active project context.
//!
//! Holds the canonical project/workspace records, the transform layer that
//! normalizes source shapes into them, the persisted snapshot model, and the
//! traits the infrastructure layer implements.

pub mod api;
pub mod clock;
pub mod config;
pub mod error;
pub mod notification;
pub mod project;
pub mod snapshot;
pub mod transform;
pub mod workspace;

// Re-export common error type
pub use error::{EepError, Result};
