//! Application layer for the EEP active project context.
//!
//! This crate coordinates the snapshot codec and the platform API behind
//! [`ActiveProjectStore`], the single owner of the user's active project.

pub mod active_project;
pub mod notifier;
pub mod revalidation;

pub use active_project::{ActiveProjectStore, ClearReason, RefreshOutcome};
pub use notifier::{ChannelNotificationSink, Notifier, TracingNotificationSink};
pub use revalidation::{RevalidationClient, RevalidationOutcome};
