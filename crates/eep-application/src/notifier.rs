//! Notification delivery.
//!
//! [`Notifier`] is the handle components emit through; it honors the
//! `enable_notifications` switch. Two sinks are provided: one forwarding to a
//! tokio channel (for a UI or CLI to drain) and one rendering notifications
//! as tracing events.

use eep_core::notification::{Notification, NotificationLevel, NotificationSink};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Emits notifications to an optional sink.
#[derive(Clone)]
pub struct Notifier {
    sink: Option<Arc<dyn NotificationSink>>,
    enabled: bool,
}

impl Notifier {
    pub fn new(sink: Arc<dyn NotificationSink>, enabled: bool) -> Self {
        Self {
            sink: Some(sink),
            enabled,
        }
    }

    /// A notifier that drops everything.
    pub fn disabled() -> Self {
        Self {
            sink: None,
            enabled: false,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled && self.sink.is_some()
    }

    pub fn notify(&self, notification: Notification) {
        if !self.enabled {
            return;
        }
        if let Some(sink) = &self.sink {
            sink.notify(notification);
        }
    }

    pub fn success(&self, title: &str, message: impl Into<String>) {
        self.notify(Notification::success(title, message));
    }

    pub fn info(&self, title: &str, message: impl Into<String>) {
        self.notify(Notification::info(title, message));
    }

    pub fn warning(&self, title: &str, message: impl Into<String>) {
        self.notify(Notification::warning(title, message));
    }

    pub fn error(&self, title: &str, message: impl Into<String>) {
        self.notify(Notification::error(title, message));
    }
}

/// Sink that forwards notifications over an unbounded channel.
pub struct ChannelNotificationSink {
    sender: mpsc::UnboundedSender<Notification>,
}

impl ChannelNotificationSink {
    /// Create a new sink with the given channel sender
    pub fn new(sender: mpsc::UnboundedSender<Notification>) -> Self {
        Self { sender }
    }

    /// Creates a sink together with the receiving end of its channel.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self::new(sender), receiver)
    }
}

impl NotificationSink for ChannelNotificationSink {
    fn notify(&self, notification: Notification) {
        // Receiver gone means nobody is listening anymore
        let _ = self.sender.send(notification);
    }
}

/// Sink that writes notifications to the tracing log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotificationSink;

impl NotificationSink for TracingNotificationSink {
    fn notify(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Success | NotificationLevel::Info => {
                tracing::info!("[Notification] {}: {}", notification.title, notification.message)
            }
            NotificationLevel::Warning => {
                tracing::warn!("[Notification] {}: {}", notification.title, notification.message)
            }
            NotificationLevel::Error => {
                tracing::error!("[Notification] {}: {}", notification.title, notification.message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_sink_forwards() {
        let (sink, mut receiver) = ChannelNotificationSink::channel();
        let notifier = Notifier::new(Arc::new(sink), true);

        notifier.warning("Project removed", "Robotics left Cohort 7");

        let received = receiver.try_recv().unwrap();
        assert_eq!(received.level, NotificationLevel::Warning);
        assert_eq!(received.title, "Project removed");
    }

    #[test]
    fn test_disabled_notifier_drops() {
        let (sink, mut receiver) = ChannelNotificationSink::channel();
        let notifier = Notifier::new(Arc::new(sink), false);

        notifier.success("Project activated", "Robotics");

        assert!(receiver.try_recv().is_err());
        assert!(!notifier.is_enabled());
        assert!(!Notifier::disabled().is_enabled());
    }

    #[test]
    fn test_send_after_receiver_dropped_is_silent() {
        let (sink, receiver) = ChannelNotificationSink::channel();
        drop(receiver);
        sink.notify(Notification::info("Refreshed", "Robotics"));
    }
}
