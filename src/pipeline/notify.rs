//! Notification sink
//!
//! Where alerts go is deployment-specific (OS notifications, a webhook,
//! a message bus). The coordinator hands fully formed [`Notification`]s
//! to this seam and moves on.

use super::types::Notification;

/// Receives alerts for sessions that produced detections.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: &Notification);
}

/// Default sink: writes alerts to the application log.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: &Notification) {
        log::warn!(
            "[ALERT p{}] {}: {}",
            notification.priority,
            notification.title_text,
            notification.body_text
        );
    }
}
