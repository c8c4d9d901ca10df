//! Toast notifications
//!
//! Ephemeral messages shown in the top-right corner. Each one expires on
//! its own 5 second timer or on manual dismissal; the newest is drawn
//! first.

use std::time::{Duration, Instant};

/// Default lifetime of a toast
pub const DEFAULT_DURATION: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
    pub expires_at: Instant,
}

impl Notification {
    pub fn new(message: impl Into<String>, level: NotificationLevel, duration: Duration) -> Self {
        Self {
            message: message.into(),
            level,
            expires_at: Instant::now() + duration,
        }
    }

    #[must_use]
    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

#[derive(Debug)]
pub struct NotificationManager {
    notifications: Vec<Notification>,
    default_duration: Duration,
}

impl Default for NotificationManager {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationManager {
    #[must_use]
    pub fn new() -> Self {
        Self::with_default_duration(DEFAULT_DURATION)
    }

    #[must_use]
    pub fn with_default_duration(default_duration: Duration) -> Self {
        Self {
            notifications: Vec::new(),
            default_duration,
        }
    }

    pub fn notify(&mut self, message: impl Into<String>, level: NotificationLevel) {
        let notification = Notification::new(message, level, self.default_duration);
        self.notifications.insert(0, notification);
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.notify(message, NotificationLevel::Success);
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.notify(message, NotificationLevel::Info);
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.notify(message, NotificationLevel::Warning);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.notify(message, NotificationLevel::Error);
    }

    /// Drop expired notifications; returns true if anything changed
    pub fn update(&mut self) -> bool {
        let before = self.notifications.len();
        self.notifications.retain(|n| !n.is_expired());
        self.notifications.len() != before
    }

    /// Newest-first view of the live notifications
    #[must_use]
    pub fn all(&self) -> &[Notification] {
        &self.notifications
    }

    #[must_use]
    pub fn current(&self) -> Option<&Notification> {
        self.notifications.first()
    }

    /// Manual close of the newest toast
    pub fn dismiss_current(&mut self) -> bool {
        if self.notifications.is_empty() {
            false
        } else {
            self.notifications.remove(0);
            true
        }
    }

    pub fn clear(&mut self) {
        self.notifications.clear();
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.notifications.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn notification_expires_on_schedule() {
        let n = Notification::new("up", NotificationLevel::Info, Duration::from_millis(40));
        assert!(!n.is_expired());
        thread::sleep(Duration::from_millis(50));
        assert!(n.is_expired());
    }

    #[test]
    fn newest_notification_is_current() {
        let mut manager = NotificationManager::new();
        manager.success("uploaded");
        manager.error("network down");

        assert_eq!(manager.count(), 2);
        let current = manager.current().unwrap();
        assert_eq!(current.message, "network down");
        assert_eq!(current.level, NotificationLevel::Error);
    }

    #[test]
    fn update_removes_expired() {
        let mut manager = NotificationManager::with_default_duration(Duration::from_millis(40));
        manager.info("short-lived");
        thread::sleep(Duration::from_millis(50));
        assert!(manager.update());
        assert_eq!(manager.count(), 0);
    }

    #[test]
    fn dismiss_closes_newest_first() {
        let mut manager = NotificationManager::new();
        manager.info("first");
        manager.info("second");

        assert!(manager.dismiss_current());
        assert_eq!(manager.current().unwrap().message, "first");
        assert!(manager.dismiss_current());
        assert!(!manager.dismiss_current());
    }
}
