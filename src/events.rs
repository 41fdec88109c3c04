//! Notification System
//!
//! Transient, auto-dismissing messages raised by action handlers.

use crate::consts::cli_consts::NOTIFICATION_TTL_SECS;
use chrono::Local;
use std::collections::VecDeque;
use std::fmt::Display;
use std::time::{Duration, Instant};
use uuid::Uuid;

#[derive(Debug, Copy, Clone, Eq, PartialEq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Severity {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub id: Uuid,
    pub severity: Severity,
    pub msg: String,
    pub timestamp: String,
    created_at: Instant,
}

impl PartialEq for Notification {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.severity == other.severity
            && self.msg == other.msg
            && self.timestamp == other.timestamp
    }
}

impl Eq for Notification {}

impl Notification {
    fn new(severity: Severity, msg: String, created_at: Instant) -> Self {
        Self {
            id: Uuid::new_v4(),
            severity,
            msg,
            timestamp: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            created_at,
        }
    }

    pub fn is_expired(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.created_at) >= ttl
    }

    /// CSS class of the notification element.
    pub fn css_class(&self) -> String {
        format!("notification notification-{}", self.severity)
    }
}

impl Display for Notification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [{}] {}", self.severity, self.timestamp, self.msg)
    }
}

/// Notifications currently on screen. Each one lives for a fixed lifetime
/// and is dropped on the next prune after that.
#[derive(Debug, Clone)]
pub struct Notifications {
    items: VecDeque<Notification>,
    ttl: Duration,
}

impl Notifications {
    pub fn new() -> Self {
        Self::with_ttl(Duration::from_secs(NOTIFICATION_TTL_SECS))
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            items: VecDeque::new(),
            ttl,
        }
    }

    pub fn push(&mut self, severity: Severity, msg: impl Into<String>) -> Uuid {
        self.push_at(severity, msg, Instant::now())
    }

    pub fn push_at(&mut self, severity: Severity, msg: impl Into<String>, now: Instant) -> Uuid {
        let notification = Notification::new(severity, msg.into(), now);
        let id = notification.id;
        self.items.push_back(notification);
        id
    }

    pub fn info(&mut self, msg: impl Into<String>) -> Uuid {
        self.push(Severity::Info, msg)
    }

    pub fn success(&mut self, msg: impl Into<String>) -> Uuid {
        self.push(Severity::Success, msg)
    }

    pub fn error(&mut self, msg: impl Into<String>) -> Uuid {
        self.push(Severity::Error, msg)
    }

    /// Drops every notification whose lifetime has passed.
    pub fn prune(&mut self, now: Instant) {
        let ttl = self.ttl;
        self.items.retain(|n| !n.is_expired(now, ttl));
    }

    /// Notifications still visible at `now`.
    pub fn active(&self, now: Instant) -> impl Iterator<Item = &Notification> {
        let ttl = self.ttl;
        self.items.iter().filter(move |n| !n.is_expired(now, ttl))
    }

    /// Every notification raised so far and not yet pruned.
    pub fn all(&self) -> impl Iterator<Item = &Notification> {
        self.items.iter()
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.items.iter().filter(|n| n.severity == severity).count()
    }

    pub fn has_errors(&self) -> bool {
        self.count(Severity::Error) > 0
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Default for Notifications {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notifications_expire_after_five_seconds() {
        let mut notes = Notifications::new();
        let start = Instant::now();
        notes.push_at(Severity::Success, "done", start);

        assert_eq!(notes.active(start + Duration::from_secs(4)).count(), 1);
        assert_eq!(notes.active(start + Duration::from_secs(5)).count(), 0);

        notes.prune(start + Duration::from_secs(6));
        assert!(notes.is_empty());
    }

    #[test]
    fn test_prune_keeps_younger_notifications() {
        let mut notes = Notifications::new();
        let start = Instant::now();
        notes.push_at(Severity::Info, "old", start);
        notes.push_at(Severity::Error, "new", start + Duration::from_secs(3));

        notes.prune(start + Duration::from_secs(5));
        assert_eq!(notes.len(), 1);
        assert!(notes.has_errors());
        assert_eq!(notes.all().next().map(|n| n.msg.as_str()), Some("new"));
    }

    #[test]
    fn test_severity_styles() {
        let mut notes = Notifications::new();
        notes.info("i");
        notes.success("s");
        notes.error("e");
        let classes: Vec<String> = notes.all().map(|n| n.css_class()).collect();
        assert_eq!(
            classes,
            vec![
                "notification notification-info",
                "notification notification-success",
                "notification notification-error",
            ]
        );
    }
}
