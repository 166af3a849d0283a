//! Flash notification model.
//!
//! The browser host only schedules wakeups; all lifecycle decisions happen
//! here against caller-supplied millisecond timestamps.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub const NOTIFICATION_LIFETIME_MS: u64 = 5_000;
pub const NOTIFICATION_FADE_MS: u64 = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Error,
    Warning,
    #[default]
    Info,
}

impl Severity {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }

    /// Font Awesome icon name shown next to the message.
    pub const fn icon(self) -> &'static str {
        match self {
            Self::Success => "check-circle",
            Self::Error => "exclamation-circle",
            Self::Warning => "exclamation-triangle",
            Self::Info => "info-circle",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = std::convert::Infallible;

    // Unknown kinds fall back to info.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "success" => Self::Success,
            "error" => Self::Error,
            "warning" => Self::Warning,
            _ => Self::Info,
        })
    }
}

/// A message waiting to be shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    pub severity: Severity,
}

impl Notice {
    pub fn new(message: impl Into<String>, severity: Severity) -> Self {
        Self {
            message: message.into(),
            severity,
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message, Severity::Success)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message, Severity::Error)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(message, Severity::Info)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Visible,
    Fading,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: u64,
    pub message: String,
    pub severity: Severity,
    created_at_ms: u64,
    fading_since_ms: Option<u64>,
}

impl Notification {
    pub fn phase(&self) -> Phase {
        if self.fading_since_ms.is_some() {
            Phase::Fading
        } else {
            Phase::Visible
        }
    }
}

/// Live notifications in display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationCenter {
    next_id: u64,
    items: Vec<Notification>,
    lifetime_ms: u64,
    fade_ms: u64,
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new(NOTIFICATION_LIFETIME_MS, NOTIFICATION_FADE_MS)
    }
}

impl NotificationCenter {
    pub fn new(lifetime_ms: u64, fade_ms: u64) -> Self {
        Self {
            next_id: 1,
            items: Vec::new(),
            lifetime_ms,
            fade_ms,
        }
    }

    pub fn lifetime_ms(&self) -> u64 {
        self.lifetime_ms
    }

    pub fn fade_ms(&self) -> u64 {
        self.fade_ms
    }

    pub fn push(&mut self, notice: Notice, now_ms: u64) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        log::debug!("notification {} ({}): {}", id, notice.severity, notice.message);
        self.items.push(Notification {
            id,
            message: notice.message,
            severity: notice.severity,
            created_at_ms: now_ms,
            fading_since_ms: None,
        });
        id
    }

    /// Starts the fade for a visible notification. Returns `false` when the
    /// id is unknown, already removed, or already fading.
    pub fn dismiss(&mut self, id: u64, now_ms: u64) -> bool {
        match self.items.iter_mut().find(|n| n.id == id) {
            Some(notification) if notification.fading_since_ms.is_none() => {
                notification.fading_since_ms = Some(now_ms);
                true
            }
            _ => false,
        }
    }

    /// Moves expired notifications into the fade and drops faded ones.
    /// Returns the ids removed by this call.
    pub fn sweep(&mut self, now_ms: u64) -> Vec<u64> {
        let lifetime_ms = self.lifetime_ms;
        let fade_ms = self.fade_ms;

        for notification in &mut self.items {
            let expires_at = notification.created_at_ms + lifetime_ms;
            if notification.fading_since_ms.is_none() && now_ms >= expires_at {
                notification.fading_since_ms = Some(expires_at);
            }
        }

        let mut removed = Vec::new();
        self.items.retain(|notification| match notification.fading_since_ms {
            Some(since) if now_ms >= since + fade_ms => {
                removed.push(notification.id);
                false
            }
            _ => true,
        });
        removed
    }

    pub fn get(&self, id: u64) -> Option<&Notification> {
        self.items.iter().find(|n| n.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_icons() {
        assert_eq!(Severity::Success.icon(), "check-circle");
        assert_eq!(Severity::Error.icon(), "exclamation-circle");
        assert_eq!(Severity::Warning.icon(), "exclamation-triangle");
        assert_eq!(Severity::Info.icon(), "info-circle");
    }

    #[test]
    fn unknown_severity_is_info() {
        assert_eq!("error".parse::<Severity>(), Ok(Severity::Error));
        assert_eq!("critical".parse::<Severity>(), Ok(Severity::Info));
        assert_eq!(Severity::default(), Severity::Info);
    }

    #[test]
    fn auto_removes_after_lifetime_and_fade() {
        let mut center = NotificationCenter::default();
        let id = center.push(Notice::success("uploaded"), 0);

        assert!(center.sweep(4_999).is_empty());
        assert_eq!(center.get(id).map(Notification::phase), Some(Phase::Visible));

        assert!(center.sweep(5_000).is_empty());
        assert_eq!(center.get(id).map(Notification::phase), Some(Phase::Fading));

        assert!(center.sweep(5_499).is_empty());
        assert_eq!(center.sweep(5_500), vec![id]);
        assert_eq!(center.iter().count(), 0);
    }

    #[test]
    fn late_sweep_still_removes() {
        let mut center = NotificationCenter::default();
        let id = center.push(Notice::info("hello"), 1_000);
        assert_eq!(center.sweep(60_000), vec![id]);
    }

    #[test]
    fn click_dismiss_uses_same_fade() {
        let mut center = NotificationCenter::default();
        let id = center.push(Notice::error("nope"), 0);

        assert!(center.dismiss(id, 1_000));
        assert!(!center.dismiss(id, 1_100));
        assert!(center.sweep(1_499).is_empty());
        assert_eq!(center.sweep(1_500), vec![id]);
    }

    #[test]
    fn removed_notification_cannot_come_back() {
        let mut center = NotificationCenter::default();
        let id = center.push(Notice::info("gone"), 0);
        center.dismiss(id, 0);
        center.sweep(500);

        assert!(!center.dismiss(id, 600));
        assert!(center.get(id).is_none());
        assert!(center.sweep(10_000).is_empty());
    }

    #[test]
    fn notifications_coexist_without_dedup() {
        let mut center = NotificationCenter::default();
        let a = center.push(Notice::error("same"), 0);
        let b = center.push(Notice::error("same"), 10);
        assert_ne!(a, b);
        assert_eq!(center.iter().count(), 2);

        assert_eq!(center.sweep(5_500), vec![a]);
        assert_eq!(center.sweep(5_510), vec![b]);
    }
}
