//! Toast notification data structures.

use crate::ui::colors;
use eframe::egui::Color32;
use std::time::Duration;
use web_time::Instant;

/// How long a toast stays on screen.
pub const TOAST_LIFETIME: Duration = Duration::from_secs(5);

/// Level of a toast notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Success,
    Error,
}

impl ToastLevel {
    /// Accent color for this level.
    pub fn color(&self) -> Color32 {
        match self {
            Self::Info => colors::toasts::INFO,
            Self::Success => colors::toasts::SUCCESS,
            Self::Error => colors::toasts::ERROR,
        }
    }

    /// Phosphor icon for this level.
    pub fn icon(&self) -> &'static str {
        match self {
            Self::Info => egui_phosphor::regular::INFO,
            Self::Success => egui_phosphor::regular::CHECK_CIRCLE,
            Self::Error => egui_phosphor::regular::WARNING,
        }
    }
}

/// A single toast.
#[derive(Debug, Clone)]
pub struct Toast {
    pub id: u64,
    pub level: ToastLevel,
    pub message: String,
    pub created_at: Instant,
}

impl Toast {
    /// Check if the toast is still shown at the given instant.
    pub fn is_live_at(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.created_at) < TOAST_LIFETIME
    }
}

/// Queue of visible toasts, oldest first.
#[derive(Default, Clone)]
pub struct Notifications {
    toasts: Vec<Toast>,
    next_id: u64,
}

impl Notifications {
    pub fn push(&mut self, level: ToastLevel, message: impl Into<String>) {
        self.push_at(level, message, Instant::now());
    }

    fn push_at(&mut self, level: ToastLevel, message: impl Into<String>, now: Instant) {
        self.next_id += 1;
        self.toasts.push(Toast {
            id: self.next_id,
            level,
            message: message.into(),
            created_at: now,
        });
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(ToastLevel::Info, message);
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(ToastLevel::Success, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(ToastLevel::Error, message);
    }

    /// Drops toasts that have expired by `now`.
    pub fn prune(&mut self, now: Instant) {
        self.toasts.retain(|t| t.is_live_at(now));
    }

    pub fn dismiss(&mut self, id: u64) {
        self.toasts.retain(|t| t.id != id);
    }

    pub fn toasts(&self) -> &[Toast] {
        &self.toasts
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_assigns_unique_ids() {
        let mut notifications = Notifications::default();
        notifications.info("one");
        notifications.error("two");

        let ids: Vec<u64> = notifications.toasts().iter().map(|t| t.id).collect();
        assert_eq!(ids.len(), 2);
        assert_ne!(ids[0], ids[1]);
        assert_eq!(notifications.toasts()[1].level, ToastLevel::Error);
    }

    #[test]
    fn test_prune_expires_old_toasts() {
        let start = Instant::now();
        let mut notifications = Notifications::default();
        notifications.push_at(ToastLevel::Info, "old", start);
        notifications.push_at(ToastLevel::Success, "new", start + Duration::from_secs(3));

        notifications.prune(start + Duration::from_secs(4));
        assert_eq!(notifications.toasts().len(), 2);

        notifications.prune(start + Duration::from_secs(6));
        assert_eq!(notifications.toasts().len(), 1);
        assert_eq!(notifications.toasts()[0].message, "new");

        notifications.prune(start + Duration::from_secs(9));
        assert!(notifications.is_empty());
    }

    #[test]
    fn test_dismiss() {
        let mut notifications = Notifications::default();
        notifications.success("loaded");
        let id = notifications.toasts()[0].id;
        notifications.dismiss(id);
        assert!(notifications.is_empty());
    }
}
