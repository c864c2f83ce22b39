//! User-facing feedback seams.
//!
//! The API client never prints or navigates on its own. It raises a
//! [`Notice`] through a [`Notifier`] and forces navigation through a
//! [`Navigator`], so every front end (CLI, desktop shell, tests) decides how
//! those side effects are rendered.

use serde::{Deserialize, Serialize};
use std::sync::Mutex;

/// Severity of a user-visible notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Negative,
    Warning,
    Info,
}

/// A short message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn negative(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Negative,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }
}

/// Surface that displays notices to the user.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Surface that owns the current route and can be forced elsewhere.
pub trait Navigator: Send + Sync {
    /// Path of the route currently shown, if the surface tracks one.
    fn current_route(&self) -> Option<String>;

    /// Moves the user to `path`.
    fn redirect(&self, path: &str);
}

/// A notifier that drops every notice.
#[derive(Debug, Default, Clone)]
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn notify(&self, _notice: Notice) {}
}

/// A navigator with no routes.
#[derive(Debug, Default, Clone)]
pub struct NoopNavigator;

impl Navigator for NoopNavigator {
    fn current_route(&self) -> Option<String> {
        None
    }

    fn redirect(&self, _path: &str) {}
}

/// Notifier that keeps every notice in memory.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of every notice raised so far.
    pub fn notices(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .map(|notices| notices.clone())
            .unwrap_or_default()
    }

    pub fn last_message(&self) -> Option<String> {
        self.notices().last().map(|notice| notice.message.clone())
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        if let Ok(mut notices) = self.notices.lock() {
            notices.push(notice);
        }
    }
}

/// Navigator that tracks the current route and records forced redirects.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    current: Mutex<Option<String>>,
    redirects: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a navigator that starts on `path`.
    pub fn at(path: impl Into<String>) -> Self {
        Self {
            current: Mutex::new(Some(path.into())),
            redirects: Mutex::new(Vec::new()),
        }
    }

    pub fn redirects(&self) -> Vec<String> {
        self.redirects
            .lock()
            .map(|redirects| redirects.clone())
            .unwrap_or_default()
    }
}

impl Navigator for RecordingNavigator {
    fn current_route(&self) -> Option<String> {
        self.current.lock().ok().and_then(|current| current.clone())
    }

    fn redirect(&self, path: &str) {
        if let Ok(mut redirects) = self.redirects.lock() {
            redirects.push(path.to_string());
        }
        if let Ok(mut current) = self.current.lock() {
            *current = Some(path.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_navigator_moves_current_route() {
        let navigator = RecordingNavigator::at("/activities");
        navigator.redirect("/auth/login");

        assert_eq!(navigator.current_route().as_deref(), Some("/auth/login"));
        assert_eq!(navigator.redirects(), vec!["/auth/login".to_string()]);
    }

    #[test]
    fn test_recording_notifier_keeps_order() {
        let notifier = RecordingNotifier::new();
        notifier.notify(Notice::negative("first"));
        notifier.notify(Notice::info("second"));

        assert_eq!(notifier.notices().len(), 2);
        assert_eq!(notifier.last_message().as_deref(), Some("second"));
    }
}
