//! Transient user-facing notifications
//!
//! Every panel operation ends by posting either a success or an error
//! notification. The presentation layer shows the latest one as a toast.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use serde::Serialize;

const HISTORY_LIMIT: usize = 32;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum NotificationKind {
    Success,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
    pub at: DateTime<Utc>,
}

/// Bounded notification log shared by one panel
#[derive(Debug, Default)]
pub struct Notifier {
    history: Mutex<VecDeque<Notification>>,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn success(&self, message: impl Into<String>) {
        self.push(NotificationKind::Success, message.into());
    }

    pub fn error(&self, message: impl Into<String>) {
        self.push(NotificationKind::Error, message.into());
    }

    fn push(&self, kind: NotificationKind, message: String) {
        let notification = Notification {
            kind,
            message,
            at: Utc::now(),
        };
        let mut history = self.entries();
        if history.len() == HISTORY_LIMIT {
            history.pop_front();
        }
        history.push_back(notification);
    }

    /// Most recent notification, if any
    pub fn latest(&self) -> Option<Notification> {
        self.entries().back().cloned()
    }

    /// Oldest first
    pub fn history(&self) -> Vec<Notification> {
        self.entries().iter().cloned().collect()
    }

    /// Drop the current toast, e.g. when the user closes it.
    pub fn dismiss(&self) {
        self.entries().pop_back();
    }

    fn entries(&self) -> MutexGuard<'_, VecDeque<Notification>> {
        self.history
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_is_last_posted() {
        let notifier = Notifier::new();
        assert!(notifier.latest().is_none());

        notifier.error("Failed to load assets");
        notifier.success("Asset uploaded successfully!");

        let latest = notifier.latest().unwrap();
        assert_eq!(latest.kind, NotificationKind::Success);
        assert_eq!(latest.message, "Asset uploaded successfully!");
    }

    #[test]
    fn test_history_is_bounded() {
        let notifier = Notifier::new();
        for i in 0..(HISTORY_LIMIT + 5) {
            notifier.success(format!("event {i}"));
        }
        let history = notifier.history();
        assert_eq!(history.len(), HISTORY_LIMIT);
        assert_eq!(history[0].message, "event 5");
    }

    #[test]
    fn test_poisoned_history_still_records() {
        let notifier = std::sync::Arc::new(Notifier::new());
        notifier.success("before");

        let poisoner = notifier.clone();
        let _ = std::thread::spawn(move || {
            let _held = poisoner.history.lock().unwrap();
            panic!("poison the history lock");
        })
        .join();
        assert!(notifier.history.is_poisoned());

        notifier.error("Failed to load assets");
        assert_eq!(notifier.latest().unwrap().message, "Failed to load assets");
        assert_eq!(notifier.history().len(), 2);
        notifier.dismiss();
        assert_eq!(notifier.latest().unwrap().message, "before");
    }

    #[test]
    fn test_dismiss_removes_latest() {
        let notifier = Notifier::new();
        notifier.error("first");
        notifier.error("second");
        notifier.dismiss();
        assert_eq!(notifier.latest().unwrap().message, "first");
    }
}
