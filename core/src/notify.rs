use serde::{Deserialize, Serialize};
use std::sync::Mutex;

/// Visual weight of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Default,
    Destructive,
}

/// Fire-and-forget operator-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub title: String,
    pub description: String,
    pub severity: Severity,
}

impl Notice {
    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            severity: Severity::Default,
        }
    }

    pub fn destructive(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            severity: Severity::Destructive,
        }
    }
}

/// Sink for operator notices. Delivery is fire-and-forget; implementations
/// never report failure back to the caller.
pub trait Notifier {
    fn notify(&self, notice: Notice);
}

/// Routes notices through the `log` facade.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notice: Notice) {
        match notice.severity {
            Severity::Default => log::info!("{}: {}", notice.title, notice.description),
            Severity::Destructive => log::warn!("{}: {}", notice.title, notice.description),
        }
    }
}

/// Collects notices in memory; used by tests and the scenario report.
#[derive(Default)]
pub struct MemoryNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drain(&self) -> Vec<Notice> {
        if let Ok(mut notices) = self.notices.lock() {
            std::mem::take(&mut *notices)
        } else {
            Vec::new()
        }
    }

    pub fn snapshot(&self) -> Vec<Notice> {
        if let Ok(notices) = self.notices.lock() {
            notices.clone()
        } else {
            Vec::new()
        }
    }
}

impl Notifier for MemoryNotifier {
    fn notify(&self, notice: Notice) {
        if let Ok(mut notices) = self.notices.lock() {
            notices.push(notice);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_notifier_keeps_arrival_order() {
        let notifier = MemoryNotifier::new();
        notifier.notify(Notice::info("first", "a"));
        notifier.notify(Notice::destructive("second", "b"));

        let notices = notifier.snapshot();
        assert_eq!(notices.len(), 2);
        assert_eq!(notices[0].title, "first");
        assert_eq!(notices[1].severity, Severity::Destructive);

        assert_eq!(notifier.drain().len(), 2);
        assert!(notifier.snapshot().is_empty());
    }

    #[test]
    fn severity_tags_serialize_lowercase() {
        let notice = Notice::destructive("t", "d");
        let raw = serde_json::to_string(&notice).unwrap();
        assert!(raw.contains("\"destructive\""));
    }
}
