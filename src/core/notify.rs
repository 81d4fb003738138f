//! Transient user-facing notifications.
//!
//! Notices are fire-and-forget: they never gate or block a command. Each one
//! expires roughly three seconds after it is pushed; `active` filters out
//! expired entries and `sweep` drops them for good.

use serde::{Deserialize, Serialize};

use crate::core::time;

/// Seconds a notice stays visible before it auto-expires.
pub const NOTICE_TTL_SECS: u64 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notice {
    pub message: String,
    pub level: NoticeLevel,
    pub expires_at: u64,
}

/// In-memory log of transient notices for one session.
#[derive(Debug, Default)]
pub struct NoticeLog {
    entries: Vec<Notice>,
}

impl NoticeLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(message.into(), NoticeLevel::Success);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(message.into(), NoticeLevel::Error);
    }

    fn push(&mut self, message: String, level: NoticeLevel) {
        self.entries.push(Notice {
            message,
            level,
            expires_at: time::now_unix_secs() + NOTICE_TTL_SECS,
        });
    }

    /// Notices still within their TTL at `now`.
    pub fn active(&self, now: u64) -> Vec<&Notice> {
        self.entries.iter().filter(|n| n.expires_at > now).collect()
    }

    /// Drop expired entries so the log stays bounded.
    pub fn sweep(&mut self, now: u64) {
        self.entries.retain(|n| n.expires_at > now);
    }

    /// Most recent notice regardless of expiry, for immediate echo.
    pub fn latest(&self) -> Option<&Notice> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notice_expires_after_ttl() {
        let mut log = NoticeLog::new();
        log.success("saved");
        let pushed_at = time::now_unix_secs();
        assert_eq!(log.active(pushed_at).len(), 1);
        assert!(log.active(pushed_at + NOTICE_TTL_SECS + 1).is_empty());
    }

    #[test]
    fn test_sweep_drops_expired() {
        let mut log = NoticeLog::new();
        log.error("missing conclusion");
        let now = time::now_unix_secs();
        log.sweep(now + NOTICE_TTL_SECS + 1);
        assert!(log.latest().is_none());
    }

    #[test]
    fn test_latest_is_most_recent() {
        let mut log = NoticeLog::new();
        log.success("first");
        log.error("second");
        let last = log.latest().unwrap();
        assert_eq!(last.message, "second");
        assert_eq!(last.level, NoticeLevel::Error);
    }
}
