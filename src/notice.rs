//! User-visible notices.

use std::collections::VecDeque;

use serde::Serialize;
use web_time::Instant;

use crate::constants::MAX_NOTICES;

/// Notice severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// A message shown to the user.
#[derive(Debug, Clone, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    #[serde(skip)]
    pub at: Instant,
}

/// Bounded log of recent notices, newest last.
#[derive(Debug, Clone)]
pub struct NoticeLog {
    notices: VecDeque<Notice>,
    capacity: usize,
}

impl NoticeLog {
    pub fn new() -> Self {
        Self::with_capacity(MAX_NOTICES)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            notices: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn push(&mut self, level: NoticeLevel, message: impl Into<String>) {
        let message = message.into();
        match level {
            NoticeLevel::Info => log::info!("Notice: {}", message),
            NoticeLevel::Warning => log::warn!("Notice: {}", message),
            NoticeLevel::Error => log::error!("Notice: {}", message),
        }
        if self.notices.len() == self.capacity {
            self.notices.pop_front();
        }
        self.notices.push_back(Notice {
            level,
            message,
            at: Instant::now(),
        });
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(NoticeLevel::Info, message);
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.push(NoticeLevel::Warning, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(NoticeLevel::Error, message);
    }

    pub fn latest(&self) -> Option<&Notice> {
        self.notices.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notice> {
        self.notices.iter()
    }

    pub fn len(&self) -> usize {
        self.notices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notices.is_empty()
    }

    /// Take all notices, e.g. after the UI displayed them.
    pub fn drain(&mut self) -> Vec<Notice> {
        self.notices.drain(..).collect()
    }
}

impl Default for NoticeLog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_drops_oldest() {
        let mut log = NoticeLog::with_capacity(2);
        log.info("one");
        log.warn("two");
        log.error("three");
        let messages: Vec<&str> = log.iter().map(|n| n.message.as_str()).collect();
        assert_eq!(messages, vec!["two", "three"]);
        assert_eq!(log.latest().map(|n| n.level), Some(NoticeLevel::Error));
    }

    #[test]
    fn test_drain_empties() {
        let mut log = NoticeLog::new();
        log.info("hello");
        assert_eq!(log.drain().len(), 1);
        assert!(log.is_empty());
    }
}
