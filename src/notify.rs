//! Transient user-facing notifications.
//!
//! Every user action ends in a toast: a confirmation or an error. Toasts are
//! never persisted; they expire after the configured lifetime.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

const MAX_TOASTS: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Error,
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub level: ToastLevel,
    pub message: String,
    pub raised_at: Instant,
}

/// Queue of toasts, newest last.
#[derive(Debug)]
pub struct Toasts {
    queue: VecDeque<Toast>,
    lifetime: Duration,
}

impl Toasts {
    pub fn new(lifetime: Duration) -> Self {
        Toasts { queue: VecDeque::new(), lifetime }
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(ToastLevel::Info, message.into());
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(ToastLevel::Error, message.into());
    }

    fn push(&mut self, level: ToastLevel, message: String) {
        if self.queue.len() == MAX_TOASTS {
            self.queue.pop_front();
        }
        self.queue.push_back(Toast { level, message, raised_at: Instant::now() });
    }

    /// Drop toasts older than the lifetime, measured against `now`.
    pub fn expire(&mut self, now: Instant) {
        let lifetime = self.lifetime;
        self.queue
            .retain(|t| now.saturating_duration_since(t.raised_at) < lifetime);
    }

    /// Newest toast still alive at `now`.
    pub fn current(&self, now: Instant) -> Option<&Toast> {
        self.queue
            .iter()
            .rev()
            .find(|t| now.saturating_duration_since(t.raised_at) < self.lifetime)
    }

    pub fn last(&self) -> Option<&Toast> {
        self.queue.back()
    }

    /// Remove and return every queued toast, oldest first.
    pub fn drain(&mut self) -> Vec<Toast> {
        self.queue.drain(..).collect()
    }

    pub fn clear(&mut self) {
        self.queue.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl Default for Toasts {
    fn default() -> Self {
        Toasts::new(Duration::from_secs(4))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_is_newest_live_toast() {
        let mut toasts = Toasts::new(Duration::from_secs(4));
        toasts.info("Task created");
        toasts.error("Failed to update task");
        let now = Instant::now();
        let current = toasts.current(now).unwrap();
        assert_eq!(current.level, ToastLevel::Error);
        assert_eq!(current.message, "Failed to update task");
    }

    #[test]
    fn test_expire_drops_old_toasts() {
        let mut toasts = Toasts::new(Duration::from_secs(4));
        toasts.info("Task moved to Open");
        let later = Instant::now() + Duration::from_secs(5);
        assert!(toasts.current(later).is_none());
        toasts.expire(later);
        assert!(toasts.is_empty());
    }

    #[test]
    fn test_queue_is_bounded() {
        let mut toasts = Toasts::default();
        for i in 0..40 {
            toasts.info(format!("toast {}", i));
        }
        let drained = toasts.drain();
        assert_eq!(drained.len(), MAX_TOASTS);
        assert_eq!(drained.last().map(|t| t.message.as_str()), Some("toast 39"));
        assert!(toasts.is_empty());
    }
}
