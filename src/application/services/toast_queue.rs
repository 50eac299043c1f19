use std::collections::VecDeque;
use std::time::Duration;

use crate::domain::errors::OperationError;
use crate::domain::toast::{Toast, ToastLevel};

/// FIFO of toasts; only the front one is visible.
#[derive(Debug)]
pub struct ToastQueue {
    queue: VecDeque<Toast>,
    duration: Duration,
}

impl Default for ToastQueue {
    fn default() -> Self {
        Self::new(Duration::from_secs(4))
    }
}

impl ToastQueue {
    #[must_use]
    pub const fn new(duration: Duration) -> Self {
        Self {
            queue: VecDeque::new(),
            duration,
        }
    }

    pub fn push(&mut self, level: ToastLevel, message: impl Into<String>) {
        self.queue
            .push_back(Toast::new(level, message).with_duration(self.duration));
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(ToastLevel::Success, message);
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(ToastLevel::Info, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(ToastLevel::Error, message);
    }

    pub fn failure(&mut self, error: &OperationError) {
        self.error(error.banner());
    }

    /// Starts the front toast's clock and drops it once expired.
    pub fn tick(&mut self) {
        if let Some(front) = self.queue.front_mut() {
            front.mark_shown();
            if front.is_expired() {
                self.queue.pop_front();
                if let Some(next) = self.queue.front_mut() {
                    next.mark_shown();
                }
            }
        }
    }

    #[must_use]
    pub fn current(&self) -> Option<&Toast> {
        self.queue.front()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::ValidationError;
    use std::time::Instant;

    #[test]
    fn test_front_toast_advances_after_expiry() {
        let mut queue = ToastQueue::default();
        queue.success("Company created");
        queue.info("Refreshed");

        queue.tick();
        assert_eq!(queue.current().unwrap().message, "Company created");

        queue.queue.front_mut().unwrap().shown_at =
            Some(Instant::now().checked_sub(Duration::from_secs(10)).unwrap());
        queue.tick();

        let next = queue.current().unwrap();
        assert_eq!(next.message, "Refreshed");
        assert!(next.shown_at.is_some());
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_failure_uses_banner() {
        let mut queue = ToastQueue::default();
        queue.failure(&ValidationError::CompanyRequired.into());

        let toast = queue.current().unwrap();
        assert_eq!(toast.level, ToastLevel::Error);
        assert!(!toast.message.is_empty());
    }
}
