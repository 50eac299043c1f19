use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Success,
    Info,
    Error,
}

/// Short-lived message shown over the main screen.
#[derive(Debug, Clone)]
pub struct Toast {
    pub level: ToastLevel,
    pub message: String,
    pub shown_at: Option<Instant>,
    pub duration: Duration,
}

impl Toast {
    #[must_use]
    pub fn new(level: ToastLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            shown_at: None,
            duration: Duration::from_secs(4),
        }
    }

    #[must_use]
    pub const fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Expiry counts from the first render, not from creation.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.shown_at
            .is_some_and(|start| start.elapsed() > self.duration)
    }

    pub fn mark_shown(&mut self) {
        if self.shown_at.is_none() {
            self.shown_at = Some(Instant::now());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unshown_toast_never_expires() {
        let toast = Toast::new(ToastLevel::Success, "Saved").with_duration(Duration::ZERO);
        assert!(!toast.is_expired());
    }

    #[test]
    fn test_expiry_after_shown() {
        let mut toast =
            Toast::new(ToastLevel::Error, "Failed").with_duration(Duration::from_nanos(1));
        toast.mark_shown();
        std::thread::sleep(Duration::from_millis(1));
        assert!(toast.is_expired());
    }
}
