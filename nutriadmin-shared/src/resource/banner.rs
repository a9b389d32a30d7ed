use std::time::{Duration, Instant};

/// Shown when a failed call carries no usable message.
pub const FALLBACK_MESSAGE: &str = "Something went wrong. Please try again.";

/// A dismissible, auto-expiring error message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    message: String,
    raised_at: Instant,
    ttl: Duration,
}

impl Banner {
    #[must_use]
    pub fn new(message: impl Into<String>, ttl: Duration) -> Self {
        Self::raised_at(message, ttl, Instant::now())
    }

    #[must_use]
    pub fn raised_at(message: impl Into<String>, ttl: Duration, raised_at: Instant) -> Self {
        Self {
            message: message.into(),
            raised_at,
            ttl,
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub fn is_expired_at(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.raised_at) >= self.ttl
    }

    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }
}
