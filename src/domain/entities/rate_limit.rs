use chrono::{DateTime, Utc};

/// Per-identity counter for the current fixed window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitRecord {
    pub window_start: DateTime<Utc>,
    pub count: u32,
}

impl RateLimitRecord {
    pub fn new(window_start: DateTime<Utc>) -> Self {
        RateLimitRecord { window_start, count: 1 }
    }

    /// End of the window, or `None` when it lies beyond the representable range.
    pub fn window_end(&self, window: chrono::Duration) -> Option<DateTime<Utc>> {
        self.window_start.checked_add_signed(window)
    }

    /// A window whose end cannot be represented never expires.
    pub fn is_expired(&self, now: DateTime<Utc>, window: chrono::Duration) -> bool {
        self.window_end(window).is_some_and(|end| now > end)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitDecision {
    pub admitted: bool,
    pub remaining: u32,
    /// Only set when the request was rejected.
    pub retry_after_secs: Option<u64>,
    pub limit: u32,
}
