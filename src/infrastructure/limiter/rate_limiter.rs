use std::{sync::Arc, time::Duration};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use crate::entities::rate_limit::{RateLimitDecision, RateLimitRecord};
use crate::limiter::counter_store::CounterStore;

/// Source of the current time, injectable so windows can be advanced in tests.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Fixed-window limiter: at most `max_requests` per identity per `window`.
pub struct RateLimiter<S: CounterStore> {
    store: S,
    clock: Arc<dyn Clock>,
    max_requests: u32,
    window: chrono::Duration,
    sweep_threshold: usize,
    // Serializes get/compare/set so concurrent workers cannot lose updates.
    guard: Mutex<()>,
}

impl<S: CounterStore> RateLimiter<S> {
    pub fn new(store: S, max_requests: u32, window: Duration, sweep_threshold: usize) -> Self {
        Self::with_clock(store, Arc::new(SystemClock), max_requests, window, sweep_threshold)
    }

    pub fn with_clock(
        store: S,
        clock: Arc<dyn Clock>,
        max_requests: u32,
        window: Duration,
        sweep_threshold: usize,
    ) -> Self {
        let window = chrono::Duration::from_std(window).unwrap_or(chrono::Duration::MAX);
        Self {
            store,
            clock,
            max_requests,
            window,
            sweep_threshold,
            guard: Mutex::new(()),
        }
    }

    /// Decide whether `key` may make another request in its current window.
    pub fn check(&self, key: &str) -> RateLimitDecision {
        let _guard = self.guard.lock();
        let now = self.clock.now();

        if self.store.len() > self.sweep_threshold {
            let removed = self.store.sweep(now, self.window);
            tracing::debug!(removed, "Swept expired rate-limit records");
        }

        match self.store.get(key) {
            Some(record) if !record.is_expired(now, self.window) => {
                if record.count >= self.max_requests {
                    let remaining_ms = match record.window_end(self.window) {
                        Some(reset_at) => (reset_at - now).num_milliseconds().max(0) as u64,
                        None => self.window.num_milliseconds().max(0) as u64,
                    };
                    let retry_after = remaining_ms.div_ceil(1000).max(1);

                    return RateLimitDecision {
                        admitted: false,
                        remaining: 0,
                        retry_after_secs: Some(retry_after),
                        limit: self.max_requests,
                    };
                }

                let updated = RateLimitRecord { count: record.count + 1, ..record };
                self.store.set(key, updated);
                self.admit(updated.count)
            }
            _ => {
                self.store.set(key, RateLimitRecord::new(now));
                self.admit(1)
            }
        }
    }

    /// Drop every expired record regardless of store size.
    pub fn sweep_expired(&self) -> usize {
        let _guard = self.guard.lock();
        self.store.sweep(self.clock.now(), self.window)
    }

    pub fn tracked_clients(&self) -> usize {
        self.store.len()
    }

    fn admit(&self, count: u32) -> RateLimitDecision {
        RateLimitDecision {
            admitted: true,
            remaining: self.max_requests.saturating_sub(count),
            retry_after_secs: None,
            limit: self.max_requests,
        }
    }
}
