use std::collections::VecDeque;
use std::time::{Duration, Instant};

use dashmap::DashMap;

/// Limiter settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// Requests allowed per key inside one window.
    pub max_requests: usize,
    /// Length of the sliding window.
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 100,
            window: Duration::from_secs(15 * 60),
        }
    }
}

/// Outcome of a single check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitDecision {
    /// Request recorded; `remaining` more fit in the current window.
    Allowed { remaining: usize },
    /// Request refused; the oldest recorded request leaves the window after `retry_after`.
    Limited { retry_after: Duration },
}

impl RateLimitDecision {
    #[must_use]
    pub const fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed { .. })
    }
}

/// Per-key log of request instants inside a sliding window.
///
/// Keys with no request inside the window are dropped by [`evict_stale`],
/// which the caller runs periodically.
///
/// [`evict_stale`]: SlidingWindowLimiter::evict_stale
#[derive(Debug)]
pub struct SlidingWindowLimiter {
    config: RateLimitConfig,
    entries: DashMap<String, VecDeque<Instant>>,
}

impl SlidingWindowLimiter {
    #[must_use]
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            entries: DashMap::new(),
        }
    }

    /// Checks (and on success records) a request for `key` at the current instant.
    pub fn check(&self, key: &str) -> RateLimitDecision {
        self.check_at(key, Instant::now())
    }

    /// Checks (and on success records) a request for `key` at `now`.
    pub fn check_at(&self, key: &str, now: Instant) -> RateLimitDecision {
        let mut log = self.entries.entry(key.to_string()).or_default();
        prune(&mut log, now, self.config.window);

        if log.len() >= self.config.max_requests {
            let retry_after = log
                .front()
                .map(|oldest| (*oldest + self.config.window).saturating_duration_since(now))
                .unwrap_or(self.config.window);
            return RateLimitDecision::Limited { retry_after };
        }

        log.push_back(now);
        RateLimitDecision::Allowed {
            remaining: self.config.max_requests - log.len(),
        }
    }

    /// Drops every key with no request inside the window. Returns how many were removed.
    pub fn evict_stale(&self) -> usize {
        self.evict_stale_at(Instant::now())
    }

    /// Like [`evict_stale`](Self::evict_stale), evaluated at `now`.
    pub fn evict_stale_at(&self, now: Instant) -> usize {
        let before = self.entries.len();
        let window = self.config.window;
        self.entries.retain(|_, log| {
            prune(log, now, window);
            !log.is_empty()
        });
        before.saturating_sub(self.entries.len())
    }

    /// Number of keys currently tracked.
    #[must_use]
    pub fn tracked_keys(&self) -> usize {
        self.entries.len()
    }
}

fn prune(log: &mut VecDeque<Instant>, now: Instant, window: Duration) {
    while let Some(oldest) = log.front() {
        if now.saturating_duration_since(*oldest) >= window {
            log.pop_front();
        } else {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limiter(max: usize, window_secs: u64) -> SlidingWindowLimiter {
        SlidingWindowLimiter::new(RateLimitConfig {
            max_requests: max,
            window: Duration::from_secs(window_secs),
        })
    }

    #[test]
    fn test_hundredth_allowed_hundred_first_rejected() {
        let limiter = SlidingWindowLimiter::new(RateLimitConfig::default());
        let now = Instant::now();

        for i in 0..99 {
            assert!(limiter.check_at("1.2.3.4", now).is_allowed(), "request {}", i + 1);
        }
        assert_eq!(
            limiter.check_at("1.2.3.4", now),
            RateLimitDecision::Allowed { remaining: 0 }
        );
        assert!(!limiter.check_at("1.2.3.4", now).is_allowed());
    }

    #[test]
    fn test_keys_are_independent() {
        let limiter = limiter(2, 60);
        let now = Instant::now();

        limiter.check_at("a", now);
        limiter.check_at("a", now);
        assert!(!limiter.check_at("a", now).is_allowed());
        assert!(limiter.check_at("b", now).is_allowed());
    }

    #[test]
    fn test_window_slides() {
        let limiter = limiter(2, 60);
        let start = Instant::now();

        limiter.check_at("a", start);
        limiter.check_at("a", start + Duration::from_secs(30));
        assert!(!limiter.check_at("a", start + Duration::from_secs(59)).is_allowed());
        // first request has left the window
        assert!(limiter.check_at("a", start + Duration::from_secs(60)).is_allowed());
    }

    #[test]
    fn test_rejected_requests_are_not_recorded() {
        let limiter = limiter(1, 60);
        let start = Instant::now();

        limiter.check_at("a", start);
        for s in 1..10 {
            assert!(!limiter.check_at("a", start + Duration::from_secs(s)).is_allowed());
        }
        assert!(limiter.check_at("a", start + Duration::from_secs(60)).is_allowed());
    }

    #[test]
    fn test_retry_after_counts_down_to_oldest_expiry() {
        let limiter = limiter(1, 60);
        let start = Instant::now();

        limiter.check_at("a", start);
        assert_eq!(
            limiter.check_at("a", start + Duration::from_secs(45)),
            RateLimitDecision::Limited {
                retry_after: Duration::from_secs(15)
            }
        );
    }

    #[test]
    fn test_evict_stale_drops_idle_keys() {
        let limiter = limiter(5, 60);
        let start = Instant::now();

        limiter.check_at("old", start);
        limiter.check_at("fresh", start + Duration::from_secs(50));
        assert_eq!(limiter.tracked_keys(), 2);

        let removed = limiter.evict_stale_at(start + Duration::from_secs(70));
        assert_eq!(removed, 1);
        assert_eq!(limiter.tracked_keys(), 1);

        assert_eq!(limiter.evict_stale_at(start + Duration::from_secs(200)), 1);
        assert_eq!(limiter.tracked_keys(), 0);
    }
}
