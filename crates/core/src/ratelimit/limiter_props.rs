//! Property-based tests for the sliding-window limiter.

use std::time::{Duration, Instant};

use proptest::prelude::*;

use super::{RateLimitConfig, SlidingWindowLimiter};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Within one window exactly `max` requests are admitted, whatever the burst size.
    #[test]
    fn prop_admits_exactly_max_per_window(max in 1usize..50, extra in 0usize..50) {
        let limiter = SlidingWindowLimiter::new(RateLimitConfig {
            max_requests: max,
            window: Duration::from_secs(900),
        });
        let now = Instant::now();

        let admitted = (0..max + extra)
            .filter(|_| limiter.check_at("k", now).is_allowed())
            .count();
        prop_assert_eq!(admitted, max);
    }

    /// One key's traffic never changes another key's outcome.
    #[test]
    fn prop_keys_do_not_interfere(max in 1usize..20, noise in 0usize..60) {
        let limiter = SlidingWindowLimiter::new(RateLimitConfig {
            max_requests: max,
            window: Duration::from_secs(900),
        });
        let now = Instant::now();

        for _ in 0..noise {
            limiter.check_at("noisy", now);
        }
        prop_assert!(limiter.check_at("quiet", now).is_allowed());
    }

    /// After eviction past the window nothing is tracked.
    #[test]
    fn prop_eviction_clears_idle_keys(keys in prop::collection::hash_set("[a-z]{1,6}", 0..30)) {
        let limiter = SlidingWindowLimiter::new(RateLimitConfig {
            max_requests: 10,
            window: Duration::from_secs(60),
        });
        let now = Instant::now();
        for key in &keys {
            limiter.check_at(key, now);
        }
        prop_assert_eq!(limiter.tracked_keys(), keys.len());

        limiter.evict_stale_at(now + Duration::from_secs(61));
        prop_assert_eq!(limiter.tracked_keys(), 0);
    }
}
