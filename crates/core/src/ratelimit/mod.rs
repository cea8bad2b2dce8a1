//! Sliding-window request limiter keyed by client identifier.
//!
//! Process-local: each instance keeps its own counters and nothing is persisted.

mod limiter;

#[cfg(test)]
mod limiter_props;

pub use limiter::{RateLimitConfig, RateLimitDecision, SlidingWindowLimiter};
