//! Fixed-window request rate limiting

use std::time::{Duration, Instant};

use dashmap::DashMap;

struct Bucket {
    count: u32,
    reset_at: Instant,
}

/// In-process fixed-window rate limiter
///
/// Each instance owns its configuration and bucket store, so multiple
/// independently configured limiters (per-route, per-tenant) coexist.
/// Multi-process deployments need a shared atomic store behind the same
/// check/remaining/reset contract.
pub struct RateLimiter {
    window: Duration,
    max: u32,
    buckets: DashMap<String, Bucket>,
}

impl RateLimiter {
    /// Limiter allowing `max` requests per `window`
    pub fn new(window: Duration, max: u32) -> Self {
        assert!(max > 0, "rate limit max must be positive");
        Self {
            window,
            max,
            buckets: DashMap::new(),
        }
    }

    /// Record one request against `key` and report whether it is allowed
    ///
    /// The count is incremented even on rejection, so call at most once per
    /// logical request. A bucket whose window has passed is reset in place
    /// before counting. Entry access is exclusive per key; different keys
    /// do not contend.
    pub fn check(&self, key: &str) -> bool {
        let now = Instant::now();
        let mut bucket = self
            .buckets
            .entry(key.to_string())
            .or_insert_with(|| Bucket {
                count: 0,
                reset_at: now + self.window,
            });

        if now >= bucket.reset_at {
            bucket.count = 0;
            bucket.reset_at = now + self.window;
        }

        bucket.count += 1;
        let allowed = bucket.count <= self.max;
        if !allowed {
            tracing::debug!(key, count = bucket.count, "rate limit exceeded");
        }
        allowed
    }

    /// Requests left in the current window
    ///
    /// Does not mutate state and does not apply window expiry; callers
    /// needing a fresh window rely on `check`.
    pub fn remaining(&self, key: &str) -> u32 {
        match self.buckets.get(key) {
            Some(bucket) => self.max.saturating_sub(bucket.count),
            None => self.max,
        }
    }

    /// Forget `key`, restoring it to the unthrottled state
    pub fn reset(&self, key: &str) {
        self.buckets.remove(key);
    }

    /// Rate-limit response headers for collaborators
    pub fn headers(&self, key: &str) -> Vec<(String, String)> {
        vec![
            ("X-RateLimit-Limit".to_string(), self.max.to_string()),
            (
                "X-RateLimit-Remaining".to_string(),
                self.remaining(key).to_string(),
            ),
        ]
    }
}
