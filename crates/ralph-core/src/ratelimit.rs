//! Fixed-window request counting keyed by (client, route).
//!
//! The limiter is plain shared state injected into whoever needs it; there
//! is no process-wide singleton. Expired windows are evicted on every check,
//! so memory is bounded by the number of distinct (client, route) pairs
//! active within one window.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Mutex;

/// Per-route limit: at most `max_requests` per `window_secs`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteLimit {
    pub window_secs: u64,
    pub max_requests: u32,
}

/// Outcome of one admission check.
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    pub allowed: bool,
    /// Requests left in the current window (0 when denied).
    pub remaining: u32,
    /// Seconds until the current window resets.
    pub retry_after_secs: u64,
}

#[derive(Debug)]
struct Window {
    started: DateTime<Utc>,
    window_secs: u64,
    count: u32,
}

impl Window {
    fn expired(&self, now: DateTime<Utc>) -> bool {
        now - self.started >= chrono::Duration::seconds(self.window_secs as i64)
    }
}

#[derive(Debug, Default)]
pub struct RateLimiter {
    windows: Mutex<HashMap<(String, String), Window>>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn check(&self, client: &str, route: &str, limit: &RouteLimit) -> Decision {
        self.check_at(client, route, limit, Utc::now())
    }

    /// Admission check at an explicit instant. Split out so tests can drive
    /// the clock instead of sleeping.
    pub fn check_at(
        &self,
        client: &str,
        route: &str,
        limit: &RouteLimit,
        now: DateTime<Utc>,
    ) -> Decision {
        let mut windows = self.windows.lock().expect("limiter lock poisoned");

        // Client identity is caller-supplied; the map must never hold a
        // window past its span.
        windows.retain(|_, w| !w.expired(now));

        let key = (client.to_string(), route.to_string());
        let window = windows.entry(key).or_insert(Window {
            started: now,
            window_secs: limit.window_secs,
            count: 0,
        });
        window.window_secs = limit.window_secs;

        let elapsed = (now - window.started).num_seconds().max(0) as u64;
        let retry_after_secs = limit.window_secs.saturating_sub(elapsed);

        if window.count >= limit.max_requests {
            return Decision {
                allowed: false,
                remaining: 0,
                retry_after_secs,
            };
        }

        window.count += 1;
        Decision {
            allowed: true,
            remaining: limit.max_requests - window.count,
            retry_after_secs,
        }
    }
}
