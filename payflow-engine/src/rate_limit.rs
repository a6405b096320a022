//! Per-user sliding-window rate limiting.
//!
//! Each user keeps an ordered log of recent attempt timestamps. Expired
//! entries are pruned when that user is checked; idle users are removed only
//! by [`RateLimiter::sweep`].

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use dashmap::DashMap;

/// Rate limiter state shared across requests.
pub struct RateLimiter {
    /// Per-user attempt timestamps, oldest first
    windows: DashMap<String, VecDeque<Instant>>,
    max_requests: usize,
    window: Duration,
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(100, Duration::from_secs(60))
    }
}

impl RateLimiter {
    /// Creates a new rate limiter.
    ///
    /// # Arguments
    /// * `max_requests` - Attempts allowed per user inside the window
    /// * `window` - Length of the trailing window
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            windows: DashMap::new(),
            max_requests,
            window,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Checks whether `user_id` may make another attempt now, recording it if so.
    pub fn check(&self, user_id: &str) -> bool {
        self.check_at(user_id, Instant::now())
    }

    /// Same as [`check`](Self::check) with an explicit clock reading.
    ///
    /// The user's entry stays locked for the whole prune-count-record
    /// sequence, so concurrent checks for one user cannot lose updates.
    pub fn check_at(&self, user_id: &str, now: Instant) -> bool {
        let mut entry = self.windows.entry(user_id.to_string()).or_default();
        let timestamps = entry.value_mut();

        prune(timestamps, now, self.window);

        if timestamps.len() >= self.max_requests {
            return false;
        }

        timestamps.push_back(now);
        true
    }

    /// Drops users with no attempts left inside the window.
    /// Returns how many users were removed.
    pub fn sweep(&self) -> usize {
        self.sweep_at(Instant::now())
    }

    pub fn sweep_at(&self, now: Instant) -> usize {
        let before = self.windows.len();
        self.windows.retain(|_, timestamps| {
            prune(timestamps, now, self.window);
            !timestamps.is_empty()
        });
        before.saturating_sub(self.windows.len())
    }

    /// Number of users currently tracked.
    pub fn tracked_users(&self) -> usize {
        self.windows.len()
    }
}

fn prune(timestamps: &mut VecDeque<Instant>, now: Instant, window: Duration) {
    while let Some(oldest) = timestamps.front() {
        if now.saturating_duration_since(*oldest) >= window {
            timestamps.pop_front();
        } else {
            break;
        }
    }
}
