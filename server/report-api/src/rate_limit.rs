//! Per-IP sliding-window rate limit for the analyze endpoint. In-memory only;
//! state resets on restart and is not shared across replicas.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

const WINDOW: Duration = Duration::from_secs(60);
const MAX_REQUESTS_PER_WINDOW: usize = 10;

pub struct RateLimiter {
  store: Mutex<HashMap<String, Vec<Instant>>>,
}

impl RateLimiter {
  pub fn new() -> Self {
    Self {
      store: Mutex::new(HashMap::new()),
    }
  }

  /// Record one request for `key`. Returns false when the window is full;
  /// rejected requests are not recorded. Expired timestamps are pruned on
  /// every call, so the map never grows past active keys.
  pub fn check(&self, key: &str) -> bool {
    let now = Instant::now();
    let mut store = self.store.lock().unwrap_or_else(|e| e.into_inner());
    let timestamps = store.entry(key.to_string()).or_default();
    timestamps.retain(|t| now.duration_since(*t) < WINDOW);
    if timestamps.len() >= MAX_REQUESTS_PER_WINDOW {
      return false;
    }
    timestamps.push(now);
    true
  }
}

impl Default for RateLimiter {
  fn default() -> Self {
    Self::new()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn eleventh_request_in_window_is_rejected() {
    let limiter = RateLimiter::new();
    for _ in 0..10 {
      assert!(limiter.check("1.2.3.4"));
    }
    assert!(!limiter.check("1.2.3.4"));
  }

  #[test]
  fn keys_are_limited_independently() {
    let limiter = RateLimiter::new();
    for _ in 0..10 {
      assert!(limiter.check("1.2.3.4"));
    }
    assert!(!limiter.check("1.2.3.4"));
    assert!(limiter.check("5.6.7.8"));
  }

  #[test]
  fn rejected_requests_do_not_extend_the_window() {
    let limiter = RateLimiter::new();
    for _ in 0..10 {
      limiter.check("k");
    }
    // A burst of rejected calls must not push the window forward.
    for _ in 0..5 {
      assert!(!limiter.check("k"));
    }
  }
}
