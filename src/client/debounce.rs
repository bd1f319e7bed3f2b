//! Submission debounce

use std::time::Duration;
use tokio::time::Instant;

/// Rejects submissions that start within `window` of the last accepted one
///
/// Guards against accidental double submission; it is not a rate limiter.
/// Only accepted submissions move the reference point.
#[derive(Debug, Clone)]
pub struct Debouncer {
    window: Duration,
    last_accepted: Option<Instant>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_accepted: None,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Accept a submission starting at `now`, or reject it as too soon
    pub fn try_accept(&mut self, now: Instant) -> bool {
        if let Some(last) = self.last_accepted
            && now.saturating_duration_since(last) < self.window
        {
            return false;
        }
        self.last_accepted = Some(now);
        true
    }
}
