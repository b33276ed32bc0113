// SPDX-FileCopyrightText: 2026 Blufio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Process-wide fixed-window rate gate.
//!
//! Admits at most `capacity` posting attempts per window. The window starts
//! when the gate is constructed and restarts on the first call after it
//! elapses. Concurrent callers serialize on a short, non-async critical
//! section.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use postsmith_config::model::RateLimitConfig;
use tokio::time::Instant;

/// Counter state for the current window.
#[derive(Debug)]
struct RateWindow {
    start: Instant,
    count: u32,
}

/// Fixed-window admission counter shared through `Arc`.
#[derive(Debug)]
pub struct RateGate {
    capacity: u32,
    window: Duration,
    state: Mutex<RateWindow>,
}

impl RateGate {
    /// Create a gate admitting `capacity` calls per `window`.
    pub fn new(capacity: u32, window: Duration) -> Self {
        Self {
            capacity,
            window,
            state: Mutex::new(RateWindow {
                start: Instant::now(),
                count: 0,
            }),
        }
    }

    /// Create a gate from the `[rate_limit]` config section.
    pub fn from_config(config: &RateLimitConfig) -> Self {
        Self::new(config.capacity, Duration::from_secs(config.window_secs))
    }

    /// Take one slot from the current window, if any remain.
    pub fn try_acquire(&self) -> bool {
        let now = Instant::now();
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);

        if now.duration_since(state.start) >= self.window {
            state.start = now;
            state.count = 0;
        }

        if state.count >= self.capacity {
            return false;
        }
        state.count += 1;
        true
    }

    /// Whole seconds until the current window ends, rounded up.
    pub fn seconds_remaining(&self) -> u64 {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let remaining = self
            .window
            .saturating_sub(Instant::now().duration_since(state.start));
        remaining.as_secs() + u64::from(remaining.subsec_nanos() > 0)
    }

    /// Slots taken in the current window.
    pub fn count(&self) -> u32 {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .count
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn denies_after_capacity() {
        let gate = RateGate::new(3, Duration::from_secs(900));
        assert!(gate.try_acquire());
        assert!(gate.try_acquire());
        assert!(gate.try_acquire());
        assert!(!gate.try_acquire());
        assert_eq!(gate.count(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn window_elapse_resets_count() {
        let gate = RateGate::new(2, Duration::from_secs(900));
        assert!(gate.try_acquire());
        assert!(gate.try_acquire());
        assert!(!gate.try_acquire());

        tokio::time::advance(Duration::from_secs(900)).await;
        assert!(gate.try_acquire());
        assert_eq!(gate.count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn window_starts_at_construction() {
        let gate = RateGate::new(1, Duration::from_secs(60));
        tokio::time::advance(Duration::from_secs(59)).await;
        assert!(gate.try_acquire());
        assert!(!gate.try_acquire());
        // One second later the window that began at construction has ended.
        tokio::time::advance(Duration::from_secs(1)).await;
        assert!(gate.try_acquire());
    }

    #[tokio::test(start_paused = true)]
    async fn seconds_remaining_rounds_up() {
        let gate = RateGate::new(1, Duration::from_secs(900));
        assert_eq!(gate.seconds_remaining(), 900);
        tokio::time::advance(Duration::from_millis(100_500)).await;
        assert_eq!(gate.seconds_remaining(), 800);
        tokio::time::advance(Duration::from_secs(1000)).await;
        assert_eq!(gate.seconds_remaining(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_callers_never_over_admit() {
        let gate = Arc::new(RateGate::new(50, Duration::from_secs(900)));
        let mut handles = Vec::new();
        for _ in 0..200 {
            let gate = Arc::clone(&gate);
            handles.push(tokio::spawn(async move { gate.try_acquire() }));
        }

        let mut admitted = 0;
        for handle in handles {
            if handle.await.unwrap() {
                admitted += 1;
            }
        }
        assert_eq!(admitted, 50);
    }

    #[test]
    fn from_config_uses_defaults() {
        let gate = RateGate::from_config(&RateLimitConfig::default());
        assert_eq!(gate.capacity(), 50);
    }
}
