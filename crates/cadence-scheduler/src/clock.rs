//! Monotonic clock sources.
//!
//! The scheduler only needs two things from a clock: the current monotonic
//! instant, and a way to block until a later instant. [`MonotonicClock`] is
//! the real one; [`ManualClock`] is a virtual clock for deterministic tests
//! where sleeping advances time instantly.

use crate::sleep::SleepStrategy;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// A monotonic time source that can block until a deadline.
pub trait Clock {
    /// Current monotonic instant.
    fn now(&self) -> Instant;

    /// Block until `deadline`. Must return immediately if it has passed.
    fn sleep_until(&mut self, deadline: Instant);
}

/// System monotonic clock (`Instant`) with a configurable sleep strategy.
#[derive(Debug, Clone, Copy, Default)]
pub struct MonotonicClock {
    strategy: SleepStrategy,
}

impl MonotonicClock {
    /// Clock using the default hybrid sleep.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clock using a specific sleep strategy.
    pub fn with_strategy(strategy: SleepStrategy) -> Self {
        Self { strategy }
    }

    /// The configured sleep strategy.
    pub fn strategy(&self) -> SleepStrategy {
        self.strategy
    }
}

impl Clock for MonotonicClock {
    #[inline]
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep_until(&mut self, deadline: Instant) {
        self.strategy.sleep_until(deadline);
    }
}

#[derive(Debug)]
struct ManualState {
    now: Instant,
    origin: Instant,
    sleep_calls: u64,
    blocked_sleeps: u64,
    total_slept: Duration,
}

/// Virtual clock. Clones share the same timeline.
///
/// `sleep_until` jumps the clock forward to the deadline (never backwards);
/// [`ManualClock::advance`] simulates time spent doing work.
#[derive(Debug, Clone)]
pub struct ManualClock {
    state: Arc<Mutex<ManualState>>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualClock {
    /// Start a virtual timeline at the current real instant.
    pub fn new() -> Self {
        let origin = Instant::now();
        Self {
            state: Arc::new(Mutex::new(ManualState {
                now: origin,
                origin,
                sleep_calls: 0,
                blocked_sleeps: 0,
                total_slept: Duration::ZERO,
            })),
        }
    }

    /// Move virtual time forward.
    pub fn advance(&self, by: Duration) {
        let mut state = self.state.lock();
        if let Some(next) = state.now.checked_add(by) {
            state.now = next;
        }
    }

    /// Virtual time elapsed since the clock was created.
    pub fn elapsed(&self) -> Duration {
        let state = self.state.lock();
        state.now.duration_since(state.origin)
    }

    /// Number of `sleep_until` calls, including ones for past deadlines.
    pub fn sleep_calls(&self) -> u64 {
        self.state.lock().sleep_calls
    }

    /// Number of `sleep_until` calls that actually had to wait.
    pub fn blocked_sleeps(&self) -> u64 {
        self.state.lock().blocked_sleeps
    }

    /// Total virtual time spent waiting.
    pub fn total_slept(&self) -> Duration {
        self.state.lock().total_slept
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.state.lock().now
    }

    fn sleep_until(&mut self, deadline: Instant) {
        let mut state = self.state.lock();
        state.sleep_calls = state.sleep_calls.saturating_add(1);

        if deadline > state.now {
            let waited = deadline.duration_since(state.now);
            state.total_slept = state.total_slept.saturating_add(waited);
            state.blocked_sleeps = state.blocked_sleeps.saturating_add(1);
            state.now = deadline;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_advance() {
        let clock = ManualClock::new();
        let start = clock.now();

        clock.advance(Duration::from_millis(5));
        assert_eq!(clock.now().duration_since(start), Duration::from_millis(5));
        assert_eq!(clock.elapsed(), Duration::from_millis(5));
    }

    #[test]
    fn test_manual_sleep_jumps_forward() {
        let mut clock = ManualClock::new();
        let deadline = clock.now() + Duration::from_millis(100);

        clock.sleep_until(deadline);

        assert_eq!(clock.now(), deadline);
        assert_eq!(clock.sleep_calls(), 1);
        assert_eq!(clock.blocked_sleeps(), 1);
        assert_eq!(clock.total_slept(), Duration::from_millis(100));
    }

    #[test]
    fn test_manual_sleep_never_goes_backwards() {
        let mut clock = ManualClock::new();
        let past = clock.now();
        clock.advance(Duration::from_millis(50));
        let before = clock.now();

        clock.sleep_until(past);

        assert_eq!(clock.now(), before);
        assert_eq!(clock.sleep_calls(), 1);
        assert_eq!(clock.blocked_sleeps(), 0);
    }

    #[test]
    fn test_clones_share_timeline() {
        let clock = ManualClock::new();
        let handle = clock.clone();

        handle.advance(Duration::from_secs(1));
        assert_eq!(clock.elapsed(), Duration::from_secs(1));
    }

    #[test]
    fn test_monotonic_clock_sleeps_to_deadline() {
        let mut clock = MonotonicClock::with_strategy(SleepStrategy::Coarse);
        let deadline = clock.now() + Duration::from_millis(2);

        clock.sleep_until(deadline);
        assert!(clock.now() >= deadline);
        assert_eq!(clock.strategy(), SleepStrategy::Coarse);
    }
}
