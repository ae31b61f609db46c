//! Sleep-until primitives for the monotonic clock.

use std::time::{Duration, Instant};

/// Default busy-spin tail for [`SleepStrategy::Hybrid`] (80µs).
pub const DEFAULT_SPIN_TAIL: Duration = Duration::from_micros(80);

/// How the calling thread waits for a deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SleepStrategy {
    /// Plain `thread::sleep` for the whole wait. Cheapest, least precise.
    Coarse,

    /// Sleep until `spin_tail` before the deadline, then busy-spin.
    ///
    /// Waits shorter than the tail are spun entirely.
    Hybrid {
        /// Portion of the wait spent spinning.
        spin_tail: Duration,
    },
}

impl Default for SleepStrategy {
    fn default() -> Self {
        SleepStrategy::Hybrid {
            spin_tail: DEFAULT_SPIN_TAIL,
        }
    }
}

impl SleepStrategy {
    /// Hybrid strategy with a custom spin tail. A zero tail is equivalent to
    /// [`SleepStrategy::Coarse`].
    pub fn hybrid(spin_tail: Duration) -> Self {
        if spin_tail.is_zero() {
            SleepStrategy::Coarse
        } else {
            SleepStrategy::Hybrid { spin_tail }
        }
    }

    /// Block the calling thread until `target`.
    ///
    /// Returns immediately when `target` is not in the future.
    pub fn sleep_until(&self, target: Instant) {
        let now = Instant::now();
        if target <= now {
            return;
        }

        let remaining = target.duration_since(now);

        match *self {
            SleepStrategy::Coarse => std::thread::sleep(remaining),
            SleepStrategy::Hybrid { spin_tail } => {
                if remaining > spin_tail {
                    std::thread::sleep(remaining.saturating_sub(spin_tail));
                }

                while Instant::now() < target {
                    std::hint::spin_loop();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_hybrid() {
        assert_eq!(
            SleepStrategy::default(),
            SleepStrategy::Hybrid {
                spin_tail: DEFAULT_SPIN_TAIL
            }
        );
    }

    #[test]
    fn test_zero_tail_is_coarse() {
        assert_eq!(SleepStrategy::hybrid(Duration::ZERO), SleepStrategy::Coarse);
    }

    #[test]
    fn test_past_deadline_returns_immediately() {
        let past = Instant::now();
        std::thread::sleep(Duration::from_millis(2));

        let start = Instant::now();
        SleepStrategy::default().sleep_until(past);
        assert!(start.elapsed() < Duration::from_millis(2));
    }

    #[test]
    fn test_hybrid_never_wakes_early() {
        let strategy = SleepStrategy::hybrid(Duration::from_micros(200));
        for _ in 0..5 {
            let target = Instant::now() + Duration::from_millis(3);
            strategy.sleep_until(target);
            assert!(Instant::now() >= target);
        }
    }

    #[test]
    fn test_coarse_never_wakes_early() {
        let target = Instant::now() + Duration::from_millis(3);
        SleepStrategy::Coarse.sleep_until(target);
        assert!(Instant::now() >= target);
    }
}
