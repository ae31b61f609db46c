//! Fixed-rate, drift-free periodic task scheduling.
//!
//! Runs a unit of work at a target frequency on the calling thread, correcting
//! for the work's own execution time so the long-run rate matches the target
//! rate rather than target-rate-plus-work-time. It includes:
//!
//! - **FixedRateScheduler**: absolute-deadline loop with cooperative cancellation
//! - **LatenessStats**: per-tick lateness and overrun tracking with percentiles
//! - **Clock**: monotonic clock abstraction, with a virtual clock for tests
//! - **SleepStrategy**: coarse or sleep-then-spin waiting
//!
//! # Guarantees
//!
//! - Deadline `n + 1` is always deadline `n` plus one period
//! - At most one work invocation in flight
//! - Late ticks run immediately; no catch-up ticks are inserted
//! - Cancellation is observed at tick boundaries, never mid-work
//!
//! # Example
//!
//! ```no_run
//! use cadence_scheduler::{CancelSignal, FixedRateScheduler};
//! use std::convert::Infallible;
//!
//! let mut scheduler = FixedRateScheduler::from_hz(10.0).expect("valid rate");
//! let cancel = CancelSignal::new();
//!
//! let _report = scheduler.run(
//!     |tick| {
//!         println!("command {} sent", tick.seq);
//!         Ok::<(), Infallible>(())
//!     },
//!     &cancel,
//! );
//! ```

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::unwrap_used)]
#![deny(static_mut_refs)]
#![deny(unused_must_use)]

pub mod cancel;
pub mod clock;
pub mod error;
pub mod lateness;
pub mod scheduler;
pub mod sleep;

pub mod prelude;

pub use cancel::CancelSignal;
pub use clock::{Clock, ManualClock, MonotonicClock};
pub use error::{ConfigError, ConfigResult, RunError};
pub use lateness::LatenessStats;
pub use scheduler::{FixedRateScheduler, RunReport, Tick, period_from_hz, run};
pub use sleep::SleepStrategy;

/// Period of the 10Hz command cadence (100ms).
pub const PERIOD_10HZ: std::time::Duration = std::time::Duration::from_millis(100);
