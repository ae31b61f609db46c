//! Fixed-rate scheduler.
//!
//! Deadlines are anchored to the run's start instant and advanced by exactly
//! one period per tick, never re-derived from "now". When work runs long,
//! the ticks whose deadlines already passed start immediately, one per
//! deadline, until the schedule is back on the grid. No extra tick is ever
//! inserted to make up for lateness.

use crate::cancel::CancelSignal;
use crate::clock::{Clock, MonotonicClock};
use crate::error::{ConfigError, ConfigResult, RunError};
use crate::lateness::LatenessStats;
use crate::sleep::SleepStrategy;
use std::time::{Duration, Instant};
use tracing::{debug, trace, warn};

/// One scheduled invocation of the work callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    /// Ordinal of this tick within the run, starting at 0.
    pub seq: u64,
    /// Ideal instant the tick was due.
    pub scheduled: Instant,
    /// Instant the work callback was actually invoked.
    pub started: Instant,
}

impl Tick {
    /// How late the tick started relative to its scheduled instant.
    #[inline]
    pub fn lateness(&self) -> Duration {
        self.started.saturating_duration_since(self.scheduled)
    }
}

/// Summary of a run that ended through cancellation.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Number of work invocations.
    pub ticks: u64,
    /// Ticks that started later than the lateness tolerance.
    pub late_ticks: u64,
    /// Ticks whose work ran past the following deadline.
    pub overrun_ticks: u64,
    /// Clock time between run start and return.
    pub elapsed: Duration,
    /// Per-tick lateness statistics.
    pub stats: LatenessStats,
}

impl RunReport {
    /// Average invocation rate over the run, in hertz.
    pub fn achieved_hz(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs <= 0.0 {
            return 0.0;
        }
        self.ticks as f64 / secs
    }
}

/// Invokes a work callback once per period on the calling thread.
///
/// The wait between ticks blocks the calling thread; async callers should
/// run the scheduler on a dedicated thread.
///
/// # Example
///
/// ```
/// use cadence_scheduler::{CancelSignal, FixedRateScheduler};
/// use std::convert::Infallible;
/// use std::time::Duration;
///
/// let mut scheduler = FixedRateScheduler::new(Duration::from_millis(1))?;
/// let cancel = CancelSignal::new();
///
/// let report = scheduler.run(
///     |tick| {
///         if tick.seq == 2 {
///             cancel.cancel();
///         }
///         Ok::<(), Infallible>(())
///     },
///     &cancel,
/// )?;
/// assert_eq!(report.ticks, 3);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct FixedRateScheduler<C = MonotonicClock> {
    period: Duration,
    clock: C,
    next_deadline: Instant,
    tick_count: u64,
    stats: LatenessStats,
}

impl FixedRateScheduler<MonotonicClock> {
    /// Scheduler on the system monotonic clock.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroPeriod`] if `period` is zero.
    pub fn new(period: Duration) -> ConfigResult<Self> {
        Self::with_clock(period, MonotonicClock::new())
    }

    /// Scheduler on the system monotonic clock targeting `hz` invocations per second.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidFrequency`] for zero, negative or non-finite
    /// input, and [`ConfigError::FrequencyTooHigh`] if the period would be zero.
    pub fn from_hz(hz: f64) -> ConfigResult<Self> {
        Self::new(period_from_hz(hz)?)
    }

    /// Replace the sleep strategy of the monotonic clock.
    pub fn with_sleep_strategy(mut self, strategy: SleepStrategy) -> Self {
        self.clock = MonotonicClock::with_strategy(strategy);
        self
    }
}

impl<C: Clock> FixedRateScheduler<C> {
    /// Scheduler on a caller-supplied clock.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroPeriod`] if `period` is zero.
    pub fn with_clock(period: Duration, clock: C) -> ConfigResult<Self> {
        if period.is_zero() {
            return Err(ConfigError::ZeroPeriod);
        }

        let next_deadline = clock.now();
        Ok(Self {
            period,
            clock,
            next_deadline,
            tick_count: 0,
            stats: LatenessStats::new(),
        })
    }

    /// Replace the lateness tolerance used to classify late ticks.
    pub fn with_lateness_tolerance(mut self, tolerance: Duration) -> Self {
        self.stats = LatenessStats::new().with_tolerance(tolerance);
        self
    }

    /// Run `work` once per period until `cancel` is observed.
    ///
    /// Cancellation is checked before every invocation, so a signal raised
    /// during tick `k` stops the run after exactly `k + 1` invocations, and a
    /// signal raised before the call means `work` never runs.
    ///
    /// # Errors
    ///
    /// - [`RunError::Work`] with the failing tick's sequence number when
    ///   `work` returns an error. The run stops; nothing is retried.
    /// - [`RunError::DeadlineOverflow`] if the next deadline cannot be
    ///   represented by the clock.
    pub fn run<F, E>(
        &mut self,
        mut work: F,
        cancel: &CancelSignal,
    ) -> Result<RunReport, RunError<E>>
    where
        F: FnMut(Tick) -> Result<(), E>,
    {
        let run_start = self.clock.now();
        self.next_deadline = run_start;
        self.tick_count = 0;
        self.stats.reset();

        debug!(period_us = self.period.as_micros(), "fixed-rate run starting");

        while !cancel.is_cancelled() {
            let seq = self.tick_count;
            let scheduled = self.next_deadline;
            let tick = Tick {
                seq,
                scheduled,
                started: self.clock.now(),
            };

            if let Err(source) = work(tick) {
                warn!(tick = seq, "work failed, stopping fixed-rate run");
                return Err(RunError::Work { tick: seq, source });
            }
            self.tick_count = seq.saturating_add(1);

            let Some(next) = scheduled.checked_add(self.period) else {
                return Err(RunError::DeadlineOverflow { tick: seq });
            };
            self.next_deadline = next;

            let now = self.clock.now();
            let overrun = now > next;
            self.stats.record(tick.lateness(), overrun);

            if overrun {
                trace!(
                    tick = seq,
                    behind_us = now.duration_since(next).as_micros(),
                    "work overran its period, next tick starts immediately"
                );
            } else {
                self.clock.sleep_until(next);
            }
        }

        let report = RunReport {
            ticks: self.tick_count,
            late_ticks: self.stats.late_ticks,
            overrun_ticks: self.stats.overrun_ticks,
            elapsed: self.clock.now().saturating_duration_since(run_start),
            stats: self.stats.clone(),
        };

        debug!(
            ticks = report.ticks,
            late = report.late_ticks,
            overruns = report.overrun_ticks,
            "fixed-rate run cancelled"
        );

        Ok(report)
    }

    /// Target period.
    #[inline]
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Invocations completed in the current or most recent run.
    #[inline]
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Deadline of the next tick.
    #[inline]
    pub fn next_deadline(&self) -> Instant {
        self.next_deadline
    }

    /// Lateness statistics of the current or most recent run.
    #[inline]
    pub fn stats(&self) -> &LatenessStats {
        &self.stats
    }

    /// Mutable statistics, for percentile queries.
    #[inline]
    pub fn stats_mut(&mut self) -> &mut LatenessStats {
        &mut self.stats
    }

    /// The clock driving this scheduler.
    #[inline]
    pub fn clock(&self) -> &C {
        &self.clock
    }
}

/// Run `work` every `period` on the calling thread until `cancel` is set.
///
/// Convenience wrapper over [`FixedRateScheduler`] on the monotonic clock.
///
/// # Errors
///
/// [`RunError::Config`] if `period` is zero (and `work` is never invoked),
/// otherwise as [`FixedRateScheduler::run`].
pub fn run<F, E>(
    period: Duration,
    work: F,
    cancel: &CancelSignal,
) -> Result<RunReport, RunError<E>>
where
    F: FnMut(Tick) -> Result<(), E>,
{
    let mut scheduler = FixedRateScheduler::new(period)?;
    scheduler.run(work, cancel)
}

/// Convert a frequency in hertz into a period.
///
/// # Errors
///
/// See [`FixedRateScheduler::from_hz`].
pub fn period_from_hz(hz: f64) -> ConfigResult<Duration> {
    if !hz.is_finite() || hz <= 0.0 {
        return Err(ConfigError::InvalidFrequency(hz));
    }

    let period = Duration::try_from_secs_f64(1.0 / hz)
        .ok()
        .ok_or(ConfigError::InvalidFrequency(hz))?;
    if period.is_zero() {
        return Err(ConfigError::FrequencyTooHigh(hz));
    }
    Ok(period)
}
