//! Per-tick lateness statistics.
//!
//! Lateness is how far after its scheduled instant a tick actually started.
//! An overrun is a tick whose work outlasted the period, so the following
//! deadline had already passed when the scheduler went to wait for it.

use std::time::Duration;

/// Default number of recent samples retained for percentiles.
pub const DEFAULT_MAX_SAMPLES: usize = 4_096;

/// Default lateness above which a tick counts as late (1ms).
pub const DEFAULT_LATE_TOLERANCE: Duration = Duration::from_millis(1);

/// Lateness statistics collected over a scheduler run.
///
/// Counters cover every recorded tick. Percentiles are computed over a
/// bounded ring buffer of the most recent samples.
#[derive(Debug, Clone)]
pub struct LatenessStats {
    /// Ticks recorded
    pub total_ticks: u64,

    /// Ticks that started later than the tolerance
    pub late_ticks: u64,

    /// Ticks whose work ran past the next deadline
    pub overrun_ticks: u64,

    /// Largest lateness seen, in nanoseconds
    pub max_lateness_ns: u64,

    /// Most recent lateness, in nanoseconds
    pub last_lateness_ns: u64,

    tolerance_ns: u64,
    sum_squared: f64,
    samples: Vec<u64>,
    max_samples: usize,
    next_index: usize,
    scratch: Vec<u64>,
}

impl Default for LatenessStats {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_MAX_SAMPLES)
    }
}

impl LatenessStats {
    /// Stats with the default sample capacity and tolerance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stats retaining at most `max_samples` recent samples.
    pub fn with_capacity(max_samples: usize) -> Self {
        Self {
            total_ticks: 0,
            late_ticks: 0,
            overrun_ticks: 0,
            max_lateness_ns: 0,
            last_lateness_ns: 0,
            tolerance_ns: duration_ns(DEFAULT_LATE_TOLERANCE),
            sum_squared: 0.0,
            samples: Vec::with_capacity(max_samples),
            max_samples,
            next_index: 0,
            scratch: Vec::new(),
        }
    }

    /// Replace the late-tick tolerance.
    pub fn with_tolerance(mut self, tolerance: Duration) -> Self {
        self.tolerance_ns = duration_ns(tolerance);
        self
    }

    /// Late-tick tolerance.
    pub fn tolerance(&self) -> Duration {
        Duration::from_nanos(self.tolerance_ns)
    }

    /// Record one tick.
    pub fn record(&mut self, lateness: Duration, overrun: bool) {
        let lateness_ns = duration_ns(lateness);

        self.total_ticks = self.total_ticks.saturating_add(1);
        if lateness_ns > self.tolerance_ns {
            self.late_ticks = self.late_ticks.saturating_add(1);
        }
        if overrun {
            self.overrun_ticks = self.overrun_ticks.saturating_add(1);
        }

        self.max_lateness_ns = self.max_lateness_ns.max(lateness_ns);
        self.last_lateness_ns = lateness_ns;
        self.sum_squared += (lateness_ns as f64).powi(2);

        if self.max_samples == 0 {
            return;
        }

        if self.samples.len() < self.max_samples {
            self.samples.push(lateness_ns);
        } else if let Some(slot) = self.samples.get_mut(self.next_index) {
            *slot = lateness_ns;
            self.next_index = (self.next_index + 1) % self.max_samples;
        }
    }

    /// Arbitrary percentile (0.0 to 1.0) over retained samples, in nanoseconds.
    ///
    /// Returns 0 when nothing has been recorded.
    pub fn percentile_ns(&mut self, percentile: f64) -> u64 {
        if self.samples.is_empty() {
            return 0;
        }

        let percentile = if percentile.is_nan() {
            0.0
        } else {
            percentile.clamp(0.0, 1.0)
        };

        self.scratch.clear();
        self.scratch.extend_from_slice(&self.samples);

        let len = self.scratch.len();
        let index = ((len as f64 * percentile) as usize).min(len.saturating_sub(1));
        let (_, value, _) = self.scratch.select_nth_unstable(index);
        *value
    }

    /// Median lateness in nanoseconds.
    pub fn p50_ns(&mut self) -> u64 {
        self.percentile_ns(0.50)
    }

    /// 95th percentile lateness in nanoseconds.
    pub fn p95_ns(&mut self) -> u64 {
        self.percentile_ns(0.95)
    }

    /// 99th percentile lateness in nanoseconds.
    pub fn p99_ns(&mut self) -> u64 {
        self.percentile_ns(0.99)
    }

    /// Root-mean-square lateness in nanoseconds.
    pub fn rms_ns(&self) -> f64 {
        if self.total_ticks == 0 {
            return 0.0;
        }
        (self.sum_squared / self.total_ticks as f64).sqrt()
    }

    /// Fraction of ticks that overran (0.0 to 1.0).
    pub fn overrun_rate(&self) -> f64 {
        if self.total_ticks == 0 {
            0.0
        } else {
            self.overrun_ticks as f64 / self.total_ticks as f64
        }
    }

    /// Fraction of ticks that started late (0.0 to 1.0).
    pub fn late_rate(&self) -> f64 {
        if self.total_ticks == 0 {
            0.0
        } else {
            self.late_ticks as f64 / self.total_ticks as f64
        }
    }

    /// Number of retained samples.
    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    /// Clear all counters and samples, keeping capacity and tolerance.
    pub fn reset(&mut self) {
        self.total_ticks = 0;
        self.late_ticks = 0;
        self.overrun_ticks = 0;
        self.max_lateness_ns = 0;
        self.last_lateness_ns = 0;
        self.sum_squared = 0.0;
        self.samples.clear();
        self.next_index = 0;
        self.scratch.clear();
    }
}

fn duration_ns(duration: Duration) -> u64 {
    u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX)
}
