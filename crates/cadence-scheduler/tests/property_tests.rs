//! Property-based tests for the scheduler crate, driven by a virtual clock.

use cadence_scheduler::{CancelSignal, Clock, FixedRateScheduler, LatenessStats, ManualClock};
use quickcheck::TestResult;
use quickcheck_macros::quickcheck;
use std::convert::Infallible;
use std::time::Duration;

fn scheduler(period: Duration) -> Option<(FixedRateScheduler<ManualClock>, ManualClock)> {
    let clock = ManualClock::new();
    let scheduler = FixedRateScheduler::with_clock(period, clock.clone()).ok()?;
    Some((scheduler, clock))
}

#[quickcheck]
fn uninterrupted_run_takes_n_periods(period_ms: u16, ticks: u8, work_fraction: u8) -> TestResult {
    if period_ms == 0 || ticks == 0 {
        return TestResult::discard();
    }
    let period = Duration::from_millis(u64::from(period_ms));
    let ticks = u64::from(ticks);
    // Work always shorter than the period.
    let work = period.mul_f64(f64::from(work_fraction) / 256.0);

    let Some((mut scheduler, clock)) = scheduler(period) else {
        return TestResult::failed();
    };
    let cancel = CancelSignal::new();
    let work_clock = clock.clone();

    let Ok(report) = scheduler.run(
        |tick| {
            work_clock.advance(work);
            if tick.seq + 1 == ticks {
                cancel.cancel();
            }
            Ok::<(), Infallible>(())
        },
        &cancel,
    ) else {
        return TestResult::failed();
    };

    TestResult::from_bool(
        report.ticks == ticks
            && clock.elapsed() == period * ticks as u32
            && report.overrun_ticks == 0,
    )
}

#[quickcheck]
fn every_tick_is_on_the_grid(period_ms: u8, work_ms: Vec<u16>) -> TestResult {
    if period_ms == 0 || work_ms.is_empty() {
        return TestResult::discard();
    }
    let period = Duration::from_millis(u64::from(period_ms));
    let Some((mut scheduler, clock)) = scheduler(period) else {
        return TestResult::failed();
    };
    let origin = clock.now();
    let cancel = CancelSignal::new();
    let work_clock = clock.clone();
    let last = work_ms.len() as u64 - 1;

    let mut on_grid = true;
    let mut calls = 0u64;
    let result = scheduler.run(
        |tick| {
            calls += 1;
            let expected = origin + period * tick.seq as u32;
            on_grid &= tick.scheduled == expected && tick.started >= tick.scheduled;

            let spent = work_ms.get(tick.seq as usize).copied().unwrap_or(0);
            work_clock.advance(Duration::from_millis(u64::from(spent)));
            if tick.seq == last {
                cancel.cancel();
            }
            Ok::<(), Infallible>(())
        },
        &cancel,
    );

    // One invocation per deadline regardless of overruns: never more ticks
    // than cancellation allowed.
    TestResult::from_bool(result.is_ok() && on_grid && calls == last + 1)
}

#[quickcheck]
fn cancel_after_k_runs_k_plus_one(k: u8) -> bool {
    let Some((mut scheduler, _clock)) = scheduler(Duration::from_millis(20)) else {
        return false;
    };
    let cancel = CancelSignal::new();
    let k = u64::from(k);

    let mut calls = 0u64;
    let ok = scheduler
        .run(
            |tick| {
                calls += 1;
                if tick.seq == k {
                    cancel.cancel();
                }
                Ok::<(), Infallible>(())
            },
            &cancel,
        )
        .is_ok();

    ok && calls == k + 1
}

#[quickcheck]
fn overrun_count_matches_slow_ticks(slow: Vec<bool>) -> TestResult {
    if slow.is_empty() {
        return TestResult::discard();
    }
    let period = Duration::from_millis(10);
    let Some((mut scheduler, clock)) = scheduler(period) else {
        return TestResult::failed();
    };
    let cancel = CancelSignal::new();
    let work_clock = clock.clone();
    let last = slow.len() as u64 - 1;

    // Slow ticks take 1.5 periods, so each one passes its next deadline.
    let result = scheduler.run(
        |tick| {
            if slow.get(tick.seq as usize).copied().unwrap_or(false) {
                work_clock.advance(period.mul_f64(1.5));
            }
            if tick.seq == last {
                cancel.cancel();
            }
            Ok::<(), Infallible>(())
        },
        &cancel,
    );

    let Ok(report) = result else {
        return TestResult::failed();
    };

    // Overruns compound on consecutive slow ticks, so the count is only
    // bounded below by the number of slow ticks.
    let slow_ticks = slow.iter().filter(|s| **s).count() as u64;
    TestResult::from_bool(report.ticks == last + 1 && report.overrun_ticks >= slow_ticks)
}

#[quickcheck]
fn lateness_percentiles_are_monotonic(samples: Vec<u32>) -> TestResult {
    if samples.is_empty() {
        return TestResult::discard();
    }

    let mut stats = LatenessStats::with_capacity(samples.len());
    for sample in &samples {
        stats.record(Duration::from_nanos(u64::from(*sample)), false);
    }

    let p50 = stats.p50_ns();
    let p95 = stats.p95_ns();
    let p99 = stats.p99_ns();
    let max = samples.iter().copied().max().map(u64::from).unwrap_or(0);

    TestResult::from_bool(p50 <= p95 && p95 <= p99 && p99 <= max && stats.max_lateness_ns == max)
}
