//! Integration tests for the scheduler crate on the real monotonic clock.

use cadence_scheduler::{
    CancelSignal, ConfigError, FixedRateScheduler, RunError, SleepStrategy, run,
};
use std::convert::Infallible;
use std::time::{Duration, Instant};

#[track_caller]
fn must<T, E: std::fmt::Debug>(r: Result<T, E>) -> T {
    match r {
        Ok(v) => v,
        Err(e) => panic!("unexpected Err: {e:?}"),
    }
}

#[test]
fn test_ten_hz_for_one_second() {
    let cancel = CancelSignal::new();
    let remote = cancel.clone();
    let canceller = std::thread::spawn(move || {
        std::thread::sleep(Duration::from_secs(1));
        remote.cancel();
    });

    let mut calls = 0u64;
    let report = must(run(
        Duration::from_millis(100),
        |_| {
            calls += 1;
            Ok::<(), Infallible>(())
        },
        &cancel,
    ));

    assert!(matches!(canceller.join(), Ok(())));
    assert!((9..=11).contains(&calls), "expected ~10 invocations, got {calls}");
    assert_eq!(report.ticks, calls);
}

#[test]
fn test_work_time_does_not_accumulate() {
    const TICKS: u64 = 40;
    let period = Duration::from_millis(5);
    let work_time = Duration::from_millis(3);

    let mut scheduler =
        must(FixedRateScheduler::new(period)).with_sleep_strategy(SleepStrategy::default());
    let cancel = CancelSignal::new();

    let start = Instant::now();
    let report = must(scheduler.run(
        |tick| {
            std::thread::sleep(work_time);
            if tick.seq + 1 == TICKS {
                cancel.cancel();
            }
            Ok::<(), Infallible>(())
        },
        &cancel,
    ));
    let elapsed = start.elapsed();

    let ideal = period * TICKS as u32;
    let naive = (period + work_time) * TICKS as u32;
    assert_eq!(report.ticks, TICKS);
    assert!(elapsed >= ideal, "finished early: {elapsed:?} < {ideal:?}");
    assert!(
        elapsed < ideal + (naive - ideal) / 2,
        "drifted: {elapsed:?}, ideal {ideal:?}, naive {naive:?}"
    );
}

#[test]
fn test_overrun_skips_wait() {
    let period = Duration::from_millis(10);
    let mut scheduler = must(FixedRateScheduler::new(period));
    let cancel = CancelSignal::new();

    let mut started = Vec::new();
    let report = must(scheduler.run(
        |tick| {
            started.push(tick.started);
            if tick.seq == 0 {
                std::thread::sleep(Duration::from_millis(15));
            }
            if tick.seq == 1 {
                cancel.cancel();
            }
            Ok::<(), Infallible>(())
        },
        &cancel,
    ));

    assert_eq!(report.ticks, 2);
    assert!(report.overrun_ticks >= 1);
    let gap = match started.as_slice() {
        [first, second] => second.duration_since(*first),
        other => panic!("expected two ticks, got {}", other.len()),
    };
    // Tick 1 starts as soon as tick 0's work returns, not a full period later.
    assert!(gap >= Duration::from_millis(15));
    assert!(gap < Duration::from_millis(15) + period, "gap was {gap:?}");
}

#[test]
fn test_work_error_propagates() {
    let cancel = CancelSignal::new();
    let result = run(
        Duration::from_millis(1),
        |tick| {
            if tick.seq == 4 {
                Err(std::io::Error::other("transport closed"))
            } else {
                Ok(())
            }
        },
        &cancel,
    );

    match result {
        Err(RunError::Work { tick, source }) => {
            assert_eq!(tick, 4);
            assert_eq!(source.to_string(), "transport closed");
        }
        other => panic!("expected work error, got {other:?}"),
    }
}

#[test]
fn test_zero_period_never_invokes_work() {
    let cancel = CancelSignal::new();
    let mut calls = 0u32;

    let result = run(
        Duration::ZERO,
        |_| {
            calls += 1;
            Ok::<(), Infallible>(())
        },
        &cancel,
    );

    assert!(matches!(result, Err(RunError::Config(ConfigError::ZeroPeriod))));
    assert_eq!(calls, 0);
}

#[test]
fn test_scheduler_on_dedicated_thread() {
    let cancel = CancelSignal::new();
    let worker_cancel = cancel.clone();

    let handle = std::thread::spawn(move || {
        let mut scheduler = FixedRateScheduler::from_hz(200.0)?;
        scheduler
            .run(|_| Ok::<(), Infallible>(()), &worker_cancel)
            .map_err(|e| match e {
                RunError::Config(config) => config,
                other => panic!("unexpected run error: {other:?}"),
            })
    });

    std::thread::sleep(Duration::from_millis(50));
    cancel.cancel();

    let report = match handle.join() {
        Ok(result) => must(result),
        Err(_) => panic!("scheduler thread panicked"),
    };
    assert!(report.ticks >= 1);
    assert!(report.achieved_hz() > 0.0);
}
