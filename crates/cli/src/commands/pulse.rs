//! Offline fixed-rate pulse: logs a timestamped line per tick, sends nothing.

use anyhow::Result;
use cadence_link::{LogSink, now_ms};
use cadence_scheduler::{CancelSignal, RunError, RunReport};
use std::convert::Infallible;
use tracing::debug;

use super::{PulseArgs, Schedule};
use crate::config::Config;
use crate::error::CliError;
use crate::output::{self, ConsoleSink};

/// Execute the pulse command
pub async fn execute(args: &PulseArgs, config: &Config, json: bool) -> Result<()> {
    let schedule = Schedule::resolve(&args.rate, config)?;
    let scheduler = schedule.scheduler()?;
    debug!(period = ?schedule.period, count = ?schedule.count, "starting pulse");

    let cancel = CancelSignal::new();
    schedule.arm(&cancel);

    let sink = ConsoleSink::new(json);
    let mut report = tokio::task::spawn_blocking(move || {
        let mut scheduler = scheduler;
        pulse(&mut scheduler, &schedule, sink, &cancel)
    })
    .await?
    .map_err(CliError::from)?;

    output::print_run_report(&mut report, json);
    Ok(())
}

/// Run the pulse loop on the calling thread.
pub fn pulse<C, S>(
    scheduler: &mut cadence_scheduler::FixedRateScheduler<C>,
    schedule: &Schedule,
    mut sink: S,
    cancel: &CancelSignal,
) -> Result<RunReport, RunError<Infallible>>
where
    C: cadence_scheduler::Clock,
    S: LogSink,
{
    scheduler.run(
        |tick| {
            sink.record(now_ms(), "Command sent");
            if schedule.is_last(tick.seq) {
                cancel.cancel();
            }
            Ok(())
        },
        cancel,
    )
}
