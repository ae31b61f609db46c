//! Send a numbered command at a fixed rate and log everything the server
//! sends back.

use anyhow::Result;
use cadence_link::{
    CommandPump, DEFAULT_QUEUE_CAPACITY, LoggingHandler, WsClient, outbound_queue,
    resolve_endpoint,
};
use cadence_scheduler::CancelSignal;
use std::time::Duration;
use tokio::sync::oneshot;
use tracing::{debug, info};

use super::{Schedule, SendArgs};
use crate::config::Config;
use crate::error::CliError;
use crate::output::{self, ConsoleSink};

/// Execute the send command
pub async fn execute(args: &SendArgs, config: &Config, json: bool) -> Result<()> {
    let endpoint = resolve_endpoint(&config.endpoint(args.endpoint.as_deref())?)
        .map_err(CliError::from)?;
    let schedule = Schedule::resolve(&args.rate, config)?;
    let mut scheduler = schedule.scheduler()?;
    let command = config.command(args.command.as_deref());
    let linger = Duration::from_millis(args.linger_ms);

    let client = WsClient::connect(&endpoint)
        .await
        .map_err(CliError::from)?;

    let cancel = CancelSignal::new();
    let (queue, outbound) = outbound_queue(DEFAULT_QUEUE_CAPACITY);
    // Held until the linger ends so the session outlives the pump.
    let keepalive = queue.clone();

    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let session_cancel = cancel.clone();
    let handler = LoggingHandler::new(ConsoleSink::new(json));
    let session = tokio::spawn(async move {
        let stopped = async move {
            if stop_rx.await.is_err() {
                debug!("stop sender dropped");
            }
        };
        let result = client.run(handler, Some(outbound), stopped).await;
        session_cancel.cancel();
        result
    });

    schedule.arm(&cancel);
    let pump_cancel = cancel.clone();
    let sink = ConsoleSink::new(json);
    let limit = schedule.count.unwrap_or(0);
    let pump = tokio::task::spawn_blocking(move || {
        let mut pump = CommandPump::new(queue, sink, command).with_limit(limit);
        pump.run(&mut scheduler, &pump_cancel)
    });

    let pumped = pump.await?;

    if !session.is_finished() && !linger.is_zero() {
        info!(?linger, "waiting for remaining replies");
        tokio::select! {
            () = tokio::time::sleep(linger) => {}
            () = super::interrupted() => {}
        }
    }
    if stop_tx.send(()).is_err() {
        debug!("session already ended");
    }
    drop(keepalive);

    let stats = session.await?.map_err(CliError::from)?;
    let mut report = pumped.map_err(CliError::from)?;

    output::print_run_report(&mut report, json);
    output::print_session(&stats, json);
    Ok(())
}
