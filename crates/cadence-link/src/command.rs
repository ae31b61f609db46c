//! Fixed-rate command pump: the scheduler work body for sending commands.

use crate::error::LinkError;
use crate::message::Payload;
use crate::sink::LogSink;
use crate::time::now_ms;
use crate::transport::Transport;
use cadence_scheduler::{CancelSignal, Clock, FixedRateScheduler, RunError, RunReport, Tick};

/// Sends `"<command> <seq>"` through a transport once per tick and logs each
/// send to a sink.
#[derive(Debug)]
pub struct CommandPump<T, S> {
    transport: T,
    sink: S,
    command: String,
    limit: Option<u64>,
}

impl<T: Transport, S: LogSink> CommandPump<T, S> {
    /// Pump sending `command` through `transport`.
    pub fn new(transport: T, sink: S, command: impl Into<String>) -> Self {
        Self {
            transport,
            sink,
            command: command.into(),
            limit: None,
        }
    }

    /// Stop after `count` commands. Zero means no limit.
    pub fn with_limit(mut self, count: u64) -> Self {
        self.limit = (count > 0).then_some(count);
        self
    }

    /// Payload sent on `tick`.
    pub fn payload_for(&self, tick: &Tick) -> Payload {
        Payload::Text(format!("{} {}", self.command, tick.seq))
    }

    /// Send the command for one tick.
    ///
    /// # Errors
    ///
    /// Whatever the transport returns; the scheduler stops on it.
    pub fn on_tick(&mut self, tick: Tick) -> Result<(), LinkError> {
        let payload = self.payload_for(&tick);
        let text = payload.to_string();
        self.transport.send(payload)?;
        self.sink.record(now_ms(), &format!("Command sent: {text}"));
        Ok(())
    }

    /// Run the pump on `scheduler` until `cancel` is set, the limit is
    /// reached, or the transport fails.
    ///
    /// Reaching the limit raises `cancel`, so other holders of the signal
    /// observe the stop too.
    ///
    /// # Errors
    ///
    /// [`RunError::Work`] wrapping the transport's [`LinkError`].
    pub fn run<C: Clock>(
        &mut self,
        scheduler: &mut FixedRateScheduler<C>,
        cancel: &CancelSignal,
    ) -> Result<RunReport, RunError<LinkError>> {
        let limit = self.limit;
        scheduler.run(
            |tick| {
                self.on_tick(tick)?;
                if limit.is_some_and(|n| tick.seq.saturating_add(1) >= n) {
                    cancel.cancel();
                }
                Ok(())
            },
            cancel,
        )
    }

    /// Borrow the sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Consume the pump, returning its transport and sink.
    pub fn into_parts(self) -> (T, S) {
        (self.transport, self.sink)
    }
}
