//! Command implementations for cadencectl

pub mod listen;
pub mod pulse;
pub mod send;
pub mod serve;

use cadence_scheduler::{CancelSignal, FixedRateScheduler, SleepStrategy, period_from_hz};
use clap::Args;
use std::future::Future;
use std::time::Duration;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::CliError;

/// Rate and stop conditions shared by the ticking commands.
#[derive(Args, Debug, Clone, Default)]
pub struct RateArgs {
    /// Tick rate in hertz [default: 10]
    #[arg(long, env = "CADENCE_RATE_HZ")]
    pub rate_hz: Option<f64>,

    /// Stop after exactly this many ticks
    #[arg(long)]
    pub count: Option<u64>,

    /// Stop after this many milliseconds
    #[arg(long)]
    pub duration_ms: Option<u64>,

    /// Busy-spin tail before each deadline in microseconds (0 for plain sleep)
    #[arg(long)]
    pub spin_tail_us: Option<u64>,
}

#[derive(Args, Debug, Clone)]
pub struct PulseArgs {
    #[command(flatten)]
    pub rate: RateArgs,
}

#[derive(Args, Debug, Clone)]
pub struct SendArgs {
    /// Server address: ws:// or wss:// URL, or host[:port]
    #[arg(env = "CADENCE_ENDPOINT")]
    pub endpoint: Option<String>,

    #[command(flatten)]
    pub rate: RateArgs,

    /// Command text; each tick sends "<command> <seq>"
    #[arg(long)]
    pub command: Option<String>,

    /// How long to keep receiving after the last command, in milliseconds
    #[arg(long, default_value_t = 500)]
    pub linger_ms: u64,
}

#[derive(Args, Debug, Clone)]
pub struct ListenArgs {
    /// Server address: ws:// or wss:// URL, or host[:port]
    #[arg(env = "CADENCE_ENDPOINT")]
    pub endpoint: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    /// Listen address [default: 127.0.0.1:8765]
    #[arg(long)]
    pub bind: Option<String>,

    /// Greeting sent to each new client
    #[arg(long)]
    pub greeting: Option<String>,
}

/// A fully resolved tick schedule.
#[derive(Debug, Clone, PartialEq)]
pub struct Schedule {
    pub period: Duration,
    pub strategy: SleepStrategy,
    pub count: Option<u64>,
    pub duration: Option<Duration>,
}

impl Schedule {
    /// Merge flags with the config file.
    ///
    /// # Errors
    ///
    /// [`CliError::Schedule`] if the rate is not a usable frequency.
    pub fn resolve(args: &RateArgs, config: &Config) -> Result<Self, CliError> {
        let period = period_from_hz(config.rate_hz(args.rate_hz))?;
        Ok(Self {
            period,
            strategy: config.sleep_strategy(args.spin_tail_us),
            count: args.count,
            duration: args.duration_ms.map(Duration::from_millis),
        })
    }

    /// Scheduler for this schedule on the monotonic clock.
    ///
    /// # Errors
    ///
    /// [`CliError::Schedule`] if the period is zero.
    pub fn scheduler(&self) -> Result<FixedRateScheduler, CliError> {
        Ok(FixedRateScheduler::new(self.period)?.with_sleep_strategy(self.strategy))
    }

    /// Whether tick `seq` is the last one `--count` allows.
    pub fn is_last(&self, seq: u64) -> bool {
        self.count.is_some_and(|n| seq.saturating_add(1) >= n)
    }

    /// Wire up the stop conditions that live outside the tick loop:
    /// `--count 0`, `--duration-ms`, and Ctrl-C.
    ///
    /// Must be called from inside the tokio runtime.
    pub fn arm(&self, cancel: &CancelSignal) {
        if self.count == Some(0) {
            cancel.cancel();
        }

        if let Some(duration) = self.duration {
            let cancel = cancel.clone();
            tokio::spawn(async move {
                tokio::time::sleep(duration).await;
                info!(?duration, "run duration elapsed");
                cancel.cancel();
            });
        }

        let cancel = cancel.clone();
        tokio::spawn(async move {
            interrupted().await;
            cancel.cancel();
        });
    }
}

/// Resolves on Ctrl-C.
pub fn interrupted() -> impl Future<Output = ()> {
    async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("interrupt received, stopping"),
            Err(e) => {
                warn!("cannot listen for Ctrl-C: {e}");
                std::future::pending::<()>().await;
            }
        }
    }
}
