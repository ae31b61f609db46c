//! Error types for cadencectl

use cadence_link::LinkError;
use cadence_scheduler::{ConfigError, RunError};
use std::convert::Infallible;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error(
        "No endpoint given: pass one on the command line, set CADENCE_ENDPOINT, or add `endpoint` to the config file"
    )]
    MissingEndpoint,

    #[error("Cannot read config file {}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid rate: {0}")]
    Schedule(#[from] ConfigError),

    #[error("Tick {tick} failed")]
    TickFailed {
        tick: u64,
        #[source]
        source: Box<CliError>,
    },

    #[error("Deadline after tick {0} overflowed the monotonic clock")]
    DeadlineOverflow(u64),

    #[error(transparent)]
    Link(#[from] LinkError),

    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),
}

impl CliError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::MissingEndpoint
            | CliError::ConfigRead { .. }
            | CliError::Schedule(_)
            | CliError::YamlError(_)
            | CliError::Link(LinkError::InvalidEndpoint { .. }) => 4,
            CliError::Link(LinkError::Connect { .. }) => 5,
            CliError::TickFailed { source, .. } => source.exit_code(),
            _ => 1,
        }
    }
}

impl From<Infallible> for CliError {
    fn from(never: Infallible) -> Self {
        match never {}
    }
}

impl<E: Into<CliError>> From<RunError<E>> for CliError {
    fn from(err: RunError<E>) -> Self {
        match err {
            RunError::Config(e) => CliError::Schedule(e),
            RunError::Work { tick, source } => CliError::TickFailed {
                tick,
                source: Box::new(source.into()),
            },
            RunError::DeadlineOverflow { tick } => CliError::DeadlineOverflow(tick),
        }
    }
}
