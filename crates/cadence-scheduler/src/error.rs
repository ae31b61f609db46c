//! Error types for the scheduler crate.
//!
//! Cancellation is not an error: a cancelled run is a clean stop and
//! returns `Ok` with a [`RunReport`](crate::RunReport).

use thiserror::Error;

/// Scheduler configuration errors, raised at construction time.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ConfigError {
    /// The period was zero.
    #[error("period must be strictly positive")]
    ZeroPeriod,

    /// The frequency was zero, negative, NaN or infinite.
    #[error("frequency must be a finite positive number of hertz, got {0}")]
    InvalidFrequency(f64),

    /// The frequency is so high its period rounds down to zero nanoseconds.
    #[error("frequency {0} Hz is too high to be represented as a period")]
    FrequencyTooHigh(f64),
}

/// Errors that end a scheduler run.
#[derive(Debug, Error)]
pub enum RunError<E> {
    /// The scheduler could not be built (only produced by [`crate::run`]).
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The work callback failed; the run stopped at this tick.
    #[error("work failed on tick {tick}")]
    Work {
        /// Sequence number of the failing tick.
        tick: u64,
        /// The callback's own error, uninterpreted.
        #[source]
        source: E,
    },

    /// Advancing the deadline overflowed the monotonic clock.
    #[error("deadline after tick {tick} overflowed the monotonic clock")]
    DeadlineOverflow {
        /// Sequence number of the last tick that ran.
        tick: u64,
    },
}

impl<E> RunError<E> {
    /// Sequence number of the tick the run stopped on, if any ran.
    pub fn tick(&self) -> Option<u64> {
        match self {
            RunError::Config(_) => None,
            RunError::Work { tick, .. } | RunError::DeadlineOverflow { tick } => Some(*tick),
        }
    }

    /// Borrow the work callback's error, if that is why the run stopped.
    pub fn work_error(&self) -> Option<&E> {
        match self {
            RunError::Work { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Result type for scheduler construction.
pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[derive(Debug, Error)]
    #[error("socket closed")]
    struct SocketClosed;

    #[test]
    fn test_config_error_display() {
        assert_eq!(
            ConfigError::ZeroPeriod.to_string(),
            "period must be strictly positive"
        );
        assert!(
            ConfigError::InvalidFrequency(-2.0)
                .to_string()
                .contains("-2")
        );
    }

    #[test]
    fn test_work_error_keeps_source() {
        let err: RunError<SocketClosed> = RunError::Work {
            tick: 7,
            source: SocketClosed,
        };

        assert_eq!(err.to_string(), "work failed on tick 7");
        assert_eq!(err.tick(), Some(7));
        assert!(err.work_error().is_some());
        let source = err.source().map(ToString::to_string);
        assert_eq!(source.as_deref(), Some("socket closed"));
    }

    #[test]
    fn test_config_error_converts() {
        let err: RunError<SocketClosed> = ConfigError::ZeroPeriod.into();
        assert!(matches!(err, RunError::Config(ConfigError::ZeroPeriod)));
        assert_eq!(err.tick(), None);
        assert!(err.work_error().is_none());
    }
}
