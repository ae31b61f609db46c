//! Prelude module for common scheduler types.

pub use crate::PERIOD_10HZ;
pub use crate::cancel::CancelSignal;
pub use crate::clock::{Clock, ManualClock, MonotonicClock};
pub use crate::error::{ConfigError, RunError};
pub use crate::lateness::LatenessStats;
pub use crate::scheduler::{FixedRateScheduler, RunReport, Tick};
pub use crate::sleep::SleepStrategy;
