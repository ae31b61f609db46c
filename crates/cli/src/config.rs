//! Optional YAML configuration file.
//!
//! Every field is optional. Values given on the command line (or through
//! their environment variables) win over the file, and the file wins over
//! the built-in defaults.
//!
//! ```yaml
//! endpoint: 192.168.1.42:8765
//! rate_hz: 10
//! spin_tail_us: 80
//! command: steer
//! greeting: Hello from the rover!
//! bind: 0.0.0.0:8765
//! ```

use cadence_link::DEFAULT_GREETING;
use cadence_scheduler::SleepStrategy;
use cadence_scheduler::sleep::DEFAULT_SPIN_TAIL;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::CliError;

/// Rate used when neither flag nor file sets one.
pub const DEFAULT_RATE_HZ: f64 = 10.0;

/// Command text sent by `send` when none is configured.
pub const DEFAULT_COMMAND: &str = "command";

/// Address the echo server listens on by default.
pub const DEFAULT_BIND: &str = "127.0.0.1:8765";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Default endpoint for `send` and `listen`
    pub endpoint: Option<String>,

    /// Default tick rate in hertz
    pub rate_hz: Option<f64>,

    /// Busy-spin tail in microseconds; 0 selects plain sleeping
    pub spin_tail_us: Option<u64>,

    /// Command text for `send`
    pub command: Option<String>,

    /// Greeting the echo server sends to new clients
    pub greeting: Option<String>,

    /// Echo server listen address
    pub bind: Option<String>,
}

impl Config {
    /// Load a config file.
    ///
    /// # Errors
    ///
    /// [`CliError::ConfigRead`] if the file cannot be read, and
    /// [`CliError::YamlError`] if it is not a valid config document.
    pub fn load(path: &Path) -> Result<Self, CliError> {
        let text = std::fs::read_to_string(path).map_err(|source| CliError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    /// Load `path` if given, otherwise start from an empty config.
    ///
    /// # Errors
    ///
    /// As [`Config::load`].
    pub fn load_optional(path: Option<&Path>) -> Result<Self, CliError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Parse a config document. An empty document is an empty config.
    ///
    /// # Errors
    ///
    /// [`CliError::YamlError`] on malformed YAML or unknown keys.
    pub fn parse(text: &str) -> Result<Self, CliError> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    /// Endpoint argument to resolve.
    ///
    /// # Errors
    ///
    /// [`CliError::MissingEndpoint`] if neither the flag nor the file sets one.
    pub fn endpoint(&self, flag: Option<&str>) -> Result<String, CliError> {
        flag.map(str::to_string)
            .or_else(|| self.endpoint.clone())
            .ok_or(CliError::MissingEndpoint)
    }

    pub fn rate_hz(&self, flag: Option<f64>) -> f64 {
        flag.or(self.rate_hz).unwrap_or(DEFAULT_RATE_HZ)
    }

    pub fn sleep_strategy(&self, spin_tail_us: Option<u64>) -> SleepStrategy {
        match spin_tail_us.or(self.spin_tail_us) {
            Some(us) => SleepStrategy::hybrid(Duration::from_micros(us)),
            None => SleepStrategy::hybrid(DEFAULT_SPIN_TAIL),
        }
    }

    pub fn command(&self, flag: Option<&str>) -> String {
        pick(flag, self.command.as_deref(), DEFAULT_COMMAND)
    }

    pub fn greeting(&self, flag: Option<&str>) -> String {
        pick(flag, self.greeting.as_deref(), DEFAULT_GREETING)
    }

    pub fn bind(&self, flag: Option<&str>) -> String {
        pick(flag, self.bind.as_deref(), DEFAULT_BIND)
    }
}

fn pick(flag: Option<&str>, file: Option<&str>, default: &str) -> String {
    flag.or(file).unwrap_or(default).to_string()
}
