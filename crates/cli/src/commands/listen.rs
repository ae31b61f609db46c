//! Receive-only session: log every message with its receive timestamp.

use anyhow::Result;
use cadence_link::{LoggingHandler, WsClient, resolve_endpoint};

use super::ListenArgs;
use crate::config::Config;
use crate::error::CliError;
use crate::output::{self, ConsoleSink};

/// Execute the listen command
pub async fn execute(args: &ListenArgs, config: &Config, json: bool) -> Result<()> {
    let endpoint = resolve_endpoint(&config.endpoint(args.endpoint.as_deref())?)
        .map_err(CliError::from)?;

    let client = WsClient::connect(&endpoint)
        .await
        .map_err(CliError::from)?;
    let handler = LoggingHandler::new(ConsoleSink::new(json));

    let stats = client
        .run(handler, None, super::interrupted())
        .await
        .map_err(CliError::from)?;

    output::print_session(&stats, json);
    Ok(())
}
