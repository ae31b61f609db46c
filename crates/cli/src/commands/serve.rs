//! Echo server for exercising clients locally.

use anyhow::Result;
use cadence_link::EchoServer;

use super::ServeArgs;
use crate::config::Config;
use crate::error::CliError;
use crate::output;

/// Execute the serve command
pub async fn execute(args: &ServeArgs, config: &Config, json: bool) -> Result<()> {
    let bind = config.bind(args.bind.as_deref());
    let greeting = config.greeting(args.greeting.as_deref());

    let server = EchoServer::bind(bind.as_str())
        .await
        .map_err(CliError::from)?
        .with_greeting(greeting);
    let addr = server.local_addr().map_err(CliError::from)?;

    output::print_success(&format!("Echo server listening on ws://{addr}/ws"), json);

    server
        .serve_until(super::interrupted())
        .await
        .map_err(CliError::from)?;

    output::print_success("Echo server stopped", json);
    Ok(())
}
