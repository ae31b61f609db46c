//! Endpoint resolution for command-line style arguments.

use crate::error::{LinkError, LinkResult};

/// Port used when an endpoint names only a host.
pub const DEFAULT_PORT: u16 = 8765;

/// Path appended to bare `host[:port]` endpoints.
pub const DEFAULT_PATH: &str = "/ws";

/// Turn an endpoint argument into a WebSocket URL.
///
/// `ws://` and `wss://` URLs pass through untouched. Anything else is read as
/// `host[:port]` and expanded to `ws://host:port/ws`, with port 8765 when
/// omitted.
///
/// # Errors
///
/// [`LinkError::InvalidEndpoint`] for an empty host, a non-numeric or zero
/// port, or a URL with some other scheme.
pub fn resolve_endpoint(arg: &str) -> LinkResult<String> {
    let arg = arg.trim();
    let invalid = |reason| LinkError::InvalidEndpoint {
        endpoint: arg.to_string(),
        reason,
    };

    if arg.starts_with("ws://") || arg.starts_with("wss://") {
        return Ok(arg.to_string());
    }
    if arg.contains("://") {
        return Err(invalid("only ws:// and wss:// schemes are supported"));
    }

    let (host, port) = match arg.rsplit_once(':') {
        Some((host, port)) if !host.contains(':') || host.ends_with(']') => {
            let port = if port.is_empty() {
                DEFAULT_PORT
            } else {
                port.parse::<u16>()
                    .ok()
                    .ok_or_else(|| invalid("port is not a number"))?
            };
            (host, port)
        }
        _ => (arg, DEFAULT_PORT),
    };

    if host.is_empty() {
        return Err(invalid("missing host"));
    }
    if port == 0 {
        return Err(invalid("port must be non-zero"));
    }

    Ok(format!("ws://{host}:{port}{DEFAULT_PATH}"))
}
