// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Control RPC listener (§4.D), ported from `RPCServer` in the original's
//! `rpc.py`: a Unix domain socket, `0o600` permissions, one task per
//! connection, framed JSON request/response.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use nix::sys::stat::{umask, Mode};
use thiserror::Error;
use tokio::net::{UnixListener, UnixStream};

use sv_wire::protocol::{ErrorCode, Request, Response, VALID_COMMANDS};
use sv_wire::wire::{self, ProtocolError};

use crate::orchestrator::{Orchestrator, OrchestratorError};

#[derive(Debug, Error)]
pub enum ListenError {
    #[error("failed to remove stale socket at {0}: {1}")]
    StaleSocket(PathBuf, std::io::Error),
    #[error("failed to bind control socket at {0}: {1}")]
    Bind(PathBuf, std::io::Error),
}

pub struct ListenCtx {
    pub socket_path: PathBuf,
    pub orchestrator: Arc<Orchestrator>,
    pub request_timeout: Duration,
}

/// Bind the control socket and accept connections until the process is
/// asked to shut down. Runs forever on success; callers `tokio::select!`
/// this against a shutdown signal.
pub async fn serve(ctx: ListenCtx) -> Result<(), ListenError> {
    if ctx.socket_path.exists() {
        std::fs::remove_file(&ctx.socket_path)
            .map_err(|e| ListenError::StaleSocket(ctx.socket_path.clone(), e))?;
    }

    // umask(0o177) so the freshly created socket ends up mode 0o600,
    // ported from the original's `os.umask(0o177)` dance in `rpc.py`.
    let previous = umask(Mode::from_bits_truncate(0o177));
    let listener = UnixListener::bind(&ctx.socket_path);
    umask(previous);
    let listener = listener.map_err(|e| ListenError::Bind(ctx.socket_path.clone(), e))?;

    let orchestrator = ctx.orchestrator;
    let timeout = ctx.request_timeout;

    loop {
        match listener.accept().await {
            Ok((stream, _addr)) => {
                let orchestrator = Arc::clone(&orchestrator);
                tokio::spawn(async move {
                    handle_connection(stream, orchestrator, timeout).await;
                });
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to accept control connection");
            }
        }
    }
}

/// Serves exactly one request/response cycle then returns, closing the
/// connection -- matching `rpc.py:74-132`'s `handle_client`, which always
/// closes in a `finally` regardless of which path was taken.
async fn handle_connection(mut stream: UnixStream, orchestrator: Arc<Orchestrator>, timeout: Duration) {
    let bytes = match tokio::time::timeout(timeout, wire::read_message(&mut stream)).await {
        Ok(Ok(bytes)) => bytes,
        Ok(Err(ProtocolError::ConnectionClosed)) => return,
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "control connection error");
            return;
        }
        Err(_) => return,
    };

    let response = match parse_request(&bytes) {
        Ok(request) => dispatch(&orchestrator, request).await,
        Err(response) => response,
    };

    let _ = wire::write_response(&mut stream, &response, timeout).await;
}

/// Validates a raw request the way `rpc.py:86-114` does, in the same
/// order: JSON parse, then object-shape, then command membership in
/// `VALID_COMMANDS` -- all before a typed decode is attempted, so an
/// unknown command is rejected with `ErrorCode::UnknownCommand` rather
/// than falling through to a generic decode failure.
fn parse_request(bytes: &[u8]) -> Result<Request, Response> {
    let value: serde_json::Value = serde_json::from_slice(bytes)
        .map_err(|e| Response::protocol_error(ErrorCode::InvalidJson, format!("invalid JSON: {e}")))?;

    let Some(obj) = value.as_object() else {
        return Err(Response::protocol_error(
            ErrorCode::InvalidRequest,
            "request must be a JSON object",
        ));
    };

    let Some(command) = obj.get("command").and_then(|c| c.as_str()) else {
        return Err(Response::protocol_error(
            ErrorCode::InvalidRequest,
            "request is missing a 'command' field",
        ));
    };

    if !VALID_COMMANDS.contains(&command) {
        return Err(Response::protocol_error(
            ErrorCode::UnknownCommand,
            format!("unknown command '{command}'"),
        ));
    }

    serde_json::from_value(value)
        .map_err(|e| Response::protocol_error(ErrorCode::InvalidRequest, format!("invalid request: {e}")))
}

async fn dispatch(orchestrator: &Arc<Orchestrator>, request: Request) -> Response {
    let result = match request {
        Request::Status => Ok(Response::ok_with(orchestrator.status().await)),
        Request::Start { name } => orchestrator
            .start(&name)
            .await
            .map(|started| Response::ok_with(serde_json::json!({ "started": started }))),
        Request::Stop { name, force: _ } => orchestrator
            .stop(&name)
            .await
            .map(|stopped| Response::ok_with(serde_json::json!({ "stopped": stopped }))),
        Request::Restart { name, force } => orchestrator
            .restart(&name, force)
            .await
            .map(|restarted| Response::ok_with(serde_json::json!({ "restarted": restarted }))),
        Request::StartGroup { group } => orchestrator.start_group(&group).await.map(|_| Response::ok()),
        Request::StopGroup { group } => orchestrator.stop_group(&group).await.map(|_| Response::ok()),
        Request::Reload => orchestrator.reload_from_file().await.map(Response::ok_with),
    };

    match result {
        Ok(response) => response,
        Err(e) => error_response(e),
    }
}

fn error_response(e: OrchestratorError) -> Response {
    Response::error(e.to_string())
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
