// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `supervicectl`'s connection to the control socket (§6 "Client CLI"),
//! ported from `RPCClient` in the original's `rpc.py`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use sv_wire::protocol::{InstanceStatus, ReloadResult, Request, Response};
use sv_wire::wire::{self, ProtocolError};
use thiserror::Error;
use tokio::net::UnixStream;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("cannot reach daemon at {0}: {1}")]
    Connect(PathBuf, std::io::Error),
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),
    #[error("daemon returned an error: {0}")]
    Daemon(String),
    #[error("unexpected response from daemon")]
    UnexpectedResponse,
}

pub struct DaemonClient {
    stream: UnixStream,
    timeout: Duration,
}

impl DaemonClient {
    pub async fn connect(socket_path: &Path) -> Result<Self, ClientError> {
        let stream = UnixStream::connect(socket_path)
            .await
            .map_err(|e| ClientError::Connect(socket_path.to_path_buf(), e))?;
        Ok(Self {
            stream,
            timeout: DEFAULT_TIMEOUT,
        })
    }

    async fn call(&mut self, request: Request) -> Result<Response, ClientError> {
        let payload = wire::encode(&request)?;
        wire::write_message(&mut self.stream, &payload).await?;
        let response: Response = wire::read_request(&mut self.stream, self.timeout).await?;
        Ok(response)
    }

    fn unwrap_data<T: serde::de::DeserializeOwned>(response: Response) -> Result<T, ClientError> {
        match response {
            Response::Ok { data: Some(value) } => {
                serde_json::from_value(value).map_err(|_| ClientError::UnexpectedResponse)
            }
            Response::Ok { data: None } => Err(ClientError::UnexpectedResponse),
            Response::Error { message, .. } => Err(ClientError::Daemon(message)),
        }
    }

    fn unwrap_ok(response: Response) -> Result<(), ClientError> {
        match response {
            Response::Ok { .. } => Ok(()),
            Response::Error { message, .. } => Err(ClientError::Daemon(message)),
        }
    }

    pub async fn status(&mut self) -> Result<Vec<InstanceStatus>, ClientError> {
        let response = self.call(Request::Status).await?;
        Self::unwrap_data(response)
    }

    pub async fn start(&mut self, name: &str) -> Result<(), ClientError> {
        let response = self
            .call(Request::Start {
                name: name.to_string(),
            })
            .await?;
        Self::unwrap_ok(response)
    }

    pub async fn stop(&mut self, name: &str, force: bool) -> Result<(), ClientError> {
        let response = self
            .call(Request::Stop {
                name: name.to_string(),
                force,
            })
            .await?;
        Self::unwrap_ok(response)
    }

    pub async fn restart(&mut self, name: &str, force: bool) -> Result<(), ClientError> {
        let response = self
            .call(Request::Restart {
                name: name.to_string(),
                force,
            })
            .await?;
        Self::unwrap_ok(response)
    }

    pub async fn start_group(&mut self, group: &str) -> Result<(), ClientError> {
        let response = self
            .call(Request::StartGroup {
                group: group.to_string(),
            })
            .await?;
        Self::unwrap_ok(response)
    }

    pub async fn stop_group(&mut self, group: &str) -> Result<(), ClientError> {
        let response = self
            .call(Request::StopGroup {
                group: group.to_string(),
            })
            .await?;
        Self::unwrap_ok(response)
    }

    pub async fn reload(&mut self) -> Result<ReloadResult, ClientError> {
        let response = self.call(Request::Reload).await?;
        Self::unwrap_data(response)
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
