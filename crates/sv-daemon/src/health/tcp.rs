// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::time::Duration;

use tokio::net::TcpStream;

use super::HealthResult;

pub async fn check(host: &str, port: u16, timeout: Duration) -> HealthResult {
    let addr = format!("{host}:{port}");
    match tokio::time::timeout(timeout, TcpStream::connect(&addr)).await {
        Ok(Ok(_stream)) => HealthResult::ok(format!("connected to {addr}")),
        Ok(Err(e)) => match e.kind() {
            std::io::ErrorKind::ConnectionRefused => {
                HealthResult::failed(format!("connection refused: {addr}"))
            }
            other => HealthResult::failed(format!("failed to connect to {addr}: {other:?}: {e}")),
        },
        Err(_) => HealthResult::failed(format!("timed out connecting to {addr} after {timeout:?}")),
    }
}
