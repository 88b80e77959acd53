// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::time::Duration;

use tokio::io::AsyncReadExt;
use tokio::process::Command;

use super::HealthResult;
use crate::env;

pub async fn check(command: &str, timeout: Duration) -> HealthResult {
    let argv = match sv_core::argv::split(command) {
        Ok(argv) if !argv.is_empty() => argv,
        Ok(_) => return HealthResult::failed("empty healthcheck command"),
        Err(e) => return HealthResult::failed(format!("invalid healthcheck command: {e}")),
    };

    let mut cmd = Command::new(&argv[0]);
    cmd.args(&argv[1..]);
    cmd.stdout(std::process::Stdio::null());
    cmd.stderr(std::process::Stdio::piped());

    let mut child = match cmd.spawn() {
        Ok(child) => child,
        Err(e) => return HealthResult::failed(format!("failed to spawn '{command}': {e}")),
    };

    match tokio::time::timeout(timeout, child.wait()).await {
        Ok(Ok(status)) if status.success() => HealthResult::ok("healthcheck command succeeded"),
        Ok(Ok(status)) => {
            let cap = env::healthcheck_stderr_cap();
            let mut stderr_buf = Vec::new();
            if let Some(mut stderr) = child.stderr.take() {
                let _ = stderr.read_to_end(&mut stderr_buf).await;
            }
            stderr_buf.truncate(cap);
            let stderr = String::from_utf8_lossy(&stderr_buf);
            HealthResult::failed(format!("healthcheck command exited with {status}: {stderr}"))
        }
        Ok(Err(e)) => HealthResult::failed(format!("failed to wait on healthcheck command: {e}")),
        Err(_) => {
            // SIGKILL the child and reap it so it doesn't linger as a zombie.
            let _ = child.start_kill();
            let _ = child.wait().await;
            HealthResult::failed(format!("healthcheck command timed out after {timeout:?}"))
        }
    }
}

#[cfg(test)]
#[path = "script_tests.rs"]
mod tests;
