// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Ambient environment-variable overrides, mirroring the teacher's
//! `daemon::env` helpers: a small set of knobs that are convenient to flip
//! without editing the config file, each with a documented default.

use std::path::PathBuf;
use std::time::Duration;

fn var(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

/// `SUPERVICE_CONFIG` — path to the config file. Defaults to
/// `/etc/supervice/supervice.conf`.
pub fn config_path() -> PathBuf {
    var("SUPERVICE_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("/etc/supervice/supervice.conf"))
}

/// `SUPERVICE_IPC_TIMEOUT_MS` — deadline for a single control-socket
/// request/response round trip. Defaults to 5000ms.
pub fn ipc_timeout() -> Duration {
    Duration::from_millis(
        var("SUPERVICE_IPC_TIMEOUT_MS")
            .and_then(|v| v.parse().ok())
            .unwrap_or(5000),
    )
}

/// `SUPERVICE_POLL_INTERVAL_MS` — the supervision loop's poll cadence,
/// mirroring the original's `asyncio.wait_for(..., timeout=0.1)`. Defaults
/// to 100ms.
pub fn poll_interval() -> Duration {
    Duration::from_millis(
        var("SUPERVICE_POLL_INTERVAL_MS")
            .and_then(|v| v.parse().ok())
            .unwrap_or(100),
    )
}

/// `SUPERVICE_EVENT_BUS_CAPACITY` — bounded event queue capacity (§4.A).
/// Defaults to 1000.
pub fn event_bus_capacity() -> usize {
    var("SUPERVICE_EVENT_BUS_CAPACITY")
        .and_then(|v| v.parse().ok())
        .unwrap_or(1000)
}

/// `SUPERVICE_HEALTHCHECK_STDERR_CAP` — bytes of script-healthcheck stderr
/// retained in the failure message. Defaults to 4096.
pub fn healthcheck_stderr_cap() -> usize {
    var("SUPERVICE_HEALTHCHECK_STDERR_CAP")
        .and_then(|v| v.parse().ok())
        .unwrap_or(4096)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn config_path_defaults_when_unset() {
        std::env::remove_var("SUPERVICE_CONFIG");
        assert_eq!(config_path(), PathBuf::from("/etc/supervice/supervice.conf"));
    }

    #[test]
    #[serial]
    fn config_path_honors_override() {
        std::env::set_var("SUPERVICE_CONFIG", "/tmp/custom.conf");
        assert_eq!(config_path(), PathBuf::from("/tmp/custom.conf"));
        std::env::remove_var("SUPERVICE_CONFIG");
    }

    #[test]
    #[serial]
    fn ipc_timeout_defaults_to_five_seconds() {
        std::env::remove_var("SUPERVICE_IPC_TIMEOUT_MS");
        assert_eq!(ipc_timeout(), Duration::from_millis(5000));
    }
}
