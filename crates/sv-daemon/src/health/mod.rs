// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Health checker (§4.B): a capability-based contract with one `check`
//! method, dispatched over the two supported check kinds.

mod script;
mod tcp;

use std::time::Duration;

use sv_core::config::{HealthCheckKind, HealthCheckSpec};

/// Outcome of a single health check invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthResult {
    pub healthy: bool,
    pub message: String,
}

impl HealthResult {
    fn ok(message: impl Into<String>) -> Self {
        Self {
            healthy: true,
            message: message.into(),
        }
    }

    fn failed(message: impl Into<String>) -> Self {
        Self {
            healthy: false,
            message: message.into(),
        }
    }
}

/// A configured health checker for one program instance.
#[derive(Debug, Clone)]
pub enum HealthChecker {
    Tcp {
        host: String,
        port: u16,
        timeout: Duration,
    },
    Script {
        command: String,
        timeout: Duration,
    },
}

impl HealthChecker {
    /// Build a checker from a program's healthcheck spec, or `None` when
    /// the program has no healthcheck configured.
    pub fn from_spec(spec: &HealthCheckSpec) -> Option<Self> {
        match spec.kind {
            HealthCheckKind::None => None,
            HealthCheckKind::Tcp => Some(HealthChecker::Tcp {
                host: spec.host.clone(),
                port: spec.port.unwrap_or(0),
                timeout: Duration::from_secs(spec.timeout),
            }),
            HealthCheckKind::Script => Some(HealthChecker::Script {
                command: spec.command.clone().unwrap_or_default(),
                timeout: Duration::from_secs(spec.timeout),
            }),
        }
    }

    pub async fn check(&self) -> HealthResult {
        match self {
            HealthChecker::Tcp { host, port, timeout } => tcp::check(host, *port, *timeout).await,
            HealthChecker::Script { command, timeout } => script::check(command, *timeout).await,
        }
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
