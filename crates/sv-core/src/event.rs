// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event types published onto the event bus (§4.A), mirroring the
//! `EventType` values the original's `process.py` maps process states onto
//! in `_change_state`.

use serde::{Deserialize, Serialize};

/// One event kind per process-state transition, plus the two health-check
/// outcomes that aren't themselves state transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventKind {
    Starting,
    Running,
    Backoff,
    Stopping,
    Stopped,
    Exited,
    Fatal,
    Unhealthy,
    HealthcheckPassed,
    HealthcheckFailed,
}

/// The data carried alongside an [`EventKind`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventPayload {
    /// Instance name, e.g. `"web"` or `"web:01"`.
    pub instance: String,
    /// Human-readable detail (exit code, health-check message, ...).
    pub message: String,
}

/// An event as it travels through the bus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub kind: EventKind,
    pub payload: EventPayload,
}

impl Event {
    pub fn new(kind: EventKind, instance: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            payload: EventPayload {
                instance: instance.into(),
                message: message.into(),
            },
        }
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
