// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wire-level request/response shapes (§4.D), ported from
//! `VALID_COMMANDS` in the original's `rpc.py`. The wire key is literally
//! `"command"` (§4.D), unlike the teacher's `oj-daemon` protocol, which
//! tags its `Request` enum as `"type"`.

use serde::{Deserialize, Serialize};

/// Commands a client may send, matching `VALID_COMMANDS` in the original's
/// `rpc.py`. Checked against an incoming request's `"command"` field before
/// it is decoded into a typed `Request`, so an unknown command is rejected
/// with `ErrorCode::UnknownCommand` instead of a generic decode failure.
pub const VALID_COMMANDS: &[&str] = &[
    "status",
    "start",
    "stop",
    "restart",
    "start_group",
    "stop_group",
    "reload",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Request {
    Status,
    Start {
        name: String,
    },
    Stop {
        name: String,
        #[serde(default)]
        force: bool,
    },
    Restart {
        name: String,
        #[serde(default)]
        force: bool,
    },
    StartGroup {
        group: String,
    },
    StopGroup {
        group: String,
    },
    Reload,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceStatus {
    pub name: String,
    pub group: String,
    pub state: String,
    pub pid: Option<u32>,
    pub uptime_secs: Option<u64>,
    pub healthy: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReloadResult {
    pub added: Vec<String>,
    pub removed: Vec<String>,
    pub changed: Vec<String>,
}

/// Error codes for protocol-level rejections (§4.D/§7), matching
/// `rpc.py:86-114`. Domain errors (e.g. "no such instance") carry no code,
/// only a message -- a `code` here means the request never reached
/// `process_request`/`dispatch` at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    InvalidJson,
    InvalidRequest,
    UnknownCommand,
    InternalError,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Response {
    Ok {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        data: Option<serde_json::Value>,
    },
    Error {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        code: Option<ErrorCode>,
        message: String,
    },
}

impl Response {
    pub fn ok() -> Self {
        Response::Ok { data: None }
    }

    pub fn ok_with(data: impl Serialize) -> Self {
        Response::Ok {
            data: serde_json::to_value(data).ok(),
        }
    }

    /// A domain error (e.g. "no such instance"): no `code`, matching §7's
    /// "Reply `{status:"error", message}`; not fatal" for RPC domain errors.
    pub fn error(message: impl Into<String>) -> Self {
        Response::Error {
            code: None,
            message: message.into(),
        }
    }

    /// A protocol-level error: carries a typed `code`, matching §7's "Reply
    /// with typed error code; close connection" for RPC protocol errors.
    pub fn protocol_error(code: ErrorCode, message: impl Into<String>) -> Self {
        Response::Error {
            code: Some(code),
            message: message.into(),
        }
    }
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod tests;
