// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-instance runtime state (§2/§4.C) and the NAME vs `NAME:NN` naming
//! scheme for `numprocs > 1` programs, ported from `_create_processes` /
//! `reload_config` in the original's `core.py`.

use crate::config::ProgramConfig;

/// Supervision state machine states (§4.C), named exactly as the original's
/// `process.py` state constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InstanceState {
    Stopped,
    Starting,
    Running,
    Backoff,
    Stopping,
    Exited,
    Fatal,
    Unhealthy,
}

impl InstanceState {
    pub fn as_str(self) -> &'static str {
        match self {
            InstanceState::Stopped => "STOPPED",
            InstanceState::Starting => "STARTING",
            InstanceState::Running => "RUNNING",
            InstanceState::Backoff => "BACKOFF",
            InstanceState::Stopping => "STOPPING",
            InstanceState::Exited => "EXITED",
            InstanceState::Fatal => "FATAL",
            InstanceState::Unhealthy => "UNHEALTHY",
        }
    }
}

/// Expand a program's declared `numprocs` into its instance names: a
/// `numprocs == 1` program keeps its bare name; `numprocs > 1` expands to
/// `"NAME:00"`, `"NAME:01"`, ... matching the original's
/// `"%s:%02d" % (name, i)` with a zero-based `i`.
pub fn instance_names_for(program: &ProgramConfig) -> Vec<String> {
    if program.numprocs <= 1 {
        vec![program.name.clone()]
    } else {
        (0..program.numprocs)
            .map(|i| format!("{}:{:02}", program.name, i))
            .collect()
    }
}

/// Expand every program in a config into the full set of instance names
/// that should exist, in program-declaration order.
pub fn expand_instance_names(programs: &[ProgramConfig]) -> Vec<String> {
    programs.iter().flat_map(instance_names_for).collect()
}

/// Split an instance name like `"web:01"` back into its program name and,
/// if present, the zero-based process index.
pub fn split_instance_name(instance: &str) -> (&str, Option<u32>) {
    match instance.rsplit_once(':') {
        Some((name, suffix)) if suffix.chars().all(|c| c.is_ascii_digit()) && !suffix.is_empty() => {
            match suffix.parse() {
                Ok(n) => (name, Some(n)),
                Err(_) => (instance, None),
            }
        }
        _ => (instance, None),
    }
}

#[cfg(test)]
#[path = "instance_tests.rs"]
mod tests;
