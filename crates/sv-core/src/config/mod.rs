// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `SupervisorConfig` value and §6 validation, parsed from the INI-like
//! config file format.

mod bool_like;
mod env_list;
mod parser;
mod signal_name;

pub use bool_like::parse_bool_like;
pub use env_list::parse_env_list;
pub use parser::parse_config_str;
pub use signal_name::{canonical_signal_name, to_nix_signal, VALID_SIGNALS};

use std::collections::BTreeMap;
use std::path::PathBuf;

use thiserror::Error;

/// Loglevel as named in `[supervice] loglevel` (§6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Warning,
    Error,
    Critical,
}

impl LogLevel {
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        match s.to_ascii_uppercase().as_str() {
            "DEBUG" => Ok(LogLevel::Debug),
            "INFO" => Ok(LogLevel::Info),
            "WARNING" | "WARN" => Ok(LogLevel::Warning),
            "ERROR" => Ok(LogLevel::Error),
            "CRITICAL" => Ok(LogLevel::Critical),
            other => Err(ConfigError::Global {
                field: "loglevel".to_string(),
                message: format!("unknown log level '{other}'"),
            }),
        }
    }

    /// `tracing`/`tracing-subscriber` filter directive for this level.
    pub fn as_filter_str(self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warning => "warn",
            LogLevel::Error => "error",
            LogLevel::Critical => "error",
        }
    }
}

/// `[supervice]` section (optional; all keys have defaults per §6).
#[derive(Debug, Clone, PartialEq)]
pub struct GlobalConfig {
    pub logfile: Option<PathBuf>,
    pub pidfile: Option<PathBuf>,
    pub loglevel: LogLevel,
    pub socket: PathBuf,
    pub shutdown_timeout: u64,
    pub log_maxbytes: u64,
    pub log_backups: u32,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            logfile: None,
            pidfile: None,
            loglevel: LogLevel::Info,
            socket: PathBuf::from("/tmp/supervice.sock"),
            shutdown_timeout: 10,
            log_maxbytes: 0,
            log_backups: 0,
        }
    }
}

/// Health-check tag, §3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HealthCheckKind {
    #[default]
    None,
    Tcp,
    Script,
}

/// Health-check spec, §3.
#[derive(Debug, Clone, PartialEq)]
pub struct HealthCheckSpec {
    pub kind: HealthCheckKind,
    pub interval: u64,
    pub timeout: u64,
    pub retries: u32,
    pub start_period: u64,
    pub host: String,
    pub port: Option<u16>,
    pub command: Option<String>,
}

impl Default for HealthCheckSpec {
    fn default() -> Self {
        Self {
            kind: HealthCheckKind::None,
            interval: 10,
            timeout: 5,
            retries: 3,
            start_period: 0,
            host: "127.0.0.1".to_string(),
            port: None,
            command: None,
        }
    }
}

/// `[program:NAME]` section, §3/§6.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgramConfig {
    pub name: String,
    pub command: String,
    pub directory: Option<PathBuf>,
    pub environment: BTreeMap<String, String>,
    pub user: Option<String>,
    pub numprocs: u32,
    pub autostart: bool,
    pub autorestart: bool,
    pub startsecs: u64,
    pub startretries: u32,
    /// Canonical (no `SIG` prefix, upper-case) signal name, e.g. `"TERM"`.
    pub stopsignal: String,
    pub stopwaitsecs: u64,
    pub stdout_logfile: Option<PathBuf>,
    pub stderr_logfile: Option<PathBuf>,
    /// Resolved group name: the `[group:NAME]` section that lists this
    /// program, or `name` itself if no such section exists (§3).
    pub group: String,
    pub healthcheck: HealthCheckSpec,
}

impl Default for ProgramConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            command: String::new(),
            directory: None,
            environment: BTreeMap::new(),
            user: None,
            numprocs: 1,
            autostart: true,
            autorestart: true,
            startsecs: 1,
            startretries: 3,
            stopsignal: "TERM".to_string(),
            stopwaitsecs: 10,
            stdout_logfile: None,
            stderr_logfile: None,
            group: String::new(),
            healthcheck: HealthCheckSpec::default(),
        }
    }
}

/// Group name -> member program names in config declaration order.
pub type GroupMembers = BTreeMap<String, Vec<String>>;

/// Fully parsed and validated configuration (§3 "Program configuration").
#[derive(Debug, Clone, PartialEq)]
pub struct SupervisorConfig {
    pub global: GlobalConfig,
    pub programs: Vec<ProgramConfig>,
    /// Group name -> member program names, in declaration order. Every
    /// program appears in exactly one group (§3 invariant).
    pub group_members: GroupMembers,
}

impl SupervisorConfig {
    pub fn program(&self, name: &str) -> Option<&ProgramConfig> {
        self.programs.iter().find(|p| p.name == name)
    }
}

/// Configuration errors (§7 "Configuration error").
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("[supervice]: {field}: {message}")]
    Global { field: String, message: String },

    #[error("program '{program}': {message}")]
    Program { program: String, message: String },

    #[error("group '{group}': {message}")]
    Group { group: String, message: String },

    #[error("malformed config at line {line}: {message}")]
    Syntax { line: usize, message: String },
}

/// Load and validate a config file from disk.
pub fn load_config(path: &std::path::Path) -> Result<SupervisorConfig, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Syntax {
        line: 0,
        message: format!("failed to read {}: {e}", path.display()),
    })?;
    parse_config_str(&text)
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
