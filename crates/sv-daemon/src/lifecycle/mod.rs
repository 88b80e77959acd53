// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon lifecycle: pidfile locking, startup ordering, and shutdown.
//! Ported from `DaemonState`/`startup()` in the teacher's
//! `oddjobs` daemon, generalized to supervice's own state.

mod startup;

pub use startup::startup;

use std::fs::File;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("failed to create state directory {0}: {1}")]
    NoStateDir(PathBuf, std::io::Error),
    #[error("failed to acquire pidfile lock at {0}: another instance appears to be running")]
    LockFailed(PathBuf),
    #[error("failed to open pidfile {0}: {1}")]
    Pidfile(PathBuf, std::io::Error),
    #[error("configuration error: {0}")]
    Config(#[from] sv_core::config::ConfigError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Resolved on-disk paths for one daemon run.
pub struct Paths {
    pub config_path: PathBuf,
    pub pidfile_path: Option<PathBuf>,
    pub socket_path: PathBuf,
}

/// Holds the pidfile lock for the process lifetime; dropping it releases
/// the lock (advisory, via `fs2`) when the daemon exits, clean or not.
pub struct DaemonState {
    pub config: sv_core::config::SupervisorConfig,
    pub paths: Paths,
    _lock_file: Option<File>,
}

impl DaemonState {
    pub(crate) fn new(config: sv_core::config::SupervisorConfig, paths: Paths, lock_file: Option<File>) -> Self {
        Self {
            config,
            paths,
            _lock_file: lock_file,
        }
    }

    /// Remove the pidfile and (if still present) the control socket.
    /// Called on clean shutdown; a crash leaves both behind, same as the
    /// original (the next `startup()` will fail to take the pidfile lock
    /// only if the old process is genuinely still alive).
    pub fn shutdown(&self) {
        if let Some(pidfile) = &self.paths.pidfile_path {
            let _ = std::fs::remove_file(pidfile);
        }
        let _ = std::fs::remove_file(&self.paths.socket_path);
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
