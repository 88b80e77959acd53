// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process spawning (§4.C "Spawn"), ported from `Process.spawn` in the
//! original's `process.py`: resolve the executable, open the stdio log
//! files, and exec with the configured user switched to before the
//! target binary runs.

#![allow(unsafe_code)]

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use nix::unistd::{Gid, Uid, User};
use sv_core::config::ProgramConfig;
use thiserror::Error;
use tokio::process::{Child, Command};

/// User-switch failure in the child's pre-exec hook exits with this code
/// (§4.C, `EXIT_CODE_USER_SWITCH_FAILED` in the original).
pub const EXIT_CODE_USER_SWITCH_FAILED: i32 = 126;
/// Any other pre-exec failure exits with this code
/// (`EXIT_CODE_PREEXEC_FAILED` in the original).
pub const EXIT_CODE_PREEXEC_FAILED: i32 = 127;

#[derive(Debug, Error)]
pub enum SpawnError {
    #[error("command line is empty")]
    EmptyCommand,
    #[error("invalid command line: {0}")]
    InvalidCommand(#[from] sv_core::argv::ArgvError),
    #[error("executable '{0}' not found")]
    ExecutableNotFound(String),
    #[error("unknown user '{0}'")]
    UnknownUser(String),
    #[error("failed to open log file {path}: {source}")]
    LogFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to spawn process: {0}")]
    Io(#[from] std::io::Error),
}

fn which(program: &str) -> Option<PathBuf> {
    if program.contains('/') {
        let path = PathBuf::from(program);
        return nix::unistd::access(&path, nix::unistd::AccessFlags::X_OK)
            .ok()
            .map(|_| path);
    }
    let path_var = std::env::var_os("PATH")?;
    for dir in std::env::split_paths(&path_var) {
        let candidate = dir.join(program);
        if nix::unistd::access(&candidate, nix::unistd::AccessFlags::X_OK).is_ok() {
            return Some(candidate);
        }
    }
    None
}

fn open_log(path: &Path) -> Result<std::fs::File, SpawnError> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| SpawnError::LogFile {
            path: path.to_path_buf(),
            source,
        })
}

/// Spawn one instance of `program`, with `instance_name` (e.g. `"web:01"`)
/// used only to expand `%(process_num)s` upstream in `program.command` --
/// expansion itself is the orchestrator's job, so `program.command` here
/// is assumed already expanded.
pub fn spawn(program: &ProgramConfig) -> Result<Child, SpawnError> {
    let argv = sv_core::argv::split(&program.command)?;
    let (exe, args) = argv.split_first().ok_or(SpawnError::EmptyCommand)?;

    let resolved = if exe.starts_with('/') {
        if nix::unistd::access(Path::new(exe), nix::unistd::AccessFlags::X_OK).is_err() {
            return Err(SpawnError::ExecutableNotFound(exe.clone()));
        }
        PathBuf::from(exe)
    } else {
        which(exe).ok_or_else(|| SpawnError::ExecutableNotFound(exe.clone()))?
    };

    let user = match &program.user {
        Some(name) => Some(
            User::from_name(name)
                .map_err(|_| SpawnError::UnknownUser(name.clone()))?
                .ok_or_else(|| SpawnError::UnknownUser(name.clone()))?,
        ),
        None => None,
    };

    let mut cmd = Command::new(&resolved);
    cmd.args(args);
    if let Some(dir) = &program.directory {
        cmd.current_dir(dir);
    }
    for (key, value) in &program.environment {
        cmd.env(key, value);
    }

    if let Some(stdout_path) = &program.stdout_logfile {
        cmd.stdout(open_log(stdout_path)?);
    }
    if let Some(stderr_path) = &program.stderr_logfile {
        cmd.stderr(open_log(stderr_path)?);
    }

    // Run in its own session so a stop signal sent to the child doesn't
    // also land on the daemon.
    cmd.process_group(0);

    if let Some(user) = user {
        let uid = Uid::from_raw(user.uid.as_raw());
        let gid = Gid::from_raw(user.gid.as_raw());
        let name = user.name.clone();
        // SAFETY: runs in the forked child before exec; only calls
        // async-signal-safe libc entry points (initgroups/setgid/setuid)
        // and `_exit` on failure, matching the original's preexec_fn.
        unsafe {
            cmd.pre_exec(move || {
                if nix::unistd::initgroups(
                    std::ffi::CString::new(name.as_str()).unwrap_or_default().as_c_str(),
                    gid,
                )
                .is_err()
                {
                    std::process::exit(EXIT_CODE_USER_SWITCH_FAILED);
                }
                if nix::unistd::setgid(gid).is_err() {
                    std::process::exit(EXIT_CODE_USER_SWITCH_FAILED);
                }
                if nix::unistd::setuid(uid).is_err() {
                    std::process::exit(EXIT_CODE_USER_SWITCH_FAILED);
                }
                set_pdeathsig();
                Ok(())
            });
        }
    } else {
        // SAFETY: same constraints as above, no user switch needed.
        unsafe {
            cmd.pre_exec(|| {
                set_pdeathsig();
                Ok(())
            });
        }
    }

    cmd.spawn().map_err(SpawnError::Io)
}

#[cfg(target_os = "linux")]
fn set_pdeathsig() {
    // Best-effort: if this fails the child simply won't be killed when the
    // daemon dies, which is the pre-existing behavior on other platforms.
    let _ = nix::sys::prctl::set_pdeathsig(Some(nix::sys::signal::Signal::SIGKILL));
}

#[cfg(not(target_os = "linux"))]
fn set_pdeathsig() {}

#[cfg(test)]
#[path = "spawn_tests.rs"]
mod tests;
