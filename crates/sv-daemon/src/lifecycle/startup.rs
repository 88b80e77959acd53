// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Startup ordering: load+validate config, take the pidfile lock (if
//! configured) *before* anything else touches the filesystem, write the
//! pid, then hand back a `DaemonState` for the caller to bind the control
//! socket from (binding happens last, in `control::serve`, only once
//! everything else has validated successfully).

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use fs2::FileExt;

use super::{DaemonState, LifecycleError, Paths};

pub fn startup(config_path: impl Into<PathBuf>) -> Result<DaemonState, LifecycleError> {
    let config_path = config_path.into();
    let config = sv_core::config::load_config(&config_path)?;

    let pidfile_path = config.global.pidfile.clone();
    let socket_path = config.global.socket.clone();

    let lock_file = match &pidfile_path {
        Some(pidfile_path) => Some(acquire_pidfile_lock(pidfile_path)?),
        None => None,
    };

    let paths = Paths {
        config_path,
        pidfile_path,
        socket_path,
    };

    Ok(DaemonState::new(config, paths, lock_file))
}

fn acquire_pidfile_lock(pidfile_path: &Path) -> Result<std::fs::File, LifecycleError> {
    if let Some(parent) = pidfile_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .map_err(|e| LifecycleError::NoStateDir(parent.to_path_buf(), e))?;
        }
    }
    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .open(pidfile_path)
        .map_err(|e| LifecycleError::Pidfile(pidfile_path.to_path_buf(), e))?;

    file.try_lock_exclusive()
        .map_err(|_| LifecycleError::LockFailed(pidfile_path.to_path_buf()))?;

    file.set_len(0)?;
    writeln!(file, "{}", std::process::id())?;
    file.flush()?;
    Ok(file)
}
