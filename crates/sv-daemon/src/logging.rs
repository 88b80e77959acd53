// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Logging setup (§6 log format), built the way the teacher builds its
//! ambient logging stack (`tracing` + `tracing-subscriber::fmt` with an
//! `EnvFilter`), plus a hand-rolled size-bounded rotating writer since
//! `tracing-appender`'s rolling writer only rotates on a time cadence and
//! §6 asks for size-bounded rotation with a backup count (the same shape
//! as Python's `RotatingFileHandler`, which the original's logging setup
//! wraps).

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use sv_core::config::LogLevel;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

/// A `std::io::Write` implementation that renames `path`, `path.1`, ...,
/// `path.N` on overflow, capped at `backups`. `max_bytes == 0` disables
/// rotation entirely (the file just grows, matching §6).
pub struct RotatingWriter {
    path: PathBuf,
    max_bytes: u64,
    backups: u32,
    file: File,
    written: u64,
}

impl RotatingWriter {
    pub fn open(path: impl Into<PathBuf>, max_bytes: u64, backups: u32) -> io::Result<Self> {
        let path = path.into();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let written = file.metadata()?.len();
        Ok(Self {
            path,
            max_bytes,
            backups,
            file,
            written,
        })
    }

    fn rotate(&mut self) -> io::Result<()> {
        if self.backups == 0 {
            self.file = OpenOptions::new().create(true).write(true).truncate(true).open(&self.path)?;
            self.written = 0;
            return Ok(());
        }

        let oldest = backup_path(&self.path, self.backups);
        let _ = fs::remove_file(&oldest);
        for n in (1..self.backups).rev() {
            let from = backup_path(&self.path, n);
            let to = backup_path(&self.path, n + 1);
            if from.exists() {
                let _ = fs::rename(&from, &to);
            }
        }
        let _ = fs::rename(&self.path, backup_path(&self.path, 1));

        self.file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        self.written = 0;
        Ok(())
    }
}

fn backup_path(path: &Path, n: u32) -> PathBuf {
    let mut os = path.as_os_str().to_owned();
    os.push(format!(".{n}"));
    PathBuf::from(os)
}

impl Write for RotatingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.max_bytes > 0 && self.written + buf.len() as u64 > self.max_bytes {
            self.rotate()?;
        }
        let n = self.file.write(buf)?;
        self.written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

/// `tracing_subscriber::fmt::MakeWriter` over a shared, mutex-guarded
/// `RotatingWriter`.
#[derive(Clone)]
pub struct RotatingMakeWriter {
    inner: std::sync::Arc<Mutex<RotatingWriter>>,
}

impl RotatingMakeWriter {
    pub fn new(writer: RotatingWriter) -> Self {
        Self {
            inner: std::sync::Arc::new(Mutex::new(writer)),
        }
    }
}

pub struct Guarded(std::sync::Arc<Mutex<RotatingWriter>>);

impl Write for Guarded {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap_or_else(|e| e.into_inner()).write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.0.lock().unwrap_or_else(|e| e.into_inner()).flush()
    }
}

impl<'a> MakeWriter<'a> for RotatingMakeWriter {
    type Writer = Guarded;

    fn make_writer(&'a self) -> Self::Writer {
        Guarded(self.inner.clone())
    }
}

/// Install a global `tracing` subscriber. Logs to `logfile` (rotating per
/// `log_maxbytes`/`log_backups`) when set, otherwise to stderr; the filter
/// is derived from `loglevel` and overridable via `RUST_LOG`.
pub fn init(
    loglevel: LogLevel,
    logfile: Option<&Path>,
    max_bytes: u64,
    backups: u32,
) -> io::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(loglevel.as_filter_str()));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    match logfile {
        Some(path) => {
            let writer = RotatingWriter::open(path, max_bytes, backups)?;
            builder.with_writer(RotatingMakeWriter::new(writer)).init();
        }
        None => {
            builder.init();
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "logging_tests.rs"]
mod tests;
