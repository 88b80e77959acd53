// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process supervisor (§4.C), ported from `Process` in the original's
//! `process.py`. One `SupervisedInstance` per expanded instance name
//! (`"web"`, `"worker:00"`, ...); its own task runs `supervise()` for as
//! long as the instance exists.

mod backoff;
mod health_loop;
mod spawn;
mod state;

pub use spawn::{SpawnError, EXIT_CODE_PREEXEC_FAILED, EXIT_CODE_USER_SWITCH_FAILED};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex as SyncMutex;
use sv_core::config::ProgramConfig;
use sv_core::instance::InstanceState;
use sv_core::Event;
use tokio::process::Child;
use tokio::sync::{Mutex as AsyncMutex, Notify};

use crate::event_bus::EventBus;
use crate::health::HealthChecker;

/// One supervised process instance.
pub struct SupervisedInstance {
    pub name: String,
    program: SyncMutex<ProgramConfig>,
    state: SyncMutex<InstanceState>,
    should_run: AtomicBool,
    force_stop: AtomicBool,
    backoff: std::sync::atomic::AtomicU32,
    child: AsyncMutex<Option<Child>>,
    spawned_at: SyncMutex<Option<Instant>>,
    healthy: SyncMutex<Option<bool>>,
    stop_notify: Notify,
    state_changed: Notify,
    bus: EventBus,
}

impl SupervisedInstance {
    pub fn new(name: impl Into<String>, program: ProgramConfig, bus: EventBus) -> Arc<Self> {
        let should_run = program.autostart;
        Arc::new(Self {
            name: name.into(),
            program: SyncMutex::new(program),
            state: SyncMutex::new(InstanceState::Stopped),
            should_run: AtomicBool::new(should_run),
            force_stop: AtomicBool::new(false),
            backoff: std::sync::atomic::AtomicU32::new(0),
            child: AsyncMutex::new(None),
            spawned_at: SyncMutex::new(None),
            healthy: SyncMutex::new(None),
            stop_notify: Notify::new(),
            state_changed: Notify::new(),
            bus,
        })
    }

    pub fn current_state(&self) -> InstanceState {
        *self.state.lock()
    }

    pub fn program(&self) -> ProgramConfig {
        self.program.lock().clone()
    }

    /// Replace the program config in place, e.g. on a config reload for an
    /// unchanged instance name. Does not restart the instance.
    pub fn update_program(&self, program: ProgramConfig) {
        *self.program.lock() = program;
    }

    fn transition(&self, state: InstanceState) {
        *self.state.lock() = state;
        let kind = state::event_kind_for(state);
        self.bus.publish(Event::new(kind, self.name.clone(), state.as_str()));
        self.state_changed.notify_waiters();
    }

    async fn is_child_alive(&self) -> bool {
        let mut guard = self.child.lock().await;
        match guard.as_mut() {
            Some(child) => matches!(child.try_wait(), Ok(None)),
            None => false,
        }
    }

    async fn kill_child_for_unhealthy_restart(&self) {
        let mut guard = self.child.lock().await;
        if let Some(child) = guard.as_mut() {
            let _ = child.start_kill();
        }
    }

    /// The child's OS pid, or `None` if nothing is currently running.
    pub async fn pid(&self) -> Option<u32> {
        self.child.lock().await.as_ref().and_then(|child| child.id())
    }

    /// Seconds since the currently running child was spawned, or `None`
    /// outside of an active run.
    pub fn uptime_secs(&self) -> Option<u64> {
        (*self.spawned_at.lock()).map(|spawned_at| spawned_at.elapsed().as_secs())
    }

    /// The most recent health-probe result, independent of the state
    /// machine's RUNNING/UNHEALTHY transition (which only flips on a
    /// change, per `process.py:343,391`).
    pub fn healthy(&self) -> Option<bool> {
        *self.healthy.lock()
    }

    pub(super) fn set_healthy(&self, value: Option<bool>) {
        *self.healthy.lock() = value;
    }

    /// Mark the instance as wanting to run and wake the supervision loop.
    /// RPC `start` handler. Returns once the instance reaches `RUNNING` or
    /// `timeout` elapses.
    pub async fn request_start(self: &Arc<Self>, timeout: Duration) -> bool {
        self.should_run.store(true, Ordering::SeqCst);
        self.stop_notify.notify_waiters();
        self.wait_for_state(InstanceState::Running, timeout).await
    }

    /// RPC `stop` handler. Returns once the instance reaches `STOPPED` or
    /// `timeout` elapses.
    pub async fn request_stop(self: &Arc<Self>, timeout: Duration) -> bool {
        self.force_stop.store(false, Ordering::SeqCst);
        self.should_run.store(false, Ordering::SeqCst);
        self.stop_notify.notify_waiters();
        self.wait_for_state(InstanceState::Stopped, timeout).await
    }

    /// RPC `restart --force` handler (§4.C "Force-kill"): skips
    /// `stopsignal`/`stopwaitsecs` entirely and sends SIGKILL as soon as
    /// the supervision loop observes the stop request.
    pub async fn request_stop_force(self: &Arc<Self>, timeout: Duration) -> bool {
        self.force_stop.store(true, Ordering::SeqCst);
        self.should_run.store(false, Ordering::SeqCst);
        self.stop_notify.notify_waiters();
        self.wait_for_state(InstanceState::Stopped, timeout).await
    }

    async fn wait_for_state(&self, target: InstanceState, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            if self.current_state() == target {
                return true;
            }
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return self.current_state() == target;
            }
            let _ = tokio::time::timeout(remaining, self.state_changed.notified()).await;
        }
    }

    /// Spawn the long-running supervision task. The returned handle
    /// completes only once the instance is permanently removed (config
    /// reload deleted it) or reaches `FATAL`.
    pub fn spawn_supervise_task(self: &Arc<Self>) -> tokio::task::JoinHandle<()> {
        let this = Arc::clone(self);
        tokio::spawn(async move { this.supervise().await })
    }

    async fn supervise(self: Arc<Self>) {
        loop {
            if !self.should_run.load(Ordering::SeqCst) {
                self.transition(InstanceState::Stopped);
                self.stop_notify.notified().await;
                continue;
            }

            self.transition(InstanceState::Starting);
            let program = self.program();
            let child = match spawn::spawn(&program) {
                Ok(child) => child,
                Err(e) => {
                    tracing::error!(instance = %self.name, error = %e, "failed to spawn");
                    if self.bump_backoff_and_check_fatal(&program).await {
                        return;
                    }
                    continue;
                }
            };
            *self.spawned_at.lock() = Some(Instant::now());
            *self.child.lock().await = Some(child);

            let startsecs = Duration::from_secs(program.startsecs);
            let survived_startup = tokio::select! {
                _ = tokio::time::sleep(startsecs) => true,
                status = self.wait_child() => {
                    self.handle_exit(&program, status).await;
                    false
                }
            };

            if !survived_startup {
                continue;
            }

            self.backoff.store(0, Ordering::SeqCst);
            self.transition(InstanceState::Running);
            self.maybe_spawn_health_loop(&program);

            // Wait for either the child to exit on its own, or a stop
            // request. `stop_notify` also fires on `request_start` (to
            // wake a STOPPED instance), so a wake with `should_run` still
            // true is spurious here and we keep waiting.
            loop {
                tokio::select! {
                    status = self.wait_child() => {
                        self.handle_exit(&program, status).await;
                        break;
                    }
                    _ = self.stop_notify.notified() => {
                        if !self.should_run.load(Ordering::SeqCst) {
                            self.stop_child(&program).await;
                            break;
                        }
                    }
                }
            }
        }
    }

    async fn wait_child(&self) -> std::io::Result<std::process::ExitStatus> {
        let mut guard = self.child.lock().await;
        match guard.as_mut() {
            Some(child) => child.wait().await,
            None => std::future::pending().await,
        }
    }

    async fn handle_exit(&self, program: &ProgramConfig, status: std::io::Result<std::process::ExitStatus>) {
        let code = status.ok().and_then(|s| s.code());
        *self.child.lock().await = None;

        match code {
            Some(spawn::EXIT_CODE_USER_SWITCH_FAILED) => {
                self.transition(InstanceState::Fatal);
                return;
            }
            Some(spawn::EXIT_CODE_PREEXEC_FAILED) => {
                self.transition(InstanceState::Fatal);
                return;
            }
            _ => {}
        }

        let runtime = self
            .spawned_at
            .lock()
            .take()
            .map(|t| t.elapsed())
            .unwrap_or_default();
        if runtime >= Duration::from_secs(program.startsecs) {
            self.backoff.store(0, Ordering::SeqCst);
        }

        self.transition(InstanceState::Exited);

        if !self.should_run.load(Ordering::SeqCst) {
            self.transition(InstanceState::Stopped);
            return;
        }
        if !program.autorestart {
            // Ported from `process.py`'s exit handler: a non-autorestart
            // exit only clears `should_run`, it does not transition past
            // EXITED (the terminal state stays EXITED, not STOPPED).
            self.should_run.store(false, Ordering::SeqCst);
            return;
        }

        self.bump_backoff_and_check_fatal(program).await;
    }

    /// Returns `true` if the instance has gone permanently `FATAL` and the
    /// caller should stop supervising it further.
    async fn bump_backoff_and_check_fatal(&self, program: &ProgramConfig) -> bool {
        let backoff = self.backoff.fetch_add(1, Ordering::SeqCst) + 1;
        if backoff::exhausted(backoff, program.startretries) {
            self.transition(InstanceState::Fatal);
            true
        } else {
            self.transition(InstanceState::Backoff);
            tokio::time::sleep(backoff::delay_for(program.startsecs, backoff)).await;
            false
        }
    }

    async fn stop_child(&self, program: &ProgramConfig) {
        self.transition(InstanceState::Stopping);

        if self.force_stop.swap(false, Ordering::SeqCst) {
            let mut guard = self.child.lock().await;
            if let Some(child) = guard.as_mut() {
                let _ = child.start_kill();
                let _ = child.wait().await;
            }
            *guard = None;
            self.transition(InstanceState::Stopped);
            return;
        }

        let signal = sv_core::config::to_nix_signal(&program.stopsignal);
        {
            let guard = self.child.lock().await;
            if let (Some(child), Some(signal)) = (guard.as_ref(), signal) {
                if let Some(pid) = child.id() {
                    let _ = nix::sys::signal::kill(
                        nix::unistd::Pid::from_raw(pid as i32),
                        signal,
                    );
                }
            }
        }

        let waited = tokio::time::timeout(
            Duration::from_secs(program.stopwaitsecs),
            self.wait_child(),
        )
        .await;

        if waited.is_err() {
            let mut guard = self.child.lock().await;
            if let Some(child) = guard.as_mut() {
                let _ = child.start_kill();
                let _ = child.wait().await;
            }
        }
        *self.child.lock().await = None;
        self.transition(InstanceState::Stopped);
    }

    fn maybe_spawn_health_loop(self: &Arc<Self>, program: &ProgramConfig) {
        let Some(checker) = HealthChecker::from_spec(&program.healthcheck) else {
            return;
        };
        let instance = Arc::clone(self);
        let start_period = Duration::from_secs(program.healthcheck.start_period);
        let interval = Duration::from_secs(program.healthcheck.interval);
        let retries = program.healthcheck.retries;
        let autorestart = program.autorestart;
        tokio::spawn(async move {
            health_loop::run(instance, checker, start_period, interval, retries, autorestart).await;
        });
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
