// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `supervice` daemon entry point (§4.E "run"): install signal handlers,
//! take the pidfile lock, start every instance, serve the control socket,
//! and shut down cleanly on SIGINT/SIGTERM.

use std::path::PathBuf;

use sv_daemon::control::{self, ListenCtx};
use sv_daemon::lifecycle;
use sv_daemon::orchestrator::Orchestrator;
use sv_daemon::{env, logging, EventBus};
use tokio::signal::unix::{signal, SignalKind};

#[tokio::main]
async fn main() -> std::process::ExitCode {
    let config_path = std::env::args().nth(1).map(PathBuf::from).unwrap_or_else(env::config_path);

    let daemon_state = match lifecycle::startup(config_path) {
        Ok(state) => state,
        Err(e) => {
            eprintln!("supervice: startup failed: {e}");
            return std::process::ExitCode::FAILURE;
        }
    };

    if let Err(e) = logging::init(
        daemon_state.config.global.loglevel,
        daemon_state.config.global.logfile.as_deref(),
        daemon_state.config.global.log_maxbytes,
        daemon_state.config.global.log_backups,
    ) {
        eprintln!("supervice: failed to initialize logging: {e}");
        return std::process::ExitCode::FAILURE;
    }

    let socket_path = daemon_state.config.global.socket.clone();
    let bus = EventBus::new(env::event_bus_capacity());
    let dispatcher = bus.spawn_dispatcher();

    let orchestrator = Orchestrator::new(
        daemon_state.config.clone(),
        daemon_state.paths.config_path.clone(),
        bus,
        env::ipc_timeout(),
    );
    orchestrator.spawn_all();

    let ctx = ListenCtx {
        socket_path: socket_path.clone(),
        orchestrator: orchestrator.clone(),
        request_timeout: env::ipc_timeout(),
    };

    let (mut sigint, mut sigterm, mut sighup) = match install_signal_handlers() {
        Ok(handlers) => handlers,
        Err(e) => {
            eprintln!("supervice: failed to install signal handlers: {e}");
            return std::process::ExitCode::FAILURE;
        }
    };

    tracing::info!(socket = %socket_path.display(), "supervice starting");

    tokio::select! {
        result = control::serve(ctx) => {
            if let Err(e) = result {
                tracing::error!(error = %e, "control socket listener exited");
            }
        }
        _ = sigint.recv() => {
            tracing::info!("received SIGINT, shutting down");
        }
        _ = sigterm.recv() => {
            tracing::info!("received SIGTERM, shutting down");
        }
        _ = sighup_loop(&mut sighup, &orchestrator) => {}
    }

    dispatcher.abort();

    let timeout = std::time::Duration::from_secs(daemon_state.config.global.shutdown_timeout);
    for name in orchestrator.status().await.into_iter().map(|s| s.name) {
        let _ = tokio::time::timeout(timeout, async { orchestrator.stop(&name).await }).await;
    }

    daemon_state.shutdown();
    std::process::ExitCode::SUCCESS
}

type SignalTrio = (
    tokio::signal::unix::Signal,
    tokio::signal::unix::Signal,
    tokio::signal::unix::Signal,
);

fn install_signal_handlers() -> std::io::Result<SignalTrio> {
    Ok((
        signal(SignalKind::interrupt())?,
        signal(SignalKind::terminate())?,
        signal(SignalKind::hangup())?,
    ))
}

/// SIGHUP means "ignore, use reload" per §4.E's `_handle_sighup` -- it
/// never returns, since a daemon shouldn't shut down on SIGHUP.
async fn sighup_loop(sighup: &mut tokio::signal::unix::Signal, _orchestrator: &std::sync::Arc<Orchestrator>) -> ! {
    loop {
        sighup.recv().await;
        tracing::warn!("received SIGHUP; ignoring (use `supervicectl reload` instead)");
    }
}
