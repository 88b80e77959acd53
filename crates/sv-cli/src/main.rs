// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `supervicectl` (§6 "Client CLI"): status/start/stop/restart/startgroup/
//! stopgroup/reload over the control socket. Exit code 0 on success, 1 on
//! any error including a missing socket.

mod client;
mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use client::DaemonClient;
use output::OutputFormat;

const DEFAULT_SOCKET: &str = "/var/run/supervice.sock";

#[derive(Parser)]
#[command(name = "supervicectl", about = "Control client for the supervice process supervisor")]
struct Cli {
    #[arg(short, long, value_name = "PATH", default_value = DEFAULT_SOCKET)]
    socket: PathBuf,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show the status of every supervised instance
    Status,
    /// Start a program
    Start { name: String },
    /// Stop a program
    Stop {
        name: String,
        #[arg(long)]
        force: bool,
    },
    /// Restart a program
    Restart {
        name: String,
        /// Skip the graceful stopsignal/stopwaitsecs sequence and SIGKILL immediately
        #[arg(long)]
        force: bool,
    },
    /// Start every program in a group
    Startgroup { name: String },
    /// Stop every program in a group
    Stopgroup { name: String },
    /// Reload the config file and apply the diff
    Reload,
}

#[tokio::main]
async fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("supervicectl: {e}");
            std::process::ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut client = DaemonClient::connect(&cli.socket).await?;

    match cli.command {
        Command::Status => {
            let statuses = client.status().await?;
            output::print_status(&statuses, cli.output)?;
        }
        Command::Start { name } => {
            client.start(&name).await?;
            println!("started {name}");
        }
        Command::Stop { name, force } => {
            client.stop(&name, force).await?;
            println!("stopped {name}");
        }
        Command::Restart { name, force } => {
            client.restart(&name, force).await?;
            println!("restarted {name}");
        }
        Command::Startgroup { name } => {
            client.start_group(&name).await?;
            println!("started group {name}");
        }
        Command::Stopgroup { name } => {
            client.stop_group(&name).await?;
            println!("stopped group {name}");
        }
        Command::Reload => {
            let result = client.reload().await?;
            output::print_reload_result(&result, cli.output)?;
        }
    }

    Ok(())
}
