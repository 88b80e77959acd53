// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Text/JSON rendering for `supervicectl` (§6).

use clap::ValueEnum;
use sv_wire::protocol::{InstanceStatus, ReloadResult};

#[derive(Clone, Copy, Debug, Default, PartialEq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

pub fn print_status(statuses: &[InstanceStatus], format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(statuses)?);
        }
        OutputFormat::Text => {
            if statuses.is_empty() {
                println!("No programs configured");
                return Ok(());
            }
            for status in statuses {
                let pid = status
                    .pid
                    .map(|pid| pid.to_string())
                    .unwrap_or_else(|| "-".to_string());
                let uptime = status
                    .uptime_secs
                    .map(|secs| format!("{secs}s"))
                    .unwrap_or_else(|| "-".to_string());
                let healthy = match status.healthy {
                    Some(true) => "healthy",
                    Some(false) => "unhealthy",
                    None => "-",
                };
                println!(
                    "{:<24} {:<10} pid={:<8} uptime={:<8} healthy={:<10} group={}",
                    status.name, status.state, pid, uptime, healthy, status.group
                );
            }
        }
    }
    Ok(())
}

pub fn print_reload_result(result: &ReloadResult, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(result)?);
        }
        OutputFormat::Text => {
            println!("added:   {}", result.added.join(", "));
            println!("removed: {}", result.removed.join(", "));
            println!("changed: {}", result.changed.join(", "));
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;
