// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Orchestrator (§4.E), ported from `Supervisor` in the original's
//! `core.py`: owns every `SupervisedInstance`, groups, and the
//! add/remove/changed config reload diff.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use sv_core::config::{ProgramConfig, SupervisorConfig};
use sv_core::instance::{expand_instance_names, instance_names_for, split_instance_name};

use sv_wire::protocol::{InstanceStatus, ReloadResult};

use crate::event_bus::EventBus;
use crate::supervisor::SupervisedInstance;

#[derive(Debug, thiserror::Error)]
pub enum OrchestratorError {
    #[error("no such instance '{0}'")]
    UnknownInstance(String),
    #[error("no such group '{0}'")]
    UnknownGroup(String),
    #[error("config error: {0}")]
    Config(#[from] sv_core::config::ConfigError),
}

struct State {
    config: SupervisorConfig,
    instances: BTreeMap<String, Arc<SupervisedInstance>>,
}

/// Owns the full set of supervised instances and their group membership.
pub struct Orchestrator {
    bus: EventBus,
    state: RwLock<State>,
    rpc_timeout: Duration,
    config_path: std::path::PathBuf,
}

impl Orchestrator {
    pub fn new(
        config: SupervisorConfig,
        config_path: impl Into<std::path::PathBuf>,
        bus: EventBus,
        rpc_timeout: Duration,
    ) -> Arc<Self> {
        let orchestrator = Arc::new(Self {
            bus,
            state: RwLock::new(State {
                config,
                instances: BTreeMap::new(),
            }),
            rpc_timeout,
            config_path: config_path.into(),
        });
        orchestrator.create_instances_for_all_programs();
        orchestrator
    }

    /// RPC `reload` handler (§4.E): re-read the config file from disk and
    /// diff it against the running instance set.
    pub async fn reload_from_file(self: &Arc<Self>) -> Result<ReloadResult, OrchestratorError> {
        let new_config = sv_core::config::load_config(&self.config_path)?;
        Ok(self.reload(new_config).await)
    }

    fn create_instances_for_all_programs(&self) {
        let mut state = self.state.write();
        let programs = state.config.programs.clone();
        for program in &programs {
            for name in instance_names_for(program) {
                let expanded = expand_program_for_instance(program, &name);
                let instance = SupervisedInstance::new(name.clone(), expanded, self.bus.clone());
                state.instances.insert(name, instance);
            }
        }
    }

    /// Start every instance's supervision task and, for `autostart`
    /// programs, request they start running (§4.E "run").
    pub fn spawn_all(self: &Arc<Self>) {
        let instances: Vec<_> = self.state.read().instances.values().cloned().collect();
        for instance in instances {
            instance.spawn_supervise_task();
        }
    }

    pub async fn status(&self) -> Vec<InstanceStatus> {
        let instances: Vec<_> = self.state.read().instances.values().cloned().collect();
        let mut statuses = Vec::with_capacity(instances.len());
        for instance in instances {
            statuses.push(InstanceStatus {
                name: instance.name.clone(),
                group: instance.program().group,
                state: instance.current_state().as_str().to_string(),
                pid: instance.pid().await,
                uptime_secs: instance.uptime_secs(),
                healthy: instance.healthy(),
            });
        }
        statuses
    }

    fn instance(&self, name: &str) -> Result<Arc<SupervisedInstance>, OrchestratorError> {
        self.state
            .read()
            .instances
            .get(name)
            .cloned()
            .ok_or_else(|| OrchestratorError::UnknownInstance(name.to_string()))
    }

    fn group_members(&self, group: &str) -> Result<Vec<String>, OrchestratorError> {
        self.state
            .read()
            .config
            .group_members
            .get(group)
            .cloned()
            .ok_or_else(|| OrchestratorError::UnknownGroup(group.to_string()))
    }

    pub async fn start(&self, name: &str) -> Result<bool, OrchestratorError> {
        let instance = self.instance(name)?;
        Ok(instance.request_start(self.rpc_timeout).await)
    }

    pub async fn stop(&self, name: &str) -> Result<bool, OrchestratorError> {
        let instance = self.instance(name)?;
        Ok(instance.request_stop(self.rpc_timeout).await)
    }

    pub async fn restart(&self, name: &str, force: bool) -> Result<bool, OrchestratorError> {
        let instance = self.instance(name)?;
        if force {
            instance.request_stop_force(self.rpc_timeout).await;
        } else {
            instance.request_stop(self.rpc_timeout).await;
        }
        Ok(instance.request_start(self.rpc_timeout).await)
    }

    pub async fn start_group(&self, group: &str) -> Result<(), OrchestratorError> {
        for name in self.group_members(group)? {
            let instance = self.instance(&name)?;
            instance.request_start(self.rpc_timeout).await;
        }
        Ok(())
    }

    pub async fn stop_group(&self, group: &str) -> Result<(), OrchestratorError> {
        for name in self.group_members(group)? {
            let instance = self.instance(&name)?;
            instance.request_stop(self.rpc_timeout).await;
        }
        Ok(())
    }

    /// §4.E `reload_config`: diff expanded instance names between the old
    /// and new configs, stop+drop removed instances, create+start added
    /// ones, and report (without restarting) the instances whose config
    /// changed in place.
    pub async fn reload(self: &Arc<Self>, new_config: SupervisorConfig) -> ReloadResult {
        let (old_names, new_names, changed) = {
            let state = self.state.read();
            let old_names: std::collections::BTreeSet<_> =
                state.instances.keys().cloned().collect();
            let new_names: std::collections::BTreeSet<_> =
                expand_instance_names(&new_config.programs).into_iter().collect();

            let changed: Vec<String> = old_names
                .intersection(&new_names)
                .filter(|name| program_changed(&state, *name, &new_config))
                .cloned()
                .collect();
            (old_names, new_names, changed)
        };

        let removed: Vec<String> = old_names.difference(&new_names).cloned().collect();
        let added: Vec<String> = new_names.difference(&old_names).cloned().collect();

        for name in &removed {
            if let Ok(instance) = self.instance(name) {
                instance.request_stop(self.rpc_timeout).await;
            }
            self.state.write().instances.remove(name);
        }

        for name in &added {
            if let Some(program) = new_config
                .programs
                .iter()
                .find(|p| instance_names_for(p).contains(name))
            {
                let expanded = expand_program_for_instance(program, name);
                let instance = SupervisedInstance::new(name.clone(), expanded, self.bus.clone());
                instance.spawn_supervise_task();
                self.state.write().instances.insert(name.clone(), instance);
            }
        }

        for name in &changed {
            tracing::warn!(instance = %name, "config changed on reload; instance was not restarted");
        }

        self.state.write().config = new_config;

        let mut added = added;
        let mut removed = removed;
        let mut changed = changed;
        added.sort();
        removed.sort();
        changed.sort();
        ReloadResult { added, removed, changed }
    }
}

fn program_changed(state: &State, instance_name: &str, new_config: &SupervisorConfig) -> bool {
    let Some(old_instance) = state.instances.get(instance_name) else {
        return false;
    };
    let Some(new_program) = new_config
        .programs
        .iter()
        .find(|p| instance_names_for(p).contains(&instance_name.to_string()))
    else {
        return false;
    };
    let expanded_new = expand_program_for_instance(new_program, instance_name);
    expanded_new != old_instance.program()
}

/// Apply `%(process_num)s` expansion to the parts of a program config that
/// are instance-specific, the way `_create_processes`/`reload_config` do
/// in the original.
fn expand_program_for_instance(program: &ProgramConfig, instance_name: &str) -> ProgramConfig {
    let (_, process_num) = split_instance_name(instance_name);
    let mut expanded = program.clone();
    expanded.name = instance_name.to_string();
    if let Some(num) = process_num {
        let token = format!("{num:02}");
        expanded.command = program.command.replace("%(process_num)s", &token);
        if let Some(path) = &program.stdout_logfile {
            expanded.stdout_logfile = Some(expand_process_num_path(path, &token));
        }
        if let Some(path) = &program.stderr_logfile {
            expanded.stderr_logfile = Some(expand_process_num_path(path, &token));
        }
    }
    expanded
}

fn expand_process_num_path(path: &std::path::Path, token: &str) -> std::path::PathBuf {
    std::path::PathBuf::from(
        path.to_string_lossy().replace("%(process_num)s", token),
    )
}

#[cfg(test)]
#[path = "orchestrator_tests.rs"]
mod tests;
