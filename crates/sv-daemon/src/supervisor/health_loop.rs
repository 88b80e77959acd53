// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Health-check loop for a running instance, ported from
//! `_run_health_checks` in the original's `process.py`: wait out
//! `start_period`, then poll on `interval` while the instance stays
//! `RUNNING`/`UNHEALTHY`, transitioning between the two and publishing
//! `HEALTHCHECK_PASSED`/`HEALTHCHECK_FAILED` events.

use std::time::Duration;

use sv_core::instance::InstanceState;
use sv_core::EventKind;

use crate::health::HealthChecker;

use super::SupervisedInstance;

pub async fn run(instance: std::sync::Arc<SupervisedInstance>, checker: HealthChecker, start_period: Duration, interval: Duration, retries: u32, autorestart: bool) {
    tokio::time::sleep(start_period).await;

    let mut failures = 0u32;
    loop {
        {
            let state = instance.current_state();
            if !matches!(state, InstanceState::Running | InstanceState::Unhealthy) {
                return;
            }
        }
        if !instance.is_child_alive().await {
            return;
        }

        let result = checker.check().await;
        if result.healthy {
            failures = 0;
            instance.set_healthy(Some(true));
            instance.bus.publish(sv_core::Event::new(
                EventKind::HealthcheckPassed,
                instance.name.clone(),
                result.message.clone(),
            ));
            // Ported from `process.py:343`: only transition on recovery,
            // not on every passing probe while already RUNNING.
            if instance.current_state() == InstanceState::Unhealthy {
                instance.transition(InstanceState::Running);
            }
        } else {
            failures += 1;
            instance.set_healthy(Some(false));
            instance.bus.publish(sv_core::Event::new(
                EventKind::HealthcheckFailed,
                instance.name.clone(),
                format!("{} (failure {failures}/{retries})", result.message),
            ));
            if failures >= retries {
                // Ported from `process.py:391`: only transition on the
                // first crossing into unhealthy, not on every subsequent
                // failing probe.
                if instance.current_state() == InstanceState::Running {
                    instance.transition(InstanceState::Unhealthy);
                }
                if autorestart {
                    instance.kill_child_for_unhealthy_restart().await;
                    return;
                }
            }
        }

        tokio::time::sleep(interval).await;
    }
}
