// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! State-to-event mapping, ported from `_change_state` in the original's
//! `process.py`.

use sv_core::instance::InstanceState;
use sv_core::EventKind;

/// Map a state transition onto the event published for it. `Unhealthy` has
/// no direct event counterpart distinct from the health-check events
/// themselves, so it still publishes `EventKind::Unhealthy` for observers
/// that only care about state, same as the original.
pub fn event_kind_for(state: InstanceState) -> EventKind {
    match state {
        InstanceState::Stopped => EventKind::Stopped,
        InstanceState::Starting => EventKind::Starting,
        InstanceState::Running => EventKind::Running,
        InstanceState::Backoff => EventKind::Backoff,
        InstanceState::Stopping => EventKind::Stopping,
        InstanceState::Exited => EventKind::Exited,
        InstanceState::Fatal => EventKind::Fatal,
        InstanceState::Unhealthy => EventKind::Unhealthy,
    }
}
