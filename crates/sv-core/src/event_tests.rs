// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn new_fills_in_payload() {
    let event = Event::new(EventKind::Running, "web:01", "pid 123");
    assert_eq!(event.kind, EventKind::Running);
    assert_eq!(event.payload.instance, "web:01");
    assert_eq!(event.payload.message, "pid 123");
}

#[test]
fn serializes_to_screaming_snake_case() {
    let event = Event::new(EventKind::HealthcheckFailed, "web", "connection refused");
    let json = serde_json::to_string(&event).unwrap();
    assert!(json.contains("\"HEALTHCHECK_FAILED\""));
}

#[test]
fn round_trips_through_json() {
    let event = Event::new(EventKind::Fatal, "web", "exited with code 127");
    let json = serde_json::to_string(&event).unwrap();
    let back: Event = serde_json::from_str(&json).unwrap();
    assert_eq!(back.kind, event.kind);
    assert_eq!(back.payload.instance, event.payload.instance);
}
