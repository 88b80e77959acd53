// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn from_spec_returns_none_for_none_kind() {
    let spec = HealthCheckSpec::default();
    assert!(HealthChecker::from_spec(&spec).is_none());
}

#[test]
fn from_spec_builds_tcp_checker() {
    let spec = HealthCheckSpec {
        kind: HealthCheckKind::Tcp,
        host: "127.0.0.1".to_string(),
        port: Some(9999),
        ..HealthCheckSpec::default()
    };
    assert!(matches!(
        HealthChecker::from_spec(&spec),
        Some(HealthChecker::Tcp { port: 9999, .. })
    ));
}

#[test]
fn from_spec_builds_script_checker() {
    let spec = HealthCheckSpec {
        kind: HealthCheckKind::Script,
        command: Some("/bin/true".to_string()),
        ..HealthCheckSpec::default()
    };
    assert!(matches!(
        HealthChecker::from_spec(&spec),
        Some(HealthChecker::Script { .. })
    ));
}

#[tokio::test]
async fn tcp_check_fails_against_closed_port() {
    let checker = HealthChecker::Tcp {
        host: "127.0.0.1".to_string(),
        port: 1, // privileged/unused port, expect connection refused
        timeout: Duration::from_millis(200),
    };
    let result = checker.check().await;
    assert!(!result.healthy);
}

#[tokio::test]
async fn script_check_true_succeeds() {
    let checker = HealthChecker::Script {
        command: "/bin/true".to_string(),
        timeout: Duration::from_secs(2),
    };
    let result = checker.check().await;
    assert!(result.healthy);
}

#[tokio::test]
async fn script_check_false_fails() {
    let checker = HealthChecker::Script {
        command: "/bin/false".to_string(),
        timeout: Duration::from_secs(2),
    };
    let result = checker.check().await;
    assert!(!result.healthy);
}
