// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::time::Duration;

#[tokio::test]
async fn timeout_kills_and_reports_failure() {
    let result = check("/bin/sleep 5", Duration::from_millis(100)).await;
    assert!(!result.healthy);
    assert!(result.message.contains("timed out"));
}

#[tokio::test]
async fn invalid_command_syntax_fails_cleanly() {
    let result = check("'unterminated", Duration::from_secs(1)).await;
    assert!(!result.healthy);
}

#[tokio::test]
async fn missing_executable_fails_cleanly() {
    let result = check("/no/such/executable", Duration::from_secs(1)).await;
    assert!(!result.healthy);
}
