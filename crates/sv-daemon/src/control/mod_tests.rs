// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::event_bus::EventBus;
use std::time::Duration;
use sv_core::config::parse_config_str;
use tokio::io::AsyncReadExt;

fn test_config() -> sv_core::config::SupervisorConfig {
    parse_config_str(
        "
[program:web]
command = /bin/sleep 100
",
    )
    .unwrap()
}

#[tokio::test]
async fn socket_is_created_with_owner_only_permissions() {
    let dir = tempfile::tempdir().unwrap();
    let socket_path = dir.path().join("ctl.sock");

    let orchestrator = Orchestrator::new(
        test_config(),
        dir.path().join("supervice.conf"),
        EventBus::new(100),
        Duration::from_secs(1),
    );

    let ctx = ListenCtx {
        socket_path: socket_path.clone(),
        orchestrator,
        request_timeout: Duration::from_secs(1),
    };
    tokio::spawn(serve(ctx));
    tokio::time::sleep(Duration::from_millis(50)).await;

    let metadata = std::fs::metadata(&socket_path).unwrap();
    use std::os::unix::fs::PermissionsExt;
    assert_eq!(metadata.permissions().mode() & 0o777, 0o600);
}

#[tokio::test]
async fn status_request_round_trips_over_the_socket() {
    let dir = tempfile::tempdir().unwrap();
    let socket_path = dir.path().join("ctl.sock");

    let orchestrator = Orchestrator::new(
        test_config(),
        dir.path().join("supervice.conf"),
        EventBus::new(100),
        Duration::from_secs(1),
    );
    orchestrator.spawn_all();

    let ctx = ListenCtx {
        socket_path: socket_path.clone(),
        orchestrator,
        request_timeout: Duration::from_secs(1),
    };
    tokio::spawn(serve(ctx));
    tokio::time::sleep(Duration::from_millis(50)).await;

    let mut stream = UnixStream::connect(&socket_path).await.unwrap();
    let payload = wire::encode(&Request::Status).unwrap();
    wire::write_message(&mut stream, &payload).await.unwrap();
    let response_bytes = wire::read_message(&mut stream).await.unwrap();
    let response: Response = wire::decode(&response_bytes).unwrap();

    assert!(matches!(response, Response::Ok { .. }));
}

#[tokio::test]
async fn unparsable_request_gets_a_typed_error_response_then_the_connection_closes() {
    let dir = tempfile::tempdir().unwrap();
    let socket_path = dir.path().join("ctl.sock");

    let orchestrator = Orchestrator::new(
        test_config(),
        dir.path().join("supervice.conf"),
        EventBus::new(100),
        Duration::from_secs(1),
    );

    let ctx = ListenCtx {
        socket_path: socket_path.clone(),
        orchestrator,
        request_timeout: Duration::from_secs(1),
    };
    tokio::spawn(serve(ctx));
    tokio::time::sleep(Duration::from_millis(50)).await;

    let mut stream = UnixStream::connect(&socket_path).await.unwrap();
    wire::write_message(&mut stream, b"not json").await.unwrap();
    let response_bytes = wire::read_message(&mut stream).await.unwrap();
    let response: Response = wire::decode(&response_bytes).unwrap();
    assert!(matches!(
        response,
        Response::Error { code: Some(ErrorCode::InvalidJson), .. }
    ));

    // each connection serves exactly one request/response cycle, then closes
    let mut header = [0u8; 4];
    let eof = stream.read_exact(&mut header).await;
    assert!(eof.is_err());
}

#[tokio::test]
async fn unknown_command_is_rejected_before_reaching_the_orchestrator() {
    let dir = tempfile::tempdir().unwrap();
    let socket_path = dir.path().join("ctl.sock");

    let orchestrator = Orchestrator::new(
        test_config(),
        dir.path().join("supervice.conf"),
        EventBus::new(100),
        Duration::from_secs(1),
    );

    let ctx = ListenCtx {
        socket_path: socket_path.clone(),
        orchestrator,
        request_timeout: Duration::from_secs(1),
    };
    tokio::spawn(serve(ctx));
    tokio::time::sleep(Duration::from_millis(50)).await;

    let mut stream = UnixStream::connect(&socket_path).await.unwrap();
    wire::write_message(&mut stream, br#"{"command":"xyz"}"#).await.unwrap();
    let response_bytes = wire::read_message(&mut stream).await.unwrap();
    let response: Response = wire::decode(&response_bytes).unwrap();
    assert!(matches!(
        response,
        Response::Error { code: Some(ErrorCode::UnknownCommand), .. }
    ));
}
