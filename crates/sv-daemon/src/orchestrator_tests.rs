// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::event_bus::EventBus;
use sv_core::config::parse_config_str;

fn orchestrator(config_text: &str, path: &std::path::Path) -> Arc<Orchestrator> {
    let config = parse_config_str(config_text).unwrap();
    Orchestrator::new(config, path, EventBus::new(100), Duration::from_millis(200))
}

#[tokio::test]
async fn create_instances_expands_numprocs() {
    let dir = tempfile::tempdir().unwrap();
    let orch = orchestrator(
        "
[program:worker]
command = /bin/true
numprocs = 3
",
        &dir.path().join("c.conf"),
    );
    let names: Vec<_> = orch.status().await.into_iter().map(|s| s.name).collect();
    assert_eq!(names, vec!["worker:00", "worker:01", "worker:02"]);
}

#[tokio::test]
async fn unknown_instance_start_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let orch = orchestrator(
        "
[program:web]
command = /bin/true
",
        &dir.path().join("c.conf"),
    );
    let err = orch.start("ghost").await.unwrap_err();
    assert!(matches!(err, OrchestratorError::UnknownInstance(_)));
}

#[tokio::test]
async fn reload_reports_added_and_removed() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("c.conf");
    std::fs::write(
        &config_path,
        "
[program:web]
command = /bin/true
",
    )
    .unwrap();
    let orch = orchestrator(
        "
[program:web]
command = /bin/true
",
        &config_path,
    );

    std::fs::write(
        &config_path,
        "
[program:worker]
command = /bin/true
",
    )
    .unwrap();

    let result = orch.reload_from_file().await.unwrap();
    assert_eq!(result.added, vec!["worker".to_string()]);
    assert_eq!(result.removed, vec!["web".to_string()]);
    assert!(result.changed.is_empty());
}

#[tokio::test]
async fn reload_detects_changed_instance_without_restarting_it() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("c.conf");
    std::fs::write(
        &config_path,
        "
[program:web]
command = /bin/true
",
    )
    .unwrap();
    let orch = orchestrator(
        "
[program:web]
command = /bin/true
",
        &config_path,
    );

    std::fs::write(
        &config_path,
        "
[program:web]
command = /bin/true --flag
",
    )
    .unwrap();

    let result = orch.reload_from_file().await.unwrap();
    assert!(result.added.is_empty());
    assert!(result.removed.is_empty());
    assert_eq!(result.changed, vec!["web".to_string()]);
}

#[test]
fn expand_program_for_instance_substitutes_process_num() {
    let program = ProgramConfig {
        name: "worker".to_string(),
        command: "worker --id=%(process_num)s".to_string(),
        numprocs: 2,
        ..ProgramConfig::default()
    };
    let expanded = expand_program_for_instance(&program, "worker:01");
    assert_eq!(expanded.command, "worker --id=01");
}
