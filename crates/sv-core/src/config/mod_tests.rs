// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

#[parameterized(
    debug = {"debug", LogLevel::Debug},
    info = {"INFO", LogLevel::Info},
    warning = {"warning", LogLevel::Warning},
    warn_alias = {"WARN", LogLevel::Warning},
    error = {"error", LogLevel::Error},
    critical = {"CRITICAL", LogLevel::Critical},
)]
fn loglevel_parses(raw: &str, expected: LogLevel) {
    assert_eq!(LogLevel::parse(raw).unwrap(), expected);
}

#[test]
fn loglevel_rejects_unknown() {
    assert!(LogLevel::parse("verbose").is_err());
}

#[test]
fn global_config_default_matches_documented_defaults() {
    let global = GlobalConfig::default();
    assert_eq!(global.loglevel, LogLevel::Info);
    assert_eq!(global.socket, PathBuf::from("/tmp/supervice.sock"));
    assert_eq!(global.shutdown_timeout, 10);
}

#[test]
fn program_config_default_is_autostart_autorestart() {
    let program = ProgramConfig::default();
    assert!(program.autostart);
    assert!(program.autorestart);
    assert_eq!(program.numprocs, 1);
    assert_eq!(program.stopsignal, "TERM");
}

#[test]
fn supervisor_config_program_lookup() {
    let cfg = SupervisorConfig {
        global: GlobalConfig::default(),
        programs: vec![ProgramConfig {
            name: "web".to_string(),
            ..ProgramConfig::default()
        }],
        group_members: BTreeMap::new(),
    };
    assert!(cfg.program("web").is_some());
    assert!(cfg.program("missing").is_none());
}
