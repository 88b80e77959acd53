// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

const MINIMAL: &str = "
[program:web]
command = /usr/bin/web-server --port 8080
";

#[test]
fn parses_minimal_program() {
    let cfg = parse_config_str(MINIMAL).unwrap();
    assert_eq!(cfg.programs.len(), 1);
    let p = &cfg.programs[0];
    assert_eq!(p.name, "web");
    assert_eq!(p.command, "/usr/bin/web-server --port 8080");
    assert_eq!(p.group, "web");
    assert!(p.autostart);
    assert!(p.autorestart);
    assert_eq!(p.numprocs, 1);
    assert_eq!(cfg.group_members.get("web").unwrap(), &vec!["web".to_string()]);
}

#[test]
fn rejects_config_with_no_programs() {
    let err = parse_config_str("[supervice]\nloglevel = info\n").unwrap_err();
    assert!(matches!(err, ConfigError::Syntax { .. }));
}

#[test]
fn parses_global_section() {
    let text = "
[supervice]
loglevel = debug
socket = /tmp/custom.sock
log_maxbytes = 1048576
log_backups = 3

[program:web]
command = /bin/true
";
    let cfg = parse_config_str(text).unwrap();
    assert_eq!(cfg.global.loglevel, LogLevel::Debug);
    assert_eq!(cfg.global.socket, PathBuf::from("/tmp/custom.sock"));
    assert_eq!(cfg.global.log_maxbytes, 1_048_576);
    assert_eq!(cfg.global.log_backups, 3);
}

#[test]
fn explicit_group_resolves_member_names() {
    let text = "
[program:web]
command = /bin/true

[program:worker]
command = /bin/true

[group:app]
programs = web,worker
";
    let cfg = parse_config_str(text).unwrap();
    assert_eq!(cfg.program("web").unwrap().group, "app");
    assert_eq!(cfg.program("worker").unwrap().group, "app");
    assert_eq!(
        cfg.group_members.get("app").unwrap(),
        &vec!["web".to_string(), "worker".to_string()]
    );
}

#[test]
fn group_referencing_unknown_program_is_an_error() {
    let text = "
[program:web]
command = /bin/true

[group:app]
programs = web,ghost
";
    let err = parse_config_str(text).unwrap_err();
    match err {
        ConfigError::Group { group, message } => {
            assert_eq!(group, "app");
            assert!(message.contains("ghost"));
        }
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn rejects_unknown_stopsignal() {
    let text = "
[program:web]
command = /bin/true
stopsignal = BOGUS
";
    assert!(parse_config_str(text).is_err());
}

#[test]
fn rejects_numprocs_zero() {
    let text = "
[program:web]
command = /bin/true
numprocs = 0
";
    assert!(parse_config_str(text).is_err());
}

#[test]
fn tcp_healthcheck_requires_port() {
    let text = "
[program:web]
command = /bin/true
healthcheck_type = tcp
healthcheck_host = 127.0.0.1
";
    assert!(parse_config_str(text).is_err());
}

#[test]
fn script_healthcheck_requires_command() {
    let text = "
[program:web]
command = /bin/true
healthcheck_type = script
";
    assert!(parse_config_str(text).is_err());
}

#[test]
fn valid_tcp_healthcheck_parses() {
    let text = "
[program:web]
command = /bin/true
healthcheck_type = tcp
healthcheck_host = 127.0.0.1
healthcheck_port = 8080
healthcheck_interval = 5
";
    let cfg = parse_config_str(text).unwrap();
    let hc = &cfg.program("web").unwrap().healthcheck;
    assert_eq!(hc.kind, HealthCheckKind::Tcp);
    assert_eq!(hc.port, Some(8080));
}

#[test]
fn environment_is_parsed_via_env_list() {
    let text = "
[program:web]
command = /bin/true
environment = A=1,B=\"x,y\"
";
    let cfg = parse_config_str(text).unwrap();
    let env = &cfg.program("web").unwrap().environment;
    assert_eq!(env.get("A"), Some(&"1".to_string()));
    assert_eq!(env.get("B"), Some(&"x,y".to_string()));
}

#[test]
fn comments_and_blank_lines_are_ignored() {
    let text = "
; a comment
# another comment

[program:web]
command = /bin/true
";
    assert!(parse_config_str(text).is_ok());
}

#[test]
fn unknown_program_key_is_an_error() {
    let text = "
[program:web]
command = /bin/true
bogus_key = 1
";
    assert!(parse_config_str(text).is_err());
}
