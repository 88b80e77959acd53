// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Hand-rolled reader for the `[supervice]` / `[program:NAME]` /
//! `[group:NAME]` INI-like format (§6).

use std::collections::BTreeMap;
use std::path::PathBuf;

use nix::unistd::{AccessFlags, User};

use super::{
    parse_bool_like, parse_env_list, ConfigError, GlobalConfig, HealthCheckKind, HealthCheckSpec,
    LogLevel, ProgramConfig, SupervisorConfig,
};

#[derive(Debug)]
enum Section {
    Supervice,
    Program(String),
    Group(String),
}

struct RawSection {
    section: Section,
    entries: Vec<(String, String, usize)>,
}

fn tokenize(text: &str) -> Result<Vec<RawSection>, ConfigError> {
    let mut sections = Vec::new();
    let mut current: Option<RawSection> = None;

    for (idx, raw_line) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        if let Some(body) = line.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
            if let Some(prev) = current.take() {
                sections.push(prev);
            }
            let section = if body == "supervice" {
                Section::Supervice
            } else if let Some(name) = body.strip_prefix("program:") {
                Section::Program(name.to_string())
            } else if let Some(name) = body.strip_prefix("group:") {
                Section::Group(name.to_string())
            } else {
                return Err(ConfigError::Syntax {
                    line: line_no,
                    message: format!("unknown section '[{body}]'"),
                });
            };
            current = Some(RawSection {
                section,
                entries: Vec::new(),
            });
            continue;
        }

        let Some(current) = current.as_mut() else {
            return Err(ConfigError::Syntax {
                line: line_no,
                message: "key/value outside of any section".to_string(),
            });
        };

        let Some((key, value)) = line.split_once('=') else {
            return Err(ConfigError::Syntax {
                line: line_no,
                message: format!("expected 'key = value', got '{line}'"),
            });
        };
        current
            .entries
            .push((key.trim().to_string(), value.trim().to_string(), line_no));
    }

    if let Some(last) = current.take() {
        sections.push(last);
    }

    Ok(sections)
}

/// Parse and validate config text into a `SupervisorConfig`.
pub fn parse_config_str(text: &str) -> Result<SupervisorConfig, ConfigError> {
    let sections = tokenize(text)?;

    let mut global = GlobalConfig::default();
    let mut programs: Vec<ProgramConfig> = Vec::new();
    let mut explicit_groups: BTreeMap<String, Vec<String>> = BTreeMap::new();

    for raw in &sections {
        match &raw.section {
            Section::Supervice => apply_global(&mut global, raw)?,
            Section::Program(name) => {
                let program = parse_program(name, raw)?;
                programs.push(program);
            }
            Section::Group(name) => {
                let members = raw
                    .entries
                    .iter()
                    .find(|(k, _, _)| k == "programs")
                    .map(|(_, v, _)| {
                        v.split(',')
                            .map(|s| s.trim().to_string())
                            .filter(|s| !s.is_empty())
                            .collect::<Vec<_>>()
                    })
                    .ok_or_else(|| ConfigError::Group {
                        group: name.clone(),
                        message: "missing 'programs' key".to_string(),
                    })?;
                explicit_groups.insert(name.clone(), members);
            }
        }
    }

    let mut group_members: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (group, members) in &explicit_groups {
        for member in members {
            let program = programs.iter_mut().find(|p| &p.name == member).ok_or_else(|| {
                ConfigError::Group {
                    group: group.clone(),
                    message: format!("unknown program '{member}'"),
                }
            })?;
            program.group = group.clone();
        }
        group_members.insert(group.clone(), members.clone());
    }

    for program in &mut programs {
        if program.group.is_empty() {
            program.group = program.name.clone();
            group_members
                .entry(program.name.clone())
                .or_insert_with(|| vec![program.name.clone()]);
        }
    }

    if programs.is_empty() {
        return Err(ConfigError::Syntax {
            line: 0,
            message: "config defines no [program:NAME] sections".to_string(),
        });
    }

    Ok(SupervisorConfig {
        global,
        programs,
        group_members,
    })
}

fn apply_global(global: &mut GlobalConfig, raw: &RawSection) -> Result<(), ConfigError> {
    for (key, value, _line) in &raw.entries {
        match key.as_str() {
            "logfile" => global.logfile = Some(PathBuf::from(value)),
            "pidfile" => global.pidfile = Some(PathBuf::from(value)),
            "loglevel" => global.loglevel = LogLevel::parse(value)?,
            "socket" => global.socket = PathBuf::from(value),
            "shutdown_timeout" => global.shutdown_timeout = parse_positive(value, "shutdown_timeout")?,
            "log_maxbytes" => global.log_maxbytes = parse_positive(value, "log_maxbytes")?,
            "log_backups" => {
                global.log_backups = parse_positive::<u64>(value, "log_backups")? as u32
            }
            other => {
                return Err(ConfigError::Global {
                    field: other.to_string(),
                    message: "unknown key".to_string(),
                })
            }
        }
    }
    Ok(())
}

fn parse_positive<T>(value: &str, field: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
{
    value.parse::<T>().map_err(|_| ConfigError::Global {
        field: field.to_string(),
        message: format!("expected non-negative integer, got '{value}'"),
    })
}

fn parse_program(name: &str, raw: &RawSection) -> Result<ProgramConfig, ConfigError> {
    let mut program = ProgramConfig {
        name: name.to_string(),
        ..ProgramConfig::default()
    };
    let mut hc = HealthCheckSpec::default();
    let mut saw_command = false;

    for (key, value, _line) in &raw.entries {
        match key.as_str() {
            "command" => {
                program.command = value.clone();
                saw_command = true;
            }
            "directory" => program.directory = Some(PathBuf::from(value)),
            "environment" => program.environment = parse_env_list(name, value)?,
            "user" => program.user = Some(value.clone()),
            "numprocs" => {
                program.numprocs = parse_program_int(name, "numprocs", value)?;
                if program.numprocs < 1 {
                    return Err(ConfigError::Program {
                        program: name.to_string(),
                        message: "numprocs must be >= 1".to_string(),
                    });
                }
            }
            "autostart" => program.autostart = parse_bool_like(value),
            "autorestart" => program.autorestart = parse_bool_like(value),
            "startsecs" => program.startsecs = parse_program_int(name, "startsecs", value)?,
            "startretries" => program.startretries = parse_program_int(name, "startretries", value)?,
            "stopsignal" => {
                program.stopsignal = super::canonical_signal_name(name, value)?;
            }
            "stopwaitsecs" => program.stopwaitsecs = parse_program_int(name, "stopwaitsecs", value)?,
            "stdout_logfile" => program.stdout_logfile = Some(PathBuf::from(value)),
            "stderr_logfile" => program.stderr_logfile = Some(PathBuf::from(value)),
            "healthcheck_type" => {
                hc.kind = match value.to_ascii_lowercase().as_str() {
                    "none" => HealthCheckKind::None,
                    "tcp" => HealthCheckKind::Tcp,
                    "script" => HealthCheckKind::Script,
                    other => {
                        return Err(ConfigError::Program {
                            program: name.to_string(),
                            message: format!("unknown healthcheck_type '{other}'"),
                        })
                    }
                }
            }
            "healthcheck_interval" => hc.interval = parse_program_int(name, "healthcheck_interval", value)?,
            "healthcheck_timeout" => hc.timeout = parse_program_int(name, "healthcheck_timeout", value)?,
            "healthcheck_retries" => {
                hc.retries = parse_program_int::<u64>(name, "healthcheck_retries", value)? as u32
            }
            "healthcheck_start_period" => {
                hc.start_period = parse_program_int(name, "healthcheck_start_period", value)?
            }
            "healthcheck_host" => hc.host = value.clone(),
            "healthcheck_port" => {
                hc.port = Some(parse_program_int::<u32>(name, "healthcheck_port", value)? as u16)
            }
            "healthcheck_command" => hc.command = Some(value.clone()),
            other => {
                return Err(ConfigError::Program {
                    program: name.to_string(),
                    message: format!("unknown key '{other}'"),
                })
            }
        }
    }

    if !saw_command || program.command.trim().is_empty() {
        return Err(ConfigError::Program {
            program: name.to_string(),
            message: "missing required 'command'".to_string(),
        });
    }

    validate_user(name, &program.user)?;
    validate_directory(name, &program.directory)?;
    validate_logfile_parent(name, "stdout_logfile", &program.stdout_logfile)?;
    validate_logfile_parent(name, "stderr_logfile", &program.stderr_logfile)?;
    validate_healthcheck(name, &hc)?;

    program.healthcheck = hc;
    Ok(program)
}

fn parse_program_int<T>(program: &str, field: &str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
{
    value.parse::<T>().map_err(|_| ConfigError::Program {
        program: program.to_string(),
        message: format!("{field}: expected non-negative integer, got '{value}'"),
    })
}

fn validate_user(program: &str, user: &Option<String>) -> Result<(), ConfigError> {
    let Some(name) = user else {
        return Ok(());
    };
    match User::from_name(name) {
        Ok(Some(_)) => Ok(()),
        Ok(None) => Err(ConfigError::Program {
            program: program.to_string(),
            message: format!("unknown user '{name}'"),
        }),
        Err(e) => Err(ConfigError::Program {
            program: program.to_string(),
            message: format!("failed to resolve user '{name}': {e}"),
        }),
    }
}

fn validate_directory(program: &str, directory: &Option<PathBuf>) -> Result<(), ConfigError> {
    let Some(dir) = directory else {
        return Ok(());
    };
    if !dir.is_dir() {
        return Err(ConfigError::Program {
            program: program.to_string(),
            message: format!("directory '{}' does not exist or is not a directory", dir.display()),
        });
    }
    nix::unistd::access(dir, AccessFlags::X_OK).map_err(|_| ConfigError::Program {
        program: program.to_string(),
        message: format!("directory '{}' is not searchable", dir.display()),
    })
}

fn validate_logfile_parent(
    program: &str,
    field: &str,
    path: &Option<PathBuf>,
) -> Result<(), ConfigError> {
    let Some(path) = path else {
        return Ok(());
    };
    let parent = path.parent().filter(|p| !p.as_os_str().is_empty());
    let Some(parent) = parent else {
        return Ok(());
    };
    if !parent.is_dir() {
        return Err(ConfigError::Program {
            program: program.to_string(),
            message: format!("{field}: parent directory '{}' does not exist", parent.display()),
        });
    }
    nix::unistd::access(parent, AccessFlags::W_OK).map_err(|_| ConfigError::Program {
        program: program.to_string(),
        message: format!("{field}: parent directory '{}' is not writable", parent.display()),
    })
}

fn validate_healthcheck(program: &str, hc: &HealthCheckSpec) -> Result<(), ConfigError> {
    if hc.kind == HealthCheckKind::None {
        return Ok(());
    }
    if hc.interval < 1 {
        return Err(ConfigError::Program {
            program: program.to_string(),
            message: "healthcheck_interval must be >= 1".to_string(),
        });
    }
    match hc.kind {
        HealthCheckKind::Tcp => {
            if hc.host.trim().is_empty() {
                return Err(ConfigError::Program {
                    program: program.to_string(),
                    message: "healthcheck_host must not be empty for a tcp healthcheck".to_string(),
                });
            }
            match hc.port {
                Some(port) if port >= 1 => {}
                _ => {
                    return Err(ConfigError::Program {
                        program: program.to_string(),
                        message: "healthcheck_port must be in 1..65535 for a tcp healthcheck".to_string(),
                    })
                }
            }
        }
        HealthCheckKind::Script => {
            if hc.command.as_deref().unwrap_or("").trim().is_empty() {
                return Err(ConfigError::Program {
                    program: program.to_string(),
                    message: "healthcheck_command must not be empty for a script healthcheck".to_string(),
                });
            }
        }
        HealthCheckKind::None => unreachable!(),
    }
    Ok(())
}

#[cfg(test)]
#[path = "parser_tests.rs"]
mod tests;
