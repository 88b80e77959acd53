// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The closed set of valid stop signal names (§6), ported from
//! `VALID_SIGNALS` in the original's `config.py`.

use nix::sys::signal::Signal;

use super::ConfigError;

pub const VALID_SIGNALS: &[&str] = &[
    "HUP", "INT", "QUIT", "ILL", "TRAP", "ABRT", "BUS", "FPE", "KILL", "USR1", "SEGV", "USR2",
    "PIPE", "ALRM", "TERM", "STKFLT", "CHLD", "CONT", "STOP", "TSTP", "TTIN", "TTOU", "URG",
    "XCPU", "XFSZ", "VTALRM", "PROF", "WINCH", "IO", "PWR", "SYS",
];

/// Validate and canonicalize a signal name for a program's `stopsignal`.
///
/// Accepts names with or without a leading `SIG` (case-insensitive) and
/// returns the bare upper-case name, e.g. `"sigterm"` and `"TERM"` both
/// resolve to `"TERM"`.
pub fn canonical_signal_name(program: &str, raw: &str) -> Result<String, ConfigError> {
    let upper = raw.to_ascii_uppercase();
    let candidate = upper.strip_prefix("SIG").unwrap_or(&upper);
    if VALID_SIGNALS.contains(&candidate) {
        Ok(candidate.to_string())
    } else {
        Err(ConfigError::Program {
            program: program.to_string(),
            message: format!(
                "invalid stopsignal '{raw}', must be one of: {}",
                VALID_SIGNALS.join(", ")
            ),
        })
    }
}

/// Map a canonical signal name (as returned by [`canonical_signal_name`])
/// to the `nix` signal used to actually send it.
pub fn to_nix_signal(name: &str) -> Option<Signal> {
    let with_sig = format!("SIG{name}");
    Signal::iterator().find(|s| s.as_str() == with_sig)
}

#[cfg(test)]
#[path = "signal_name_tests.rs"]
mod tests;
