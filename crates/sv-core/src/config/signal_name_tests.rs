// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

#[parameterized(
    bare = {"TERM", "TERM"},
    lowercase = {"term", "TERM"},
    sig_prefixed = {"SIGTERM", "TERM"},
    sig_prefixed_lowercase = {"sigkill", "KILL"},
    usr1 = {"USR1", "USR1"},
)]
fn resolves_known_signals(raw: &str, expected: &str) {
    assert_eq!(canonical_signal_name("demo", raw).unwrap(), expected);
}

#[test]
fn rejects_unknown_signal() {
    let err = canonical_signal_name("demo", "BOGUS").unwrap_err();
    match err {
        ConfigError::Program { program, message } => {
            assert_eq!(program, "demo");
            assert!(message.contains("BOGUS"));
        }
        other => panic!("unexpected error variant: {other:?}"),
    }
}

#[test]
fn rejects_sig_itself() {
    assert!(canonical_signal_name("demo", "SIG").is_err());
}

#[test]
fn all_valid_signals_map_to_a_nix_signal() {
    for name in VALID_SIGNALS {
        assert!(
            to_nix_signal(name).is_some(),
            "no nix::Signal for {name}"
        );
    }
}
