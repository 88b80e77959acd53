// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Supervisor-style boolish string parsing for `autostart`/`autorestart`.

/// `true`/`1`/`yes`/`on`, case-insensitive, parse as `true`; anything else
/// (including `false`/`0`/`no`/`off`) parses as `false`. Ported from
/// `_parse_bool` in the original's `config.py`.
pub fn parse_bool_like(raw: &str) -> bool {
    matches!(
        raw.to_ascii_lowercase().as_str(),
        "true" | "1" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use yare::parameterized;

    #[parameterized(
        lower_true = {"true", true},
        upper_true = {"TRUE", true},
        one = {"1", true},
        yes = {"yes", true},
        on = {"On", true},
        lower_false = {"false", false},
        zero = {"0", false},
        no = {"no", false},
        off = {"off", false},
        garbage = {"nope", false},
        empty = {"", false},
    )]
    fn parses(raw: &str, expected: bool) {
        assert_eq!(parse_bool_like(raw), expected);
    }
}
