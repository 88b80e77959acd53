// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `environment = K=V,K2="v,2",K3='v3'` parsing.
//!
//! Ported from `_parse_env` in the original's `config.py`: a hand-rolled,
//! character-by-character scanner rather than a naive `split(',')`, since a
//! quoted value may itself contain commas.

use std::collections::BTreeMap;

use super::ConfigError;

/// Parse a comma-separated `key=value` list, honoring matching `'`/`"`
/// quotes around a value (which may then contain literal commas).
pub fn parse_env_list(program: &str, raw: &str) -> Result<BTreeMap<String, String>, ConfigError> {
    let mut out = BTreeMap::new();
    let chars: Vec<char> = raw.chars().collect();
    let mut i = 0;
    let len = chars.len();

    while i < len {
        // Skip leading separator/whitespace between pairs.
        while i < len && (chars[i] == ',' || chars[i].is_whitespace()) {
            i += 1;
        }
        if i >= len {
            break;
        }

        let key_start = i;
        while i < len && chars[i] != '=' {
            i += 1;
        }
        if i >= len {
            return Err(malformed(program, raw));
        }
        let key: String = chars[key_start..i].iter().collect();
        let key = key.trim().to_string();
        if key.is_empty() {
            return Err(malformed(program, raw));
        }
        i += 1; // skip '='

        let value = if i < len && (chars[i] == '\'' || chars[i] == '"') {
            let quote = chars[i];
            i += 1;
            let value_start = i;
            while i < len && chars[i] != quote {
                i += 1;
            }
            if i >= len {
                return Err(malformed(program, raw));
            }
            let value: String = chars[value_start..i].iter().collect();
            i += 1; // skip closing quote
            value
        } else {
            let value_start = i;
            while i < len && chars[i] != ',' {
                i += 1;
            }
            chars[value_start..i].iter().collect::<String>().trim().to_string()
        };

        out.insert(key, value);
    }

    Ok(out)
}

fn malformed(program: &str, raw: &str) -> ConfigError {
    ConfigError::Program {
        program: program.to_string(),
        message: format!("malformed environment list '{raw}'"),
    }
}
