// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! POSIX-ish word splitting for a `command` string into argv.
//!
//! Mirrors Python's `shlex.split` semantics closely enough for the command
//! lines programs are configured with: single quotes suppress all escaping,
//! double quotes allow `\` to escape `\`, `"`, `$`, and backtick, and an
//! unquoted `\` escapes the following character.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ArgvError {
    #[error("unterminated quote in command line")]
    UnterminatedQuote,
    #[error("trailing backslash in command line")]
    TrailingBackslash,
}

pub fn split(command: &str) -> Result<Vec<String>, ArgvError> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut have_current = false;
    let mut chars = command.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            c if c.is_whitespace() => {
                if have_current {
                    words.push(std::mem::take(&mut current));
                    have_current = false;
                }
            }
            '\'' => {
                have_current = true;
                loop {
                    match chars.next() {
                        Some('\'') => break,
                        Some(c) => current.push(c),
                        None => return Err(ArgvError::UnterminatedQuote),
                    }
                }
            }
            '"' => {
                have_current = true;
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some('\\') => match chars.next() {
                            Some(c @ ('\\' | '"' | '$' | '`')) => current.push(c),
                            Some(other) => {
                                current.push('\\');
                                current.push(other);
                            }
                            None => return Err(ArgvError::UnterminatedQuote),
                        },
                        Some(c) => current.push(c),
                        None => return Err(ArgvError::UnterminatedQuote),
                    }
                }
            }
            '\\' => {
                have_current = true;
                match chars.next() {
                    Some(c) => current.push(c),
                    None => return Err(ArgvError::TrailingBackslash),
                }
            }
            c => {
                have_current = true;
                current.push(c);
            }
        }
    }

    if have_current {
        words.push(current);
    }

    Ok(words)
}

#[cfg(test)]
#[path = "argv_tests.rs"]
mod tests;
