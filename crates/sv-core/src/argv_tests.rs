// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

#[parameterized(
    simple = {"/usr/bin/true", &["/usr/bin/true"]},
    with_args = {"web-server --port 8080", &["web-server", "--port", "8080"]},
    single_quoted = {"echo 'hello world'", &["echo", "hello world"]},
    double_quoted = {"echo \"hello world\"", &["echo", "hello world"]},
    quoted_preserves_inner_spaces = {"cmd '-a -b'", &["cmd", "-a -b"]},
    escaped_space = {"cmd foo\\ bar", &["cmd", "foo bar"]},
    multiple_spaces_collapse = {"a   b", &["a", "b"]},
    empty = {"", &[] as &[&str]},
)]
fn splits(input: &str, expected: &[&str]) {
    let got = split(input).unwrap();
    assert_eq!(got, expected.iter().map(|s| s.to_string()).collect::<Vec<_>>());
}

#[test]
fn unterminated_single_quote_is_an_error() {
    assert_eq!(split("echo 'oops"), Err(ArgvError::UnterminatedQuote));
}

#[test]
fn unterminated_double_quote_is_an_error() {
    assert_eq!(split("echo \"oops"), Err(ArgvError::UnterminatedQuote));
}

#[test]
fn trailing_backslash_is_an_error() {
    assert_eq!(split("echo foo\\"), Err(ArgvError::TrailingBackslash));
}

#[test]
fn double_quotes_only_escape_special_chars() {
    assert_eq!(split(r#"echo "a\nb""#).unwrap(), vec!["echo", "a\\nb"]);
}

#[test]
fn sh_dash_c_style_command_splits_literally() {
    assert_eq!(
        split("sh -c 'exit 1'").unwrap(),
        vec!["sh", "-c", "exit 1"]
    );
}
