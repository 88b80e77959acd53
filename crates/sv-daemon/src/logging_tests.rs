// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn writes_accumulate_without_rotation_when_max_bytes_zero() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.log");
    let mut writer = RotatingWriter::open(&path, 0, 2).unwrap();
    writer.write_all(b"one\n").unwrap();
    writer.write_all(b"two\n").unwrap();
    writer.flush().unwrap();

    let contents = std::fs::read_to_string(&path).unwrap();
    assert_eq!(contents, "one\ntwo\n");
    assert!(!backup_path(&path, 1).exists());
}

#[test]
fn rotates_when_max_bytes_exceeded() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.log");
    let mut writer = RotatingWriter::open(&path, 4, 2).unwrap();
    writer.write_all(b"1234").unwrap();
    writer.write_all(b"5678").unwrap(); // exceeds max_bytes, triggers rotation first
    writer.flush().unwrap();

    assert!(backup_path(&path, 1).exists());
    let current = std::fs::read_to_string(&path).unwrap();
    assert_eq!(current, "5678");
}

#[test]
fn keeps_at_most_backups_count_of_old_logs() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.log");
    let mut writer = RotatingWriter::open(&path, 2, 2).unwrap();
    for chunk in ["aa", "bb", "cc", "dd"] {
        writer.write_all(chunk.as_bytes()).unwrap();
    }
    writer.flush().unwrap();

    assert!(backup_path(&path, 1).exists());
    assert!(backup_path(&path, 2).exists());
    assert!(!backup_path(&path, 3).exists());
}

#[test]
fn zero_backups_truncates_in_place_on_rotation() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.log");
    let mut writer = RotatingWriter::open(&path, 4, 0).unwrap();
    writer.write_all(b"1234").unwrap();
    writer.write_all(b"5678").unwrap();
    writer.flush().unwrap();

    assert!(!backup_path(&path, 1).exists());
    let current = std::fs::read_to_string(&path).unwrap();
    assert_eq!(current, "5678");
}
