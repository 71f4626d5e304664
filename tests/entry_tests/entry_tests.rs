//! Tests for FileEntry
//!
//! These tests verify:
//! - Metadata of a regular file
//! - Rejection of directories and missing paths
//! - Sending an entry through a session

use std::fs;
use std::io::Cursor;
use std::path::PathBuf;

use scpsource::{FileEntry, FileTime, ScpError, Session};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_file(name: &str, content: &[u8]) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join(name);
    fs::write(&path, content).unwrap();
    (temp_dir, path)
}

// =============================================================================
// Metadata Tests
// =============================================================================

#[test]
fn test_entry_from_regular_file() {
    let (_temp, path) = setup_file("notes.txt", b"hello world");

    let entry = FileEntry::from_path(&path).unwrap();
    assert_eq!(entry.name, "notes.txt");
    assert_eq!(entry.length, 11);
    assert_eq!(entry.path, path);
    assert!(entry.mode <= 0o7777);
    assert!(entry.mtime.micros < 1_000_000);
    assert!(entry.atime.micros < 1_000_000);
}

#[cfg(unix)]
#[test]
fn test_entry_mode_from_permissions() {
    use std::os::unix::fs::PermissionsExt;

    let (_temp, path) = setup_file("script.sh", b"#!/bin/sh\n");
    fs::set_permissions(&path, fs::Permissions::from_mode(0o750)).unwrap();

    let entry = FileEntry::from_path(&path).unwrap();
    assert_eq!(entry.mode, 0o750);
}

#[test]
fn test_entry_rejects_directory() {
    let temp_dir = TempDir::new().unwrap();
    let result = FileEntry::from_path(temp_dir.path());
    assert!(matches!(result, Err(ScpError::Logic(_))));
}

#[test]
fn test_entry_missing_file_is_source_error() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("nope");

    let err = FileEntry::from_path(&missing).unwrap_err();
    assert!(!err.is_fatal());
    match err {
        ScpError::Source { path, source } => {
            assert_eq!(path, missing);
            assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
        }
        other => panic!("Expected source error, got {:?}", other),
    }
}

#[test]
fn test_entry_rename() {
    let (_temp, path) = setup_file("a", b"x");
    let entry = FileEntry::from_path(&path).unwrap();

    let renamed = entry.clone().with_name("b.txt").unwrap();
    assert_eq!(renamed.name, "b.txt");
    assert!(matches!(entry.with_name(".."), Err(ScpError::Logic(_))));
}

// =============================================================================
// Session Integration Tests
// =============================================================================

#[test]
fn test_send_entry_without_times() {
    let (_temp, path) = setup_file("data.bin", b"0123456789");
    let mut entry = FileEntry::from_path(&path).unwrap();
    entry.mode = 0o640;

    let mut session = Session::open(Vec::new(), Cursor::new(vec![0x00, 0x00, 0x00])).unwrap();
    session.send_entry(&entry, false).unwrap();

    assert_eq!(
        session.outbound_ref().as_slice(),
        b"C0640 10 data.bin\n0123456789\x00"
    );
}

#[test]
fn test_send_entry_with_times() {
    let (_temp, path) = setup_file("data.bin", b"abc");
    let mut entry = FileEntry::from_path(&path).unwrap();
    entry.mode = 0o644;
    entry.mtime = FileTime::new(1136214245, 678901).unwrap();
    entry.atime = FileTime::new(1535759998, 999999).unwrap();

    let mut session =
        Session::open(Vec::new(), Cursor::new(vec![0x00, 0x00, 0x00, 0x00])).unwrap();
    session.send_entry(&entry, true).unwrap();

    assert_eq!(
        session.outbound_ref().as_slice(),
        b"T1136214245 678901 1535759998 999999\nC0644 3 data.bin\nabc\x00"
    );
}

#[test]
fn test_send_entry_missing_file_leaves_session_ready() {
    let (temp, path) = setup_file("gone", b"abc");
    let entry = FileEntry::from_path(&path).unwrap();
    fs::remove_file(&path).unwrap();

    let mut session = Session::open(Vec::new(), Cursor::new(vec![0x00])).unwrap();
    let err = session.send_entry(&entry, true).unwrap_err();
    assert!(matches!(err, ScpError::Source { .. }));
    assert!(!err.is_fatal());
    assert!(!session.is_faulted());
    assert!(session.outbound_ref().is_empty());
    drop(temp);
}

#[test]
fn test_send_continues_after_unreadable_entry() {
    let (temp, path) = setup_file("gone", b"abc");
    let missing = FileEntry::from_path(&path).unwrap();
    fs::remove_file(&path).unwrap();
    let (_temp2, ok_path) = setup_file("ok.txt", b"hi");
    let present = FileEntry::from_path(&ok_path).unwrap();

    let mut session = Session::open(Vec::new(), Cursor::new(vec![0x00, 0x00, 0x00])).unwrap();
    let err = session.send_entry(&missing, false).unwrap_err();
    assert!(!err.is_fatal());

    session.send_entry(&present, false).unwrap();
    assert!(session
        .outbound_ref()
        .starts_with(format!("C{:04o} 2 ok.txt\n", present.mode).as_bytes()));
    drop(temp);
}
