//! Tests for the Index Log
//!
//! These tests verify:
//! - Record append offsets and on-disk layout
//! - In-place patching of the value offset field
//! - Replay of well-formed logs
//! - Torn tails and truncated keys during replay

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

use dockv::config::SyncMode;
use dockv::index::{IndexLog, KeyRecord, KEY_HEADER_SIZE};
use dockv::{DocError, IndexOffset, StorageOffset};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_temp_index() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("index");
    (temp_dir, path)
}

fn replay(log: &mut IndexLog) -> Vec<KeyRecord> {
    log.records()
        .unwrap()
        .collect::<Result<Vec<_>, _>>()
        .unwrap()
}

fn append_raw(path: &PathBuf, bytes: &[u8]) {
    let mut file = OpenOptions::new().append(true).open(path).unwrap();
    file.write_all(bytes).unwrap();
}

// =============================================================================
// Append Tests
// =============================================================================

#[test]
fn test_open_creates_empty_log() {
    let (_temp, path) = setup_temp_index();

    let mut log = IndexLog::open(&path, SyncMode::Data).unwrap();

    assert!(path.exists());
    assert_eq!(log.size(), 0);
    assert!(replay(&mut log).is_empty());
    assert_eq!(log.size(), 0);
}

#[test]
fn test_append_returns_header_offsets() {
    let (_temp, path) = setup_temp_index();
    let mut log = IndexLog::open(&path, SyncMode::Data).unwrap();

    let first = log.append(b"key1", StorageOffset::new(0)).unwrap();
    let second = log.append(b"k2", StorageOffset::new(19)).unwrap();

    assert_eq!(first, IndexOffset::new(0));
    assert_eq!(second, IndexOffset::new(KEY_HEADER_SIZE + 4));
    assert_eq!(log.size(), 2 * KEY_HEADER_SIZE + 6);
}

#[test]
fn test_append_writes_documented_layout() {
    let (_temp, path) = setup_temp_index();
    let mut log = IndexLog::open(&path, SyncMode::Data).unwrap();

    log.append(b"key1", StorageOffset::new(42)).unwrap();

    let bytes = fs::read(&path).unwrap();
    assert_eq!(bytes.len(), 20);
    assert_eq!(&bytes[0..8], &4u64.to_le_bytes());
    assert_eq!(&bytes[8..16], &42u64.to_le_bytes());
    assert_eq!(&bytes[16..], b"key1");
}

// =============================================================================
// Patch Tests
// =============================================================================

#[test]
fn test_patch_rewrites_only_value_offset() {
    let (_temp, path) = setup_temp_index();
    let mut log = IndexLog::open(&path, SyncMode::Data).unwrap();

    log.append(b"a", StorageOffset::new(0)).unwrap();
    let b = log.append(b"bb", StorageOffset::new(9)).unwrap();
    let before = fs::read(&path).unwrap();

    log.patch_value_offset(b, StorageOffset::new(500)).unwrap();

    let after = fs::read(&path).unwrap();
    assert_eq!(after.len(), before.len());
    assert_eq!(log.size(), before.len() as u64);

    let field = (b.get() + 8) as usize;
    assert_eq!(&after[..field], &before[..field]);
    assert_eq!(&after[field..field + 8], &500u64.to_le_bytes());
    assert_eq!(&after[field + 8..], &before[field + 8..]);
}

#[test]
fn test_patch_is_seen_by_replay() {
    let (_temp, path) = setup_temp_index();

    {
        let mut log = IndexLog::open(&path, SyncMode::All).unwrap();
        let at = log.append(b"key", StorageOffset::new(0)).unwrap();
        log.patch_value_offset(at, StorageOffset::new(77)).unwrap();
        log.sync().unwrap();
    }

    let mut log = IndexLog::open(&path, SyncMode::Data).unwrap();
    let records = replay(&mut log);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].value_offset, StorageOffset::new(77));
}

#[test]
fn test_patch_beyond_end_is_rejected() {
    let (_temp, path) = setup_temp_index();
    let mut log = IndexLog::open(&path, SyncMode::Data).unwrap();
    log.append(b"a", StorageOffset::new(0)).unwrap();

    let err = log
        .patch_value_offset(IndexOffset::new(10), StorageOffset::new(1))
        .unwrap_err();

    assert!(matches!(err, DocError::Io(_)));
    assert_eq!(fs::read(&path).unwrap().len(), 17);
}

// =============================================================================
// Replay Tests
// =============================================================================

#[test]
fn test_replay_yields_records_in_order() {
    let (_temp, path) = setup_temp_index();

    {
        let mut log = IndexLog::open(&path, SyncMode::Data).unwrap();
        for i in 0..20u64 {
            let key = format!("key{}", i);
            log.append(key.as_bytes(), StorageOffset::new(i * 100)).unwrap();
        }
    }

    let mut log = IndexLog::open(&path, SyncMode::Data).unwrap();
    let records = replay(&mut log);

    assert_eq!(records.len(), 20);
    let mut expected_offset = 0;
    for (i, record) in records.iter().enumerate() {
        assert_eq!(record.key, format!("key{}", i).into_bytes());
        assert_eq!(record.value_offset, StorageOffset::new(i as u64 * 100));
        assert_eq!(record.offset, IndexOffset::new(expected_offset));
        expected_offset += record.encoded_len();
    }
    assert_eq!(log.size(), expected_offset);
}

#[test]
fn test_replay_stops_at_partial_header() {
    let (_temp, path) = setup_temp_index();

    {
        let mut log = IndexLog::open(&path, SyncMode::Data).unwrap();
        log.append(b"whole", StorageOffset::new(0)).unwrap();
    }
    append_raw(&path, &[0xAB; 9]);

    let mut log = IndexLog::open(&path, SyncMode::Data).unwrap();
    assert_eq!(log.size(), 21 + 9);

    let records = replay(&mut log);
    assert_eq!(records.len(), 1);
    assert_eq!(log.size(), 21);

    // New record overwrites the torn bytes
    let at = log.append(b"next", StorageOffset::new(13)).unwrap();
    assert_eq!(at, IndexOffset::new(21));
    assert_eq!(replay(&mut log).len(), 2);
}

#[test]
fn test_replay_rejects_truncated_key() {
    let (_temp, path) = setup_temp_index();

    {
        let mut log = IndexLog::open(&path, SyncMode::Data).unwrap();
        log.append(b"fine", StorageOffset::new(0)).unwrap();
    }
    let mut torn = Vec::new();
    torn.extend_from_slice(&8u64.to_le_bytes());
    torn.extend_from_slice(&0u64.to_le_bytes());
    torn.extend_from_slice(b"half");
    append_raw(&path, &torn);

    let mut log = IndexLog::open(&path, SyncMode::Data).unwrap();
    let mut records = log.records().unwrap();

    assert!(records.next().unwrap().is_ok());
    match records.next() {
        Some(Err(DocError::IndexCorruption { offset, reason })) => {
            assert_eq!(offset, 20);
            assert!(reason.contains("key length 8"), "{reason}");
        }
        other => panic!("expected IndexCorruption, got {other:?}"),
    }
    assert!(records.next().is_none());
}

#[test]
fn test_replay_rejects_absurd_key_length() {
    let (_temp, path) = setup_temp_index();

    let mut header = Vec::new();
    header.extend_from_slice(&u64::MAX.to_le_bytes());
    header.extend_from_slice(&0u64.to_le_bytes());
    fs::write(&path, &header).unwrap();

    let mut log = IndexLog::open(&path, SyncMode::Data).unwrap();
    let result: Result<Vec<_>, _> = log.records().unwrap().collect();

    assert!(matches!(
        result,
        Err(DocError::IndexCorruption { offset: 0, .. })
    ));
}

#[test]
fn test_replay_position_tracks_progress() {
    let (_temp, path) = setup_temp_index();
    let mut log = IndexLog::open(&path, SyncMode::Data).unwrap();
    log.append(b"abc", StorageOffset::new(0)).unwrap();

    let mut records = log.records().unwrap();
    assert_eq!(records.position(), IndexOffset::new(0));
    records.next().unwrap().unwrap();
    assert_eq!(records.position(), IndexOffset::new(19));
    assert!(records.next().is_none());
    assert_eq!(records.position(), IndexOffset::new(19));
}
