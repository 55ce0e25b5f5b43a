use std::fs;
use std::io::Write;

use remake::store::{LineFile, StoreError};
use tempfile::NamedTempFile;

fn writable_store(content: &str) -> (NamedTempFile, LineFile) {
    let mut file = NamedTempFile::new().expect("create temp file");
    file.write_all(content.as_bytes()).expect("write fixture");
    let store = LineFile::open(file.path(), true).expect("open fixture");
    (file, store)
}

#[test]
fn shared_map_writes_reach_the_backing_file() {
    let (guard, mut store) = writable_store("x = 0\n");

    assert_eq!(store.write_at(b"1", 4), 1);
    store.flush().expect("flush");

    let on_disk = fs::read(guard.path()).expect("read back");
    assert_eq!(on_disk, b"x = 1\n");
}

#[test]
fn write_at_clamps_to_the_mapping() {
    let (_guard, mut store) = writable_store("abcd\n");

    assert_eq!(store.write_at(b"XYZ", 3), 2);
    assert_eq!(store.read_at(0, 5), b"abcXY");
    assert_eq!(store.write_at(b"X", 40), 0);
}

#[test]
fn write_at_on_a_private_map_is_refused() {
    let mut file = NamedTempFile::new().expect("create temp file");
    file.write_all(b"x\n").expect("write fixture");
    let mut store = LineFile::open(file.path(), false).expect("open fixture");

    assert_eq!(store.write_at(b"y", 0), 0);
    let on_disk = fs::read(file.path()).expect("read back");
    assert_eq!(on_disk, b"x\n");
}

#[test]
fn resize_to_zero_is_rejected() {
    let (_guard, mut store) = writable_store("abc\n");

    assert!(matches!(
        store.resize(0),
        Err(StoreError::EmptyFile { .. })
    ));
    assert!(store.is_open());
}

#[test]
fn resize_grows_the_mapping() {
    let (guard, mut store) = writable_store("ab\n");

    store.resize(6).expect("grow");
    assert_eq!(store.length(), 6);
    assert_eq!(fs::metadata(guard.path()).expect("stat").len(), 6);

    // The grown tail reads as zero bytes.
    assert_eq!(store.read_at(3, 3), &[0, 0, 0]);
}

#[test]
fn resize_shrink_clamps_the_cursor_and_recomputes_lines() {
    let (_guard, mut store) = writable_store("a\nb\nc\nd\n");

    store.seek(7).expect("seek near end");
    assert_eq!(store.line_number(), 4);

    store.resize(3).expect("shrink");
    assert_eq!(store.length(), 3);
    assert_eq!(store.position(), 3);
    assert_eq!(store.line_number(), 2);
    assert_eq!(store.total_line_count(), 2);
}

#[test]
fn resize_invalidates_the_line_count_cache() {
    let (_guard, mut store) = writable_store("a\nb\n");

    assert_eq!(store.total_line_count(), 3);
    store.resize(2).expect("shrink to one line");
    assert_eq!(store.total_line_count(), 2);
}

#[test]
fn rollback_state_does_not_survive_a_resize() {
    let (_guard, mut store) = writable_store("abcdef\n");

    store.read_bytes(3);
    store.resize(7).expect("same-size remap");
    assert_eq!(store.rollback_last_read(), 0);
}
