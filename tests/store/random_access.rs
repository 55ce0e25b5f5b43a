use std::io::Write;

use remake::store::{LineFile, StoreError, EOB_SENTINEL};
use tempfile::NamedTempFile;

fn store_over(content: &str) -> (NamedTempFile, LineFile) {
    let mut file = NamedTempFile::new().expect("create temp file");
    file.write_all(content.as_bytes()).expect("write fixture");
    let store = LineFile::open(file.path(), false).expect("open fixture");
    (file, store)
}

#[test]
fn peek_at_inspects_without_consuming() {
    let (_guard, store) = store_over("abc\n");

    assert_eq!(store.peek_at(0).expect("in range"), b'a');
    assert_eq!(store.peek_at(2).expect("in range"), b'c');
    assert_eq!(store.position(), 0);
}

#[test]
fn peek_at_rejects_offsets_past_the_mapping() {
    let (_guard, store) = store_over("abc\n");

    assert!(matches!(
        store.peek_at(4),
        Err(StoreError::OutOfRange {
            position: 4,
            length: 4
        })
    ));
}

#[test]
fn peek_current_and_next_follow_the_cursor() {
    let (_guard, mut store) = store_over("xy\n");

    assert_eq!(store.peek_current(), b'x');
    assert_eq!(store.peek_next(), b'y');
    store.read_byte();
    assert_eq!(store.peek_current(), b'y');
    assert_eq!(store.peek_next(), b'\n');
}

#[test]
fn peek_past_end_degrades_to_the_sentinel() {
    let (_guard, mut store) = store_over("x\n");

    store.read_bytes(2);
    assert_eq!(store.peek_current(), EOB_SENTINEL);
    assert_eq!(store.peek_next(), EOB_SENTINEL);
}

#[test]
fn slice_at_borrows_exact_spans() {
    let (_guard, store) = store_over("target: dep\n");

    assert_eq!(store.slice_at(0, 6).expect("in range"), b"target");
    assert_eq!(store.slice_at(8, 3).expect("in range"), b"dep");
}

#[test]
fn slice_at_rejects_spans_overrunning_the_mapping() {
    let (_guard, store) = store_over("abc\n");

    assert!(store.slice_at(2, 3).is_err());
    assert!(store.slice_at(u64::MAX, 2).is_err());
}

#[test]
fn read_at_clamps_instead_of_failing() {
    let (_guard, store) = store_over("abc\n");

    assert_eq!(store.read_at(1, 100), b"bc\n");
    assert_eq!(store.read_at(9, 4), b"");
}

#[test]
fn seek_rejects_positions_at_or_past_the_length() {
    let (_guard, mut store) = store_over("abc\n");

    assert!(store.seek(3).is_ok());
    assert!(matches!(
        store.seek(4),
        Err(StoreError::OutOfRange { .. })
    ));
    assert!(store.rewind().is_ok());
    assert_eq!(store.position(), 0);
}
