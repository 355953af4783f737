//! Lifecycle tests: open/close idempotence, reopen, and drop behavior.

use mapfile::{create_file, MapFileError, MappedFile, OpenOptions};
use tempfile::tempdir;

#[test]
fn close_twice_reports_success_both_times() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("double_close.bin");

    let mut map = MappedFile::create_rw(&path, 512).expect("create");
    assert!(map.close());
    assert!(map.close());
    assert!(!map.is_open());
}

#[test]
fn close_on_never_opened_instance_is_a_noop() {
    let mut map = MappedFile::new();
    assert!(map.close());
    assert!(map.close());
}

#[test]
fn open_while_open_fails_and_keeps_first_mapping() {
    let dir = tempdir().expect("tempdir");
    let first = dir.path().join("first.bin");
    let second = dir.path().join("second.bin");
    assert!(create_file(&second, 64));

    let mut map = MappedFile::create_rw(&first, 32).expect("create");
    map.as_mut_slice().expect("rw slice")[0] = b'A';

    let result = map.open(&second, &OpenOptions::new().create(false));
    assert!(matches!(result, Err(MapFileError::AlreadyOpen)));

    // The first mapping is intact.
    assert!(map.is_open());
    assert_eq!(map.size(), 32);
    assert_eq!(map.as_slice()[0], b'A');
}

#[test]
fn instance_can_be_reopened_after_close() {
    let dir = tempdir().expect("tempdir");
    let path_a = dir.path().join("a.bin");
    let path_b = dir.path().join("b.bin");

    let mut map = MappedFile::new();
    map.open(&path_a, &OpenOptions::new().len(16))
        .expect("open a");
    map.as_mut_slice().expect("rw slice")[0] = 1;
    assert!(map.close());

    map.open(&path_b, &OpenOptions::new().len(32))
        .expect("open b");
    assert_eq!(map.size(), 32);
    assert!(map.close());

    // And back to the first file, read-only this time.
    map.open(
        &path_a,
        &OpenOptions::new()
            .mode(mapfile::OpenMode::ReadOnly)
            .create(false),
    )
    .expect("reopen a");
    assert_eq!(map.size(), 16);
    assert_eq!(map.as_slice()[0], 1);
}

#[test]
fn drop_releases_the_mapping() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("dropped.bin");

    {
        let mut map = MappedFile::create_rw(&path, 64).expect("create");
        map.as_mut_slice().expect("rw slice")[0] = b'x';
        // Dropped while open; Drop must close.
    }

    // The path stays usable: truncating re-create and a fresh mapping work.
    let map = MappedFile::create_rw(&path, 128).expect("recreate");
    assert_eq!(map.size(), 128);
}

#[test]
fn failed_open_leaves_instance_closed_and_reusable() {
    let dir = tempdir().expect("tempdir");
    let missing = dir.path().join("missing.bin");
    let path = dir.path().join("real.bin");

    let mut map = MappedFile::new();
    let result = map.open(&missing, &OpenOptions::new().create(false));
    assert!(matches!(result, Err(MapFileError::FileOpen(_))));
    assert!(!map.is_open());
    assert!(map.data().is_null());

    // The same instance opens fine afterwards.
    map.open(&path, &OpenOptions::new().len(8)).expect("open");
    assert!(map.is_open());
}
