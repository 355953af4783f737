//! Placement tests: alignment queries, offsets, and fixed base addresses.

use mapfile::{create_file, MapFileError, MappedFile, OpenMode, OpenOptions};
use std::fs;
use std::path::PathBuf;

fn tmp_path(name: &str) -> PathBuf {
    let mut p = std::env::temp_dir();
    p.push(format!("mapfile_placement_{}_{}", name, std::process::id()));
    p
}

#[test]
fn alignment_is_a_nonzero_power_of_two() {
    let alignment = MappedFile::alignment();
    assert!(alignment > 0);
    assert!(alignment.is_power_of_two());
}

#[test]
fn data_pointer_matches_slice() {
    let path = tmp_path("data_pointer_matches_slice");
    let _ = fs::remove_file(&path);

    let map = MappedFile::create_rw(&path, 64).expect("create");
    assert_eq!(map.data().cast_const(), map.as_slice().as_ptr());

    let _ = fs::remove_file(&path);
}

#[test]
fn remap_at_previous_address() {
    let path = tmp_path("remap_at_previous_address");
    let _ = fs::remove_file(&path);

    let mut map = MappedFile::create_rw(&path, 4096).expect("create");
    let base = map.data();
    assert!(map.close());

    // Ask for the address the OS just gave us. The OS may refuse (the range
    // can be reused between close and reopen); what must never happen is a
    // successful open at some other address.
    let result = OpenOptions::new()
        .create(false)
        .at(base)
        .open(&path);
    match result {
        Ok(remapped) => assert_eq!(remapped.data(), base),
        Err(MapFileError::Mapping(_)) => {}
        Err(e) => panic!("unexpected error kind: {e}"),
    }

    let _ = fs::remove_file(&path);
}

#[test]
fn unaligned_offset_is_refused_by_the_os() {
    let path = tmp_path("unaligned_offset_is_refused_by_the_os");
    let _ = fs::remove_file(&path);

    assert!(create_file(&path, 8192));
    let result = OpenOptions::new().offset(1).create(false).open(&path);
    assert!(matches!(result, Err(MapFileError::Mapping(_))));

    let _ = fs::remove_file(&path);
}

#[test]
fn offset_mapping_reads_later_bytes() {
    let path = tmp_path("offset_mapping_reads_later_bytes");
    let _ = fs::remove_file(&path);

    let offset = MappedFile::alignment();
    let total = offset + 16;

    let mut map = MappedFile::create_rw(&path, total as u64).expect("create");
    map.as_mut_slice().expect("rw slice")[offset..offset + 4].copy_from_slice(b"tail");
    assert!(map.close());

    let tail = OpenOptions::new()
        .mode(OpenMode::ReadOnly)
        .offset(offset as u64)
        .create(false)
        .open(&path)
        .expect("open at offset");
    assert_eq!(tail.size(), 16);
    assert_eq!(&tail.as_slice()[..4], b"tail");

    let _ = fs::remove_file(&path);
}

#[test]
fn offset_past_end_of_file_cannot_be_mapped() {
    let path = tmp_path("offset_past_end_of_file_cannot_be_mapped");
    let _ = fs::remove_file(&path);

    assert!(create_file(&path, 16));
    let offset = MappedFile::alignment() as u64;
    let result = OpenOptions::new().offset(offset).create(false).open(&path);
    assert!(matches!(result, Err(MapFileError::Mapping(_))));

    let _ = fs::remove_file(&path);
}
