//! High-level helpers for pre-sizing and mapping files.

use std::fs;
use std::path::Path;

use log::warn;

use crate::errors::Result;
use crate::mapped::MappedFile;

/// Create `path` if absent and set its length to exactly `size` bytes.
///
/// Sparse where the filesystem supports it; existing content within the new
/// length is kept. Reports success as a bool and never panics; the failure
/// cause is logged. Intended for pre-sizing a file that a later
/// `create(false)` open maps without the mapping itself resizing anything:
///
/// ```no_run
/// use mapfile::{create_file, MappedFile};
///
/// assert!(create_file("data.bin", 4096));
/// let map = MappedFile::open_rw("data.bin")?;
/// assert_eq!(map.size(), 4096);
/// # Ok::<(), mapfile::MapFileError>(())
/// ```
pub fn create_file<P: AsRef<Path>>(path: P, size: u64) -> bool {
    let path = path.as_ref();
    let result = fs::OpenOptions::new()
        .write(true)
        .create(true)
        .open(path)
        .and_then(|file| file.set_len(size));
    match result {
        Ok(()) => true,
        Err(e) => {
            warn!("couldn't size {path:?} to {size} bytes: {e}");
            false
        }
    }
}

/// Map the whole of an existing file read-only.
///
/// # Errors
///
/// Returns errors from [`MappedFile::open_ro`].
pub fn map_ro<P: AsRef<Path>>(path: P) -> Result<MappedFile> {
    MappedFile::open_ro(path)
}

/// Map the whole of an existing file read-write.
///
/// # Errors
///
/// Returns errors from [`MappedFile::open_rw`].
pub fn map_rw<P: AsRef<Path>>(path: P) -> Result<MappedFile> {
    MappedFile::open_rw(path)
}

/// Create a file of `size` bytes (truncating if it exists) and map it
/// read-write.
///
/// # Errors
///
/// Returns errors from [`MappedFile::create_rw`].
pub fn create_map<P: AsRef<Path>>(path: P, size: u64) -> Result<MappedFile> {
    MappedFile::create_rw(path, size)
}

/// Delete the file backing a mapping path.
///
/// Close or drop mappings over the file first; on Unix the data lives on
/// until the last open handle drops.
///
/// # Errors
///
/// Returns [`crate::MapFileError::Io`] if the delete operation fails.
pub fn delete_file<P: AsRef<Path>>(path: P) -> Result<()> {
    fs::remove_file(path)?;
    Ok(())
}
