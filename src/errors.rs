//! Crate-specific error types for mapfile.

use std::io;
use thiserror::Error;

/// Result alias for mapfile operations.
pub type Result<T> = std::result::Result<T, MapFileError>;

/// Error type covering the open lifecycle, file sizing, and mapping failures.
///
/// Every OS-level failure carries the OS diagnostic string so callers can log
/// or surface it without touching `errno`/`GetLastError` themselves.
#[derive(Debug, Error)]
pub enum MapFileError {
    /// `open` was called on an instance that already holds a mapping.
    #[error("file already open")]
    AlreadyOpen,

    /// The backing file could not be opened or created.
    #[error("couldn't open: {0}")]
    FileOpen(String),

    /// The backing file could not be truncated/extended to the requested length.
    #[error("couldn't set size to {len}: {reason}")]
    Resize {
        /// Length the file was being resized to.
        len: u64,
        /// OS diagnostic.
        reason: String,
    },

    /// The file's current size could not be determined for an unbounded mapping.
    #[error("couldn't determine file size: {0}")]
    SizeQuery(String),

    /// The OS refused to establish the mapping, including refusal to honor a
    /// requested fixed base address.
    #[error("couldn't map file: {0}")]
    Mapping(String),

    /// Rejected argument combination, e.g. `create` with no explicit length.
    #[error("invalid open options: {0}")]
    InvalidOptions(&'static str),

    /// Error when a requested offset/length pair is out of bounds.
    #[error("range out of bounds: offset={offset}, len={len}, total={total}")]
    OutOfBounds {
        /// Requested offset.
        offset: usize,
        /// Requested length.
        len: usize,
        /// Total size of the mapping.
        total: usize,
    },

    /// A human-readable size string could not be parsed.
    #[error("invalid size string: {0}")]
    ParseSize(String),

    /// Wrapper for `std::io::Error` from filesystem helpers.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
