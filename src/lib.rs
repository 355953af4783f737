//! # mapfile: portable memory-mapped file regions
//!
//! This crate exposes a disk file as a contiguous, directly addressable byte
//! region. One [`MappedFile`] owns at most one mapping: callers open it
//! read-only or read-write, touch the bytes through ordinary slices instead
//! of explicit read/write calls, and close (or drop) the instance to release
//! the OS resources. The divergent native facilities for obtaining such a
//! region (POSIX `mmap`, Win32 file mappings) sit behind a single backend
//! boundary selected at build time.
//!
//! ## Quick Start
//!
//! ```no_run
//! use mapfile::MappedFile;
//!
//! // Create a 4KB file and map it read-write.
//! let mut map = MappedFile::create_rw("data.bin", 4096)?;
//! if let Some(bytes) = map.as_mut_slice() {
//!     bytes[0] = 0x2a;
//! }
//! assert!(map.close());
//!
//! // Re-open the same file read-only.
//! let map = MappedFile::open_ro("data.bin")?;
//! assert_eq!(map.as_slice()[0], 0x2a);
//! # Ok::<(), mapfile::MapFileError>(())
//! ```
//!
//! ## Modules
//!
//! - [`errors`]: Error types for all mapping operations
//! - [`mapped`]: Core [`MappedFile`] implementation and [`OpenOptions`]
//! - [`segment`]: Non-owning views into an open mapping
//! - [`manager`]: File pre-sizing and high-level mapping helpers
//! - [`size`]: Human-readable size strings for mapping lengths
//! - [`utils`]: Alignment helpers

#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![deny(missing_docs)]
#![doc(html_root_url = "https://docs.rs/mapfile")]

pub mod errors;
pub mod manager;
pub mod mapped;
pub mod segment;
pub mod size;
pub mod utils;

mod sys;

pub use errors::MapFileError;
pub use manager::{create_file, create_map, delete_file, map_ro, map_rw};
pub use mapped::{MappedFile, OpenMode, OpenOptions};
pub use segment::Segment;
pub use size::{format_size, parse_size};
