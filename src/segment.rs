//! Non-owning segment views into an open mapped file.
//!
//! A [`Segment`] adopts a sub-range of a mapping whose lifetime is owned
//! elsewhere: dropping the view never releases the mapping, and the borrow
//! keeps the mapping open for as long as the view is alive.

use crate::errors::{MapFileError, Result};
use crate::mapped::MappedFile;

/// Immutable view of `[offset, offset + len)` within a mapping.
///
/// # Examples
///
/// ```no_run
/// use mapfile::{MappedFile, Segment};
///
/// let map = MappedFile::open_ro("data.bin")?;
/// let header = Segment::new(&map, 0, 16)?;
/// assert_eq!(header.as_slice().len(), 16);
/// # Ok::<(), mapfile::MapFileError>(())
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Segment<'a> {
    parent: &'a MappedFile,
    offset: usize,
    len: usize,
}

impl<'a> Segment<'a> {
    /// Create a view over `[offset, offset + len)`. Bounds are validated once
    /// here, against the mapping's current size; a closed mapping has size 0
    /// and admits only empty views at offset 0.
    ///
    /// # Errors
    ///
    /// Returns [`MapFileError::OutOfBounds`] if the range exceeds the mapping.
    pub fn new(parent: &'a MappedFile, offset: usize, len: usize) -> Result<Self> {
        let total = parent.size();
        if offset.checked_add(len).map_or(true, |end| end > total) {
            return Err(MapFileError::OutOfBounds { offset, len, total });
        }
        Ok(Self {
            parent,
            offset,
            len,
        })
    }

    /// The viewed bytes.
    #[must_use]
    pub fn as_slice(&self) -> &'a [u8] {
        &self.parent.as_slice()[self.offset..self.offset + self.len]
    }

    /// Length of the segment.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the segment is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Offset of the segment within the mapping.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// The mapping this segment views.
    #[must_use]
    pub fn parent(&self) -> &MappedFile {
        self.parent
    }
}
