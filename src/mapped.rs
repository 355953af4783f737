//! Core mapped-file abstraction: one file exposed as one contiguous,
//! directly addressable byte region.

use std::fmt;
use std::fs::{File, OpenOptions as FsOpenOptions};
use std::path::Path;
use std::ptr;
use std::slice;

use log::{debug, warn};

use crate::errors::{MapFileError, Result};
use crate::sys;

/// Access mode for a mapped file, fixed for the lifetime of the open mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OpenMode {
    /// Read-only mapping. Never permits writes through the mapped region.
    ReadOnly,
    /// Read-write mapping. Writes become visible to other mappings of the
    /// same file under the OS's standard shared-mapping rules.
    #[default]
    ReadWrite,
}

/// Parameters for [`MappedFile::open`], builder style.
///
/// The defaults are read-write access, whole-file length, offset zero,
/// creation on, and OS-chosen placement.
///
/// # Examples
///
/// ```no_run
/// use mapfile::{OpenMode, OpenOptions};
///
/// // Map the first 4KB of an existing file, read-only.
/// let map = OpenOptions::new()
///     .mode(OpenMode::ReadOnly)
///     .len(4096)
///     .create(false)
///     .open("data.bin")?;
/// assert!(map.size() <= 4096);
/// # Ok::<(), mapfile::MapFileError>(())
/// ```
#[derive(Debug, Clone)]
pub struct OpenOptions {
    mode: OpenMode,
    len: Option<u64>,
    offset: u64,
    create: bool,
    base: Option<*mut u8>,
}

impl OpenOptions {
    /// Start from the defaults described on the type.
    #[must_use]
    pub fn new() -> Self {
        Self {
            mode: OpenMode::ReadWrite,
            len: None,
            offset: 0,
            create: true,
            base: None,
        }
    }

    /// Select read-only or read-write access.
    #[must_use]
    pub fn mode(mut self, mode: OpenMode) -> Self {
        self.mode = mode;
        self
    }

    /// Map exactly `len` bytes instead of the whole file.
    ///
    /// The mapped size is still clamped to what the file actually holds past
    /// `offset` at the time of mapping.
    #[must_use]
    pub fn len(mut self, len: u64) -> Self {
        self.len = Some(len);
        self
    }

    /// Byte offset into the file at which the mapping starts.
    ///
    /// Must be a multiple of [`MappedFile::alignment`]; the OS rejects other
    /// values and the refusal surfaces as [`MapFileError::Mapping`].
    #[must_use]
    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = offset;
        self
    }

    /// Create the file and size it to `offset + len` before mapping.
    ///
    /// On by default. Forced off for read-only mappings, which must never
    /// create or truncate the file. Requires an explicit [`len`](Self::len):
    /// combining creation with an unbounded length has no well-defined target
    /// size and is rejected as [`MapFileError::InvalidOptions`].
    #[must_use]
    pub fn create(mut self, create: bool) -> Self {
        self.create = create;
        self
    }

    /// Request that the mapping be placed at this exact virtual address.
    ///
    /// The OS may refuse, which surfaces as [`MapFileError::Mapping`]; a
    /// mapping is never silently placed elsewhere. An address that is not a
    /// multiple of [`MappedFile::alignment`] is logged as suspicious but not
    /// rejected, since addresses previously handed out by the OS are the
    /// usual source of this argument.
    #[must_use]
    pub fn at(mut self, base: *mut u8) -> Self {
        self.base = Some(base);
        self
    }

    /// Open `path` with these options.
    ///
    /// # Errors
    ///
    /// Returns any error [`MappedFile::open`] can produce.
    pub fn open<P: AsRef<Path>>(&self, path: P) -> Result<MappedFile> {
        let mut mapped = MappedFile::new();
        mapped.open(path, self)?;
        Ok(mapped)
    }
}

impl Default for OpenOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// A disk file exposed as a contiguous byte region.
///
/// An instance owns at most one mapping: the backing file handle, the
/// OS-level mapping resources, the region pointer, and its length. It is
/// created closed, acquires everything in [`open`](Self::open), and releases
/// everything exactly once in [`close`](Self::close) or on drop.
///
/// The type is move-only (a live mapping handle is singular) and neither
/// `Send` nor `Sync`; callers needing concurrent access must serialize
/// externally or use separate instances over the same file.
///
/// # Examples
///
/// ```no_run
/// use mapfile::MappedFile;
///
/// let mut map = MappedFile::create_rw("data.bin", 1024)?;
/// if let Some(bytes) = map.as_mut_slice() {
///     bytes[..5].copy_from_slice(b"hello");
/// }
/// assert!(map.close());
/// # Ok::<(), mapfile::MapFileError>(())
/// ```
pub struct MappedFile {
    data: *mut u8,
    size: usize,
    mode: OpenMode,
    file: Option<File>,
    map: Option<sys::RawMapping>,
}

impl fmt::Debug for MappedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MappedFile")
            .field("open", &self.is_open())
            .field("mode", &self.mode)
            .field("size", &self.size)
            .finish()
    }
}

impl MappedFile {
    /// New instance in the closed state. Holds no resources.
    #[must_use]
    pub fn new() -> Self {
        Self {
            data: ptr::null_mut(),
            size: 0,
            mode: OpenMode::ReadWrite,
            file: None,
            map: None,
        }
    }

    /// Map the whole of an existing file read-only.
    ///
    /// # Errors
    ///
    /// Returns any error [`open`](Self::open) can produce.
    pub fn open_ro<P: AsRef<Path>>(path: P) -> Result<Self> {
        OpenOptions::new()
            .mode(OpenMode::ReadOnly)
            .create(false)
            .open(path)
    }

    /// Map the whole of an existing file read-write.
    ///
    /// # Errors
    ///
    /// Returns any error [`open`](Self::open) can produce.
    pub fn open_rw<P: AsRef<Path>>(path: P) -> Result<Self> {
        OpenOptions::new().create(false).open(path)
    }

    /// Create a file (truncating if it exists), size it to `size` bytes, and
    /// map it read-write.
    ///
    /// # Errors
    ///
    /// Returns any error [`open`](Self::open) can produce.
    pub fn create_rw<P: AsRef<Path>>(path: P, size: u64) -> Result<Self> {
        OpenOptions::new().len(size).open(path)
    }

    /// Open a mapping over `path` with the given options.
    ///
    /// Acquires the file handle, sizes the file when creation was requested,
    /// and establishes the OS mapping. Any failure along the way releases
    /// whatever was acquired earlier and leaves the instance closed.
    ///
    /// # Errors
    ///
    /// - [`MapFileError::AlreadyOpen`] if this instance holds a mapping.
    /// - [`MapFileError::InvalidOptions`] for creation without an explicit
    ///   length, or an `offset + len` that overflows.
    /// - [`MapFileError::FileOpen`] if the file cannot be opened/created.
    /// - [`MapFileError::Resize`] if the file cannot be sized.
    /// - [`MapFileError::SizeQuery`] if the file's size cannot be determined.
    /// - [`MapFileError::Mapping`] if the OS refuses the mapping, including
    ///   refusal to honor a fixed base address.
    pub fn open<P: AsRef<Path>>(&mut self, path: P, opts: &OpenOptions) -> Result<()> {
        self.open_impl(path.as_ref(), opts)
    }

    fn open_impl(&mut self, path: &Path, opts: &OpenOptions) -> Result<()> {
        if self.is_open() {
            return Err(MapFileError::AlreadyOpen);
        }

        let readonly = opts.mode == OpenMode::ReadOnly;
        // A read-only mapping must never create or truncate the file.
        let create = opts.create && !readonly;

        let target_len = if create {
            let len = opts
                .len
                .ok_or(MapFileError::InvalidOptions("create requires an explicit length"))?;
            Some(
                opts.offset
                    .checked_add(len)
                    .ok_or(MapFileError::InvalidOptions("offset + len overflows"))?,
            )
        } else {
            None
        };

        if let Some(base) = opts.base {
            let granularity = sys::granularity();
            if granularity > 0 && (base as usize) % granularity != 0 {
                // Known-permissive: the OS itself hands out bases that fail
                // this check in some configurations, so it is diagnosed
                // rather than enforced.
                warn!(
                    "requested base address {base:p} is not a multiple of the \
                     {granularity}-byte mapping granularity"
                );
            }
        }

        let file = FsOpenOptions::new()
            .read(true)
            .write(!readonly)
            .create(create)
            .truncate(create)
            .open(path)
            .map_err(|e| MapFileError::FileOpen(e.to_string()))?;

        // File handle release on the error paths below is the drop of `file`.
        if let Some(target) = target_len {
            file.set_len(target).map_err(|e| MapFileError::Resize {
                len: target,
                reason: e.to_string(),
            })?;
        }

        let file_len = file
            .metadata()
            .map_err(|e| MapFileError::SizeQuery(e.to_string()))?
            .len();
        let available = file_len.saturating_sub(opts.offset);
        let map_len = opts.len.map_or(available, |len| len.min(available));
        let map_len = usize::try_from(map_len)
            .map_err(|_| MapFileError::Mapping("mapped length exceeds address space".into()))?;
        if map_len == 0 {
            return Err(MapFileError::Mapping(
                "cannot map a zero-length region".into(),
            ));
        }

        let map = sys::RawMapping::establish(&file, map_len, opts.offset, readonly, opts.base)
            .map_err(|e| MapFileError::Mapping(e.to_string()))?;

        debug!(
            "mapped {path:?}: {map_len} bytes at {:p} ({:?})",
            map.as_ptr(),
            opts.mode
        );
        self.data = map.as_ptr();
        self.size = map_len;
        self.mode = opts.mode;
        self.file = Some(file);
        self.map = Some(map);
        Ok(())
    }

    /// Release the mapping and the backing file handle.
    ///
    /// Idempotent: returns `true` immediately when already closed. Otherwise
    /// returns whether the OS release calls succeeded. The instance is reset
    /// to the closed state even when release fails, so a failed unmap never
    /// leaves it claiming to still be open.
    pub fn close(&mut self) -> bool {
        let Some(map) = self.map.take() else {
            return true;
        };
        let ok = match map.release() {
            Ok(()) => true,
            Err(e) => {
                warn!("failed to release mapping: {e}");
                false
            }
        };
        // The file handle is released by drop; handle-close failures are not
        // observable through std and cannot be reported here.
        self.file = None;
        self.data = ptr::null_mut();
        self.size = 0;
        ok
    }

    /// Whether a mapping is currently open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        !self.data.is_null()
    }

    /// Length in bytes of the mapped region; 0 while closed.
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Raw pointer to the start of the mapped region; null while closed.
    ///
    /// Callers dereferencing this must check [`is_open`](Self::is_open)
    /// first and stay within `[data, data + size)`.
    #[must_use]
    pub fn data(&self) -> *mut u8 {
        self.data
    }

    /// The whole mapped region as a byte slice; empty while closed.
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        if self.data.is_null() {
            return &[];
        }
        // SAFETY: data/size describe the live mapping owned by self.
        unsafe { slice::from_raw_parts(self.data, self.size) }
    }

    /// The whole mapped region as a mutable byte slice.
    ///
    /// `None` while closed or when the mapping is read-only.
    pub fn as_mut_slice(&mut self) -> Option<&mut [u8]> {
        if self.data.is_null() || self.mode == OpenMode::ReadOnly {
            return None;
        }
        // SAFETY: live read-write mapping, exclusively borrowed through self.
        Some(unsafe { slice::from_raw_parts_mut(self.data, self.size) })
    }

    /// Current access mode. Meaningful only while open.
    #[must_use]
    pub fn mode(&self) -> OpenMode {
        self.mode
    }

    /// Minimum granularity in bytes to which `offset` and fixed base address
    /// arguments should conform.
    ///
    /// Pure query, safe to call regardless of open state. Page size on Unix,
    /// allocation granularity on Windows; always a power of two.
    #[must_use]
    pub fn alignment() -> usize {
        sys::granularity()
    }
}

impl Default for MappedFile {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for MappedFile {
    fn drop(&mut self) {
        self.close();
    }
}
