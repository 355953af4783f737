//! POSIX mapping backend (`mmap`/`munmap`).

use std::fs::File;
use std::io;
use std::os::unix::io::AsRawFd;
use std::ptr;

/// An established `mmap` region over an open file descriptor.
///
/// The region stays valid until [`release`](RawMapping::release) consumes the
/// handle; the owning type is responsible for calling it exactly once.
pub(crate) struct RawMapping {
    ptr: *mut u8,
    len: usize,
}

impl RawMapping {
    /// Map `len` bytes of `file` starting at `offset`.
    ///
    /// When `base` is supplied it is passed to the kernel as a placement
    /// request. The kernel treats it as a hint, so a mapping that lands
    /// anywhere else is torn down and reported as an error rather than
    /// returned at the wrong address.
    #[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
    pub(crate) fn establish(
        file: &File,
        len: usize,
        offset: u64,
        readonly: bool,
        base: Option<*mut u8>,
    ) -> io::Result<Self> {
        let prot = if readonly {
            libc::PROT_READ
        } else {
            libc::PROT_READ | libc::PROT_WRITE
        };
        let addr = base.unwrap_or(ptr::null_mut());

        // SAFETY: the fd is a valid open descriptor for the lifetime of this
        // call, and addr is either null or a caller-supplied placement request
        // the kernel is free to honor or ignore.
        let data = unsafe {
            libc::mmap(
                addr.cast::<libc::c_void>(),
                len,
                prot,
                libc::MAP_SHARED,
                file.as_raw_fd(),
                offset as libc::off_t,
            )
        };
        if data == libc::MAP_FAILED {
            return Err(io::Error::last_os_error());
        }

        let ptr = data.cast::<u8>();
        if let Some(requested) = base {
            if ptr != requested {
                // SAFETY: data is the live region mmap just returned.
                unsafe { libc::munmap(data, len) };
                return Err(io::Error::new(
                    io::ErrorKind::AddrNotAvailable,
                    format!("mapping placed at {ptr:p} instead of requested {requested:p}"),
                ));
            }
        }
        Ok(Self { ptr, len })
    }

    /// Start of the mapped region.
    pub(crate) fn as_ptr(&self) -> *mut u8 {
        self.ptr
    }

    /// Unmap the region. Consumes the handle so release happens exactly once.
    pub(crate) fn release(self) -> io::Result<()> {
        // SAFETY: ptr/len describe the region returned by mmap in establish,
        // and consuming self guarantees no second munmap.
        let rc = unsafe { libc::munmap(self.ptr.cast::<libc::c_void>(), self.len) };
        if rc != 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }
}

/// Minimum alignment for mapping offsets and requested base addresses.
#[allow(clippy::cast_sign_loss)]
pub(crate) fn granularity() -> usize {
    // SAFETY: sysconf with _SC_PAGESIZE is safe to call.
    unsafe { libc::sysconf(libc::_SC_PAGESIZE).max(0) as usize }
}
