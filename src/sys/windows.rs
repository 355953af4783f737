//! Win32 mapping backend (`CreateFileMapping`/`MapViewOfFileEx`).

use std::fs::File;
use std::io;
use std::os::windows::io::AsRawHandle;
use std::ptr;

type Handle = *mut core::ffi::c_void;

const PAGE_READONLY: u32 = 0x02;
const PAGE_READWRITE: u32 = 0x04;
const FILE_MAP_WRITE: u32 = 0x0002;
const FILE_MAP_READ: u32 = 0x0004;

#[allow(non_snake_case)]
#[repr(C)]
struct SYSTEM_INFO {
    wProcessorArchitecture: u16,
    wReserved: u16,
    dwPageSize: u32,
    lpMinimumApplicationAddress: *mut core::ffi::c_void,
    lpMaximumApplicationAddress: *mut core::ffi::c_void,
    dwActiveProcessorMask: usize,
    dwNumberOfProcessors: u32,
    dwProcessorType: u32,
    dwAllocationGranularity: u32,
    wProcessorLevel: u16,
    wProcessorRevision: u16,
}

extern "system" {
    fn CreateFileMappingW(
        hFile: Handle,
        lpFileMappingAttributes: *mut core::ffi::c_void,
        flProtect: u32,
        dwMaximumSizeHigh: u32,
        dwMaximumSizeLow: u32,
        lpName: *const u16,
    ) -> Handle;

    fn MapViewOfFileEx(
        hFileMappingObject: Handle,
        dwDesiredAccess: u32,
        dwFileOffsetHigh: u32,
        dwFileOffsetLow: u32,
        dwNumberOfBytesToMap: usize,
        lpBaseAddress: *mut core::ffi::c_void,
    ) -> *mut core::ffi::c_void;

    fn UnmapViewOfFile(lpBaseAddress: *const core::ffi::c_void) -> i32;

    fn CloseHandle(hObject: Handle) -> i32;

    fn GetSystemInfo(lpSystemInfo: *mut SYSTEM_INFO);
}

/// An established view of a file mapping object.
///
/// Holds the second OS handle this platform requires (the mapping object)
/// alongside the view pointer; both are released together, exactly once, by
/// [`release`](RawMapping::release).
pub(crate) struct RawMapping {
    ptr: *mut u8,
    mapping: Handle,
}

impl RawMapping {
    /// Map `len` bytes of `file` starting at `offset`.
    ///
    /// When `base` is supplied, `MapViewOfFileEx` either places the view at
    /// exactly that address or fails; there is no silent relocation to check
    /// for on this platform.
    #[allow(clippy::cast_possible_truncation)]
    pub(crate) fn establish(
        file: &File,
        len: usize,
        offset: u64,
        readonly: bool,
        base: Option<*mut u8>,
    ) -> io::Result<Self> {
        let protect = if readonly { PAGE_READONLY } else { PAGE_READWRITE };

        // SAFETY: the file handle is valid; an unnamed mapping object sized to
        // the current file length (0, 0) is requested.
        let mapping = unsafe {
            CreateFileMappingW(
                file.as_raw_handle(),
                ptr::null_mut(),
                protect,
                0,
                0,
                ptr::null(),
            )
        };
        if mapping.is_null() {
            return Err(io::Error::last_os_error());
        }

        let access = if readonly { FILE_MAP_READ } else { FILE_MAP_WRITE };
        let addr = base.map_or(ptr::null_mut(), |b| b.cast::<core::ffi::c_void>());

        // SAFETY: mapping is the handle created above; offset is split into
        // the high/low DWORD pair the API expects.
        let data = unsafe {
            MapViewOfFileEx(
                mapping,
                access,
                (offset >> 32) as u32,
                (offset & 0xffff_ffff) as u32,
                len,
                addr,
            )
        };
        if data.is_null() {
            let err = io::Error::last_os_error();
            // SAFETY: mapping was created above and is not yet owned.
            unsafe { CloseHandle(mapping) };
            return Err(err);
        }

        Ok(Self {
            ptr: data.cast::<u8>(),
            mapping,
        })
    }

    /// Start of the mapped view.
    pub(crate) fn as_ptr(&self) -> *mut u8 {
        self.ptr
    }

    /// Unmap the view and close the mapping object. Consumes the handle so
    /// release happens exactly once.
    pub(crate) fn release(self) -> io::Result<()> {
        // SAFETY: ptr is the base of the view established above; mapping is
        // the handle it was created from. Consuming self prevents reuse.
        let unmapped = unsafe { UnmapViewOfFile(self.ptr.cast::<core::ffi::c_void>()) } != 0;
        let err = io::Error::last_os_error();
        let closed = unsafe { CloseHandle(self.mapping) } != 0;
        if !unmapped {
            return Err(err);
        }
        if !closed {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }
}

/// Minimum alignment for mapping offsets and requested base addresses.
///
/// This is the allocation granularity (commonly 64KB), not the page size.
pub(crate) fn granularity() -> usize {
    use std::mem::MaybeUninit;

    let mut sysinfo = MaybeUninit::<SYSTEM_INFO>::uninit();
    // SAFETY: GetSystemInfo fills the struct and cannot fail.
    unsafe {
        GetSystemInfo(sysinfo.as_mut_ptr());
        sysinfo.assume_init().dwAllocationGranularity as usize
    }
}
