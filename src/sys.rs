//! Build-time selection of the platform mapping backend.
//!
//! Both backends expose the same surface: [`RawMapping::establish`] maps a
//! range of an open file (honoring mode, offset, and an optional fixed base
//! address), [`RawMapping::release`] tears it down exactly once, and
//! [`granularity`] reports the minimum alignment the platform requires for
//! offsets and base addresses. Client code above this module contains no
//! platform conditionals.

cfg_if::cfg_if! {
    if #[cfg(windows)] {
        mod windows;
        pub(crate) use self::windows::{granularity, RawMapping};
    } else {
        mod unix;
        pub(crate) use self::unix::{granularity, RawMapping};
    }
}
