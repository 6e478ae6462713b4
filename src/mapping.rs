//! Anonymous virtual memory mappings.
//!
//! A mapped region is identified by `(handle, size)`, but only the handle is
//! returned: callers keep the size themselves and hand it back to [`unmap`].
//! On unix that size is used as-is. On windows it is ignored and the whole
//! reservation is released. Both behaviours are kept, since tooling under test
//! may rely on seeing the native one.

use crate::error::Result;
use crate::handle::Handle;
use crate::os_dependent::{MemoryMapper, PLATFORM};

/// Maps `size` bytes of zeroed, read-write memory directly from the OS.
pub fn map(size: usize) -> Result<Handle> {
    PLATFORM.map(size)
}

/// Releases a mapping made by [`map`].
///
/// # Safety
/// `handle` must come from [`map`] and not have been unmapped. On unix a
/// `size` different from the one given to [`map`] unmaps the wrong range.
pub unsafe fn unmap(handle: Handle, size: usize) -> Result<()> {
    // SAFETY: guaranteed by caller
    unsafe { PLATFORM.unmap(handle, size) }
}

/// The granularity mappings are made in.
pub fn page_size() -> usize {
    PLATFORM.page_size()
}
