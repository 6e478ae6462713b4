use crate::error::{HarnessError, Result};
use crate::handle::Handle;

// NOTE: a null return for `size == 0` is reported as out of memory too. Some C
// runtimes do that, and it is their zero-size policy to surface, not ours.
pub(super) fn malloc(size: usize) -> Result<Handle> {
    // SAFETY: malloc has no preconditions
    let ptr = unsafe { libc::malloc(size) };
    if ptr.is_null() {
        debug!("malloc({size}) returned null");
        return Err(HarnessError::OutOfMemory);
    }
    trace!("malloc({size}) = {ptr:016x?}");
    Ok(Handle::from_ptr(ptr))
}

/// SAFETY: `handle` must be null or a live pointer from [`malloc`].
pub(super) unsafe fn free(handle: Handle) {
    trace!("free({:016x?})", handle.as_ptr());
    unsafe { libc::free(handle.as_ptr()) }
}
