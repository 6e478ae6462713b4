use std::os::unix::thread::JoinHandleExt;
use std::thread::JoinHandle;

use crate::error::{HarnessError, OsErrorCode, Result};
use crate::handle::{Handle, ThreadToken};

use super::{crt, MemoryMapper, NativeThreads, RawAllocator};

/// The POSIX capability set: `malloc`, `mmap` and pthreads.
pub struct Posix;

impl RawAllocator for Posix {
    fn allocate(&self, size: usize) -> Result<Handle> {
        crt::malloc(size)
    }

    unsafe fn deallocate(&self, handle: Handle) {
        // SAFETY: guaranteed by caller
        unsafe { crt::free(handle) }
    }
}

impl MemoryMapper for Posix {
    fn page_size(&self) -> usize {
        // SAFETY: sysconf has no preconditions
        let rv = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
        // every POSIX system we care about reports this, 4KiB is the fallback
        if rv <= 0 { 0x1000 } else { rv as usize }
    }

    fn map(&self, size: usize) -> Result<Handle> {
        // SAFETY: anonymous private mapping with no address hint, nothing is aliased
        let ptr = unsafe {
            libc::mmap(
                std::ptr::null_mut(),
                size,
                libc::PROT_READ | libc::PROT_WRITE,
                libc::MAP_PRIVATE | libc::MAP_ANONYMOUS,
                -1,
                0,
            )
        };
        if ptr == libc::MAP_FAILED {
            let err = HarnessError::last_os_error();
            debug!("mmap({size}) failed: {err}");
            return Err(err);
        }
        trace!("mmap({size}) = {ptr:016x?}");
        Ok(Handle::from_ptr(ptr))
    }

    unsafe fn unmap(&self, handle: Handle, size: usize) -> Result<()> {
        // NOTE: `size` goes to munmap verbatim. If it doesn't match the size
        // given to `map`, only part of the region (or a neighbour) is unmapped.
        // SAFETY: guaranteed by caller
        if unsafe { libc::munmap(handle.as_ptr(), size) } == -1 {
            let err = HarnessError::last_os_error();
            debug!("munmap({:016x?}, {size}) failed: {err}", handle.as_ptr());
            return Err(err);
        }
        trace!("munmap({:016x?}, {size})", handle.as_ptr());
        Ok(())
    }
}

impl NativeThreads for Posix {
    fn into_token(&self, thread: JoinHandle<()>) -> ThreadToken {
        ThreadToken::from_raw(thread.into_pthread_t() as usize)
    }

    unsafe fn join(&self, token: ThreadToken) -> std::result::Result<(), OsErrorCode> {
        let thread = token.raw() as libc::pthread_t;
        // SAFETY: the caller guarantees `thread` is joinable, and we own it since `into_pthread_t`
        match unsafe { libc::pthread_join(thread, std::ptr::null_mut()) } {
            0 => Ok(()),
            code => Err(code),
        }
    }
}
