use std::os::windows::io::IntoRawHandle;
use std::thread::JoinHandle;

use windows_sys::Win32::Foundation::{CloseHandle, GetLastError, HANDLE, WAIT_FAILED};
use windows_sys::Win32::System::Threading::{INFINITE, WaitForSingleObject};

use crate::error::{OsErrorCode, Result};
use crate::handle::{Handle, ThreadToken};

use super::{crt, NativeThreads, RawAllocator};

pub mod heap;
pub mod mem_source;

/// The windows capability set: CRT `malloc`, `VirtualAlloc`, `HeapCreate`
/// and native thread handles.
pub struct Windows;

impl RawAllocator for Windows {
    fn allocate(&self, size: usize) -> Result<Handle> {
        crt::malloc(size)
    }

    unsafe fn deallocate(&self, handle: Handle) {
        // SAFETY: guaranteed by caller
        unsafe { crt::free(handle) }
    }
}

impl NativeThreads for Windows {
    fn into_token(&self, thread: JoinHandle<()>) -> ThreadToken {
        let handle: HANDLE = thread.into_raw_handle();
        ThreadToken::from_raw(handle.expose_provenance())
    }

    unsafe fn join(&self, token: ThreadToken) -> std::result::Result<(), OsErrorCode> {
        let handle: HANDLE = std::ptr::with_exposed_provenance_mut(token.raw());

        // SAFETY: the caller guarantees `handle` is an open thread handle that we own
        let waited = unsafe { WaitForSingleObject(handle, INFINITE) };
        let wait_err = (waited == WAIT_FAILED).then(|| unsafe { GetLastError() } as OsErrorCode);

        // the handle gets closed even if the wait failed, otherwise it leaks
        if unsafe { CloseHandle(handle) } == 0 {
            return Err(unsafe { GetLastError() } as OsErrorCode);
        }

        match wait_err {
            Some(code) => Err(code),
            None => Ok(()),
        }
    }
}
