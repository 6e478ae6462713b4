use std::mem::MaybeUninit;

use windows_sys::Win32::System::Memory::{MEM_COMMIT, MEM_RELEASE, MEM_RESERVE, PAGE_READWRITE, VirtualAlloc, VirtualFree};
use windows_sys::Win32::System::SystemInformation::{GetSystemInfo, SYSTEM_INFO};

use crate::error::{HarnessError, Result};
use crate::handle::Handle;
use crate::os_dependent::MemoryMapper;

use super::Windows;

impl Windows {
    /// fallback when `GetSystemInfo` reports nothing useful
    const PAGE_SIZE: usize = 0x1000;
}

impl MemoryMapper for Windows {
    fn page_size(&self) -> usize {
        let mut info: MaybeUninit<SYSTEM_INFO> = MaybeUninit::zeroed();
        // SAFETY: GetSystemInfo only writes to `info`, and never fails
        let info = unsafe {
            GetSystemInfo(info.as_mut_ptr());
            info.assume_init()
        };
        match info.dwPageSize as usize {
            0 => Self::PAGE_SIZE,
            size => size,
        }
    }

    fn map(&self, size: usize) -> Result<Handle> {
        // Reserve and commit in one go, the pages come back zeroed
        let ptr = unsafe { VirtualAlloc(std::ptr::null(), size, MEM_RESERVE | MEM_COMMIT, PAGE_READWRITE) };
        if ptr.is_null() {
            let err = HarnessError::last_os_error();
            debug!("VirtualAlloc({size}) failed: {err}");
            return Err(err);
        }
        trace!("VirtualAlloc({size}) = {ptr:016x?}");
        Ok(Handle::from_ptr(ptr))
    }

    unsafe fn unmap(&self, handle: Handle, size: usize) -> Result<()> {
        // NOTE: MEM_RELEASE requires a size of zero and always frees the whole
        // reservation, so the caller's `size` is deliberately unused here.
        let _ = size;
        // SAFETY: guaranteed by caller
        if unsafe { VirtualFree(handle.as_ptr(), 0, MEM_RELEASE) } == 0 {
            let err = HarnessError::last_os_error();
            debug!("VirtualFree({:016x?}) failed: {err}", handle.as_ptr());
            return Err(err);
        }
        trace!("VirtualFree({:016x?})", handle.as_ptr());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unmap_ignores_size() {
        let page = Windows.page_size();
        let region = Windows.map(page * 4).unwrap();
        // a wrong size still releases the entire reservation on windows
        unsafe { Windows.unmap(region, 1) }.unwrap();
    }

    #[test]
    fn unmap_of_unknown_address_reports_error() {
        let page = Windows.page_size();
        let region = Windows.map(page).unwrap();
        let inside = Handle::from_addr(region.addr() + 8);

        // MEM_RELEASE needs the base address of the reservation
        assert!(matches!(unsafe { Windows.unmap(inside, 0) }, Err(HarnessError::ResourceError { .. })));

        unsafe { Windows.unmap(region, page) }.unwrap();
    }
}
