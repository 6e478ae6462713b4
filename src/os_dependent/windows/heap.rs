use windows_sys::Win32::Foundation::HANDLE;
use windows_sys::Win32::System::Memory::{GetProcessHeap, HEAP_NO_SERIALIZE, HeapAlloc, HeapCreate, HeapDestroy, HeapFree};

use crate::error::{HarnessError, Result};
use crate::handle::Handle;
use crate::os_dependent::PrivateHeaps;

use super::Windows;

fn heap_handle(heap: Handle) -> HANDLE {
    heap.as_ptr()
}

/// The process default heap. Never null once the process is running.
fn process_heap() -> Result<HANDLE> {
    let heap = unsafe { GetProcessHeap() };
    if heap.is_null() {
        return Err(HarnessError::last_os_error());
    }
    Ok(heap)
}

/// SAFETY: `heap` must be a live heap handle
unsafe fn alloc_from(heap: HANDLE, size: usize) -> Result<Handle> {
    let ptr = unsafe { HeapAlloc(heap, 0, size) };
    if ptr.is_null() {
        debug!("HeapAlloc({heap:016x?}, {size}) returned null");
        return Err(HarnessError::OutOfMemory);
    }
    trace!("HeapAlloc({heap:016x?}, {size}) = {ptr:016x?}");
    Ok(Handle::from_ptr(ptr))
}

/// SAFETY: `block` must be a live allocation owned by `heap`
unsafe fn free_to(heap: HANDLE, block: Handle) -> Result<()> {
    if block.is_null() {
        return Err(HarnessError::InvalidHandle);
    }
    if unsafe { HeapFree(heap, 0, block.as_ptr()) } == 0 {
        debug!("HeapFree({heap:016x?}, {:016x?}) failed: {}", block.as_ptr(), HarnessError::last_os_error());
        return Err(HarnessError::InvalidHandle);
    }
    trace!("HeapFree({heap:016x?}, {:016x?})", block.as_ptr());
    Ok(())
}

impl PrivateHeaps for Windows {
    fn create_heap(&self, initial_size: usize, max_size: usize) -> Result<Handle> {
        // `max_size == 0` makes the heap growable, anything else is a hard ceiling
        let heap = unsafe { HeapCreate(HEAP_NO_SERIALIZE, initial_size, max_size) };
        if heap.is_null() {
            let err = HarnessError::last_os_error();
            debug!("HeapCreate({initial_size}, {max_size}) failed: {err}");
            return Err(err);
        }
        trace!("HeapCreate({initial_size}, {max_size}) = {heap:016x?}");
        Ok(Handle::from_ptr(heap))
    }

    unsafe fn destroy_heap(&self, heap: Handle) -> Result<()> {
        // NOTE: every block still allocated from `heap` is gone after this
        if unsafe { HeapDestroy(heap_handle(heap)) } == 0 {
            let err = HarnessError::last_os_error();
            debug!("HeapDestroy({:016x?}) failed: {err}", heap.as_ptr());
            return Err(err);
        }
        trace!("HeapDestroy({:016x?})", heap.as_ptr());
        Ok(())
    }

    unsafe fn heap_allocate(&self, heap: Handle, size: usize) -> Result<Handle> {
        // SAFETY: guaranteed by caller
        unsafe { alloc_from(heap_handle(heap), size) }
    }

    unsafe fn heap_deallocate(&self, heap: Handle, handle: Handle) -> Result<()> {
        // SAFETY: guaranteed by caller
        unsafe { free_to(heap_handle(heap), handle) }
    }

    fn process_heap_allocate(&self, size: usize) -> Result<Handle> {
        // SAFETY: the process heap lives as long as the process
        unsafe { alloc_from(process_heap()?, size) }
    }

    unsafe fn process_heap_deallocate(&self, handle: Handle) -> Result<()> {
        // SAFETY: guaranteed by caller
        unsafe { free_to(process_heap()?, handle) }
    }
}
