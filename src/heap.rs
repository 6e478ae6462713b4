//! Private OS heaps (windows only).
//!
//! A heap is created with [`create_heap`], allocated from with
//! [`heap_allocate`], and torn down with [`destroy_heap`], which also frees
//! anything still allocated from it. The process heap pair is here too.

use crate::error::Result;
use crate::handle::Handle;
use crate::os_dependent::{PLATFORM, PrivateHeaps};

/// Creates an isolated heap. A `max_size` of zero lets it grow without bound.
pub fn create_heap(initial_size: usize, max_size: usize) -> Result<Handle> {
    PLATFORM.create_heap(initial_size, max_size)
}

/// # Safety
/// `heap` must be a live heap from [`create_heap`]. Every handle
/// [`heap_allocate`] returned for it dangles once this succeeds.
pub unsafe fn destroy_heap(heap: Handle) -> Result<()> {
    // SAFETY: guaranteed by caller
    unsafe { PLATFORM.destroy_heap(heap) }
}

/// # Safety
/// `heap` must be a live heap from [`create_heap`].
pub unsafe fn heap_allocate(heap: Handle, size: usize) -> Result<Handle> {
    // SAFETY: guaranteed by caller
    unsafe { PLATFORM.heap_allocate(heap, size) }
}

/// # Safety
/// `handle` must be a live allocation from `heap`.
pub unsafe fn heap_deallocate(heap: Handle, handle: Handle) -> Result<()> {
    // SAFETY: guaranteed by caller
    unsafe { PLATFORM.heap_deallocate(heap, handle) }
}

pub fn process_heap_allocate(size: usize) -> Result<Handle> {
    PLATFORM.process_heap_allocate(size)
}

/// # Safety
/// `handle` must be a live allocation from [`process_heap_allocate`].
pub unsafe fn process_heap_deallocate(handle: Handle) -> Result<()> {
    // SAFETY: guaranteed by caller
    unsafe { PLATFORM.process_heap_deallocate(handle) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heap_lifecycle() {
        let heap = create_heap(0x1000, 0).unwrap();
        unsafe {
            let a = heap_allocate(heap, 128).unwrap();
            let b = heap_allocate(heap, 4096).unwrap();
            assert_ne!(a, b);
            heap_deallocate(heap, a).unwrap();
            // `b` is left for destroy_heap to reclaim
            destroy_heap(heap).unwrap();
        }
    }

    #[test]
    fn destroying_null_heap_reports_os_error() {
        match unsafe { destroy_heap(Handle::from_addr(0)) } {
            Err(err @ crate::HarnessError::ResourceError { .. }) => assert!(err.os_error().is_some()),
            other => panic!("unexpected {other:?}"),
        }
    }
}
