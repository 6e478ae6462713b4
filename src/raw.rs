//! Raw allocations from the process default allocator.

use crate::error::Result;
use crate::handle::Handle;
use crate::os_dependent::{PLATFORM, RawAllocator};

/// Requests `size` bytes from the C runtime allocator.
///
/// `size == 0` is passed through untouched, so the result follows whatever
/// the platform's `malloc(0)` does.
pub fn allocate(size: usize) -> Result<Handle> {
    PLATFORM.allocate(size)
}

/// Releases an allocation made by [`allocate`].
///
/// # Safety
/// `handle` must be null or come from [`allocate`] and not have been released.
/// Nothing checks this: a handle from another category, or a double free, is
/// handed straight to `free`.
pub unsafe fn deallocate(handle: Handle) {
    // SAFETY: guaranteed by caller
    unsafe { PLATFORM.deallocate(handle) }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn allocation_is_writable() {
        let handle = allocate(64).unwrap();
        assert!(!handle.is_null());

        let bytes = handle.as_ptr().cast::<u8>();
        unsafe {
            bytes.write_bytes(0xAB, 64);
            assert_eq!(*bytes.add(63), 0xAB);
            deallocate(handle);
        }
    }

    #[test]
    fn zero_size_is_delegated() {
        // glibc, musl, the BSDs and the windows CRT all hand out a unique pointer here
        if let Ok(handle) = allocate(0) {
            unsafe { deallocate(handle) }
        }
    }

    #[test]
    fn null_deallocate_is_a_no_op() {
        unsafe { deallocate(Handle::from_addr(0)) }
    }

    #[test]
    fn absurd_size_is_out_of_memory() {
        assert!(matches!(allocate(usize::MAX), Err(crate::HarnessError::OutOfMemory)));
    }

    proptest! {
        #[test]
        fn allocate_then_deallocate(size in 1usize..(1 << 20)) {
            let handle = allocate(size).unwrap();
            prop_assert!(!handle.is_null());
            unsafe { deallocate(handle) }
        }
    }
}
