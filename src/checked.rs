//! The same operations, on [`TaggedHandle`]s.
//!
//! Every allocate-family call tags its handle with the [`Category`] that made
//! it, and every deallocate-family call refuses a handle from another category
//! with [`WrongCategory`](crate::HarnessError::WrongCategory) before touching
//! the OS. Double frees and stale handles are still not caught, which is why
//! the release functions stay `unsafe`.

use crate::error::Result;
use crate::handle::{Category, TaggedHandle};
#[cfg(windows)]
use crate::heap;
use crate::{mapping, raw};

pub fn allocate(size: usize) -> Result<TaggedHandle> {
    raw::allocate(size).map(|h| TaggedHandle::new(h, Category::Raw))
}

/// # Safety
/// See [`raw::deallocate`].
pub unsafe fn deallocate(handle: TaggedHandle) -> Result<()> {
    let handle = handle.expect(Category::Raw)?;
    // SAFETY: guaranteed by caller
    unsafe { raw::deallocate(handle) };
    Ok(())
}

pub fn map(size: usize) -> Result<TaggedHandle> {
    mapping::map(size).map(|h| TaggedHandle::new(h, Category::Mapping))
}

/// # Safety
/// See [`mapping::unmap`].
pub unsafe fn unmap(handle: TaggedHandle, size: usize) -> Result<()> {
    let handle = handle.expect(Category::Mapping)?;
    // SAFETY: guaranteed by caller
    unsafe { mapping::unmap(handle, size) }
}

#[cfg(windows)]
pub fn create_heap(initial_size: usize, max_size: usize) -> Result<TaggedHandle> {
    heap::create_heap(initial_size, max_size).map(|h| TaggedHandle::new(h, Category::Heap))
}

/// # Safety
/// See [`heap::destroy_heap`].
#[cfg(windows)]
pub unsafe fn destroy_heap(heap: TaggedHandle) -> Result<()> {
    let heap = heap.expect(Category::Heap)?;
    // SAFETY: guaranteed by caller
    unsafe { heap::destroy_heap(heap) }
}

/// # Safety
/// See [`heap::heap_allocate`].
#[cfg(windows)]
pub unsafe fn heap_allocate(heap: TaggedHandle, size: usize) -> Result<TaggedHandle> {
    let heap = heap.expect(Category::Heap)?;
    // SAFETY: guaranteed by caller
    unsafe { heap::heap_allocate(heap, size) }.map(|h| TaggedHandle::new(h, Category::HeapBlock))
}

/// # Safety
/// See [`heap::heap_deallocate`].
#[cfg(windows)]
pub unsafe fn heap_deallocate(heap: TaggedHandle, handle: TaggedHandle) -> Result<()> {
    let heap = heap.expect(Category::Heap)?;
    let handle = handle.expect(Category::HeapBlock)?;
    // SAFETY: guaranteed by caller
    unsafe { heap::heap_deallocate(heap, handle) }
}

#[cfg(windows)]
pub fn process_heap_allocate(size: usize) -> Result<TaggedHandle> {
    heap::process_heap_allocate(size).map(|h| TaggedHandle::new(h, Category::ProcessHeapBlock))
}

/// # Safety
/// See [`heap::process_heap_deallocate`].
#[cfg(windows)]
pub unsafe fn process_heap_deallocate(handle: TaggedHandle) -> Result<()> {
    let handle = handle.expect(Category::ProcessHeapBlock)?;
    // SAFETY: guaranteed by caller
    unsafe { heap::process_heap_deallocate(handle) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HarnessError;

    #[test]
    fn matching_categories_round_trip() {
        let block = allocate(32).unwrap();
        assert_eq!(block.category(), Category::Raw);
        unsafe { deallocate(block) }.unwrap();

        let size = mapping::page_size();
        let region = map(size).unwrap();
        assert_eq!(region.category(), Category::Mapping);
        unsafe { unmap(region, size) }.unwrap();
    }

    #[test]
    fn cross_category_free_is_rejected() {
        let size = mapping::page_size();
        let region = map(size).unwrap();

        // freeing a mapping with `free` would be UB, checked mode stops it
        match unsafe { deallocate(region) } {
            Err(HarnessError::WrongCategory { expected: Category::Raw, found: Category::Mapping }) => {}
            other => panic!("unexpected {other:?}"),
        }

        let block = allocate(16).unwrap();
        assert!(matches!(unsafe { unmap(block, size) }, Err(HarnessError::WrongCategory { .. })));

        // both are still live and can be released properly
        unsafe {
            unmap(region, size).unwrap();
            deallocate(block).unwrap();
        }
    }

    #[cfg(windows)]
    #[test]
    fn heap_blocks_need_a_heap_handle() {
        let heap = create_heap(0, 0).unwrap();
        let block = unsafe { heap_allocate(heap, 64) }.unwrap();

        // arguments swapped
        assert!(matches!(unsafe { heap_deallocate(block, heap) }, Err(HarnessError::WrongCategory { .. })));
        // a heap block is not a process heap block
        assert!(matches!(unsafe { process_heap_deallocate(block) }, Err(HarnessError::WrongCategory { .. })));

        unsafe {
            heap_deallocate(heap, block).unwrap();
            destroy_heap(heap).unwrap();
        }
    }
}
