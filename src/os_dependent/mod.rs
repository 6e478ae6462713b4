//! The capability sets each platform provides.
//!
//! Exactly one [`Platform`] is compiled in: [`Posix`](unix::Posix) on unix,
//! [`Windows`](windows::Windows) on windows. Only the windows set implements
//! [`PrivateHeaps`].

use std::thread::JoinHandle;

use crate::error::{OsErrorCode, Result};
use crate::handle::{Handle, ThreadToken};

mod crt;

#[cfg(unix)]
pub mod unix;
#[cfg(windows)]
pub mod windows;

#[cfg(unix)]
pub use unix::Posix as Platform;
#[cfg(windows)]
pub use windows::Windows as Platform;

pub static PLATFORM: Platform = Platform;

/// `{allocate, deallocate}` against the process default allocator.
pub trait RawAllocator {
    fn allocate(&self, size: usize) -> Result<Handle>;

    /// # Safety
    /// `handle` must come from [`RawAllocator::allocate`] and not have been freed.
    unsafe fn deallocate(&self, handle: Handle);
}

/// `{map, unmap}` of anonymous memory straight from the OS.
pub trait MemoryMapper {
    fn page_size(&self) -> usize;

    fn map(&self, size: usize) -> Result<Handle>;

    /// # Safety
    /// `handle` must come from [`MemoryMapper::map`] and not have been unmapped.
    /// Whether `size` is honoured is up to the platform.
    unsafe fn unmap(&self, handle: Handle, size: usize) -> Result<()>;
}

/// `{create_heap, destroy_heap, heap_allocate, heap_deallocate}` on isolated
/// OS heaps, plus the same allocation pair against the process heap.
pub trait PrivateHeaps {
    fn create_heap(&self, initial_size: usize, max_size: usize) -> Result<Handle>;

    /// # Safety
    /// `heap` must be a live heap from [`PrivateHeaps::create_heap`]. Every
    /// allocation from it dangles afterwards.
    unsafe fn destroy_heap(&self, heap: Handle) -> Result<()>;

    /// # Safety
    /// `heap` must be a live heap from [`PrivateHeaps::create_heap`].
    unsafe fn heap_allocate(&self, heap: Handle, size: usize) -> Result<Handle>;

    /// # Safety
    /// `handle` must be a live allocation owned by `heap`.
    unsafe fn heap_deallocate(&self, heap: Handle, handle: Handle) -> Result<()>;

    fn process_heap_allocate(&self, size: usize) -> Result<Handle>;

    /// # Safety
    /// `handle` must be a live allocation from [`PrivateHeaps::process_heap_allocate`].
    unsafe fn process_heap_deallocate(&self, handle: Handle) -> Result<()>;
}

/// Converting spawned threads to native tokens and joining them.
pub trait NativeThreads {
    /// Takes ownership of the native thread behind `thread`.
    fn into_token(&self, thread: JoinHandle<()>) -> ThreadToken;

    /// Blocks until the thread exits, then releases its OS resources.
    ///
    /// # Safety
    /// `token` must come from [`NativeThreads::into_token`] and not have been joined.
    unsafe fn join(&self, token: ThreadToken) -> std::result::Result<(), OsErrorCode>;
}
