//! Address-sized handles for native resources.
//!
//! A [`Handle`] is just the native address (or OS descriptor) as a `usize`.
//! It carries no record of where it came from, so passing it to the wrong
//! deallocate operation is undefined behaviour. [`TaggedHandle`] pairs a
//! handle with its [`Category`] for callers that want that misuse caught.

use std::ffi::c_void;
use std::fmt;

use crate::error::{HarnessError, Result};

#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Handle(usize);

impl Handle {
    pub const fn from_addr(addr: usize) -> Self {
        Self(addr)
    }

    pub fn from_ptr<T>(ptr: *mut T) -> Self {
        Self(ptr.expose_provenance())
    }

    pub const fn addr(self) -> usize {
        self.0
    }

    pub fn as_ptr(self) -> *mut c_void {
        std::ptr::with_exposed_provenance_mut(self.0)
    }

    pub const fn is_null(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle({:#x})", self.0)
    }
}

impl From<Handle> for usize {
    fn from(handle: Handle) -> usize {
        handle.0
    }
}

impl TryFrom<i128> for Handle {
    type Error = HarnessError;

    /// Decodes a foreign integer (e.g. a scripting-language int) into a handle.
    /// Negative values and values wider than a pointer are rejected.
    fn try_from(value: i128) -> Result<Self> {
        usize::try_from(value).map(Handle).map_err(|_| HarnessError::InvalidHandle)
    }
}

impl TryFrom<i64> for Handle {
    type Error = HarnessError;

    fn try_from(value: i64) -> Result<Self> {
        Handle::try_from(i128::from(value))
    }
}

impl TryFrom<u64> for Handle {
    type Error = HarnessError;

    fn try_from(value: u64) -> Result<Self> {
        Handle::try_from(i128::from(value))
    }
}

/// Identifies a thread started by a [`ThreadController`](crate::thread::ThreadController).
///
/// The value is the native thread handle (`pthread_t` or a Win32 `HANDLE`).
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ThreadToken(usize);

impl ThreadToken {
    pub(crate) const fn from_raw(raw: usize) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> usize {
        self.0
    }
}

impl fmt::Debug for ThreadToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ThreadToken({:#x})", self.0)
    }
}

/// The kind of operation that produced a handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// `allocate`
    Raw,
    /// `map`
    Mapping,
    /// `create_heap`
    Heap,
    /// `heap_allocate`
    HeapBlock,
    /// `process_heap_allocate`
    ProcessHeapBlock,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaggedHandle {
    handle: Handle,
    category: Category,
}

impl TaggedHandle {
    pub const fn new(handle: Handle, category: Category) -> Self {
        Self { handle, category }
    }

    pub const fn handle(self) -> Handle {
        self.handle
    }

    pub const fn category(self) -> Category {
        self.category
    }

    /// Returns the untagged handle if it was produced by `category`.
    pub fn expect(self, category: Category) -> Result<Handle> {
        if self.category == category {
            Ok(self.handle)
        } else {
            Err(HarnessError::WrongCategory { expected: category, found: self.category })
        }
    }
}
