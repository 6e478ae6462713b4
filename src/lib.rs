//! Native resources on demand, for exercising leak detectors.
//!
//! Every operation here is a thin wrapper over one OS or C runtime primitive:
//! `malloc`/`free`, anonymous mappings, private heaps (windows) and bare OS
//! threads, plus [`leak`], which leaks on purpose. Handles are plain
//! address-sized integers and nothing keeps track of them, so releasing the
//! wrong thing is exactly as undefined as it is in C. The [`checked`] module
//! tags handles with their origin for callers that want cross-category misuse
//! rejected.

#![deny(unsafe_op_in_unsafe_fn)]

#[macro_use]
extern crate log;

pub mod config;
pub mod error;
pub mod handle;
pub mod logging;
pub mod os_dependent;

// resource primitives
pub mod raw;
pub mod mapping;
#[cfg(windows)]
pub mod heap;
pub mod thread;
pub mod leak;

pub mod checked;

pub use config::HarnessConfig;
pub use error::{HarnessError, OsErrorCode, Result};
pub use handle::{Category, Handle, TaggedHandle, ThreadToken};
pub use leak::leak;
pub use thread::{ThreadController, ThreadState};
