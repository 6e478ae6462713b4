//! A known-positive leak for detectors to find.

use crate::error::{HarnessError, Result};

/// Allocates a container of `count` elements and drops the only reference to
/// it without freeing. Every element is written so its pages are actually
/// committed and show up in RSS, not just in the address space.
pub fn leak(count: usize) -> Result<()> {
    let mut container: Vec<usize> = Vec::new();
    container.try_reserve_exact(count).map_err(|_| HarnessError::OutOfMemory)?;
    container.extend(0..count);

    let leaked: &'static mut [usize] = container.leak();
    trace!("leaked {count} elements at {:016x?}", leaked.as_ptr());
    Ok(())
}
