use core::alloc::Layout;
use core::cell::Cell;
use core::ptr::NonNull;

use crate::{AllocError, Allocator};

/// Counters shared by every copy of a [`Tracked`] allocator.
#[derive(Debug, Default)]
pub struct AllocStats {
    allocations: Cell<usize>,
    frees: Cell<usize>,
    live_bytes: Cell<usize>,
}

impl AllocStats {
    pub const fn new() -> Self {
        AllocStats {
            allocations: Cell::new(0),
            frees: Cell::new(0),
            live_bytes: Cell::new(0),
        }
    }

    pub fn allocations(&self) -> usize {
        self.allocations.get()
    }

    pub fn frees(&self) -> usize {
        self.frees.get()
    }

    pub fn live_blocks(&self) -> usize {
        self.allocations.get() - self.frees.get()
    }

    pub fn live_bytes(&self) -> usize {
        self.live_bytes.get()
    }
}

/// Wraps an allocator and records every allocation and free in an
/// [`AllocStats`].
#[derive(Debug, Copy, Clone)]
pub struct Tracked<'s, A> {
    inner: A,
    stats: &'s AllocStats,
}

impl<'s, A> Tracked<'s, A> {
    pub fn new(inner: A, stats: &'s AllocStats) -> Self {
        Tracked { inner, stats }
    }

    pub fn stats(&self) -> &'s AllocStats {
        self.stats
    }

    pub fn inner(&self) -> &A {
        &self.inner
    }
}

unsafe impl<A: Allocator> Allocator for Tracked<'_, A> {
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        let ptr = self.inner.allocate(layout)?;

        let stats = self.stats;
        stats.allocations.set(stats.allocations.get() + 1);
        stats.live_bytes.set(stats.live_bytes.get() + layout.size());

        Ok(ptr)
    }

    unsafe fn free(&self, ptr: NonNull<u8>, layout: Layout) {
        let stats = self.stats;
        stats.frees.set(stats.frees.get() + 1);
        stats.live_bytes.set(stats.live_bytes.get() - layout.size());

        // SAFETY: forwarded contract
        unsafe { self.inner.free(ptr, layout) }
    }
}
