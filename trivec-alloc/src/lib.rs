#![no_std]

//! The allocator capability consumed by `trivec` buffers, plus a few
//! providers: the global heap, a bump arena over caller-owned storage, and
//! an accounting wrapper.

#[cfg(feature = "alloc")]
extern crate alloc;

use core::alloc::Layout;
use core::ptr::NonNull;

use thiserror::Error;

pub mod arena;
#[cfg(feature = "alloc")]
pub mod heap;
pub mod tracked;

pub use arena::{FixedBuffer, LinearArena};
#[cfg(feature = "alloc")]
pub use heap::HeapAllocator;
pub use tracked::{AllocStats, Tracked};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Error)]
pub enum AllocError {
    #[error("allocation failed, requested {requested_bytes} bytes")]
    OutOfMemory { requested_bytes: usize },
    #[error("capacity overflow")]
    CapacityOverflow,
    #[error("zero-sized allocation requested")]
    ZeroSized,
}

/// A source of raw memory blocks.
///
/// # Safety
///
/// A successful `allocate` must return a block of at least `layout.size()`
/// bytes aligned to `layout.align()`, valid until it is passed back to
/// `free`. Blocks must not overlap other live blocks from the same allocator.
pub unsafe trait Allocator {
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError>;

    /// # Safety
    ///
    /// `ptr` must have been returned by `allocate` on this allocator (or a
    /// copy of it) with the same `layout`, and must not be freed twice.
    unsafe fn free(&self, ptr: NonNull<u8>, layout: Layout);
}

/// Owns no memory: every request fails. Stands in as the default allocator
/// when the `alloc` feature is off.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct NullAllocator;

unsafe impl Allocator for NullAllocator {
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        Err(AllocError::OutOfMemory { requested_bytes: layout.size() })
    }

    unsafe fn free(&self, _: NonNull<u8>, _: Layout) {
        unreachable!("NullAllocator never hands out blocks")
    }
}

unsafe impl<A: Allocator + ?Sized> Allocator for &A {
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        (**self).allocate(layout)
    }

    unsafe fn free(&self, ptr: NonNull<u8>, layout: Layout) {
        // SAFETY: forwarded contract
        unsafe { (**self).free(ptr, layout) }
    }
}
