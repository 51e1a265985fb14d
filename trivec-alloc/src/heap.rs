use core::alloc::Layout;
use core::ptr::NonNull;

use crate::{AllocError, Allocator};

/// Allocates from the global allocator.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct HeapAllocator;

unsafe impl Allocator for HeapAllocator {
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        if layout.size() == 0 {
            return Err(AllocError::ZeroSized);
        }

        // SAFETY: layout has non-zero size, checked above
        let ptr = unsafe { alloc::alloc::alloc(layout) };

        NonNull::new(ptr).ok_or(AllocError::OutOfMemory {
            requested_bytes: layout.size(),
        })
    }

    unsafe fn free(&self, ptr: NonNull<u8>, layout: Layout) {
        // SAFETY: caller guarantees ptr came from allocate with this layout
        unsafe { alloc::alloc::dealloc(ptr.as_ptr(), layout) }
    }
}
