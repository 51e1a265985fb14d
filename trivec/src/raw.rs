//! The untyped half of a [`TrivialVec`](crate::TrivialVec): a byte region
//! sized in items, plus the growth and relocation rules shared by every
//! element type.
//!
//! Item layout is passed into each call rather than stored, so one
//! implementation serves all element types. The region remembers the layout
//! it was allocated with so it can always be freed.

use core::alloc::Layout;
use core::ptr::{self, NonNull};

use trivec_alloc::{AllocError, Allocator};

/// Capacity chosen when growing to hold `requested` items: 1.5x the
/// requested size, rounded up. `None` on overflow.
pub const fn grown_capacity(requested: usize) -> Option<usize> {
    match requested.checked_mul(3) {
        Some(n) => match n.checked_add(1) {
            Some(n) => Some(n / 2),
            None => None,
        },
        None => None,
    }
}

#[derive(Debug, Copy, Clone)]
struct Region {
    ptr: NonNull<u8>,
    layout: Layout,
}

pub struct RawBuffer<A: Allocator> {
    /// None when capacity is zero or items are zero-sized
    region: Option<Region>,
    len: usize,
    capacity: usize,
    alloc: A,
}

// SAFETY: the region holds plain bytes owned by this buffer
unsafe impl<A: Allocator + Send> Send for RawBuffer<A> {}
unsafe impl<A: Allocator + Sync> Sync for RawBuffer<A> {}

impl<A: Allocator> RawBuffer<A> {
    pub const fn new_in(alloc: A) -> Self {
        RawBuffer {
            region: None,
            len: 0,
            capacity: 0,
            alloc,
        }
    }

    /// Allocates room for exactly `count` items and marks all of them live.
    /// The caller must initialize them before reading.
    pub fn with_len_in(count: usize, item: Layout, alloc: A) -> Result<Self, AllocError> {
        let mut buf = RawBuffer::new_in(alloc);
        buf.set_capacity(count, item)?;
        buf.len = count;
        Ok(buf)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn allocator(&self) -> &A {
        &self.alloc
    }

    /// Start of the byte region, if one is allocated.
    pub fn region(&self) -> Option<NonNull<u8>> {
        self.region.map(|region| region.ptr)
    }

    /// # Safety
    ///
    /// `len` must not exceed the capacity, and the first `len` items must be
    /// initialized.
    pub unsafe fn set_len(&mut self, len: usize) {
        debug_assert!(len <= self.capacity);
        self.len = len;
    }

    /// Makes room for `count` items and sets the length to `count`. Returns
    /// the byte offset of the previous end, where new items are written.
    #[inline]
    pub fn ensure_size_for(&mut self, count: usize, item: Layout) -> Result<usize, AllocError> {
        if self.capacity < count {
            self.grow(count, item)?;
        }

        let offset = self.len * item.size();
        self.len = count;
        Ok(offset)
    }

    #[cold]
    #[inline(never)]
    fn grow(&mut self, count: usize, item: Layout) -> Result<(), AllocError> {
        let capacity = grown_capacity(count).ok_or(AllocError::CapacityOverflow)?;
        self.set_capacity(capacity, item)
    }

    /// Reallocates to hold exactly `capacity` items, keeping as many leading
    /// items as fit. The length is clamped to the new capacity.
    #[inline(never)]
    pub fn set_capacity(&mut self, capacity: usize, item: Layout) -> Result<(), AllocError> {
        if capacity == self.capacity {
            return Ok(());
        }

        let layout = array_layout(item, capacity)?;

        let region = if layout.size() == 0 {
            None
        } else {
            let ptr = self.alloc.allocate(layout)?;
            Some(Region { ptr, layout })
        };

        let len = self.len.min(capacity);

        if let (Some(old), Some(new)) = (self.region, region) {
            // SAFETY: both regions hold at least len items and are distinct
            // live blocks
            unsafe {
                ptr::copy_nonoverlapping(old.ptr.as_ptr(), new.ptr.as_ptr(), len * item.size());
            }
        }

        log::trace!("reallocated buffer: capacity {} -> {capacity}, len={len}, item_size={}",
            self.capacity, item.size());

        self.release();
        self.region = region;
        self.capacity = capacity;
        self.len = len;
        Ok(())
    }

    /// Exchanges everything, allocator included. No element is touched.
    pub fn swap(&mut self, other: &mut Self) {
        core::mem::swap(self, other);
    }

    /// Deep copy holding exactly the live items.
    pub fn try_clone(&self, item: Layout) -> Result<Self, AllocError>
    where
        A: Clone,
    {
        let copy = RawBuffer::with_len_in(self.len, item, self.alloc.clone())?;

        if let (Some(src), Some(dst)) = (self.region, copy.region) {
            // SAFETY: copy was just allocated with room for len items
            unsafe {
                ptr::copy_nonoverlapping(src.ptr.as_ptr(), dst.ptr.as_ptr(), self.len * item.size());
            }
        }

        Ok(copy)
    }

    fn release(&mut self) {
        if let Some(region) = self.region.take() {
            // SAFETY: region came from self.alloc with this layout and is
            // only ever released once, here
            unsafe { self.alloc.free(region.ptr, region.layout) }
        }
    }
}

impl<A: Allocator + Default> Default for RawBuffer<A> {
    fn default() -> Self {
        RawBuffer::new_in(A::default())
    }
}

impl<A: Allocator> Drop for RawBuffer<A> {
    fn drop(&mut self) {
        self.release();
    }
}

fn array_layout(item: Layout, count: usize) -> Result<Layout, AllocError> {
    let size = item.size()
        .checked_mul(count)
        .ok_or(AllocError::CapacityOverflow)?;

    Layout::from_size_align(size, item.align())
        .map_err(|_| AllocError::CapacityOverflow)
}
