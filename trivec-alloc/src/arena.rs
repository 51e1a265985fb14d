use core::alloc::Layout;
use core::cell::Cell;
use core::marker::PhantomData;
use core::mem::MaybeUninit;
use core::ptr::NonNull;

use derive_more::{Deref, DerefMut};

use crate::{AllocError, Allocator};

/// Uninitialized, 16-byte aligned backing storage of `N` bytes, suitable for
/// placing a [`LinearArena`] on the stack.
#[repr(C, align(16))]
#[derive(Deref, DerefMut)]
pub struct FixedBuffer<const N: usize>([MaybeUninit<u8>; N]);

impl<const N: usize> FixedBuffer<N> {
    pub const fn new() -> Self {
        FixedBuffer([MaybeUninit::uninit(); N])
    }
}

impl<const N: usize> Default for FixedBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Bump allocator over borrowed storage.
///
/// Blocks are handed out front to back. Freeing the most recent block rolls
/// the head back, so a buffer that repeatedly reallocates while it is the
/// last thing in the arena reuses its space. Any other free is a no-op and
/// the space is reclaimed by [`LinearArena::reset`].
pub struct LinearArena<'a> {
    base: NonNull<u8>,
    size: usize,
    head: Cell<usize>,
    _storage: PhantomData<&'a mut [MaybeUninit<u8>]>,
}

impl<'a> LinearArena<'a> {
    pub fn new(storage: &'a mut [MaybeUninit<u8>]) -> Self {
        let size = storage.len();
        // SAFETY: slice pointers are never null
        let base = unsafe { NonNull::new_unchecked(storage.as_mut_ptr().cast::<u8>()) };

        LinearArena {
            base,
            size,
            head: Cell::new(0),
            _storage: PhantomData,
        }
    }

    pub fn capacity(&self) -> usize {
        self.size
    }

    pub fn used(&self) -> usize {
        self.head.get()
    }

    pub fn remaining(&self) -> usize {
        self.size - self.head.get()
    }

    /// Reclaims every block. Requires `&mut self`, so no buffer can still be
    /// borrowing the arena.
    pub fn reset(&mut self) {
        self.head.set(0);
    }
}

unsafe impl Allocator for LinearArena<'_> {
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        if layout.size() == 0 {
            return Err(AllocError::ZeroSized);
        }

        let head = self.head.get();
        let exhausted = AllocError::OutOfMemory { requested_bytes: layout.size() };

        // SAFETY: head never exceeds size, so this stays within storage
        let cursor = unsafe { self.base.as_ptr().add(head) };
        let padding = cursor.align_offset(layout.align());

        let end = head
            .checked_add(padding)
            .and_then(|start| start.checked_add(layout.size()))
            .filter(|end| *end <= self.size);

        let Some(end) = end else {
            log::warn!("linear arena exhausted: requested_bytes={}, remaining={}",
                layout.size(), self.remaining());
            return Err(exhausted);
        };

        self.head.set(end);

        // SAFETY: head + padding < end <= size
        Ok(unsafe { NonNull::new_unchecked(cursor.add(padding)) })
    }

    unsafe fn free(&self, ptr: NonNull<u8>, layout: Layout) {
        let offset = (ptr.as_ptr() as usize).wrapping_sub(self.base.as_ptr() as usize);

        // only the most recent block can be returned to the arena:
        if offset.wrapping_add(layout.size()) == self.head.get() {
            self.head.set(offset);
        }
    }
}
