use core::alloc::Layout;
use core::fmt::{self, Debug};
use core::marker::PhantomData;
use core::ops::{Bound, Deref, DerefMut, RangeBounds};
use core::ptr::{self, NonNull};
use core::slice;

use bytemuck::{NoUninit, Pod, Zeroable};
use trivec_alloc::{AllocError, Allocator};

use crate::raw::RawBuffer;
use crate::DefaultAllocator;

/// A growable array of `Copy` values whose memory comes from `A`.
///
/// Elements are only ever moved by copying bytes: growing, inserting and
/// erasing never run any per-element code. `T: Copy` rules out any type
/// with drop glue at compile time.
///
/// Allocation failure on the infallible methods is fatal and panics with the
/// allocator's error. Use the `try_` variants to handle it.
pub struct TrivialVec<T: Copy, A: Allocator = DefaultAllocator> {
    buf: RawBuffer<A>,
    _marker: PhantomData<T>,
}

// SAFETY: owns its elements like Vec<T> does
unsafe impl<T: Copy + Send, A: Allocator + Send> Send for TrivialVec<T, A> {}
unsafe impl<T: Copy + Sync, A: Allocator + Sync> Sync for TrivialVec<T, A> {}

impl<T: Copy, A: Allocator + Default> TrivialVec<T, A> {
    pub fn new() -> Self {
        Self::new_in(A::default())
    }

    pub fn from_elem(proto: T, count: usize) -> Self {
        Self::from_elem_in(proto, count, A::default())
    }

    pub fn with_len(count: usize) -> Self
    where
        T: Default,
    {
        Self::from_elem(T::default(), count)
    }
}

impl<T: Copy, A: Allocator> TrivialVec<T, A> {
    const ITEM: Layout = Layout::new::<T>();

    pub const fn new_in(alloc: A) -> Self {
        TrivialVec {
            buf: RawBuffer::new_in(alloc),
            _marker: PhantomData,
        }
    }

    /// `count` copies of `proto`, in a single allocation of exactly `count`
    /// items.
    pub fn from_elem_in(proto: T, count: usize, alloc: A) -> Self {
        infallible(Self::try_from_elem_in(proto, count, alloc))
    }

    pub fn try_from_elem_in(proto: T, count: usize, alloc: A) -> Result<Self, AllocError> {
        let buf = RawBuffer::with_len_in(count, Self::ITEM, alloc)?;
        let mut vec = Self { buf, _marker: PhantomData };

        let base: *mut T = vec.base().as_ptr();
        for i in 0..count {
            // SAFETY: buffer has room for exactly count items
            unsafe { base.add(i).write(proto) };
        }

        Ok(vec)
    }

    pub fn with_len_in(count: usize, alloc: A) -> Self
    where
        T: Default,
    {
        Self::from_elem_in(T::default(), count, alloc)
    }

    fn base(&self) -> NonNull<T> {
        self.buf.region()
            .map(NonNull::cast)
            .unwrap_or(NonNull::dangling())
    }

    /// Grows the length to `count` and returns a pointer to the first new
    /// slot. Slots from there up to `count` are uninitialized.
    fn ensure_size_for(&mut self, count: usize) -> Result<*mut T, AllocError> {
        let offset = self.buf.ensure_size_for(count, Self::ITEM)?;
        // SAFETY: offset lies within (or one past) the region
        Ok(unsafe { self.base().as_ptr().cast::<u8>().add(offset).cast() })
    }

    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    pub fn allocator(&self) -> &A {
        self.buf.allocator()
    }

    pub fn as_slice(&self) -> &[T] {
        // SAFETY: the first len items are initialized
        unsafe { slice::from_raw_parts(self.base().as_ptr(), self.buf.len()) }
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: the first len items are initialized
        unsafe { slice::from_raw_parts_mut(self.base().as_ptr(), self.buf.len()) }
    }

    /// The live elements as raw bytes.
    pub fn as_bytes(&self) -> &[u8]
    where
        T: NoUninit,
    {
        bytemuck::cast_slice(self.as_slice())
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8]
    where
        T: Pod,
    {
        bytemuck::cast_slice_mut(self.as_mut_slice())
    }

    pub fn front(&self) -> Option<&T> {
        self.as_slice().first()
    }

    pub fn front_mut(&mut self) -> Option<&mut T> {
        self.as_mut_slice().first_mut()
    }

    pub fn back(&self) -> Option<&T> {
        self.as_slice().last()
    }

    pub fn back_mut(&mut self) -> Option<&mut T> {
        self.as_mut_slice().last_mut()
    }

    pub fn push_back(&mut self, value: T) {
        infallible(self.try_push_back(value))
    }

    pub fn try_push_back(&mut self, value: T) -> Result<(), AllocError> {
        let slot = self.ensure_size_for(self.len() + 1)?;
        // SAFETY: ensure_size_for made room for one item at slot
        unsafe { slot.write(value) };
        Ok(())
    }

    /// Appends the value built by `f`, writing it straight into the new slot
    /// after any growth has happened.
    pub fn emplace_back<F>(&mut self, f: F) -> &mut T
    where
        F: FnOnce() -> T,
    {
        let len = self.len();
        let slot = infallible(self.ensure_size_for(len + 1));

        // SAFETY: ensure_size_for made room for one item at slot. The length
        // only covers the slot once it is written, in case f panics.
        unsafe {
            self.buf.set_len(len);
            slot.write(f());
            self.buf.set_len(len + 1);
            &mut *slot
        }
    }

    pub fn pop_back(&mut self) -> Option<T> {
        let last = *self.back()?;
        // SAFETY: shrinking, prefix stays initialized
        unsafe { self.buf.set_len(self.len() - 1) };
        Some(last)
    }

    /// Inserts `value` before the element at `index`, shifting the rest of
    /// the elements right. Returns `index`.
    ///
    /// Panics if `index > len`.
    pub fn insert(&mut self, index: usize, value: T) -> usize {
        infallible(self.try_insert(index, value))
    }

    pub fn try_insert(&mut self, index: usize, value: T) -> Result<usize, AllocError> {
        let len = self.len();
        if index > len {
            panic!("insertion index (is {index}) should be <= len (is {len})");
        }

        self.ensure_size_for(len + 1)?;

        // SAFETY: room for len + 1 items, index <= len
        unsafe {
            let pos = self.base().as_ptr().add(index);
            ptr::copy(pos, pos.add(1), len - index);
            pos.write(value);
        }

        Ok(index)
    }

    /// Removes the element at `index`, shifting the tail left. Returns
    /// `index`, which now holds the element that followed the removed one.
    ///
    /// Panics if `index >= len`.
    pub fn erase(&mut self, index: usize) -> usize {
        let len = self.len();
        if index >= len {
            panic!("removal index (is {index}) should be < len (is {len})");
        }

        self.erase_range(index..index + 1)
    }

    /// Removes the elements in `range`, shifting the tail left. Returns the
    /// start of the range.
    ///
    /// Panics if the range is inverted or ends past `len`.
    pub fn erase_range<R>(&mut self, range: R) -> usize
    where
        R: RangeBounds<usize>,
    {
        let len = self.len();

        let start = match range.start_bound() {
            Bound::Included(&n) => n,
            Bound::Excluded(&n) => n.checked_add(1)
                .unwrap_or_else(|| panic!("erase range start overflows usize")),
            Bound::Unbounded => 0,
        };

        let end = match range.end_bound() {
            Bound::Included(&n) => n.checked_add(1)
                .unwrap_or_else(|| panic!("erase range end overflows usize")),
            Bound::Excluded(&n) => n,
            Bound::Unbounded => len,
        };

        if start > end {
            panic!("erase range starts at {start} but ends at {end}");
        }

        if end > len {
            panic!("erase range end (is {end}) should be <= len (is {len})");
        }

        // SAFETY: start <= end <= len
        unsafe {
            let base = self.base().as_ptr();
            ptr::copy(base.add(end), base.add(start), len - end);
            self.buf.set_len(len - (end - start));
        }

        start
    }

    /// Drops every element but keeps the allocation.
    pub fn clear(&mut self) {
        // SAFETY: empty prefix is trivially initialized
        unsafe { self.buf.set_len(0) };
    }

    /// Sets the length to `count`. New slots are filled with copies of
    /// `value`; shrinking just forgets the tail.
    pub fn resize(&mut self, count: usize, value: T) {
        infallible(self.try_resize(count, value))
    }

    pub fn try_resize(&mut self, count: usize, value: T) -> Result<(), AllocError> {
        let len = self.len();

        if count <= len {
            // SAFETY: shrinking, prefix stays initialized
            unsafe { self.buf.set_len(count) };
            return Ok(());
        }

        let slot = self.ensure_size_for(count)?;
        for i in 0..count - len {
            // SAFETY: ensure_size_for made room for count - len items at slot
            unsafe { slot.add(i).write(value) };
        }

        Ok(())
    }

    pub fn resize_default(&mut self, count: usize)
    where
        T: Default,
    {
        self.resize(count, T::default())
    }

    pub fn resize_zeroed(&mut self, count: usize)
    where
        T: Zeroable,
    {
        self.resize(count, T::zeroed())
    }

    /// Ensures room for at least `capacity` items in total. Never shrinks.
    pub fn reserve(&mut self, capacity: usize) {
        infallible(self.try_reserve(capacity))
    }

    pub fn try_reserve(&mut self, capacity: usize) -> Result<(), AllocError> {
        if capacity > self.capacity() {
            self.buf.set_capacity(capacity, Self::ITEM)?;
        }
        Ok(())
    }

    /// Reallocates so that capacity equals length.
    pub fn shrink_to_fit(&mut self) {
        infallible(self.buf.set_capacity(self.len(), Self::ITEM))
    }

    /// Exchanges contents and allocators with `other` without touching any
    /// element.
    pub fn swap(&mut self, other: &mut Self) {
        self.buf.swap(&mut other.buf);
    }

    pub fn extend_from_slice(&mut self, items: &[T]) {
        infallible(self.try_extend_from_slice(items))
    }

    pub fn try_extend_from_slice(&mut self, items: &[T]) -> Result<(), AllocError> {
        let slot = self.ensure_size_for(self.len() + items.len())?;
        // SAFETY: room for items.len() at slot, and items cannot alias our
        // storage while we hold &mut self
        unsafe { ptr::copy_nonoverlapping(items.as_ptr(), slot, items.len()) };
        Ok(())
    }

    pub fn try_clone(&self) -> Result<Self, AllocError>
    where
        A: Clone,
    {
        Ok(TrivialVec {
            buf: self.buf.try_clone(Self::ITEM)?,
            _marker: PhantomData,
        })
    }
}

#[cold]
#[track_caller]
fn alloc_failed(err: AllocError) -> ! {
    panic!("trivec: {err}")
}

#[track_caller]
fn infallible<T>(result: Result<T, AllocError>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => alloc_failed(err),
    }
}

impl<T: Copy, A: Allocator + Default> Default for TrivialVec<T, A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Copy, A: Allocator + Clone> Clone for TrivialVec<T, A> {
    fn clone(&self) -> Self {
        infallible(self.try_clone())
    }
}

impl<T: Copy, A: Allocator> Deref for TrivialVec<T, A> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T: Copy, A: Allocator> DerefMut for TrivialVec<T, A> {
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T: Copy, A: Allocator> AsRef<[T]> for TrivialVec<T, A> {
    fn as_ref(&self) -> &[T] {
        self
    }
}

impl<T: Copy, A: Allocator> AsMut<[T]> for TrivialVec<T, A> {
    fn as_mut(&mut self) -> &mut [T] {
        self
    }
}

impl<T: Copy + Debug, A: Allocator> Debug for TrivialVec<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: Copy + PartialEq, A: Allocator, B: Allocator> PartialEq<TrivialVec<T, B>> for TrivialVec<T, A> {
    fn eq(&self, other: &TrivialVec<T, B>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Copy + PartialEq, A: Allocator> PartialEq<[T]> for TrivialVec<T, A> {
    fn eq(&self, other: &[T]) -> bool {
        self.as_slice() == other
    }
}

impl<T: Copy + PartialEq, A: Allocator, const N: usize> PartialEq<[T; N]> for TrivialVec<T, A> {
    fn eq(&self, other: &[T; N]) -> bool {
        self.as_slice() == other
    }
}

impl<T: Copy + Eq, A: Allocator> Eq for TrivialVec<T, A> {}

impl<T: Copy, A: Allocator> Extend<T> for TrivialVec<T, A> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        let (lower, _) = iter.size_hint();
        self.reserve(self.len().saturating_add(lower));

        for item in iter {
            self.push_back(item);
        }
    }
}

impl<'a, T: Copy + 'a, A: Allocator> Extend<&'a T> for TrivialVec<T, A> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied())
    }
}

impl<T: Copy, A: Allocator + Default> FromIterator<T> for TrivialVec<T, A> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut vec = TrivialVec::new();
        vec.extend(iter);
        vec
    }
}

impl<T: Copy, A: Allocator + Default> From<&[T]> for TrivialVec<T, A> {
    fn from(items: &[T]) -> Self {
        let mut vec = TrivialVec::new();
        vec.extend_from_slice(items);
        vec
    }
}

impl<T: Copy, A: Allocator + Default, const N: usize> From<[T; N]> for TrivialVec<T, A> {
    fn from(items: [T; N]) -> Self {
        TrivialVec::from(&items[..])
    }
}

impl<'a, T: Copy, A: Allocator> IntoIterator for &'a TrivialVec<T, A> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T: Copy, A: Allocator> IntoIterator for &'a mut TrivialVec<T, A> {
    type Item = &'a mut T;
    type IntoIter = slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}
