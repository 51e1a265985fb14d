#![cfg_attr(not(test), no_std)]

//! Growable arrays of `Copy` values over a pluggable allocator.
//!
//! ```text
//! TrivialVec<T, A>   typed view: indexing, insert/erase, resize
//! └── RawBuffer<A>   untyped bytes: growth, relocation, swap
//!     └── A          trivec_alloc::Allocator (heap, stack arena, ...)
//! ```
//!
//! [`sorted`] holds lower-bound insertion helpers that work on any
//! [`InsertSeq`](sorted::InsertSeq), including [`TrivialVec`].

#[cfg(feature = "alloc")]
extern crate alloc;

pub mod raw;
pub mod sorted;
mod vec;

#[cfg(feature = "serde")]
mod serde_impl;

pub use raw::grown_capacity;
pub use sorted::{insert_sorted, insert_sorted_by, insert_sorted_unique, insert_sorted_unique_by};
pub use trivec_alloc::{AllocError, Allocator};
pub use vec::TrivialVec;

#[cfg(feature = "alloc")]
pub type DefaultAllocator = trivec_alloc::HeapAllocator;

#[cfg(not(feature = "alloc"))]
pub type DefaultAllocator = trivec_alloc::NullAllocator;
