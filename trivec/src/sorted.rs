//! Insertion into sequences kept in ascending order.

#[cfg(feature = "alloc")]
use alloc::vec::Vec;
use core::cmp::Ordering;

use trivec_alloc::Allocator;

use crate::TrivialVec;

/// A sequence that can be viewed as a slice and inserted into at any index.
pub trait InsertSeq {
    type Item;

    fn items(&self) -> &[Self::Item];

    /// Inserts before the element at `index`; `index == len` appends.
    fn insert_at(&mut self, index: usize, item: Self::Item);

    fn push_last(&mut self, item: Self::Item) {
        let len = self.items().len();
        self.insert_at(len, item);
    }
}

impl<T: Copy, A: Allocator> InsertSeq for TrivialVec<T, A> {
    type Item = T;

    fn items(&self) -> &[T] {
        self
    }

    fn insert_at(&mut self, index: usize, item: T) {
        self.insert(index, item);
    }

    fn push_last(&mut self, item: T) {
        self.push_back(item);
    }
}

#[cfg(feature = "alloc")]
impl<T> InsertSeq for Vec<T> {
    type Item = T;

    fn items(&self) -> &[T] {
        self
    }

    fn insert_at(&mut self, index: usize, item: T) {
        self.insert(index, item);
    }

    fn push_last(&mut self, item: T) {
        self.push(item);
    }
}

/// Inserts `item` before the first element not less than it. Equal elements
/// are kept, with `item` landing ahead of them.
pub fn insert_sorted<S>(seq: &mut S, item: S::Item)
where
    S: InsertSeq + ?Sized,
    S::Item: PartialOrd,
{
    insert_lower_bound(seq, item, |a, b| a < b)
}

/// Like [`insert_sorted`], but leaves the sequence untouched and returns
/// `false` when an equal element is already present.
pub fn insert_sorted_unique<S>(seq: &mut S, item: S::Item) -> bool
where
    S: InsertSeq + ?Sized,
    S::Item: PartialOrd,
{
    insert_lower_bound_unique(seq, item, |a, b| a < b)
}

pub fn insert_sorted_by<S, F>(seq: &mut S, item: S::Item, mut compare: F)
where
    S: InsertSeq + ?Sized,
    F: FnMut(&S::Item, &S::Item) -> Ordering,
{
    insert_lower_bound(seq, item, |a, b| compare(a, b) == Ordering::Less)
}

pub fn insert_sorted_unique_by<S, F>(seq: &mut S, item: S::Item, mut compare: F) -> bool
where
    S: InsertSeq + ?Sized,
    F: FnMut(&S::Item, &S::Item) -> Ordering,
{
    insert_lower_bound_unique(seq, item, |a, b| compare(a, b) == Ordering::Less)
}

fn insert_lower_bound<S, F>(seq: &mut S, item: S::Item, mut less: F)
where
    S: InsertSeq + ?Sized,
    F: FnMut(&S::Item, &S::Item) -> bool,
{
    let pos = seq.items().partition_point(|x| less(x, &item));
    seq.insert_at(pos, item);
}

fn insert_lower_bound_unique<S, F>(seq: &mut S, item: S::Item, mut less: F) -> bool
where
    S: InsertSeq + ?Sized,
    F: FnMut(&S::Item, &S::Item) -> bool,
{
    // new maximum, no search needed
    let append = seq.items().last().map_or(true, |last| less(last, &item));
    if append {
        seq.push_last(item);
        return true;
    }

    let items = seq.items();
    let pos = items.partition_point(|x| less(x, &item));
    let present = items.get(pos).is_some_and(|existing| !less(&item, existing));

    if present {
        return false;
    }

    seq.insert_at(pos, item);
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inserts_in_order() {
        let mut v = TrivialVec::<i32>::from([1, 3]);
        insert_sorted(&mut v, 2);
        assert_eq!(v, [1, 2, 3]);

        insert_sorted(&mut v, 0);
        insert_sorted(&mut v, 9);
        assert_eq!(v, [0, 1, 2, 3, 9]);
    }

    #[test]
    fn duplicates_land_before_equal_elements() {
        #[derive(Debug, Clone, Copy)]
        struct Keyed(u8, char);

        impl PartialEq for Keyed {
            fn eq(&self, other: &Self) -> bool {
                self.0 == other.0
            }
        }

        impl PartialOrd for Keyed {
            fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
                self.0.partial_cmp(&other.0)
            }
        }

        let mut v = TrivialVec::<Keyed>::from([Keyed(1, 'a'), Keyed(2, 'b'), Keyed(3, 'c')]);
        insert_sorted(&mut v, Keyed(2, 'x'));

        let tags: Vec<char> = v.iter().map(|k| k.1).collect();
        assert_eq!(tags, ['a', 'x', 'b', 'c']);
    }

    #[test]
    fn unique_rejects_existing() {
        let mut v = TrivialVec::<i32>::from([1, 2, 3]);

        assert!(!insert_sorted_unique(&mut v, 2));
        assert_eq!(v, [1, 2, 3]);

        assert!(!insert_sorted_unique(&mut v, 3));
        assert!(!insert_sorted_unique(&mut v, 1));
        assert_eq!(v, [1, 2, 3]);
    }

    #[test]
    fn unique_accepts_novel_values() {
        let mut v = TrivialVec::<i32>::new();

        assert!(insert_sorted_unique(&mut v, 5));
        assert!(insert_sorted_unique(&mut v, 7));
        assert!(insert_sorted_unique(&mut v, 6));
        assert!(insert_sorted_unique(&mut v, 0));

        assert_eq!(v, [0, 5, 6, 7]);
    }

    #[cfg(feature = "alloc")]
    #[test]
    fn works_on_std_vec() {
        let mut v = vec![10, 20, 30];
        insert_sorted(&mut v, 25);
        assert!(!insert_sorted_unique(&mut v, 20));
        assert_eq!(v, [10, 20, 25, 30]);
    }

    #[test]
    fn comparator_variants() {
        let mut v = TrivialVec::<i32>::from([9, 5, 1]);

        insert_sorted_by(&mut v, 4, |a, b| b.cmp(a));
        assert_eq!(v, [9, 5, 4, 1]);

        assert!(!insert_sorted_unique_by(&mut v, 5, |a, b| b.cmp(a)));
        assert!(insert_sorted_unique_by(&mut v, 0, |a, b| b.cmp(a)));
        assert_eq!(v, [9, 5, 4, 1, 0]);
    }
}
