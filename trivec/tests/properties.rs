use proptest::prelude::*;
use trivec::{insert_sorted, insert_sorted_unique, TrivialVec};

fn strictly_ascending(items: &[i32]) -> bool {
    items.windows(2).all(|w| w[0] < w[1])
}

fn ascending_set() -> impl Strategy<Value = Vec<i32>> {
    proptest::collection::btree_set(-1000i32..1000, 0..64)
        .prop_map(|set| set.into_iter().collect())
}

proptest! {
    #[test]
    fn push_back_keeps_every_value_in_order(
        values in proptest::collection::vec(any::<u64>(), 0..200),
    ) {
        let mut v = TrivialVec::<u64>::new();
        for &x in &values {
            v.push_back(x);
        }

        prop_assert_eq!(v.len(), values.len());
        prop_assert_eq!(v.as_slice(), &values[..]);
    }

    #[test]
    fn capacity_never_shrinks_while_growing(
        ops in proptest::collection::vec(0u8..4, 1..200),
    ) {
        let mut v = TrivialVec::<u32>::new();
        let mut capacity = v.capacity();

        for op in ops {
            match op {
                0 => v.push_back(1),
                1 => { v.emplace_back(|| 2); }
                2 => { v.insert(v.len() / 2, 3); }
                _ => v.extend_from_slice(&[4, 5, 6]),
            }

            prop_assert!(v.capacity() >= capacity);
            prop_assert!(v.capacity() >= v.len());
            capacity = v.capacity();
        }
    }

    #[test]
    fn insert_sorted_keeps_order(
        mut initial in proptest::collection::vec(-50i32..50, 0..40),
        inserts in proptest::collection::vec(-60i32..60, 1..40),
    ) {
        initial.sort();
        let mut v = TrivialVec::<i32>::from(&initial[..]);

        for x in inserts {
            insert_sorted(&mut v, x);
        }

        prop_assert!(v.windows(2).all(|w| !(w[1] < w[0])));
    }

    #[test]
    fn insert_sorted_unique_rejects_duplicates(
        items in ascending_set().prop_filter("non-empty", |v| !v.is_empty()),
        pick in any::<prop::sample::Index>(),
    ) {
        let mut v = TrivialVec::<i32>::from(&items[..]);
        let duplicate = items[pick.index(items.len())];

        prop_assert!(!insert_sorted_unique(&mut v, duplicate));
        prop_assert_eq!(v.as_slice(), &items[..]);
    }

    #[test]
    fn insert_sorted_unique_accepts_novel_values(
        items in ascending_set(),
        value in -1100i32..1100,
    ) {
        prop_assume!(!items.contains(&value));
        let mut v = TrivialVec::<i32>::from(&items[..]);

        prop_assert!(insert_sorted_unique(&mut v, value));
        prop_assert_eq!(v.len(), items.len() + 1);
        prop_assert!(strictly_ascending(&v));
        prop_assert!(v.contains(&value));
    }

    #[test]
    fn resize_fills_only_new_slots(
        k in 0usize..100,
        x in any::<i16>(),
        y in any::<i16>(),
    ) {
        let mut v = TrivialVec::<i16>::new();
        v.resize(k, x);
        v.resize(v.len() + 5, y);

        prop_assert!(v[..k].iter().all(|&e| e == x));
        prop_assert!(v[k..k + 5].iter().all(|&e| e == y));
    }

    #[test]
    fn erase_range_matches_vec_drain(
        items in proptest::collection::vec(any::<u8>(), 0..64),
        a in any::<prop::sample::Index>(),
        b in any::<prop::sample::Index>(),
    ) {
        let len = items.len() + 1;
        let (start, end) = {
            let (a, b) = (a.index(len), b.index(len));
            (a.min(b), a.max(b))
        };

        let mut v = TrivialVec::<u8>::from(&items[..]);
        let mut expected = items.clone();
        expected.drain(start..end);

        prop_assert_eq!(v.erase_range(start..end), start);
        prop_assert_eq!(v.as_slice(), &expected[..]);
    }
}
