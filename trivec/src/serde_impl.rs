use core::fmt;
use core::marker::PhantomData;
use core::mem;

use serde::de::{Deserialize, Deserializer, SeqAccess, Visitor};
use serde::ser::{Serialize, Serializer};
use trivec_alloc::Allocator;

use crate::TrivialVec;

const MAX_PREALLOC_BYTES: usize = 1024 * 1024;

impl<T, A> Serialize for TrivialVec<T, A>
where
    T: Copy + Serialize,
    A: Allocator,
{
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

impl<'de, T, A> Deserialize<'de> for TrivialVec<T, A>
where
    T: Copy + Deserialize<'de>,
    A: Allocator + Default,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_seq(SeqVisitor(PhantomData))
    }
}

struct SeqVisitor<T, A>(PhantomData<(T, A)>);

impl<'de, T, A> Visitor<'de> for SeqVisitor<T, A>
where
    T: Copy + Deserialize<'de>,
    A: Allocator + Default,
{
    type Value = TrivialVec<T, A>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a sequence")
    }

    fn visit_seq<S: SeqAccess<'de>>(self, mut seq: S) -> Result<Self::Value, S::Error> {
        let mut vec = TrivialVec::new();

        // the hint comes from the input, so never trust it for more than
        // MAX_PREALLOC_BYTES up front
        if let Some(len) = seq.size_hint() {
            let limit = MAX_PREALLOC_BYTES / mem::size_of::<T>().max(1);
            vec.try_reserve(len.min(limit)).map_err(serde::de::Error::custom)?;
        }

        while let Some(item) = seq.next_element()? {
            vec.try_push_back(item).map_err(serde::de::Error::custom)?;
        }

        Ok(vec)
    }
}
