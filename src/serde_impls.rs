use crate::{compare::Compare, map::Map};
use serde::{
    de::{Deserialize, Deserializer, Error as _, MapAccess, Visitor},
    ser::{Serialize, Serializer},
};
use std::{fmt, marker::PhantomData};

impl<K, V, C> Serialize for Map<K, V, C>
where
    K: Serialize,
    V: Serialize,
{
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

const PREALLOC_MAX: usize = 4096;

struct MapVisitor<K, V, C>(PhantomData<(K, V, C)>);

impl<'de, K, V, C> Visitor<'de> for MapVisitor<K, V, C>
where
    K: Deserialize<'de>,
    V: Deserialize<'de>,
    C: Compare<K> + Default,
{
    type Value = Map<K, V, C>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map")
    }

    // the capacity of the result is the number of entries read. The size
    // hint comes from the input, so it only bounds the first allocation.
    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut elts = Vec::with_capacity(access.size_hint().unwrap_or(0).min(PREALLOC_MAX));
        while let Some((k, v)) = access.next_entry()? {
            elts.push((k, v));
        }
        let mut m = Map::with_comparator(elts.len(), C::default()).map_err(A::Error::custom)?;
        m.insert_many(elts).map_err(A::Error::custom)?;
        Ok(m)
    }
}

impl<'de, K, V, C> Deserialize<'de> for Map<K, V, C>
where
    K: Deserialize<'de>,
    V: Deserialize<'de>,
    C: Compare<K> + Default,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(MapVisitor(PhantomData))
    }
}
