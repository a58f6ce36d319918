use crate::{
    avl::Tree,
    compare::{Compare, Natural},
    error::Result,
    pool::Pool,
};
use std::{
    borrow::Borrow,
    fmt::{self, Debug, Formatter},
    iter::FusedIterator,
    ops::Index,
};

pub use crate::avl::Iter;

/// The capacity of a map built with [`Default`].
pub const DEFAULT_CAPACITY: usize = 32;

/// An ordered map with a fixed capacity.
///
/// All the nodes the map will ever use are allocated up front, when the map
/// is constructed, and recycled through a free list as entries come and
/// go. Lookup, insertion and removal are O(log(N)), N being the number of
/// entries, and never touch the global allocator. Inserting a new key into
/// a full map fails with [`Error::Exhausted`](crate::Error::Exhausted)
/// and leaves the map as it was.
///
/// Keys are ordered by a [`Compare`] predicate, [`Natural`] (`Ord`) unless
/// another one is given. Keys the predicate considers equivalent are the
/// same key.
///
/// With the `serde` feature a map serializes as its entries only. A
/// deserialized map gets exactly as many slots as it has entries, so it
/// comes back full whatever the capacity of the map that was written; move
/// the entries into a larger map with [`Map::insert_many`] to make room.
///
/// # Examples
/// ```
/// use pooled_avl::{Error, Map};
///
/// let mut m = Map::new(3).unwrap();
/// assert_eq!(m.insert("b", 2).unwrap(), None);
/// assert_eq!(m.insert("a", 1).unwrap(), None);
/// assert_eq!(m.insert("c", 3).unwrap(), None);
/// assert_eq!(m.insert("d", 4), Err(Error::Exhausted { capacity: 3 }));
///
/// assert_eq!(m.get("a"), Some(&1));
/// assert_eq!(m.remove("b"), Some(2));
/// assert_eq!(m.insert("d", 4).unwrap(), None);
///
/// for (k, v) in &m {
///     println!("key {}, val: {}", k, v)
/// }
/// ```
#[derive(Clone)]
pub struct Map<K, V, C = Natural> {
    tree: Tree<K, V, C>,
}

impl<K, V> Map<K, V> {
    /// Create an empty map with room for `capacity` entries, ordered by
    /// `Ord`.
    pub fn new(capacity: usize) -> Result<Self> {
        Map::with_comparator(capacity, Natural)
    }
}

impl<K, V, C> Map<K, V, C> {
    /// Create an empty map with room for `capacity` entries, ordered by
    /// `cmp`. Fails if the node pool can't be allocated.
    pub fn with_comparator(capacity: usize, cmp: C) -> Result<Self> {
        Ok(Map {
            tree: Tree::new(Pool::new(capacity)?, cmp),
        })
    }

    /// The number of entries in the map, O(1).
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The maximum number of entries the map can hold.
    pub fn capacity(&self) -> usize {
        self.tree.capacity()
    }

    /// true if inserting a new key would fail
    pub fn is_full(&self) -> bool {
        self.len() == self.capacity()
    }

    /// The height of the tree, 0 when empty. Never more than
    /// 1.4405 * log2(len + 2) - 0.3277.
    pub fn height(&self) -> usize {
        self.tree.height()
    }

    pub fn comparator(&self) -> &C {
        self.tree.comparator()
    }

    /// Look up the value bound to `k`, which may be any borrowed form of
    /// the key type. Runs in O(log(N)) time.
    pub fn get<Q>(&self, k: &Q) -> Option<&V>
    where
        Q: ?Sized,
        K: Borrow<Q>,
        C: Compare<Q>,
    {
        self.tree.get_full(k).map(|(_, v)| v)
    }

    /// Look up both the stored key and the value bound to `k`.
    pub fn get_key_value<Q>(&self, k: &Q) -> Option<(&K, &V)>
    where
        Q: ?Sized,
        K: Borrow<Q>,
        C: Compare<Q>,
    {
        self.tree.get_full(k)
    }

    pub fn get_mut<Q>(&mut self, k: &Q) -> Option<&mut V>
    where
        Q: ?Sized,
        K: Borrow<Q>,
        C: Compare<Q>,
    {
        self.tree.get_mut(k)
    }

    pub fn contains_key<Q>(&self, k: &Q) -> bool
    where
        Q: ?Sized,
        K: Borrow<Q>,
        C: Compare<Q>,
    {
        self.tree.get_full(k).is_some()
    }

    /// Bind `k` to `v`. If `k` was already bound the old value is replaced
    /// and returned, the stored key is kept, and no node is consumed, so
    /// this succeeds even on a full map. Otherwise a node is taken from the
    /// pool; if there is none left the result is
    /// [`Error::Exhausted`](crate::Error::Exhausted) and the map is
    /// unchanged. Runs in O(log(N)) time.
    pub fn insert(&mut self, k: K, v: V) -> Result<Option<V>>
    where
        C: Compare<K>,
    {
        self.tree.insert(k, v)
    }

    /// Insert every pair from `elts` in order, stopping at the first
    /// failure. Pairs inserted before the failure stay in the map.
    ///
    /// # Examples
    /// ```
    /// use pooled_avl::{Error, Map};
    ///
    /// let mut m = Map::new(4).unwrap();
    /// m.insert_many((0..4).map(|k| (k, k * 10))).unwrap();
    /// assert_eq!(m.insert_many(vec![(2, 0), (9, 9)]), Err(Error::Exhausted { capacity: 4 }));
    /// assert_eq!(m.get(&2), Some(&0));
    /// assert_eq!(m.len(), 4);
    /// ```
    pub fn insert_many<E>(&mut self, elts: E) -> Result<()>
    where
        E: IntoIterator<Item = (K, V)>,
        C: Compare<K>,
    {
        for (k, v) in elts {
            self.tree.insert(k, v)?;
        }
        Ok(())
    }

    /// Remove the binding for `k` and return its value, or `None` if
    /// there was none. The node goes back to the pool. Runs in O(log(N))
    /// time.
    pub fn remove<Q>(&mut self, k: &Q) -> Option<V>
    where
        Q: ?Sized,
        K: Borrow<Q>,
        C: Compare<Q>,
    {
        self.tree.remove(k).map(|(_, v)| v)
    }

    /// Like `remove`, but also hands back the stored key.
    pub fn remove_entry<Q>(&mut self, k: &Q) -> Option<(K, V)>
    where
        Q: ?Sized,
        K: Borrow<Q>,
        C: Compare<Q>,
    {
        self.tree.remove(k)
    }

    /// Remove every entry. Nodes are released bottom up and the pool's
    /// allocation is kept, so the full capacity is available again.
    pub fn clear(&mut self) {
        self.tree.clear()
    }

    /// The entry with the least key.
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        self.tree.first()
    }

    /// The entry with the greatest key.
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        self.tree.last()
    }

    /// Iterate over the entries in ascending key order. The iterator is
    /// double ended, so `.rev()` walks them in descending order. A full
    /// traversal is O(N).
    pub fn iter(&self) -> Iter<'_, K, V> {
        self.tree.iter()
    }

    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys(self.iter())
    }

    pub fn values(&self) -> Values<'_, K, V> {
        Values(self.iter())
    }

    /// Call `f` on every entry in ascending key order.
    ///
    /// # Examples
    /// ```
    /// use pooled_avl::Map;
    ///
    /// let mut m = Map::new(8).unwrap();
    /// m.insert_many([(3, 'c'), (1, 'a'), (2, 'b')]).unwrap();
    /// let mut s = String::new();
    /// m.inorder(|_, c| s.push(*c));
    /// assert_eq!(s, "abc");
    /// ```
    pub fn inorder<F>(&self, mut f: F)
    where
        F: FnMut(&K, &V),
    {
        for (k, v) in self.iter() {
            f(k, v)
        }
    }
}

impl<K, V, C> Map<K, V, C>
where
    K: Debug,
    V: Debug,
    C: Compare<K>,
{
    #[allow(dead_code)]
    pub(crate) fn invariant(&self) {
        self.tree.invariant()
    }
}

impl<K, V, C> Default for Map<K, V, C>
where
    C: Default,
{
    /// An empty map with [`DEFAULT_CAPACITY`] slots.
    fn default() -> Self {
        Map {
            tree: Tree::new(Pool::with_capacity(DEFAULT_CAPACITY), C::default()),
        }
    }
}

impl<K, V, C> Debug for Map<K, V, C>
where
    K: Debug,
    V: Debug,
{
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        Debug::fmt(&self.tree, f)
    }
}

/// Two maps are equal when they hold equal entries in the same order,
/// whatever their capacities.
impl<K, V, C> PartialEq for Map<K, V, C>
where
    K: PartialEq,
    V: PartialEq,
{
    fn eq(&self, other: &Map<K, V, C>) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<K, V, C> Eq for Map<K, V, C>
where
    K: Eq,
    V: Eq,
{
}

impl<'a, Q, K, V, C> Index<&'a Q> for Map<K, V, C>
where
    Q: ?Sized,
    K: Borrow<Q>,
    C: Compare<Q>,
{
    type Output = V;

    fn index(&self, k: &Q) -> &V {
        self.get(k).expect("element not found for key")
    }
}

impl<'a, K, V, C> IntoIterator for &'a Map<K, V, C> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// The keys of a [`Map`] in ascending order.
pub struct Keys<'a, K, V>(Iter<'a, K, V>);

impl<'a, K, V> Clone for Keys<'a, K, V> {
    fn clone(&self) -> Self {
        Keys(self.0.clone())
    }
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        self.0.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<'a, K, V> DoubleEndedIterator for Keys<'a, K, V> {
    fn next_back(&mut self) -> Option<&'a K> {
        self.0.next_back().map(|(k, _)| k)
    }
}

impl<'a, K, V> ExactSizeIterator for Keys<'a, K, V> {}
impl<'a, K, V> FusedIterator for Keys<'a, K, V> {}

/// The values of a [`Map`] in ascending key order.
pub struct Values<'a, K, V>(Iter<'a, K, V>);

impl<'a, K, V> Clone for Values<'a, K, V> {
    fn clone(&self) -> Self {
        Values(self.0.clone())
    }
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<&'a V> {
        self.0.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<'a, K, V> DoubleEndedIterator for Values<'a, K, V> {
    fn next_back(&mut self) -> Option<&'a V> {
        self.0.next_back().map(|(_, v)| v)
    }
}

impl<'a, K, V> ExactSizeIterator for Values<'a, K, V> {}
impl<'a, K, V> FusedIterator for Values<'a, K, V> {}
