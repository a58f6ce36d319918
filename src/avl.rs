use crate::{
    compare::Compare,
    error::{Error, Result},
    pool::{Handle, Node, Pool},
};
use arrayvec::ArrayVec;
use std::{
    borrow::Borrow,
    cmp::max,
    fmt::{self, Debug, Formatter},
    iter::FusedIterator,
};

// a tree over at most u32::MAX nodes is less than 47 levels deep
pub(crate) const MAX_DEPTH: usize = 64;

/// The AVL engine. Nodes live in `pool`, links between them are handles.
#[derive(Clone)]
pub(crate) struct Tree<K, V, C> {
    root: Option<Handle>,
    pool: Pool<K, V>,
    cmp: C,
    len: usize,
}

impl<K, V, C> Tree<K, V, C> {
    pub(crate) fn new(pool: Pool<K, V>, cmp: C) -> Self {
        Tree {
            root: None,
            pool,
            cmp,
            len: 0,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn capacity(&self) -> usize {
        self.pool.capacity()
    }

    pub(crate) fn comparator(&self) -> &C {
        &self.cmp
    }

    pub(crate) fn height(&self) -> usize {
        self.height_of(self.root) as usize
    }

    #[inline]
    fn height_of(&self, t: Option<Handle>) -> u16 {
        match t {
            None => 0,
            Some(h) => self.pool.node(h).height,
        }
    }

    fn reheight(&mut self, x: Handle) {
        let n = self.pool.node(x);
        let h = 1 + max(self.height_of(n.left), self.height_of(n.right));
        self.pool.node_mut(x).height = h;
    }

    fn bias(&self, x: Handle) -> i32 {
        let n = self.pool.node(x);
        self.height_of(n.left) as i32 - self.height_of(n.right) as i32
    }

    // x's right child y becomes the subtree root, y's left subtree moves
    // under x
    fn rotate_left(&mut self, x: Handle) -> Handle {
        let y = match self.pool.node(x).right {
            Some(y) => y,
            None => unreachable!("left rotation of {:?} without a right child", x),
        };
        let inner = self.pool.node(y).left;
        self.pool.node_mut(x).right = inner;
        self.pool.node_mut(y).left = Some(x);
        self.reheight(x);
        self.reheight(y);
        trace_log!(from = x.index(), to = y.index(), "rotate left");
        y
    }

    fn rotate_right(&mut self, x: Handle) -> Handle {
        let y = match self.pool.node(x).left {
            Some(y) => y,
            None => unreachable!("right rotation of {:?} without a left child", x),
        };
        let inner = self.pool.node(y).right;
        self.pool.node_mut(x).left = inner;
        self.pool.node_mut(y).right = Some(x);
        self.reheight(x);
        self.reheight(y);
        trace_log!(from = x.index(), to = y.index(), "rotate right");
        y
    }

    /// Both subtrees of `x` are balanced and their heights differ by at
    /// most 2. Returns the root of the rebalanced subtree, at most two
    /// rotations.
    fn balance(&mut self, x: Handle) -> Handle {
        self.reheight(x);
        let b = self.bias(x);
        if b > 1 {
            if let Some(l) = self.pool.node(x).left {
                if self.bias(l) < 0 {
                    let l = self.rotate_left(l);
                    self.pool.node_mut(x).left = Some(l);
                }
            }
            self.rotate_right(x)
        } else if b < -1 {
            if let Some(r) = self.pool.node(x).right {
                if self.bias(r) > 0 {
                    let r = self.rotate_right(r);
                    self.pool.node_mut(x).right = Some(r);
                }
            }
            self.rotate_left(x)
        } else {
            x
        }
    }

    fn locate<Q>(&self, q: &Q) -> Option<Handle>
    where
        Q: ?Sized,
        K: Borrow<Q>,
        C: Compare<Q>,
    {
        let mut cur = self.root;
        while let Some(h) = cur {
            let n = self.pool.node(h);
            cur = if self.cmp.less(q, n.key().borrow()) {
                n.left
            } else if self.cmp.less(n.key().borrow(), q) {
                n.right
            } else {
                return Some(h);
            };
        }
        None
    }

    pub(crate) fn get_full<'a, Q>(&'a self, q: &Q) -> Option<(&'a K, &'a V)>
    where
        Q: ?Sized,
        K: Borrow<Q>,
        C: Compare<Q>,
    {
        self.locate(q).map(|h| {
            let n = self.pool.node(h);
            (n.key(), &n.value)
        })
    }

    pub(crate) fn get_mut<Q>(&mut self, q: &Q) -> Option<&mut V>
    where
        Q: ?Sized,
        K: Borrow<Q>,
        C: Compare<Q>,
    {
        let h = self.locate(q)?;
        Some(&mut self.pool.node_mut(h).value)
    }

    fn insert_at(&mut self, t: Option<Handle>, k: K, v: V) -> Result<(Handle, Option<V>)>
    where
        C: Compare<K>,
    {
        let x = match t {
            Some(x) => x,
            None => {
                return match self.pool.acquire(k, v) {
                    Some(h) => Ok((h, None)),
                    None => {
                        let capacity = self.pool.capacity();
                        warn_log!(capacity, "insert rejected, node pool exhausted");
                        Err(Error::Exhausted { capacity })
                    }
                }
            }
        };
        let n = self.pool.node(x);
        let (l, r) = (n.left, n.right);
        if self.cmp.less(&k, n.key()) {
            let (l, prev) = self.insert_at(l, k, v)?;
            self.pool.node_mut(x).left = Some(l);
            Ok((self.balance(x), prev))
        } else if self.cmp.less(n.key(), &k) {
            let (r, prev) = self.insert_at(r, k, v)?;
            self.pool.node_mut(x).right = Some(r);
            Ok((self.balance(x), prev))
        } else {
            let prev = std::mem::replace(&mut self.pool.node_mut(x).value, v);
            Ok((x, Some(prev)))
        }
    }

    /// Insert or overwrite the binding for `k`. On `Err` nothing has been
    /// linked, relinked or reheighted.
    pub(crate) fn insert(&mut self, k: K, v: V) -> Result<Option<V>>
    where
        C: Compare<K>,
    {
        let (root, prev) = self.insert_at(self.root, k, v)?;
        self.root = Some(root);
        if prev.is_none() {
            self.len += 1;
        }
        Ok(prev)
    }

    // detach the leftmost node of the subtree at x, returning the new
    // subtree root and the detached node
    fn remove_min(&mut self, x: Handle) -> (Option<Handle>, Handle) {
        let n = self.pool.node(x);
        let (l, r) = (n.left, n.right);
        match l {
            None => (r, x),
            Some(l) => {
                let (l, min) = self.remove_min(l);
                self.pool.node_mut(x).left = l;
                (Some(self.balance(x)), min)
            }
        }
    }

    fn remove_at<Q>(&mut self, t: Option<Handle>, q: &Q) -> (Option<Handle>, Option<(K, V)>)
    where
        Q: ?Sized,
        K: Borrow<Q>,
        C: Compare<Q>,
    {
        let x = match t {
            None => return (None, None),
            Some(x) => x,
        };
        let n = self.pool.node(x);
        let (l, r) = (n.left, n.right);
        if self.cmp.less(q, n.key().borrow()) {
            let (l, removed) = self.remove_at(l, q);
            self.pool.node_mut(x).left = l;
            (Some(self.balance(x)), removed)
        } else if self.cmp.less(n.key().borrow(), q) {
            let (r, removed) = self.remove_at(r, q);
            self.pool.node_mut(x).right = r;
            (Some(self.balance(x)), removed)
        } else {
            let root = match r {
                None => l,
                Some(r) => {
                    let (r, succ) = self.remove_min(r);
                    let s = self.pool.node_mut(succ);
                    s.left = l;
                    s.right = r;
                    Some(self.balance(succ))
                }
            };
            (root, Some(self.pool.release(x)))
        }
    }

    pub(crate) fn remove<Q>(&mut self, q: &Q) -> Option<(K, V)>
    where
        Q: ?Sized,
        K: Borrow<Q>,
        C: Compare<Q>,
    {
        let (root, removed) = self.remove_at(self.root, q);
        self.root = root;
        if removed.is_some() {
            self.len -= 1;
        }
        removed
    }

    fn release_postorder(&mut self, t: Option<Handle>) {
        if let Some(x) = t {
            let n = self.pool.node(x);
            let (l, r) = (n.left, n.right);
            self.release_postorder(l);
            self.release_postorder(r);
            self.pool.release(x);
        }
    }

    /// Return every live node to the free list, keeping the allocation.
    pub(crate) fn clear(&mut self) {
        let root = self.root.take();
        self.release_postorder(root);
        debug_log!(released = self.len, "tree cleared");
        self.len = 0;
    }

    fn extreme(&self, leftmost: bool) -> Option<(&K, &V)> {
        let mut x = self.root?;
        loop {
            let n = self.pool.node(x);
            let next = if leftmost { n.left } else { n.right };
            match next {
                Some(c) => x = c,
                None => return Some((n.key(), &n.value)),
            }
        }
    }

    pub(crate) fn first(&self) -> Option<(&K, &V)> {
        self.extreme(true)
    }

    pub(crate) fn last(&self) -> Option<(&K, &V)> {
        self.extreme(false)
    }

    pub(crate) fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(&self.pool, self.root, self.len)
    }
}

impl<K, V, C> Debug for Tree<K, V, C>
where
    K: Debug,
    V: Debug,
{
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// In-order iterator over the entries of a [`Map`](crate::map::Map),
/// ascending from the front and descending from the back.
pub struct Iter<'a, K, V> {
    pool: &'a Pool<K, V>,
    front: ArrayVec<Handle, MAX_DEPTH>,
    back: ArrayVec<Handle, MAX_DEPTH>,
    remaining: usize,
}

impl<'a, K, V> Iter<'a, K, V> {
    fn new(pool: &'a Pool<K, V>, root: Option<Handle>, len: usize) -> Self {
        let mut it = Iter {
            pool,
            front: ArrayVec::new(),
            back: ArrayVec::new(),
            remaining: len,
        };
        it.push_left_spine(root);
        it.push_right_spine(root);
        it
    }

    fn push_left_spine(&mut self, mut t: Option<Handle>) {
        while let Some(h) = t {
            self.front.push(h);
            t = self.pool.node(h).left;
        }
    }

    fn push_right_spine(&mut self, mut t: Option<Handle>) {
        while let Some(h) = t {
            self.back.push(h);
            t = self.pool.node(h).right;
        }
    }
}

impl<'a, K, V> Clone for Iter<'a, K, V> {
    fn clone(&self) -> Self {
        Iter {
            pool: self.pool,
            front: self.front.clone(),
            back: self.back.clone(),
            remaining: self.remaining,
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let h = self.front.pop()?;
        let pool = self.pool;
        let n: &'a Node<K, V> = pool.node(h);
        self.push_left_spine(n.right);
        self.remaining -= 1;
        Some((n.key(), &n.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, K, V> DoubleEndedIterator for Iter<'a, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let h = self.back.pop()?;
        let pool = self.pool;
        let n: &'a Node<K, V> = pool.node(h);
        self.push_right_spine(n.left);
        self.remaining -= 1;
        Some((n.key(), &n.value))
    }
}

impl<'a, K, V> ExactSizeIterator for Iter<'a, K, V> {}

impl<'a, K, V> FusedIterator for Iter<'a, K, V> {}

impl<K, V, C> Tree<K, V, C>
where
    K: Debug,
    V: Debug,
{
    /// Check heights, balance, ordering, the count and the pool, panicking
    /// with a description of the first violation found.
    #[allow(dead_code)]
    pub(crate) fn invariant(&self)
    where
        C: Compare<K>,
    {
        fn check<K, V, C>(
            t: &Tree<K, V, C>,
            x: Option<Handle>,
            lower: Option<&K>,
            upper: Option<&K>,
            seen: &mut [bool],
        ) -> (u16, usize)
        where
            K: Debug,
            V: Debug,
            C: Compare<K>,
        {
            let x = match x {
                None => return (0, 0),
                Some(x) => x,
            };
            if seen[x.index()] {
                panic!("slot {:?} is linked into the tree twice", x)
            }
            seen[x.index()] = true;
            let n = t.pool.node(x);
            if let Some(lower) = lower {
                if !t.cmp.less(lower, n.key()) {
                    panic!("key {:?} is not above its lower bound {:?}", n.key(), lower)
                }
            }
            if let Some(upper) = upper {
                if !t.cmp.less(n.key(), upper) {
                    panic!("key {:?} is not below its upper bound {:?}", n.key(), upper)
                }
            }
            let (hl, cl) = check(t, n.left, lower, Some(n.key()), seen);
            let (hr, cr) = check(t, n.right, Some(n.key()), upper, seen);
            let h = 1 + max(hl, hr);
            if h != n.height {
                panic!("node height is wrong {} vs {} at {:?}", n.height, h, n.key())
            }
            if max(hl, hr) - std::cmp::min(hl, hr) > 1 {
                panic!("tree is unbalanced at {:?}: {} vs {}", n.key(), hl, hr)
            }
            (h, 1 + cl + cr)
        }

        let mut seen = vec![false; self.pool.capacity()];
        let (_height, count) = check(self, self.root, None, None, &mut seen);
        if count != self.len {
            panic!("len is wrong {} vs {}", self.len, count)
        }
        if self.pool.len() != self.len {
            panic!("pool holds {} live nodes, tree has {}", self.pool.len(), self.len)
        }
        self.pool.invariant();
    }
}
