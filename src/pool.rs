use crate::error::{Error, Result};
use std::mem;

/// Slots are addressed by `u32`, which bounds the capacity of a pool.
pub(crate) const MAX_CAPACITY: usize = u32::MAX as usize;

/// The index of a slot in a [`Pool`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct Handle(u32);

impl Handle {
    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Node<K, V> {
    key: K,
    pub(crate) value: V,
    pub(crate) left: Option<Handle>,
    pub(crate) right: Option<Handle>,
    pub(crate) height: u16,
}

impl<K, V> Node<K, V> {
    fn new(key: K, value: V) -> Self {
        Node {
            key,
            value,
            left: None,
            right: None,
            height: 1,
        }
    }

    #[inline]
    pub(crate) fn key(&self) -> &K {
        &self.key
    }
}

/// A free slot carries only the free list link, an occupied slot carries
/// only tree data. A slot can't be both.
#[derive(Clone, Debug)]
enum Slot<K, V> {
    Free { next: Option<Handle> },
    Occupied(Node<K, V>),
}

/// A fixed number of node slots, allocated once, with an intrusive free
/// list threaded through the unused ones. Acquire and release are O(1).
/// The pool knows nothing about the tree built from its nodes.
#[derive(Clone, Debug)]
pub(crate) struct Pool<K, V> {
    slots: Box<[Slot<K, V>]>,
    free: Option<Handle>,
    live: usize,
}

impl<K, V> Pool<K, V> {
    pub(crate) fn new(capacity: usize) -> Result<Self> {
        if capacity > MAX_CAPACITY {
            return Err(Error::CapacityOverflow {
                requested: capacity,
                max: MAX_CAPACITY,
            });
        }
        let mut slots = Vec::new();
        slots.try_reserve_exact(capacity)?;
        Ok(Pool::threaded(slots, capacity))
    }

    /// like `new`, but aborts on allocation failure the way std collections
    /// do. `capacity` must not exceed `MAX_CAPACITY`.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        debug_assert!(capacity <= MAX_CAPACITY);
        Pool::threaded(Vec::with_capacity(capacity), capacity)
    }

    // the free list initially runs through the slots in index order
    fn threaded(mut slots: Vec<Slot<K, V>>, capacity: usize) -> Self {
        slots.extend((0..capacity).map(|i| Slot::Free {
            next: if i + 1 < capacity {
                Some(Handle(i as u32 + 1))
            } else {
                None
            },
        }));
        debug_log!(capacity, "node pool allocated");
        Pool {
            slots: slots.into_boxed_slice(),
            free: if capacity > 0 { Some(Handle(0)) } else { None },
            live: 0,
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn len(&self) -> usize {
        self.live
    }

    /// Take the head of the free list and build a childless node in it.
    /// Returns `None` when every slot is live.
    pub(crate) fn acquire(&mut self, key: K, value: V) -> Option<Handle> {
        let h = self.free?;
        let next = match self.slots[h.index()] {
            Slot::Free { next } => next,
            Slot::Occupied(_) => unreachable!("free list head {:?} is a live slot", h),
        };
        self.slots[h.index()] = Slot::Occupied(Node::new(key, value));
        self.free = next;
        self.live += 1;
        trace_log!(slot = h.index(), live = self.live, "slot acquired");
        Some(h)
    }

    /// Move the payload out of a live slot and push the slot onto the free
    /// list. The handle must not be used as live afterwards.
    pub(crate) fn release(&mut self, h: Handle) -> (K, V) {
        let slot = &mut self.slots[h.index()];
        if let Slot::Free { .. } = slot {
            unreachable!("release of free slot {:?}", h)
        }
        match mem::replace(slot, Slot::Free { next: self.free }) {
            Slot::Occupied(n) => {
                self.free = Some(h);
                self.live -= 1;
                trace_log!(slot = h.index(), live = self.live, "slot released");
                (n.key, n.value)
            }
            Slot::Free { .. } => unreachable!(),
        }
    }

    #[inline]
    pub(crate) fn node(&self, h: Handle) -> &Node<K, V> {
        match &self.slots[h.index()] {
            Slot::Occupied(n) => n,
            Slot::Free { .. } => unreachable!("handle {:?} refers to a free slot", h),
        }
    }

    #[inline]
    pub(crate) fn node_mut(&mut self, h: Handle) -> &mut Node<K, V> {
        match &mut self.slots[h.index()] {
            Slot::Occupied(n) => n,
            Slot::Free { .. } => unreachable!("handle {:?} refers to a free slot", h),
        }
    }

    /// every slot is either live or on the free list, exactly once
    #[allow(dead_code)]
    pub(crate) fn invariant(&self) {
        let mut on_free_list = vec![false; self.capacity()];
        let mut free = 0;
        let mut cur = self.free;
        while let Some(h) = cur {
            if on_free_list[h.index()] {
                panic!("slot {:?} is on the free list twice", h)
            }
            on_free_list[h.index()] = true;
            free += 1;
            cur = match self.slots[h.index()] {
                Slot::Free { next } => next,
                Slot::Occupied(_) => panic!("live slot {:?} is on the free list", h),
            };
        }
        let occupied = self
            .slots
            .iter()
            .filter(|s| matches!(s, Slot::Occupied(_)))
            .count();
        if occupied != self.live {
            panic!("live count is wrong {} vs {}", self.live, occupied)
        }
        if free + self.live != self.capacity() {
            panic!(
                "{} free + {} live slots don't account for capacity {}",
                free,
                self.live,
                self.capacity()
            )
        }
    }
}
