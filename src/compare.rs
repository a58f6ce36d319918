//! Ordering predicates for [`Map`](crate::map::Map).
//!
//! The map never asks for a full [`Ordering`](std::cmp::Ordering), only
//! whether one key orders strictly before another. Two keys for which
//! neither orders before the other are treated as the same key.

/// A strict weak ordering over `T`.
///
/// # Examples
/// ```
/// use pooled_avl::{Compare, Map};
///
/// let by_abs = |a: &i32, b: &i32| a.abs() < b.abs();
/// let mut m = Map::with_comparator(4, by_abs).unwrap();
/// m.insert(-3, "minus three").unwrap();
/// m.insert(1, "one").unwrap();
/// assert_eq!(m.insert(3, "three").unwrap(), Some("minus three"));
/// assert_eq!(m.keys().copied().collect::<Vec<_>>(), vec![1, -3]);
/// assert!(by_abs.less(&1, &-3));
/// ```
pub trait Compare<T: ?Sized> {
    /// true if `a` orders strictly before `b`
    fn less(&self, a: &T, b: &T) -> bool;
}

/// Ascending order per [`Ord`]. The default predicate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Natural;

impl<T: ?Sized + Ord> Compare<T> for Natural {
    #[inline]
    fn less(&self, a: &T, b: &T) -> bool {
        a < b
    }
}

/// Descending order per [`Ord`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Reverse;

impl<T: ?Sized + Ord> Compare<T> for Reverse {
    #[inline]
    fn less(&self, a: &T, b: &T) -> bool {
        a > b
    }
}

impl<T, F> Compare<T> for F
where
    T: ?Sized,
    F: Fn(&T, &T) -> bool,
{
    #[inline]
    fn less(&self, a: &T, b: &T) -> bool {
        self(a, b)
    }
}
