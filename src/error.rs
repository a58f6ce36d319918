use std::collections::TryReserveError;

/// Everything that can go wrong when building or growing a [`Map`](crate::map::Map).
///
/// A missing key is not an error, lookups and removals report it as `None`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Every slot of the node pool holds a live entry. The map is unchanged.
    #[error("node pool exhausted, all {capacity} slots are in use")]
    Exhausted { capacity: usize },

    /// Slots are addressed by `u32` handles, so the pool can't be larger.
    #[error("capacity {requested} exceeds the maximum pool size of {max}")]
    CapacityOverflow { requested: usize, max: usize },

    /// The backing array could not be allocated.
    #[error("failed to allocate the node pool")]
    Alloc(#[from] TryReserveError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
