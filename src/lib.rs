#![forbid(unsafe_code)]
//! A fixed capacity ordered map. See the map module for details.
//!
//! The map is an AVL tree whose nodes all come from a pool allocated once,
//! when the map is created. Removed nodes go back to the pool's free list
//! and are reused by later insertions, so a map never allocates after
//! construction, and a full map refuses new keys instead of growing.

#[macro_use]
mod tracing_helpers;

pub(crate) mod avl;
pub mod compare;
pub mod error;
pub mod map;
pub(crate) mod pool;
#[cfg(feature = "serde")]
mod serde_impls;

pub use crate::{
    compare::{Compare, Natural, Reverse},
    error::{Error, Result},
    map::{Map, DEFAULT_CAPACITY},
};

#[cfg(test)]
mod proptests;
