//! # Memory Management
//!
//! Pools for short-lived game objects.
//!
//! ## Design Philosophy
//!
//! Pools only grow. During gameplay:
//! - Killing an entity leaves a tombstone, never frees memory
//! - Spawning reuses the lowest tombstone before appending
//! - Growth reserves in chunks to bound reallocation cost

mod pool;

pub use pool::{Pool, Poolable, DEFAULT_GROWTH_CHUNK};
