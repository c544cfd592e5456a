//! # HORDE Core
//!
//! Entity storage for the arena simulation:
//! - Growable pools with tombstone recycling
//! - Generation-tagged handles
//! - One record type per entity kind
//!
//! ## Architecture Rules
//!
//! 1. **Pools never shrink** - Dead entities keep their slot until reused
//! 2. **No inheritance** - Kinds compose a shared `Body`
//! 3. **One owner per pool** - Parallel jobs get a whole pool or disjoint slices
//!
//! ## Example
//!
//! ```rust,ignore
//! use horde_core::{Pool, Projectile};
//!
//! let mut projectiles: Pool<Projectile> = Pool::new();
//! let handle = projectiles.spawn(Projectile::default());
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod ecs;
pub mod memory;

pub use ecs::{
    ArchetypeRef, Body, Effect, EntityHandle, EntityState, Monster, Number, Pickup, PickupKind,
    Player, Projectile, Run, Source, MAX_DIGITS, TINT_CRITICAL, TINT_HIT, TINT_NEUTRAL,
};
pub use memory::{Pool, Poolable, DEFAULT_GROWTH_CHUNK};
