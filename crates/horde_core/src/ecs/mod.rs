//! # Entities
//!
//! Inheritance-free entity records: every kind embeds a [`Body`] and lives
//! in its own [`crate::Pool`].

mod component;
mod entity;
mod kinds;

pub use component::{Body, Effect, EntityState};
pub use entity::EntityHandle;
pub use kinds::{
    ArchetypeRef, Monster, Number, Pickup, PickupKind, Player, Projectile, Run, Source,
    MAX_DIGITS, TINT_CRITICAL, TINT_HIT, TINT_NEUTRAL,
};
