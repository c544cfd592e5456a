//! # HORDE Shared
//!
//! Math and tuning constants used by both the entity core and the
//! simulation crate.
//!
//! ## CRITICAL RULE
//!
//! This crate must NEVER depend on rendering, audio or windowing crates.
//! The simulation runs headless.

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod constants;
pub mod math;

pub use math::Vec2;
