//! # HORDE
//!
//! Per-frame simulation core of an arena survival game: waves of monsters
//! chase the player, auto-fired projectiles cut them down, experience drops
//! home in and level the player up.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                              HORDE                                      │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  ┌─────────────────┐     ┌─────────────────┐     ┌─────────────────┐   │
//! │  │  horde_shared   │     │   horde_core    │     │     config      │   │
//! │  │  • Vec2         │────>│  • Pool<T>      │     │  • SimConfig    │   │
//! │  │  • Constants    │     │  • Entity kinds │     │  • Catalog      │   │
//! │  └─────────────────┘     └────────┬────────┘     └────────┬────────┘   │
//! │                                   │                       │            │
//! │                          ┌────────v───────────────────────v────────┐   │
//! │                          │              Simulation                 │   │
//! │                          │  • spawn    • combat    • progression   │   │
//! │                          │  • scheduler (rayon workers + barrier)  │   │
//! │                          └────┬──────────────┬──────────────┬──────┘   │
//! │                               │              │              │          │
//! │                         RenderInstance   SoundCue     OverlaySnapshot  │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - `simulation`: Frame orchestration and the game state machine
//! - `scheduler`: Worker pool, partitioning, per-frame jobs
//! - `spawn` / `combat` / `progression`: Gameplay rules
//! - `render` / `overlay` / `audio`: Data handed to collaborators

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::pedantic)]

pub mod audio;
pub mod catalog;
pub mod combat;
pub mod config;
pub mod error;
pub mod events;
pub mod input;
pub mod overlay;
pub mod progression;
pub mod render;
pub mod rng;
pub mod scheduler;
pub mod simulation;
pub mod spawn;
pub mod stats;

pub use horde_core as core;
pub use horde_shared as shared;

pub use audio::{CueBus, CueReceiver, CueSender, SoundCue};
pub use catalog::{MonsterCatalog, MonsterDefinition, MonsterSet, MonsterSetDefinition, MonsterType};
pub use config::SimConfig;
pub use error::{HordeError, HordeResult};
pub use events::{FrameReport, GameState, SimEvent};
pub use input::PlayerInput;
pub use overlay::OverlaySnapshot;
pub use progression::required_experience;
pub use render::RenderInstance;
pub use rng::SimRng;
pub use scheduler::partition;
pub use simulation::Simulation;
pub use spawn::SpriteBindings;
pub use stats::{FrameStats, FrameStatsAccumulator};
