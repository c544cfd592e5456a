//! # Simulation Events
//!
//! What a frame reports back to its caller. The UI decides what to show
//! from these instead of reading simulation internals.

use horde_shared::Vec2;

use crate::stats::FrameStats;

/// Top-level game state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum GameState {
    /// Frames advance the simulation.
    Running,
    /// Waiting for the player to pick a level-up reward.
    LevelUp,
    /// Frozen by the caller, or not started yet.
    #[default]
    Paused,
}

/// Something that happened during a frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SimEvent {
    /// A run was started and the world reset.
    RunStarted,
    /// The player fired.
    ProjectileFired {
        /// Muzzle position.
        position: Vec2,
        /// Shot direction.
        direction: Vec2,
    },
    /// A monster died.
    MonsterKilled {
        /// Where it died.
        position: Vec2,
        /// Whether it was a boss.
        boss: bool,
    },
    /// The player reached a new level; the game is now in [`GameState::LevelUp`].
    LevelUp {
        /// The new level.
        level: u32,
    },
    /// A wave of monsters spawned.
    WaveSpawned {
        /// Monsters in the wave.
        count: u32,
        /// How many reused Dead slots.
        recycled: usize,
    },
    /// Waves got shorter and larger.
    WaveEscalated {
        /// New scaled duration between waves.
        trigger_duration: f32,
        /// New wave size.
        monster_count: u32,
    },
}

/// Result of one [`crate::Simulation::update`] call.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameReport {
    /// Frame number (counts running frames only).
    pub frame: u64,
    /// Delta actually simulated, after clamping. Zero when not running.
    pub delta: f32,
    /// State after the frame.
    pub state: GameState,
    /// Events in the order they happened.
    pub events: Vec<SimEvent>,
    /// Sound cues dropped because the cue bus was full.
    pub dropped_cues: u32,
    /// Phase timings, when the frame ran.
    pub stats: Option<FrameStats>,
}

impl FrameReport {
    /// Whether the simulation advanced this call.
    #[inline]
    #[must_use]
    pub const fn ran(&self) -> bool {
        self.stats.is_some()
    }

    /// Whether a level-up happened this frame.
    #[must_use]
    pub fn leveled_up(&self) -> bool {
        self.events
            .iter()
            .any(|event| matches!(event, SimEvent::LevelUp { .. }))
    }

    /// Monsters killed this frame.
    #[must_use]
    pub fn kills(&self) -> usize {
        self.events
            .iter()
            .filter(|event| matches!(event, SimEvent::MonsterKilled { .. }))
            .count()
    }
}
