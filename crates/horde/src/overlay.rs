//! Overlay snapshot: the numbers a HUD shows.

use crate::events::GameState;

/// Read-only HUD data, copied out of the simulation.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct OverlaySnapshot {
    /// Game state.
    pub state: GameState,
    /// Living monsters.
    pub monsters: usize,
    /// Living projectiles.
    pub projectiles: usize,
    /// Living pickups.
    pub pickups: usize,
    /// Living floating numbers.
    pub numbers: usize,
    /// Player level.
    pub level: u32,
    /// Accumulated experience.
    pub experience: f32,
    /// Experience needed for the next level.
    pub next_level_experience: u32,
    /// Seconds until the next wave at the current pace.
    pub next_wave_in: f32,
    /// Monsters killed this run.
    pub monsters_killed: u32,
    /// Seconds played this run.
    pub run_duration: f32,
    /// Player stamina.
    pub stamina: f32,
    /// Stamina cap.
    pub max_stamina: f32,
}

impl OverlaySnapshot {
    /// Progress toward the next level in `[0, 1]`.
    #[must_use]
    pub fn level_progress(&self) -> f32 {
        if self.next_level_experience == 0 {
            return 1.0;
        }
        (self.experience / self.next_level_experience as f32).clamp(0.0, 1.0)
    }

    /// Total living entities, the player excluded.
    #[must_use]
    pub const fn entity_count(&self) -> usize {
        self.monsters + self.projectiles + self.pickups + self.numbers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_progress() {
        let snapshot = OverlaySnapshot {
            experience: 250.0,
            next_level_experience: 500,
            ..OverlaySnapshot::default()
        };
        assert!((snapshot.level_progress() - 0.5).abs() < 1e-6);

        let done = OverlaySnapshot {
            experience: 900.0,
            next_level_experience: 500,
            ..OverlaySnapshot::default()
        };
        assert_eq!(done.level_progress(), 1.0);
    }
}
