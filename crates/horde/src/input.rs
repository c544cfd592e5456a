//! Player movement input.
//!
//! The caller samples its devices and hands a [`PlayerInput`] to
//! [`crate::Simulation::update`]. Axes are taken as-is (clamped to
//! `[-1, 1]`), so diagonal movement is faster than axial movement.

use horde_core::Player;
use horde_shared::Vec2;

use crate::config::PlayerConfig;

/// Movement intent for one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PlayerInput {
    /// Per-axis movement in `[-1, 1]`. Negative Y is up.
    pub movement: Vec2,
    /// Sprint while stamina lasts.
    pub sprint: bool,
}

impl PlayerInput {
    /// No movement.
    pub const IDLE: Self = Self {
        movement: Vec2::ZERO,
        sprint: false,
    };

    /// Movement without sprinting.
    #[must_use]
    pub const fn moving(x: f32, y: f32) -> Self {
        Self {
            movement: Vec2::new(x, y),
            sprint: false,
        }
    }
}

/// Moves the player and updates stamina. Returns true while sprinting.
pub fn apply_input(player: &mut Player, input: PlayerInput, tuning: &PlayerConfig, delta: f32) -> bool {
    let moving = input.movement != Vec2::ZERO;
    let sprinting = input.sprint && moving && player.stamina > 0.0;

    if sprinting {
        player.stamina = (player.stamina - tuning.stamina_drain * delta).max(0.0);
    } else {
        player.stamina = (player.stamina + tuning.stamina_regen * delta).min(player.max_stamina);
    }

    if moving {
        let speed = if sprinting {
            player.body.speed * tuning.sprint_multiplier
        } else {
            player.body.speed
        };
        let step = Vec2::new(
            input.movement.x.clamp(-1.0, 1.0),
            input.movement.y.clamp(-1.0, 1.0),
        );
        player.body.direction = step;
        player.body.position += step * (speed * delta);
    }

    sprinting
}
