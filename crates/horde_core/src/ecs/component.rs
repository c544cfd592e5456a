//! # Shared Entity Components
//!
//! Every entity kind embeds a [`Body`]: the transform, health, lifecycle
//! state and visual effect common to monsters, projectiles, pickups,
//! numbers and the player.

use horde_shared::constants::HIT_EFFECT_DURATION;
use horde_shared::Vec2;

/// Lifecycle state of an entity.
///
/// `Dead` does not mean removed: the slot stays in its pool and is reused by
/// the next spawn of the same kind.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum EntityState {
    /// Simulated, collidable and rendered.
    #[default]
    Alive = 0,
    /// Tombstone, waiting for reuse.
    Dead = 1,
}

/// Short-lived visual feedback tag. No gameplay effect.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Effect {
    /// No effect.
    #[default]
    None = 0,
    /// Took damage.
    Hit = 1,
    /// Critical hit.
    Critical = 2,
}

impl Effect {
    /// Numeric tag handed to the renderer.
    #[inline]
    #[must_use]
    pub const fn tag(self) -> u32 {
        self as u32
    }
}

/// Base shape shared by all entity kinds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Body {
    /// World position.
    pub position: Vec2,
    /// Movement direction (not necessarily normalized).
    pub direction: Vec2,
    /// Movement speed in units per second.
    pub speed: f32,
    /// Uniform scale; doubles as the collision radius for monsters.
    pub scale: f32,
    /// Health, meaningful for monsters and the player while alive.
    pub health: f32,
    /// Lifecycle state.
    pub state: EntityState,
    /// Visual effect tag.
    pub effect: Effect,
    /// Seconds until `effect` decays back to `None`.
    pub effect_timer: f32,
    /// Opaque handle into the external texture table.
    pub sprite_index: u32,
}

impl Default for Body {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            direction: Vec2::ZERO,
            speed: 1.0,
            scale: 1.0,
            health: 100.0,
            state: EntityState::Alive,
            effect: Effect::None,
            effect_timer: 0.0,
            sprite_index: 0,
        }
    }
}

impl Body {
    /// Creates a living body at `position`.
    #[must_use]
    pub fn at(position: Vec2) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Returns true while the entity is alive.
    #[inline]
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.state == EntityState::Alive
    }

    /// Applies a visual effect and restarts its timer.
    pub fn set_effect(&mut self, effect: Effect) {
        self.effect = effect;
        self.effect_timer = match effect {
            Effect::None => 0.0,
            Effect::Hit | Effect::Critical => HIT_EFFECT_DURATION,
        };
    }

    /// Decays the current effect. Returns true when it expired this call.
    pub fn tick_effect(&mut self, delta: f32) -> bool {
        if self.effect_timer > 0.0 {
            self.effect_timer -= delta;
            if self.effect_timer <= 0.0 {
                self.effect = Effect::None;
                self.effect_timer = 0.0;
                return true;
            }
        }
        false
    }

    /// Moves along `direction * speed * delta`.
    #[inline]
    pub fn advance(&mut self, delta: f32) {
        self.position += self.direction * (self.speed * delta);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effect_decays() {
        let mut body = Body::default();
        body.set_effect(Effect::Hit);
        assert_eq!(body.effect, Effect::Hit);

        assert!(!body.tick_effect(0.1));
        assert!(body.tick_effect(0.2));
        assert_eq!(body.effect, Effect::None);
        assert!(!body.tick_effect(0.2));
    }

    #[test]
    fn test_advance() {
        let mut body = Body::at(Vec2::new(1.0, 1.0));
        body.direction = Vec2::new(1.0, 0.0);
        body.speed = 2.0;
        body.advance(0.5);
        assert_eq!(body.position, Vec2::new(2.0, 1.0));
    }
}
