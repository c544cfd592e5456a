//! # Entity Kinds
//!
//! One record type per pooled kind, each embedding a [`Body`], plus the
//! singleton [`Player`] and the cumulative [`Run`] statistics.

use horde_shared::constants::{
    CRITICAL_CHANCE, CRITICAL_DAMAGE_MULTIPLIER, DIGIT_SPACING, MAX_STAMINA, PICKUP_DISTANCE,
    PLAYER_SPEED,
};
use horde_shared::Vec2;

use super::component::{Body, Effect, EntityState};
use crate::memory::Poolable;

/// Neutral sprite tint (RGBA).
pub const TINT_NEUTRAL: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

/// Tint flashed on a monster that took damage.
pub const TINT_HIT: [f32; 4] = [1.0, 0.35, 0.35, 1.0];

/// Tint flashed on a monster that took a critical hit.
pub const TINT_CRITICAL: [f32; 4] = [1.0, 0.85, 0.2, 1.0];

/// Who fired a projectile.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Source {
    /// Player weapon; collides with monsters.
    #[default]
    Player = 0,
    /// Monster attack.
    Monster = 1,
    /// Hazards.
    Environment = 2,
}

/// Kind of pickup.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PickupKind {
    /// Experience orb; homes toward the player.
    #[default]
    Experience = 0,
    /// Coins.
    Currency = 1,
    /// Healing.
    Health = 2,
    /// Temporary upgrade.
    Powerup = 3,
}

/// Archetype reference of a monster: set index, then type index in the set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ArchetypeRef {
    /// Index of the monster set.
    pub set: u16,
    /// Index of the type inside the set.
    pub kind: u16,
}

/// A hostile creature chasing the player.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Monster {
    /// Shared body.
    pub body: Body,
    /// Boss variant (boosted health and scale).
    pub is_boss: bool,
    /// Which catalog entry this monster was spawned from.
    pub archetype: ArchetypeRef,
    /// Sprite tint, flashed while an effect is active.
    pub tint: [f32; 4],
}

impl Default for Monster {
    fn default() -> Self {
        Self {
            body: Body::default(),
            is_boss: false,
            archetype: ArchetypeRef::default(),
            tint: TINT_NEUTRAL,
        }
    }
}

impl Monster {
    /// Applies a hit effect and the matching tint.
    pub fn flash(&mut self, effect: Effect) {
        self.body.set_effect(effect);
        self.tint = match effect {
            Effect::None => TINT_NEUTRAL,
            Effect::Hit => TINT_HIT,
            Effect::Critical => TINT_CRITICAL,
        };
    }

    /// Decays the effect timer, restoring the tint when it expires.
    pub fn tick_effect(&mut self, delta: f32) {
        if self.body.tick_effect(delta) {
            self.tint = TINT_NEUTRAL;
        }
    }
}

/// A moving damage source.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Projectile {
    /// Shared body.
    pub body: Body,
    /// Who fired it.
    pub source: Source,
    /// Damage dealt on hit.
    pub damage: f32,
    /// Remaining life; expires at zero.
    pub life: f32,
}

/// A collectible dropped by a dying monster.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Pickup {
    /// Shared body.
    pub body: Body,
    /// Pickup kind.
    pub kind: PickupKind,
    /// Amount granted on collection.
    pub value: f32,
}

/// Most decimal digits a `u32` can have.
pub const MAX_DIGITS: usize = 10;

/// A floating damage/experience label.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Number {
    /// Shared body.
    pub body: Body,
    /// Remaining life; expires at zero.
    pub life: f32,
    value: u32,
    digits: u8,
    glyphs: [u8; MAX_DIGITS],
}

impl Default for Number {
    fn default() -> Self {
        let mut number = Self {
            body: Body::default(),
            life: 0.0,
            value: 0,
            digits: 1,
            glyphs: [0; MAX_DIGITS],
        };
        number.set_value(0);
        number
    }
}

impl Number {
    /// Sets the value and recomputes the decimal digits.
    pub fn set_value(&mut self, value: u32) {
        self.value = value;
        let mut rest = value;
        let mut reversed = [0u8; MAX_DIGITS];
        let mut count = 0usize;
        loop {
            reversed[count] = (rest % 10) as u8;
            count += 1;
            rest /= 10;
            if rest == 0 {
                break;
            }
        }
        for (slot, digit) in self.glyphs.iter_mut().zip(reversed[..count].iter().rev()) {
            *slot = *digit;
        }
        self.digits = count as u8;
    }

    /// The displayed value.
    #[inline]
    #[must_use]
    pub const fn value(&self) -> u32 {
        self.value
    }

    /// Number of decimal digits.
    #[inline]
    #[must_use]
    pub const fn digits(&self) -> u32 {
        self.digits as u32
    }

    /// Decimal digits, most significant first.
    #[inline]
    #[must_use]
    pub fn glyphs(&self) -> &[u8] {
        &self.glyphs[..self.digits as usize]
    }

    /// Per-digit layout: `(digit, world position)`, centered on the label.
    pub fn layout(&self) -> impl Iterator<Item = (u8, Vec2)> + '_ {
        let step = DIGIT_SPACING * self.body.scale;
        let center = (f32::from(self.digits) - 1.0) * 0.5;
        self.glyphs().iter().enumerate().map(move |(i, &digit)| {
            let offset = (i as f32 - center) * step;
            (digit, self.body.position + Vec2::new(offset, 0.0))
        })
    }
}

macro_rules! impl_poolable {
    ($($kind:ty),*) => {
        $(
            impl Poolable for $kind {
                #[inline]
                fn is_alive(&self) -> bool {
                    self.body.is_alive()
                }

                #[inline]
                fn mark_dead(&mut self) {
                    self.body.state = EntityState::Dead;
                }
            }
        )*
    };
}

impl_poolable!(Monster, Projectile, Pickup, Number);

/// The singleton player. Never pooled.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Player {
    /// Shared body.
    pub body: Body,
    /// Accumulated experience (never reset on level-up).
    pub experience: f32,
    /// Current level, starting at 1.
    pub level: u32,
    /// Critical chance in percent (0-100).
    pub critical_chance: f32,
    /// Damage multiplier on a critical hit.
    pub critical_damage_multiplier: f32,
    /// Sprint resource.
    pub stamina: f32,
    /// Stamina cap.
    pub max_stamina: f32,
    /// Radius in which experience homes toward the player.
    pub pickup_distance: f32,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            body: Body {
                speed: PLAYER_SPEED,
                ..Body::default()
            },
            experience: 0.0,
            level: 1,
            critical_chance: CRITICAL_CHANCE,
            critical_damage_multiplier: CRITICAL_DAMAGE_MULTIPLIER,
            stamina: MAX_STAMINA,
            max_stamina: MAX_STAMINA,
            pickup_distance: PICKUP_DISTANCE,
        }
    }
}

/// Cumulative statistics of the current run.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Run {
    /// Monsters killed so far.
    pub monsters_killed: u32,
    /// Seconds of simulated play.
    pub duration: f32,
}

impl Run {
    /// Advances the run clock.
    pub fn update(&mut self, delta: f32) {
        self.duration += delta;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_digits() {
        let mut number = Number::default();
        number.set_value(1234);
        assert_eq!(number.digits(), 4);
        assert_eq!(number.glyphs(), &[1, 2, 3, 4]);

        number.set_value(0);
        assert_eq!(number.digits(), 1);
        assert_eq!(number.glyphs(), &[0]);

        number.set_value(u32::MAX);
        assert_eq!(number.digits(), 10);
    }

    #[test]
    fn test_number_layout_is_centered() {
        let mut number = Number::default();
        number.body.position = Vec2::new(10.0, 0.0);
        number.set_value(25);

        let xs: Vec<f32> = number.layout().map(|(_, p)| p.x).collect();
        assert_eq!(xs.len(), 2);
        assert!(((xs[0] + xs[1]) * 0.5 - 10.0).abs() < 1e-6);
        assert!(xs[0] < xs[1]);
    }

    #[test]
    fn test_monster_tint_restored() {
        let mut monster = Monster::default();
        monster.flash(Effect::Hit);
        assert_eq!(monster.tint, TINT_HIT);
        monster.tick_effect(1.0);
        assert_eq!(monster.tint, TINT_NEUTRAL);
        assert_eq!(monster.body.effect, Effect::None);
    }

    #[test]
    fn test_poolable_marks_dead() {
        let mut pickup = Pickup::default();
        assert!(pickup.is_alive());
        pickup.mark_dead();
        assert!(!pickup.is_alive());
    }
}
