//! # Spawn Subsystem
//!
//! Builders for every pooled kind. Each builder returns a fresh record; the
//! caller spawns it into the pool it owns, so recycling always follows the
//! pool's lowest-free-slot policy and never crosses threads.

use std::f32::consts::TAU;

use horde_core::{
    Body, Effect, Monster, Number, Pickup, PickupKind, Pool, Projectile, Source, TINT_NEUTRAL,
};
use horde_shared::Vec2;
use serde::{Deserialize, Serialize};

use crate::catalog::MonsterCatalog;
use crate::config::{NumberConfig, PickupConfig, ProjectileStats, SpawnConfig};
use crate::rng::SimRng;

/// Texture indices of kinds that do not come from the monster catalog.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpriteBindings {
    /// Player sprite.
    pub player: u32,
    /// Projectile sprite.
    pub projectile: u32,
    /// Experience orb sprite.
    pub experience: u32,
    /// Sprite of glyph `0`; glyph `d` uses `digits + d`.
    pub digits: u32,
}

/// Rolls monsters and places them on the spawn ring around the player.
#[derive(Clone, Copy, Debug)]
pub struct MonsterSpawner<'a> {
    catalog: &'a MonsterCatalog,
    tuning: &'a SpawnConfig,
    half_width: f32,
}

impl<'a> MonsterSpawner<'a> {
    /// Creates a spawner for a playfield of half-width `half_width`.
    #[must_use]
    pub const fn new(catalog: &'a MonsterCatalog, tuning: &'a SpawnConfig, half_width: f32) -> Self {
        Self {
            catalog,
            tuning,
            half_width,
        }
    }

    /// Uniform point on the spawn annulus around `center`.
    ///
    /// The radius is drawn as `sqrt(U * (outer² - inner²) + inner²)` so
    /// points are uniform over the ring's area.
    pub fn ring_position(&self, center: Vec2, rng: &mut SimRng) -> Vec2 {
        let inner = self.half_width * self.tuning.ring_inner;
        let outer = self.half_width * self.tuning.ring_outer;
        let rho = (rng.unit() * (outer * outer - inner * inner) + inner * inner).sqrt();
        let theta = rng.unit() * TAU;
        center + Vec2::from_polar(rho, theta)
    }

    /// Whether a monster at `position` has drifted out of play.
    #[inline]
    #[must_use]
    pub fn is_out_of_range(&self, position: Vec2, center: Vec2) -> bool {
        position.distance(center) > self.half_width * self.tuning.despawn_distance
    }

    /// Rolls one monster: archetype, ring position, speed, scale, boss.
    pub fn roll(&self, center: Vec2, rng: &mut SimRng) -> Monster {
        let (archetype, kind) = self.catalog.pick(rng);
        let mut body = Body::at(self.ring_position(center, rng));
        body.sprite_index = kind.sprite_index;
        body.speed = rng.range(self.tuning.speed_min, self.tuning.speed_max);
        body.scale = rng.range(self.tuning.scale_min, self.tuning.scale_max);
        body.health = self.tuning.monster_health;

        let is_boss = rng.percent() < self.tuning.boss_chance_percent;
        if is_boss {
            body.health = self.tuning.boss_health;
            body.scale *= self.tuning.boss_scale_multiplier;
        }

        Monster {
            body,
            is_boss,
            archetype,
            tint: TINT_NEUTRAL,
        }
    }

    /// Spawns `count` monsters. Returns how many slots were recycled.
    pub fn spawn_wave(
        &self,
        pool: &mut Pool<Monster>,
        count: u32,
        center: Vec2,
        rng: &mut SimRng,
    ) -> usize {
        let mut recycled = 0;
        for _ in 0..count {
            if pool.free_count() > 0 {
                recycled += 1;
            }
            let monster = self.roll(center, rng);
            pool.spawn(monster);
        }
        recycled
    }
}

/// Builds a projectile. `direction` is used as given, unnormalized.
#[must_use]
pub fn projectile(
    source: Source,
    stats: ProjectileStats,
    sprite_index: u32,
    position: Vec2,
    direction: Vec2,
) -> Projectile {
    Projectile {
        body: Body {
            direction,
            speed: stats.speed,
            scale: stats.scale,
            sprite_index,
            ..Body::at(position)
        },
        source,
        damage: stats.damage,
        life: stats.life,
    }
}

/// Player shot direction: independent jitter on both axes.
pub fn fire_direction(rng: &mut SimRng) -> Vec2 {
    let x = rng.signed_unit();
    let y = rng.signed_unit();
    Vec2::new(x, y)
}

/// Experience dropped where `monster` died.
#[must_use]
pub fn experience_drop(
    monster: &Monster,
    tuning: &PickupConfig,
    player_speed: f32,
    sprite_index: u32,
) -> Pickup {
    let (value, scale) = if monster.is_boss {
        (tuning.boss_experience_value, tuning.boss_scale)
    } else {
        (tuning.experience_value, tuning.scale)
    };
    Pickup {
        body: Body {
            speed: player_speed * tuning.homing_speed_factor,
            scale,
            sprite_index,
            ..Body::at(monster.body.position)
        },
        kind: PickupKind::Experience,
        value,
    }
}

/// Floating label drifting up from `position`.
#[must_use]
pub fn number(
    value: u32,
    position: Vec2,
    effect: Effect,
    tuning: &NumberConfig,
    digit_sprite: u32,
) -> Number {
    let scale = match effect {
        Effect::Critical => tuning.scale * tuning.critical_scale_multiplier,
        Effect::None | Effect::Hit => tuning.scale,
    };
    let mut label = Number::default();
    label.body = Body {
        direction: Vec2::UP,
        speed: tuning.speed,
        scale,
        effect,
        sprite_index: digit_sprite,
        ..Body::at(position)
    };
    label.life = tuning.life;
    label.set_value(value);
    label
}
