//! # Gameplay Constants
//!
//! Default tuning values for the arena simulation. Runtime configuration
//! (`horde::config`) starts from these and may override any of them.

// =============================================================================
// SPAWN RING
// =============================================================================

/// Inner spawn ring radius, as a multiple of the playfield half-width.
pub const SPAWN_RING_INNER: f32 = 1.5;

/// Outer spawn ring radius, as a multiple of the playfield half-width.
pub const SPAWN_RING_OUTER: f32 = 1.75;

/// Monsters farther than this multiple of the half-width are moved back
/// onto the spawn ring.
pub const DESPAWN_DISTANCE: f32 = 3.0;

/// Monsters per spawn wave at the start of a run.
pub const WAVE_MONSTER_COUNT: u32 = 128;

/// Scaled timer units between spawn waves.
pub const WAVE_TRIGGER_DURATION: f32 = 100.0;

/// Percentage chance (0-100) that a spawned monster is a boss.
pub const BOSS_CHANCE_PERCENT: f32 = 1.0;

/// Fixed health of a boss.
pub const BOSS_HEALTH: f32 = 250.0;

/// Scale multiplier applied to a boss.
pub const BOSS_SCALE_MULTIPLIER: f32 = 2.5;

/// Health of a regular monster.
pub const MONSTER_HEALTH: f32 = 100.0;

// =============================================================================
// PROJECTILES
// =============================================================================

/// Damage dealt by a projectile.
pub const PROJECTILE_DAMAGE: f32 = 25.0;

/// Starting life of a projectile (decays by `LIFE_DECAY_RATE` per second).
pub const PROJECTILE_LIFE: f32 = 100.0;

/// Projectile speed (units per second).
pub const PROJECTILE_SPEED: f32 = 15.0;

/// Projectile scale.
pub const PROJECTILE_SCALE: f32 = 0.5;

/// Life units removed per second from projectiles and numbers.
pub const LIFE_DECAY_RATE: f32 = 50.0;

/// Scaled timer units between two player shots.
pub const PLAYER_FIRE_INTERVAL: f32 = 5.0;

// =============================================================================
// PICKUPS & NUMBERS
// =============================================================================

/// Experience granted by a regular monster.
pub const EXPERIENCE_VALUE: f32 = 10.0;

/// Experience granted by a boss.
pub const BOSS_EXPERIENCE_VALUE: f32 = 100.0;

/// Experience pickup scale.
pub const EXPERIENCE_SCALE: f32 = 0.5;

/// Experience pickup scale when dropped by a boss.
pub const BOSS_EXPERIENCE_SCALE: f32 = 1.0;

/// Distance at which a homing pickup is consumed.
pub const PICKUP_CONSUME_DISTANCE: f32 = 1.0;

/// Starting life of a floating number.
pub const NUMBER_LIFE: f32 = 100.0;

/// Upward drift speed of a floating number.
pub const NUMBER_SPEED: f32 = 1.0;

/// Horizontal distance between two digits of a number, in glyph scales.
pub const DIGIT_SPACING: f32 = 0.5;

/// Scale multiplier for critical-hit numbers.
pub const CRITICAL_NUMBER_SCALE: f32 = 1.5;

// =============================================================================
// PLAYER
// =============================================================================

/// Player walking speed.
pub const PLAYER_SPEED: f32 = 5.0;

/// Critical chance in percent (0-100).
pub const CRITICAL_CHANCE: f32 = 5.0;

/// Damage multiplier on a critical hit.
pub const CRITICAL_DAMAGE_MULTIPLIER: f32 = 1.5;

/// Radius in which experience starts homing toward the player.
pub const PICKUP_DISTANCE: f32 = 3.0;

/// Maximum stamina.
pub const MAX_STAMINA: f32 = 100.0;

// =============================================================================
// LEVELING & TIMING
// =============================================================================

/// Base of the leveling curve `floor(base * level^exponent)`.
pub const LEVEL_CURVE_BASE: f32 = 500.0;

/// Exponent of the leveling curve.
pub const LEVEL_CURVE_EXPONENT: f32 = 1.25;

/// Multiplier applied to frame delta for the fire and spawn timers.
pub const TIMER_SCALE: f32 = 25.0;

/// Duration of the "hit" flash, in seconds.
pub const HIT_EFFECT_DURATION: f32 = 0.25;
