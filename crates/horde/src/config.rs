//! # Simulation Configuration
//!
//! Loaded once at construction from TOML. Every section has defaults that
//! match the tuned game, so a config file only lists what it overrides:
//!
//! ```toml
//! seed = 42
//!
//! [playfield]
//! half_width = 20.0
//!
//! [spawn]
//! boss_chance_percent = 5.0
//!
//! [workers]
//! threads = 4
//! ```

use std::path::Path;

use horde_core::{Source, DEFAULT_GROWTH_CHUNK};
use horde_shared::constants::{
    BOSS_CHANCE_PERCENT, BOSS_EXPERIENCE_SCALE, BOSS_EXPERIENCE_VALUE, BOSS_HEALTH,
    BOSS_SCALE_MULTIPLIER, CRITICAL_CHANCE, CRITICAL_DAMAGE_MULTIPLIER, CRITICAL_NUMBER_SCALE,
    DESPAWN_DISTANCE, EXPERIENCE_SCALE, EXPERIENCE_VALUE, LEVEL_CURVE_BASE, LEVEL_CURVE_EXPONENT,
    LIFE_DECAY_RATE, MAX_STAMINA, MONSTER_HEALTH, NUMBER_LIFE, NUMBER_SPEED,
    PICKUP_CONSUME_DISTANCE, PICKUP_DISTANCE, PLAYER_FIRE_INTERVAL, PLAYER_SPEED,
    PROJECTILE_DAMAGE, PROJECTILE_LIFE, PROJECTILE_SCALE, PROJECTILE_SPEED, SPAWN_RING_INNER,
    SPAWN_RING_OUTER, TIMER_SCALE, WAVE_MONSTER_COUNT, WAVE_TRIGGER_DURATION,
};
use serde::{Deserialize, Serialize};

use crate::error::{HordeError, HordeResult};

/// Complete simulation configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// RNG seed. `None` seeds from the clock.
    pub seed: Option<u64>,
    /// Playfield extent.
    pub playfield: PlayfieldConfig,
    /// Monster spawning and waves.
    pub spawn: SpawnConfig,
    /// Projectile constants.
    pub projectile: ProjectileConfig,
    /// Pickup constants.
    pub pickup: PickupConfig,
    /// Floating number constants.
    pub number: NumberConfig,
    /// Player starting stats.
    pub player: PlayerConfig,
    /// Leveling curve.
    pub leveling: LevelingConfig,
    /// Timer pacing.
    pub timing: TimingConfig,
    /// Worker pool and buffers.
    pub workers: WorkerConfig,
}

/// Playfield extent, in world units.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayfieldConfig {
    /// Half of the visible width (the `R` of the spawn ring).
    pub half_width: f32,
    /// Half of the visible height.
    pub half_height: f32,
}

impl Default for PlayfieldConfig {
    fn default() -> Self {
        Self {
            half_width: 16.0,
            half_height: 9.0,
        }
    }
}

/// Monster spawning, bosses and wave pacing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    /// Inner ring radius as a multiple of the half-width.
    pub ring_inner: f32,
    /// Outer ring radius as a multiple of the half-width.
    pub ring_outer: f32,
    /// Respawn monsters beyond this multiple of the half-width.
    pub despawn_distance: f32,
    /// Scaled timer units between waves.
    pub trigger_duration: f32,
    /// Monsters per wave.
    pub monster_count: u32,
    /// Spawn a wave when a run starts.
    pub initial_wave: bool,
    /// Boss chance in percent (0-100).
    pub boss_chance_percent: f32,
    /// Fixed boss health.
    pub boss_health: f32,
    /// Boss scale multiplier.
    pub boss_scale_multiplier: f32,
    /// Regular monster health.
    pub monster_health: f32,
    /// Minimum monster speed.
    pub speed_min: f32,
    /// Maximum monster speed.
    pub speed_max: f32,
    /// Minimum monster scale.
    pub scale_min: f32,
    /// Maximum monster scale.
    pub scale_max: f32,
    /// Wave escalation over the run.
    pub escalation: EscalationConfig,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            ring_inner: SPAWN_RING_INNER,
            ring_outer: SPAWN_RING_OUTER,
            despawn_distance: DESPAWN_DISTANCE,
            trigger_duration: WAVE_TRIGGER_DURATION,
            monster_count: WAVE_MONSTER_COUNT,
            initial_wave: true,
            boss_chance_percent: BOSS_CHANCE_PERCENT,
            boss_health: BOSS_HEALTH,
            boss_scale_multiplier: BOSS_SCALE_MULTIPLIER,
            monster_health: MONSTER_HEALTH,
            speed_min: 0.5,
            speed_max: 2.5,
            scale_min: 0.5,
            scale_max: 1.0,
            escalation: EscalationConfig::default(),
        }
    }
}

/// Waves get shorter and larger as the run goes on.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EscalationConfig {
    /// Seconds of run time between two escalation steps. Zero disables.
    pub interval: f32,
    /// Trigger duration multiplier per step.
    pub duration_factor: f32,
    /// Trigger duration floor.
    pub min_trigger_duration: f32,
    /// Extra monsters per wave per step.
    pub count_step: u32,
    /// Wave size cap.
    pub max_monster_count: u32,
}

impl Default for EscalationConfig {
    fn default() -> Self {
        Self {
            interval: 60.0,
            duration_factor: 0.9,
            min_trigger_duration: 25.0,
            count_step: 16,
            max_monster_count: 1024,
        }
    }
}

/// Projectile constants for one source.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileStats {
    /// Damage on hit.
    pub damage: f32,
    /// Starting life.
    pub life: f32,
    /// Speed in units per second.
    pub speed: f32,
    /// Uniform scale.
    pub scale: f32,
}

impl Default for ProjectileStats {
    fn default() -> Self {
        Self {
            damage: PROJECTILE_DAMAGE,
            life: PROJECTILE_LIFE,
            speed: PROJECTILE_SPEED,
            scale: PROJECTILE_SCALE,
        }
    }
}

/// Projectile constants per source, plus firing pace.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileConfig {
    /// Player-fired projectiles.
    pub player: ProjectileStats,
    /// Monster-fired projectiles.
    pub monster: ProjectileStats,
    /// Environment hazards.
    pub environment: ProjectileStats,
    /// Life removed per second.
    pub life_decay: f32,
    /// Scaled timer units between player shots.
    pub fire_interval: f32,
}

impl Default for ProjectileConfig {
    fn default() -> Self {
        Self {
            player: ProjectileStats::default(),
            monster: ProjectileStats::default(),
            environment: ProjectileStats::default(),
            life_decay: LIFE_DECAY_RATE,
            fire_interval: PLAYER_FIRE_INTERVAL,
        }
    }
}

impl ProjectileConfig {
    /// Constants for projectiles fired by `source`.
    #[must_use]
    pub fn stats(&self, source: Source) -> ProjectileStats {
        match source {
            Source::Player => self.player,
            Source::Monster => self.monster,
            Source::Environment => self.environment,
        }
    }
}

/// Pickup constants.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickupConfig {
    /// Experience dropped by a regular monster.
    pub experience_value: f32,
    /// Experience dropped by a boss.
    pub boss_experience_value: f32,
    /// Regular experience scale.
    pub scale: f32,
    /// Boss experience scale.
    pub boss_scale: f32,
    /// Distance at which a homing pickup is consumed.
    pub consume_distance: f32,
    /// Homing speed as a multiple of the player's speed.
    pub homing_speed_factor: f32,
    /// Homing acceleration in units per second squared.
    pub acceleration: f32,
    /// Upper bound on homing speed.
    pub max_homing_speed: f32,
}

impl Default for PickupConfig {
    fn default() -> Self {
        Self {
            experience_value: EXPERIENCE_VALUE,
            boss_experience_value: BOSS_EXPERIENCE_VALUE,
            scale: EXPERIENCE_SCALE,
            boss_scale: BOSS_EXPERIENCE_SCALE,
            consume_distance: PICKUP_CONSUME_DISTANCE,
            homing_speed_factor: 2.0,
            acceleration: 10.0,
            max_homing_speed: 60.0,
        }
    }
}

/// Floating number constants.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NumberConfig {
    /// Starting life.
    pub life: f32,
    /// Life removed per second.
    pub life_decay: f32,
    /// Upward drift speed.
    pub speed: f32,
    /// Glyph scale.
    pub scale: f32,
    /// Scale multiplier for critical hits.
    pub critical_scale_multiplier: f32,
    /// Spawn a number with the XP value when experience is collected.
    pub show_experience: bool,
}

impl Default for NumberConfig {
    fn default() -> Self {
        Self {
            life: NUMBER_LIFE,
            life_decay: LIFE_DECAY_RATE,
            speed: NUMBER_SPEED,
            scale: 0.5,
            critical_scale_multiplier: CRITICAL_NUMBER_SCALE,
            show_experience: true,
        }
    }
}

/// Player starting stats.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Walking speed.
    pub speed: f32,
    /// Uniform scale.
    pub scale: f32,
    /// Starting health.
    pub health: f32,
    /// Critical chance in percent (0-100).
    pub critical_chance: f32,
    /// Critical damage multiplier.
    pub critical_damage_multiplier: f32,
    /// Experience homing radius.
    pub pickup_distance: f32,
    /// Stamina cap.
    pub max_stamina: f32,
    /// Speed multiplier while sprinting.
    pub sprint_multiplier: f32,
    /// Stamina spent per second of sprinting.
    pub stamina_drain: f32,
    /// Stamina recovered per second when not sprinting.
    pub stamina_regen: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            speed: PLAYER_SPEED,
            scale: 1.0,
            health: 100.0,
            critical_chance: CRITICAL_CHANCE,
            critical_damage_multiplier: CRITICAL_DAMAGE_MULTIPLIER,
            pickup_distance: PICKUP_DISTANCE,
            max_stamina: MAX_STAMINA,
            sprint_multiplier: 2.0,
            stamina_drain: 40.0,
            stamina_regen: 20.0,
        }
    }
}

/// Leveling curve `floor(base * level^exponent)`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelingConfig {
    /// Curve base.
    pub base: f32,
    /// Curve exponent.
    pub exponent: f32,
}

impl Default for LevelingConfig {
    fn default() -> Self {
        Self {
            base: LEVEL_CURVE_BASE,
            exponent: LEVEL_CURVE_EXPONENT,
        }
    }
}

/// Timer pacing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Multiplier applied to delta for the fire and spawn timers.
    pub timer_scale: f32,
    /// Longest delta accepted per frame, in seconds.
    pub max_delta: f32,
    /// Frame budget in milliseconds; slower frames are logged.
    pub frame_budget_ms: f32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            timer_scale: TIMER_SCALE,
            max_delta: 0.1,
            frame_budget_ms: 16.666,
        }
    }
}

/// Worker pool and buffer sizing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkerConfig {
    /// Worker threads. `None` uses the available hardware parallelism.
    pub threads: Option<usize>,
    /// Slots reserved per pool growth step.
    pub pool_growth_chunk: usize,
    /// Sound cues buffered before new ones are dropped.
    pub cue_capacity: usize,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            threads: None,
            pool_growth_chunk: DEFAULT_GROWTH_CHUNK,
            cue_capacity: 1024,
        }
    }
}

impl WorkerConfig {
    /// Number of worker threads to start.
    #[must_use]
    pub fn resolved_threads(&self) -> usize {
        self.threads.unwrap_or_else(|| {
            std::thread::available_parallelism().map_or(1, std::num::NonZeroUsize::get)
        })
    }
}

impl SimConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`HordeError::Parse`] on malformed TOML and
    /// [`HordeError::InvalidConfig`] when validation fails.
    pub fn from_toml_str(source: &str) -> HordeResult<Self> {
        let config: Self = toml::from_str(source).map_err(|e| HordeError::Parse {
            what: "config",
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`HordeError::Io`] if the file cannot be read, otherwise the
    /// errors of [`SimConfig::from_toml_str`].
    pub fn from_file(path: impl AsRef<Path>) -> HordeResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| HordeError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&source)
    }

    /// Checks that every value is usable.
    ///
    /// # Errors
    ///
    /// Returns [`HordeError::InvalidConfig`] naming the first bad field.
    pub fn validate(&self) -> HordeResult<()> {
        fn positive(name: &str, value: f32) -> HordeResult<()> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(HordeError::InvalidConfig(format!(
                    "{name} must be positive, got {value}"
                )))
            }
        }

        fn percent(name: &str, value: f32) -> HordeResult<()> {
            if (0.0..=100.0).contains(&value) {
                Ok(())
            } else {
                Err(HordeError::InvalidConfig(format!(
                    "{name} must be within 0..=100, got {value}"
                )))
            }
        }

        fn range(name: &str, min: f32, max: f32) -> HordeResult<()> {
            if min.is_finite() && max.is_finite() && min <= max {
                Ok(())
            } else {
                Err(HordeError::InvalidConfig(format!(
                    "{name} range is empty: {min}..={max}"
                )))
            }
        }

        positive("playfield.half_width", self.playfield.half_width)?;
        positive("playfield.half_height", self.playfield.half_height)?;

        let spawn = &self.spawn;
        positive("spawn.ring_inner", spawn.ring_inner)?;
        range("spawn.ring", spawn.ring_inner, spawn.ring_outer)?;
        if spawn.despawn_distance <= spawn.ring_outer {
            return Err(HordeError::InvalidConfig(format!(
                "spawn.despawn_distance ({}) must lie beyond the spawn ring ({})",
                spawn.despawn_distance, spawn.ring_outer
            )));
        }
        positive("spawn.trigger_duration", spawn.trigger_duration)?;
        percent("spawn.boss_chance_percent", spawn.boss_chance_percent)?;
        positive("spawn.boss_health", spawn.boss_health)?;
        positive("spawn.boss_scale_multiplier", spawn.boss_scale_multiplier)?;
        positive("spawn.monster_health", spawn.monster_health)?;
        positive("spawn.speed_min", spawn.speed_min)?;
        range("spawn.speed", spawn.speed_min, spawn.speed_max)?;
        positive("spawn.scale_min", spawn.scale_min)?;
        range("spawn.scale", spawn.scale_min, spawn.scale_max)?;
        if spawn.escalation.interval < 0.0 {
            return Err(HordeError::InvalidConfig(
                "spawn.escalation.interval must not be negative".to_string(),
            ));
        }
        positive(
            "spawn.escalation.min_trigger_duration",
            spawn.escalation.min_trigger_duration,
        )?;
        range(
            "spawn.escalation.duration_factor",
            0.0,
            spawn.escalation.duration_factor,
        )?;

        for (name, stats) in [
            ("projectile.player", &self.projectile.player),
            ("projectile.monster", &self.projectile.monster),
            ("projectile.environment", &self.projectile.environment),
        ] {
            positive(&format!("{name}.life"), stats.life)?;
            positive(&format!("{name}.scale"), stats.scale)?;
            if stats.damage < 0.0 || stats.speed < 0.0 {
                return Err(HordeError::InvalidConfig(format!(
                    "{name} damage and speed must not be negative"
                )));
            }
        }
        positive("projectile.life_decay", self.projectile.life_decay)?;
        positive("projectile.fire_interval", self.projectile.fire_interval)?;

        positive("pickup.consume_distance", self.pickup.consume_distance)?;
        positive("pickup.scale", self.pickup.scale)?;
        positive("pickup.boss_scale", self.pickup.boss_scale)?;
        positive("pickup.max_homing_speed", self.pickup.max_homing_speed)?;

        positive("number.life", self.number.life)?;
        positive("number.life_decay", self.number.life_decay)?;
        positive("number.scale", self.number.scale)?;

        positive("player.speed", self.player.speed)?;
        positive("player.scale", self.player.scale)?;
        positive("player.health", self.player.health)?;
        percent("player.critical_chance", self.player.critical_chance)?;
        positive(
            "player.critical_damage_multiplier",
            self.player.critical_damage_multiplier,
        )?;
        positive("player.pickup_distance", self.player.pickup_distance)?;
        positive("player.max_stamina", self.player.max_stamina)?;

        positive("leveling.base", self.leveling.base)?;
        positive("leveling.exponent", self.leveling.exponent)?;

        positive("timing.timer_scale", self.timing.timer_scale)?;
        positive("timing.max_delta", self.timing.max_delta)?;
        positive("timing.frame_budget_ms", self.timing.frame_budget_ms)?;

        if self.workers.threads == Some(0) {
            return Err(HordeError::InvalidConfig(
                "workers.threads must be at least 1".to_string(),
            ));
        }
        if self.workers.cue_capacity == 0 {
            return Err(HordeError::InvalidConfig(
                "workers.cue_capacity must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = SimConfig::default();
        config.validate().unwrap();
        assert_eq!(config.spawn.monster_count, 128);
        assert_eq!(config.projectile.player.damage, 25.0);
        assert_eq!(config.timing.timer_scale, 25.0);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = SimConfig::from_toml_str(
            r#"
            seed = 7

            [playfield]
            half_width = 20.0

            [spawn]
            boss_chance_percent = 50.0

            [workers]
            threads = 3
            "#,
        )
        .unwrap();

        assert_eq!(config.seed, Some(7));
        assert_eq!(config.playfield.half_width, 20.0);
        assert_eq!(config.playfield.half_height, 9.0);
        assert_eq!(config.spawn.boss_chance_percent, 50.0);
        assert_eq!(config.spawn.boss_health, 250.0);
        assert_eq!(config.workers.resolved_threads(), 3);
    }

    #[test]
    fn test_malformed_toml_rejected() {
        let err = SimConfig::from_toml_str("[spawn\nmonster_count = 3").unwrap_err();
        assert!(matches!(err, HordeError::Parse { what: "config", .. }));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut config = SimConfig::default();
        config.spawn.ring_outer = 1.0;
        assert!(matches!(config.validate(), Err(HordeError::InvalidConfig(_))));

        let mut config = SimConfig::default();
        config.spawn.boss_chance_percent = 150.0;
        assert!(config.validate().is_err());

        let mut config = SimConfig::default();
        config.workers.threads = Some(0);
        assert!(config.validate().is_err());

        let mut config = SimConfig::default();
        config.spawn.speed_min = 3.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_projectile_stats_per_source() {
        let mut config = ProjectileConfig::default();
        config.monster.damage = 5.0;
        assert_eq!(config.stats(Source::Monster).damage, 5.0);
        assert_eq!(config.stats(Source::Player).damage, 25.0);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = SimConfig::from_file("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, HordeError::Io { .. }));
    }
}
