//! # Combat Resolver
//!
//! Monster jobs resolve hits against a read-only [`ProbeTable`] built from
//! the projectile pool before dispatch. A projectile hits at most one
//! monster: the first job to claim its probe wins, and the claims are
//! applied to the pool after the barrier.
//!
//! ```text
//! projectile pool ──build──> ProbeTable ──claim (atomic)──> StagingBuffer
//!                                │                              │
//!                         monster jobs read              merged after the
//!                         positions + damage             barrier, chunk order
//! ```

use std::sync::atomic::{AtomicBool, Ordering};

use horde_core::{Effect, EntityState, Monster, Player, Pool, Projectile, Source};
use horde_shared::Vec2;

use crate::audio::SoundCue;
use crate::config::{NumberConfig, PickupConfig};
use crate::rng::SimRng;
use crate::scheduler::{ProjectileClaim, StagingBuffer};
use crate::spawn::{self, SpriteBindings};

/// Snapshot of one living player projectile.
#[derive(Debug)]
pub struct ProjectileProbe {
    /// Slot in the projectile pool.
    pub slot: usize,
    /// Position at frame start.
    pub position: Vec2,
    /// Damage on hit.
    pub damage: f32,
    claimed: AtomicBool,
}

impl ProjectileProbe {
    /// Whether a monster already took this projectile.
    #[inline]
    #[must_use]
    pub fn is_claimed(&self) -> bool {
        self.claimed.load(Ordering::Acquire)
    }

    /// Takes the projectile. Only the first caller gets `true`.
    #[inline]
    pub fn claim(&self) -> bool {
        self.claimed
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}

/// Read-only view of the projectiles that can hit monsters this frame.
#[derive(Debug, Default)]
pub struct ProbeTable {
    probes: Vec<ProjectileProbe>,
}

impl ProbeTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshots every living player projectile, in storage order.
    #[must_use]
    pub fn build(projectiles: &Pool<Projectile>) -> Self {
        let mut table = Self::new();
        table.rebuild(projectiles);
        table
    }

    /// Refills the table, keeping its allocation.
    pub fn rebuild(&mut self, projectiles: &Pool<Projectile>) {
        self.probes.clear();
        self.probes.extend(
            projectiles
                .iter_alive()
                .filter(|(_, projectile)| projectile.source == Source::Player)
                .map(|(slot, projectile)| ProjectileProbe {
                    slot,
                    position: projectile.body.position,
                    damage: projectile.damage,
                    claimed: AtomicBool::new(false),
                }),
        );
    }

    /// Number of probes.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.probes.len()
    }

    /// Returns true when no projectile can hit this frame.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.probes.is_empty()
    }

    /// All probes, in projectile storage order.
    #[inline]
    #[must_use]
    pub fn probes(&self) -> &[ProjectileProbe] {
        &self.probes
    }
}

/// The player stats monster jobs need, copied before dispatch.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerView {
    /// Player position.
    pub position: Vec2,
    /// Walking speed (pickups home at a multiple of it).
    pub speed: f32,
    /// Critical chance in percent.
    pub critical_chance: f32,
    /// Critical damage multiplier.
    pub critical_damage_multiplier: f32,
}

impl PlayerView {
    /// Copies the relevant fields.
    #[must_use]
    pub fn of(player: &Player) -> Self {
        Self {
            position: player.body.position,
            speed: player.body.speed,
            critical_chance: player.critical_chance,
            critical_damage_multiplier: player.critical_damage_multiplier,
        }
    }
}

/// Everything a monster job needs to resolve hits.
#[derive(Clone, Copy, Debug)]
pub struct CombatRules<'a> {
    /// Projectiles in play.
    pub probes: &'a ProbeTable,
    /// Attacker stats.
    pub player: PlayerView,
    /// Loot tuning.
    pub pickup: &'a PickupConfig,
    /// Damage label tuning.
    pub number: &'a NumberConfig,
    /// Sprites for loot and labels.
    pub sprites: SpriteBindings,
}

/// What happened to one monster.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CombatOutcome {
    /// Projectiles that hit.
    pub hits: u32,
    /// The monster died this frame.
    pub killed: bool,
}

/// Resolves every probe against the monster in `slot`.
///
/// Hits land while the monster is alive; the kill stops the scan. A Dead
/// monster is left untouched and stages nothing.
pub fn resolve_monster(
    slot: usize,
    monster: &mut Monster,
    rules: &CombatRules<'_>,
    rng: &mut SimRng,
    staging: &mut StagingBuffer,
) -> CombatOutcome {
    let mut outcome = CombatOutcome::default();
    if !monster.body.is_alive() {
        return outcome;
    }

    for probe in rules.probes.probes() {
        if probe.is_claimed() {
            continue;
        }
        if monster.body.position.distance(probe.position) >= monster.body.scale {
            continue;
        }
        if !probe.claim() {
            continue;
        }

        let (damage, effect) = if rng.percent() < rules.player.critical_chance {
            (
                probe.damage * rules.player.critical_damage_multiplier,
                Effect::Critical,
            )
        } else {
            (probe.damage, Effect::Hit)
        };

        outcome.hits += 1;
        monster.body.health -= damage;
        monster.flash(Effect::Hit);
        staging.claims.push(ProjectileClaim {
            slot: probe.slot,
            effect,
        });
        staging.numbers.push(spawn::number(
            damage.max(0.0) as u32,
            monster.body.position,
            effect,
            rules.number,
            rules.sprites.digits,
        ));

        if monster.body.health <= 0.0 {
            monster.body.state = EntityState::Dead;
            staging.dead_monsters.push(slot);
            staging.pickups.push(spawn::experience_drop(
                monster,
                rules.pickup,
                rules.player.speed,
                rules.sprites.experience,
            ));
            staging.kills.push((monster.body.position, monster.is_boss));
            staging.cues.push(SoundCue::EnemyDeath);
            outcome.killed = true;
            break;
        }
        staging.cues.push(SoundCue::EnemyHit);
    }

    outcome
}
