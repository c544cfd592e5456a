//! # Parallel Update Scheduler
//!
//! A fixed rayon pool runs the per-frame jobs:
//!
//! ```text
//! ┌──────────────┐ ┌──────────────┐ ┌──────────────┐ ┌──────────────────────┐
//! │ Pickup job   │ │ Projectile   │ │ Number job   │ │ Monster job × chunks │
//! │ owns pickups │ │ job owns     │ │ owns numbers │ │ disjoint &mut slices │
//! │ and player   │ │ projectiles  │ │              │ │ + own StagingBuffer  │
//! └──────┬───────┘ └──────┬───────┘ └──────┬───────┘ └──────────┬───────────┘
//!        └────────────────┴──── scope end (barrier) ─────────────┘
//! ```
//!
//! No job touches a pool another job owns. Spawns that cross pools are
//! staged and merged on the calling thread after the barrier.

use std::ops::Range;

use horde_core::{Effect, Monster, Number, Pickup, PickupKind, Player, Pool, Projectile};
use horde_shared::Vec2;
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::debug;

use crate::audio::SoundCue;
use crate::combat::{self, CombatRules};
use crate::config::SimConfig;
use crate::error::{HordeError, HordeResult};
use crate::progression;
use crate::rng::SimRng;
use crate::spawn::{self, MonsterSpawner};

/// Jobs that are not monster chunks (pickup, projectile, number).
pub const FIXED_JOBS: usize = 3;

/// Splits `[0, len)` into `parts` contiguous near-equal ranges.
///
/// Ranges cover every index exactly once, in order. The first `len % parts`
/// ranges are one longer; when `parts > len` the trailing ranges are empty.
/// `parts` of zero is treated as one.
#[must_use]
pub fn partition(len: usize, parts: usize) -> Vec<Range<usize>> {
    let parts = parts.max(1);
    let base = len / parts;
    let extra = len % parts;

    let mut start = 0;
    (0..parts)
        .map(|part| {
            let size = base + usize::from(part < extra);
            let range = start..start + size;
            start += size;
            range
        })
        .collect()
}

/// A projectile taken by a monster, applied to the pool after the barrier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProjectileClaim {
    /// Slot in the projectile pool.
    pub slot: usize,
    /// Hit or Critical.
    pub effect: Effect,
}

/// Output a job produces for pools it does not own.
#[derive(Clone, Debug, Default)]
pub struct StagingBuffer {
    /// Pickups to spawn.
    pub pickups: Vec<Pickup>,
    /// Numbers to spawn.
    pub numbers: Vec<Number>,
    /// Sound cues, in emission order.
    pub cues: Vec<SoundCue>,
    /// Killed monsters: position and boss flag.
    pub kills: Vec<(Vec2, bool)>,
    /// Monster slots killed through a slice, to reclaim.
    pub dead_monsters: Vec<usize>,
    /// Projectiles consumed by hits.
    pub claims: Vec<ProjectileClaim>,
    /// Levels gained (pickup job only).
    pub levels_gained: u32,
}

impl StagingBuffer {
    /// Empties the buffer, keeping its allocations.
    pub fn clear(&mut self) {
        self.pickups.clear();
        self.numbers.clear();
        self.cues.clear();
        self.kills.clear();
        self.dead_monsters.clear();
        self.claims.clear();
        self.levels_gained = 0;
    }

    /// Returns true if nothing was staged.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pickups.is_empty()
            && self.numbers.is_empty()
            && self.cues.is_empty()
            && self.kills.is_empty()
            && self.dead_monsters.is_empty()
            && self.claims.is_empty()
            && self.levels_gained == 0
    }
}

/// Staging for a whole frame: the pickup job's buffer plus one buffer and
/// one random stream per monster chunk.
#[derive(Debug, Default)]
pub struct FrameStaging {
    /// Pickup job output.
    pub pickup: StagingBuffer,
    /// Monster chunk outputs, in chunk order.
    pub chunks: Vec<StagingBuffer>,
    /// Random streams forked for this frame, one per chunk.
    pub streams: Vec<SimRng>,
}

impl FrameStaging {
    /// Clears every buffer, sizes the chunk list and forks a fresh stream
    /// per chunk from `rng`.
    pub fn prepare(&mut self, chunks: usize, rng: &mut SimRng) {
        self.pickup.clear();
        self.chunks.resize_with(chunks, StagingBuffer::default);
        for chunk in &mut self.chunks {
            chunk.clear();
        }
        self.streams.clear();
        self.streams.extend((0..chunks).map(|_| rng.fork()));
    }
}

/// Read-only inputs shared by every job.
#[derive(Clone, Copy)]
pub struct FrameContext<'a> {
    /// Clamped frame delta in seconds.
    pub delta: f32,
    /// Tuning.
    pub config: &'a SimConfig,
    /// Ring placement for out-of-range monsters.
    pub spawner: MonsterSpawner<'a>,
    /// Hit resolution inputs.
    pub combat: CombatRules<'a>,
}

/// The pools a frame updates.
pub struct FrameWorld<'a> {
    /// Monster pool, split into chunks.
    pub monsters: &'a mut Pool<Monster>,
    /// Projectile pool.
    pub projectiles: &'a mut Pool<Projectile>,
    /// Pickup pool.
    pub pickups: &'a mut Pool<Pickup>,
    /// Number pool.
    pub numbers: &'a mut Pool<Number>,
    /// The player; only the pickup job writes to it.
    pub player: &'a mut Player,
}

/// Fixed-size worker pool.
pub struct WorkerPool {
    pool: ThreadPool,
    threads: usize,
}

impl WorkerPool {
    /// Starts `threads` named workers.
    ///
    /// # Errors
    ///
    /// [`HordeError::WorkerPool`] if the threads cannot be spawned.
    pub fn new(threads: usize) -> HordeResult<Self> {
        let threads = threads.max(1);
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|index| format!("horde-worker-{index}"))
            .build()
            .map_err(|e| HordeError::WorkerPool(e.to_string()))?;
        debug!(threads, "worker pool started");
        Ok(Self { pool, threads })
    }

    /// Worker count.
    #[inline]
    #[must_use]
    pub const fn threads(&self) -> usize {
        self.threads
    }

    /// Monster chunks per frame: the workers left after the fixed jobs, at
    /// least one.
    #[inline]
    #[must_use]
    pub const fn monster_chunks(&self) -> usize {
        let rest = self.threads.saturating_sub(FIXED_JOBS);
        if rest == 0 {
            1
        } else {
            rest
        }
    }

    /// Runs every job of the frame and blocks until all are done.
    ///
    /// Every monster chunk gets its own stream forked from `rng`, in chunk
    /// order.
    pub fn dispatch(
        &self,
        world: FrameWorld<'_>,
        ctx: &FrameContext<'_>,
        rng: &mut SimRng,
        staging: &mut FrameStaging,
    ) {
        let FrameWorld {
            monsters,
            projectiles,
            pickups,
            numbers,
            player,
        } = world;

        let ranges = partition(monsters.len(), self.monster_chunks());
        staging.prepare(ranges.len(), rng);
        let FrameStaging {
            pickup: pickup_staging,
            chunks,
            streams,
        } = staging;

        let mut rest = monsters.slots_mut();
        let mut monster_jobs = Vec::with_capacity(ranges.len());
        for ((range, chunk_staging), stream) in ranges.iter().zip(chunks.iter_mut()).zip(streams.iter_mut()) {
            let (chunk, tail) = std::mem::take(&mut rest).split_at_mut(range.len());
            rest = tail;
            monster_jobs.push((range.start, chunk, stream, chunk_staging));
        }

        self.pool.scope(move |scope| {
            scope.spawn(move |_| pickup_job(pickups, player, ctx, pickup_staging));
            scope.spawn(move |_| projectile_job(projectiles, ctx));
            scope.spawn(move |_| number_job(numbers, ctx));

            for (base, chunk, rng, chunk_staging) in monster_jobs {
                scope.spawn(move |_| monster_job(base, chunk, ctx, rng, chunk_staging));
            }
        });
    }
}

/// Homes experience toward the player and consumes it on contact.
pub fn pickup_job(
    pickups: &mut Pool<Pickup>,
    player: &mut Player,
    ctx: &FrameContext<'_>,
    staging: &mut StagingBuffer,
) {
    let tuning = &ctx.config.pickup;
    let delta = ctx.delta;

    for slot in 0..pickups.len() {
        let consumed = {
            let Some(pickup) = pickups.slots_mut().get_mut(slot) else {
                break;
            };
            if !pickup.body.is_alive() || pickup.kind != PickupKind::Experience {
                continue;
            }
            if pickup.body.position.distance(player.body.position) >= player.pickup_distance {
                continue;
            }

            let to_player = player.body.position - pickup.body.position;
            let remaining = to_player.length();
            pickup.body.direction = to_player.normalize_or_zero();
            pickup.body.speed =
                (pickup.body.speed + tuning.acceleration * delta).min(tuning.max_homing_speed);

            // Never step past the player
            let step = (pickup.body.speed * delta).min(remaining);
            pickup.body.position += pickup.body.direction * step;

            if remaining - step < tuning.consume_distance {
                Some(pickup.value)
            } else {
                None
            }
        };

        if let Some(value) = consumed {
            pickups.kill(slot);
            staging.cues.push(SoundCue::PickupXp);
            if ctx.config.number.show_experience {
                staging.numbers.push(spawn::number(
                    value.max(0.0) as u32,
                    player.body.position,
                    Effect::None,
                    &ctx.config.number,
                    ctx.combat.sprites.digits,
                ));
            }
            if progression::award_experience(player, value, &ctx.config.leveling) {
                staging.levels_gained += 1;
            }
        }
    }
}

/// Moves projectiles and expires them when their life runs out.
pub fn projectile_job(projectiles: &mut Pool<Projectile>, ctx: &FrameContext<'_>) {
    let decay = ctx.delta * ctx.config.projectile.life_decay;
    for slot in 0..projectiles.len() {
        let expired = match projectiles.slots_mut().get_mut(slot) {
            Some(projectile) if projectile.body.is_alive() => {
                projectile.body.advance(ctx.delta);
                projectile.life -= decay;
                projectile.life <= 0.0
            }
            _ => false,
        };
        if expired {
            projectiles.kill(slot);
        }
    }
}

/// Drifts numbers and expires them when their life runs out.
pub fn number_job(numbers: &mut Pool<Number>, ctx: &FrameContext<'_>) {
    let decay = ctx.delta * ctx.config.number.life_decay;
    for slot in 0..numbers.len() {
        let expired = match numbers.slots_mut().get_mut(slot) {
            Some(number) if number.body.is_alive() => {
                number.body.advance(ctx.delta);
                number.life -= decay;
                number.life <= 0.0
            }
            _ => false,
        };
        if expired {
            numbers.kill(slot);
        }
    }
}

/// Updates one contiguous chunk of monster slots starting at slot `base`.
pub fn monster_job(
    base: usize,
    chunk: &mut [Monster],
    ctx: &FrameContext<'_>,
    rng: &mut SimRng,
    staging: &mut StagingBuffer,
) {
    let target = ctx.combat.player.position;
    for (offset, monster) in chunk.iter_mut().enumerate() {
        if !monster.body.is_alive() {
            continue;
        }

        monster.tick_effect(ctx.delta);
        if ctx.spawner.is_out_of_range(monster.body.position, target) {
            monster.body.position = ctx.spawner.ring_position(target, rng);
        }
        monster.body.direction = (target - monster.body.position).normalize_or_zero();
        monster.body.advance(ctx.delta);

        combat::resolve_monster(base + offset, monster, &ctx.combat, rng, staging);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_covers(len: usize, parts: usize) {
        let ranges = partition(len, parts);
        assert_eq!(ranges.len(), parts.max(1));

        let mut next = 0;
        for range in &ranges {
            assert_eq!(range.start, next);
            next = range.end;
        }
        assert_eq!(next, len);

        let longest = ranges.iter().map(ExactSizeIterator::len).max().unwrap_or(0);
        let shortest = ranges.iter().map(ExactSizeIterator::len).min().unwrap_or(0);
        assert!(longest - shortest <= 1);
    }

    #[test]
    fn test_partition_covers_exactly_once() {
        for len in 0..40 {
            for parts in 0..12 {
                assert_covers(len, parts);
            }
        }
        assert_covers(100_000, 7);
    }

    #[test]
    fn test_partition_more_parts_than_items() {
        let ranges = partition(2, 5);
        assert_eq!(ranges, vec![0..1, 1..2, 2..2, 2..2, 2..2]);
    }

    #[test]
    fn test_monster_chunks() {
        assert_eq!(WorkerPool::new(1).unwrap().monster_chunks(), 1);
        assert_eq!(WorkerPool::new(4).unwrap().monster_chunks(), 1);
        assert_eq!(WorkerPool::new(8).unwrap().monster_chunks(), 5);
    }

    #[test]
    fn test_staging_clear() {
        let mut staging = StagingBuffer::default();
        staging.cues.push(SoundCue::Laser);
        staging.levels_gained = 2;
        assert!(!staging.is_empty());
        staging.clear();
        assert!(staging.is_empty());
    }

    #[test]
    fn test_frame_staging_resizes() {
        let mut rng = SimRng::seeded(1);
        let mut staging = FrameStaging::default();
        staging.prepare(4, &mut rng);
        staging.chunks[3].kills.push((Vec2::ZERO, false));
        staging.prepare(2, &mut rng);
        assert_eq!(staging.chunks.len(), 2);
        assert_eq!(staging.streams.len(), 2);
        assert!(staging.chunks.iter().all(StagingBuffer::is_empty));
    }
}
