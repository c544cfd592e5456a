//! # Simulation
//!
//! Frame orchestration and the game state machine.
//!
//! ```text
//! update(delta, input)
//! ┌──────────────────────────────────────────────────────────────────┐
//! │ 1. INPUT     clamp delta, move player, fire timer, probe table   │
//! │ 2. DISPATCH  pickup / projectile / number / monster jobs         │
//! │              ── barrier ──                                       │
//! │ 3. MERGE     claims, reclaims, staged spawns, cues, level-up     │
//! │ 4. SPAWN     wave escalation and the wave trigger                │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ```text
//!            start_run / resume            level-up
//!  Paused ─────────────────────> Running ───────────> LevelUp
//!    ^  <─────── pause ─────────    ^                    │
//!                                   └─ acknowledge ──────┘
//! ```

use std::sync::Arc;
use std::time::Instant;

use horde_core::{
    EntityHandle, Monster, Number, Pickup, Player, Pool, Projectile, Run, Source,
};
use horde_shared::Vec2;
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::audio::{CueSender, SoundCue};
use crate::catalog::MonsterCatalog;
use crate::combat::{CombatRules, PlayerView, ProbeTable};
use crate::config::SimConfig;
use crate::error::HordeResult;
use crate::events::{FrameReport, GameState, SimEvent};
use crate::input::{self, PlayerInput};
use crate::overlay::OverlaySnapshot;
use crate::progression;
use crate::render::{self, RenderInstance, RenderSource};
use crate::rng::SimRng;
use crate::scheduler::{FrameContext, FrameStaging, FrameWorld, StagingBuffer, WorkerPool};
use crate::spawn::{self, MonsterSpawner, SpriteBindings};
use crate::stats::{FrameStats, FrameStatsAccumulator};

/// Everything that lives in the arena.
struct Arena {
    monsters: Pool<Monster>,
    projectiles: Pool<Projectile>,
    pickups: Pool<Pickup>,
    numbers: Pool<Number>,
    player: Player,
    run: Run,
}

impl Arena {
    fn new(config: &SimConfig, sprites: SpriteBindings) -> Self {
        let chunk = config.workers.pool_growth_chunk;
        Self {
            monsters: Pool::with_growth_chunk(chunk),
            projectiles: Pool::with_growth_chunk(chunk),
            pickups: Pool::with_growth_chunk(chunk),
            numbers: Pool::with_growth_chunk(chunk),
            player: new_player(config, sprites),
            run: Run::default(),
        }
    }

    /// Kills every entity. Slots stay allocated for the next run.
    fn clear(&mut self) {
        kill_all(&mut self.monsters);
        kill_all(&mut self.projectiles);
        kill_all(&mut self.pickups);
        kill_all(&mut self.numbers);
    }

    /// Applies one job's staged output. Returns the number of dropped cues.
    fn merge(&mut self, staging: &StagingBuffer, cues: &CueSender, events: &mut Vec<SimEvent>) -> u32 {
        for claim in &staging.claims {
            if let Some(projectile) = self.projectiles.slots_mut().get_mut(claim.slot) {
                projectile.body.effect = claim.effect;
            }
            self.projectiles.kill(claim.slot);
        }
        for &slot in &staging.dead_monsters {
            self.monsters.reclaim(slot);
        }
        for &(position, boss) in &staging.kills {
            self.run.monsters_killed += 1;
            events.push(SimEvent::MonsterKilled { position, boss });
        }
        for pickup in &staging.pickups {
            self.pickups.spawn(*pickup);
        }
        for number in &staging.numbers {
            self.numbers.spawn(*number);
        }

        let mut dropped = 0;
        for &cue in &staging.cues {
            if !cues.send(cue) {
                dropped += 1;
            }
        }
        dropped
    }
}

fn kill_all<T: horde_core::Poolable>(pool: &mut Pool<T>) {
    for slot in 0..pool.len() {
        pool.kill(slot);
    }
}

fn new_player(config: &SimConfig, sprites: SpriteBindings) -> Player {
    let tuning = &config.player;
    let mut player = Player {
        critical_chance: tuning.critical_chance,
        critical_damage_multiplier: tuning.critical_damage_multiplier,
        stamina: tuning.max_stamina,
        max_stamina: tuning.max_stamina,
        pickup_distance: tuning.pickup_distance,
        ..Player::default()
    };
    player.body.speed = tuning.speed;
    player.body.scale = tuning.scale;
    player.body.health = tuning.health;
    player.body.sprite_index = sprites.player;
    player
}

/// The arena survival simulation.
///
/// # Example
///
/// ```rust,ignore
/// let bus = CueBus::new(config.workers.cue_capacity);
/// let mut sim = Simulation::new(config, catalog, sprites, bus.sender())?;
/// sim.start_run();
///
/// loop {
///     let report = sim.update(delta, input);
///     if report.leveled_up() {
///         // show rewards, then
///         sim.acknowledge_level_up();
///     }
///     sim.render_instances(&mut instances);
/// }
/// ```
pub struct Simulation {
    config: SimConfig,
    catalog: MonsterCatalog,
    sprites: SpriteBindings,
    workers: WorkerPool,
    rng: SimRng,
    arena: Arena,
    state: GameState,
    started: bool,
    fire_timer: f32,
    spawn_timer: f32,
    trigger_duration: f32,
    wave_size: u32,
    escalation_steps: u32,
    frame: u64,
    probes: ProbeTable,
    staging: FrameStaging,
    pending: Vec<SimEvent>,
    cues: CueSender,
    stats: Arc<Mutex<FrameStatsAccumulator>>,
}

impl Simulation {
    /// Builds a simulation. It starts [`GameState::Paused`] until
    /// [`Simulation::start_run`].
    ///
    /// # Errors
    ///
    /// [`crate::HordeError::InvalidConfig`] if the config does not validate,
    /// [`crate::HordeError::WorkerPool`] if the workers cannot start.
    pub fn new(
        config: SimConfig,
        catalog: MonsterCatalog,
        sprites: SpriteBindings,
        cues: CueSender,
    ) -> HordeResult<Self> {
        config.validate()?;

        let threads = config.workers.resolved_threads();
        let workers = WorkerPool::new(threads)?;
        let rng = config.seed.map_or_else(SimRng::from_clock, SimRng::seeded);
        let arena = Arena::new(&config, sprites);
        let stats = Arc::new(Mutex::new(FrameStatsAccumulator::new(
            config.timing.frame_budget_ms,
        )));

        info!(
            threads,
            monster_chunks = workers.monster_chunks(),
            monster_types = catalog.type_count(),
            seed = ?config.seed,
            "simulation created"
        );

        Ok(Self {
            trigger_duration: config.spawn.trigger_duration,
            wave_size: config.spawn.monster_count,
            config,
            catalog,
            sprites,
            workers,
            rng,
            arena,
            state: GameState::Paused,
            started: false,
            fire_timer: 0.0,
            spawn_timer: 0.0,
            escalation_steps: 0,
            frame: 0,
            probes: ProbeTable::new(),
            staging: FrameStaging::default(),
            pending: Vec::new(),
            cues,
            stats,
        })
    }

    /// Resets the arena and player, spawns the opening wave and starts
    /// running.
    pub fn start_run(&mut self) {
        self.arena.clear();
        self.arena.player = new_player(&self.config, self.sprites);
        self.arena.run = Run::default();
        self.fire_timer = 0.0;
        self.spawn_timer = 0.0;
        self.trigger_duration = self.config.spawn.trigger_duration;
        self.wave_size = self.config.spawn.monster_count;
        self.escalation_steps = 0;
        self.started = true;
        self.state = GameState::Running;
        self.pending.push(SimEvent::RunStarted);

        if self.config.spawn.initial_wave {
            let event = self.spawn_wave(self.wave_size);
            self.pending.push(event);
        }
        info!(wave_size = self.wave_size, "run started");
    }

    /// Freezes a running game.
    pub fn pause(&mut self) {
        if self.state == GameState::Running {
            self.state = GameState::Paused;
            debug!("paused");
        }
    }

    /// Unfreezes a paused game. Does nothing before [`Simulation::start_run`].
    pub fn resume(&mut self) {
        if self.state == GameState::Paused && self.started {
            self.state = GameState::Running;
            debug!("resumed");
        }
    }

    /// Pauses when running, resumes when paused. Ignored during a level-up.
    pub fn toggle_pause(&mut self) {
        match self.state {
            GameState::Running => self.pause(),
            GameState::Paused => self.resume(),
            GameState::LevelUp => {}
        }
    }

    /// Leaves the level-up screen.
    pub fn acknowledge_level_up(&mut self) {
        if self.state == GameState::LevelUp {
            self.state = GameState::Running;
        }
    }

    /// Advances one frame. Does nothing unless the state is Running.
    pub fn update(&mut self, delta: f32, input: PlayerInput) -> FrameReport {
        let mut report = FrameReport {
            frame: self.frame,
            state: self.state,
            events: std::mem::take(&mut self.pending),
            ..FrameReport::default()
        };
        if self.state != GameState::Running {
            return report;
        }

        let frame_start = Instant::now();
        let delta = if delta.is_finite() {
            delta.clamp(0.0, self.config.timing.max_delta)
        } else {
            0.0
        };
        report.delta = delta;

        // Input
        self.arena.run.update(delta);
        input::apply_input(&mut self.arena.player, input, &self.config.player, delta);
        self.fire_timer += delta * self.config.timing.timer_scale;
        if self.fire_timer > self.config.projectile.fire_interval {
            self.fire_timer = 0.0;
            let position = self.arena.player.body.position;
            let direction = spawn::fire_direction(&mut self.rng);
            self.spawn_projectile(Source::Player, position, direction);
            report.events.push(SimEvent::ProjectileFired { position, direction });
            if !self.cues.send(SoundCue::Laser) {
                report.dropped_cues += 1;
            }
        }
        self.probes.rebuild(&self.arena.projectiles);
        let input_done = Instant::now();

        // Dispatch
        let ctx = FrameContext {
            delta,
            config: &self.config,
            spawner: MonsterSpawner::new(
                &self.catalog,
                &self.config.spawn,
                self.config.playfield.half_width,
            ),
            combat: CombatRules {
                probes: &self.probes,
                player: PlayerView::of(&self.arena.player),
                pickup: &self.config.pickup,
                number: &self.config.number,
                sprites: self.sprites,
            },
        };
        let world = FrameWorld {
            monsters: &mut self.arena.monsters,
            projectiles: &mut self.arena.projectiles,
            pickups: &mut self.arena.pickups,
            numbers: &mut self.arena.numbers,
            player: &mut self.arena.player,
        };
        self.workers
            .dispatch(world, &ctx, &mut self.rng, &mut self.staging);
        let dispatch_done = Instant::now();

        // Merge
        for chunk in &self.staging.chunks {
            report.dropped_cues += self.arena.merge(chunk, &self.cues, &mut report.events);
        }
        report.dropped_cues += self
            .arena
            .merge(&self.staging.pickup, &self.cues, &mut report.events);
        let gained = self.staging.pickup.levels_gained;
        if gained > 0 {
            let reached = self.arena.player.level;
            self.state = GameState::LevelUp;
            // One event per level, oldest first
            for level in reached.saturating_sub(gained - 1)..=reached {
                report.events.push(SimEvent::LevelUp { level });
            }
            info!(level = reached, gained, experience = self.arena.player.experience, "level up");
        }
        let merge_done = Instant::now();

        // Spawn
        self.escalate(&mut report.events);
        self.spawn_timer += delta * self.config.timing.timer_scale;
        if self.spawn_timer > self.trigger_duration {
            self.spawn_timer = 0.0;
            let event = self.spawn_wave(self.wave_size);
            report.events.push(event);
        }
        let spawn_done = Instant::now();

        let stats = FrameStats {
            frame: self.frame,
            total_us: micros(frame_start, spawn_done),
            input_us: micros(frame_start, input_done),
            dispatch_us: micros(input_done, dispatch_done),
            merge_us: micros(dispatch_done, merge_done),
            spawn_us: micros(merge_done, spawn_done),
            monsters_alive: u32::try_from(self.arena.monsters.alive_count()).unwrap_or(u32::MAX),
        };
        if self.stats.lock().record(stats) {
            warn!(
                frame = self.frame,
                total_ms = stats.total_us as f64 / 1000.0,
                "frame exceeded budget"
            );
        }
        if report.dropped_cues > 0 {
            warn!(dropped = report.dropped_cues, "cue bus full, sound cues dropped");
        }
        debug!(
            frame = self.frame,
            monsters = self.arena.monsters.alive_count(),
            projectiles = self.arena.projectiles.alive_count(),
            events = report.events.len(),
            "frame done"
        );

        report.stats = Some(stats);
        report.state = self.state;
        self.frame += 1;
        report
    }

    fn escalate(&mut self, events: &mut Vec<SimEvent>) {
        let tuning = &self.config.spawn.escalation;
        if tuning.interval <= 0.0 {
            return;
        }
        let due = (self.arena.run.duration / tuning.interval) as u32;
        while self.escalation_steps < due {
            self.escalation_steps += 1;
            self.trigger_duration =
                (self.trigger_duration * tuning.duration_factor).max(tuning.min_trigger_duration);
            let cap = tuning.max_monster_count.max(self.wave_size);
            self.wave_size = self.wave_size.saturating_add(tuning.count_step).min(cap);
            info!(
                step = self.escalation_steps,
                trigger_duration = self.trigger_duration,
                wave_size = self.wave_size,
                "waves escalated"
            );
            events.push(SimEvent::WaveEscalated {
                trigger_duration: self.trigger_duration,
                monster_count: self.wave_size,
            });
        }
    }

    /// Spawns `count` monsters on the ring around the player.
    pub fn spawn_wave(&mut self, count: u32) -> SimEvent {
        let spawner = MonsterSpawner::new(
            &self.catalog,
            &self.config.spawn,
            self.config.playfield.half_width,
        );
        let recycled = spawner.spawn_wave(
            &mut self.arena.monsters,
            count,
            self.arena.player.body.position,
            &mut self.rng,
        );
        info!(
            count,
            recycled,
            alive = self.arena.monsters.alive_count(),
            "wave spawned"
        );
        SimEvent::WaveSpawned { count, recycled }
    }

    /// Spawns a projectile with the source's constants.
    pub fn spawn_projectile(&mut self, source: Source, position: Vec2, direction: Vec2) -> EntityHandle {
        let shot = spawn::projectile(
            source,
            self.config.projectile.stats(source),
            self.sprites.projectile,
            position,
            direction,
        );
        self.arena.projectiles.spawn(shot)
    }

    /// Inserts a prepared monster, recycling a Dead slot first.
    pub fn spawn_monster(&mut self, monster: Monster) -> EntityHandle {
        self.arena.monsters.spawn(monster)
    }

    /// Writes the render snapshot into `out`.
    pub fn render_instances(&self, out: &mut Vec<RenderInstance>) {
        render::collect_instances(
            &RenderSource {
                monsters: &self.arena.monsters,
                projectiles: &self.arena.projectiles,
                pickups: &self.arena.pickups,
                numbers: &self.arena.numbers,
                player: &self.arena.player,
            },
            out,
        );
    }

    /// HUD data.
    #[must_use]
    pub fn overlay(&self) -> OverlaySnapshot {
        let player = &self.arena.player;
        let remaining = (self.trigger_duration - self.spawn_timer).max(0.0);
        OverlaySnapshot {
            state: self.state,
            monsters: self.arena.monsters.alive_count(),
            projectiles: self.arena.projectiles.alive_count(),
            pickups: self.arena.pickups.alive_count(),
            numbers: self.arena.numbers.alive_count(),
            level: player.level,
            experience: player.experience,
            next_level_experience: progression::required_experience(
                player.level,
                &self.config.leveling,
            ),
            next_wave_in: remaining / self.config.timing.timer_scale,
            monsters_killed: self.arena.run.monsters_killed,
            run_duration: self.arena.run.duration,
            stamina: player.stamina,
            max_stamina: player.max_stamina,
        }
    }

    /// Current state.
    #[inline]
    #[must_use]
    pub const fn state(&self) -> GameState {
        self.state
    }

    /// Running frames so far.
    #[inline]
    #[must_use]
    pub const fn frame(&self) -> u64 {
        self.frame
    }

    /// The player.
    #[inline]
    #[must_use]
    pub const fn player(&self) -> &Player {
        &self.arena.player
    }

    /// The player, for level-up rewards.
    #[inline]
    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.arena.player
    }

    /// Run statistics.
    #[inline]
    #[must_use]
    pub const fn run(&self) -> &Run {
        &self.arena.run
    }

    /// Monster pool.
    #[inline]
    #[must_use]
    pub const fn monsters(&self) -> &Pool<Monster> {
        &self.arena.monsters
    }

    /// Projectile pool.
    #[inline]
    #[must_use]
    pub const fn projectiles(&self) -> &Pool<Projectile> {
        &self.arena.projectiles
    }

    /// Pickup pool.
    #[inline]
    #[must_use]
    pub const fn pickups(&self) -> &Pool<Pickup> {
        &self.arena.pickups
    }

    /// Number pool.
    #[inline]
    #[must_use]
    pub const fn numbers(&self) -> &Pool<Number> {
        &self.arena.numbers
    }

    /// Active configuration.
    #[inline]
    #[must_use]
    pub const fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Worker count.
    #[inline]
    #[must_use]
    pub const fn threads(&self) -> usize {
        self.workers.threads()
    }

    /// Current wave size, after escalation.
    #[inline]
    #[must_use]
    pub const fn wave_size(&self) -> u32 {
        self.wave_size
    }

    /// Current scaled wave interval, after escalation.
    #[inline]
    #[must_use]
    pub const fn trigger_duration(&self) -> f32 {
        self.trigger_duration
    }

    /// Copy of the accumulated frame statistics.
    #[must_use]
    pub fn stats(&self) -> FrameStatsAccumulator {
        self.stats.lock().clone()
    }

    /// Shared handle to the frame statistics, for observers on other threads.
    #[must_use]
    pub fn stats_handle(&self) -> Arc<Mutex<FrameStatsAccumulator>> {
        Arc::clone(&self.stats)
    }
}

fn micros(from: Instant, to: Instant) -> u64 {
    u64::try_from(to.duration_since(from).as_micros()).unwrap_or(u64::MAX)
}
