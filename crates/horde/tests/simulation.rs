//! # Simulation Scenario Tests
//!
//! End-to-end frames through `Simulation::update`: combat, loot,
//! progression, the state machine and the render snapshot.
//!
//! Run with: cargo test --package horde --test simulation

use horde::core::{Body, Monster, PickupKind, Source};
use horde::shared::Vec2;
use horde::{
    CueBus, CueReceiver, GameState, HordeError, MonsterCatalog, PlayerInput, SimConfig, SimEvent,
    Simulation, SoundCue, SpriteBindings,
};

const FRAME: f32 = 1.0 / 60.0;
const MONSTER_SPRITE: u32 = 8;

const SPRITES: SpriteBindings = SpriteBindings {
    player: 0,
    projectile: 1,
    experience: 2,
    digits: 10,
};

fn quiet_config() -> SimConfig {
    let mut config = SimConfig::default();
    config.seed = Some(42);
    config.spawn.initial_wave = false;
    config.workers.threads = Some(2);
    config
}

fn simulation(config: SimConfig) -> (Simulation, CueReceiver) {
    let bus = CueBus::new(config.workers.cue_capacity);
    let sim = Simulation::new(
        config,
        MonsterCatalog::single("grunt", MONSTER_SPRITE),
        SPRITES,
        bus.sender(),
    )
    .expect("valid config");
    (sim, bus.receiver())
}

/// A started, empty arena where the player never lands critical hits.
fn arena() -> (Simulation, CueReceiver) {
    let (mut sim, cues) = simulation(quiet_config());
    sim.start_run();
    sim.player_mut().critical_chance = 0.0;
    (sim, cues)
}

fn still_monster(position: Vec2, health: f32) -> Monster {
    Monster {
        body: Body {
            position,
            speed: 0.0,
            scale: 1.0,
            health,
            sprite_index: MONSTER_SPRITE,
            ..Body::default()
        },
        ..Monster::default()
    }
}

// ============================================================================
// COMBAT
// ============================================================================

#[test]
fn hit_without_kill() {
    let (mut sim, cues) = arena();
    sim.spawn_monster(still_monster(Vec2::new(0.5, 0.0), 30.0));
    sim.spawn_projectile(Source::Player, Vec2::ZERO, Vec2::ZERO);

    let report = sim.update(FRAME, PlayerInput::IDLE);
    assert!(report.ran());
    assert_eq!(report.kills(), 0);

    let (_, monster) = sim.monsters().iter_alive().next().expect("monster alive");
    assert_eq!(monster.body.health, 5.0);
    assert_eq!(sim.projectiles().alive_count(), 0);
    assert_eq!(sim.pickups().alive_count(), 0);

    let numbers: Vec<u32> = sim.numbers().iter_alive().map(|(_, n)| n.value()).collect();
    assert_eq!(numbers, vec![25]);
    assert_eq!(cues.drain(), vec![SoundCue::EnemyHit]);
}

#[test]
fn kill_drops_experience() {
    let (mut sim, cues) = arena();
    sim.spawn_monster(still_monster(Vec2::new(0.5, 0.0), 20.0));
    sim.spawn_projectile(Source::Player, Vec2::ZERO, Vec2::ZERO);

    let report = sim.update(FRAME, PlayerInput::IDLE);

    assert_eq!(report.kills(), 1);
    assert_eq!(sim.monsters().alive_count(), 0);
    assert_eq!(sim.run().monsters_killed, 1);
    assert_eq!(cues.drain(), vec![SoundCue::EnemyDeath]);

    let pickups: Vec<_> = sim.pickups().iter_alive().map(|(_, p)| *p).collect();
    assert_eq!(pickups.len(), 1);
    assert_eq!(pickups[0].kind, PickupKind::Experience);
    assert_eq!(pickups[0].value, 10.0);
    assert_eq!(pickups[0].body.position, Vec2::new(0.5, 0.0));
    assert_eq!(pickups[0].body.sprite_index, SPRITES.experience);
}

#[test]
fn boss_drops_more_experience() {
    let (mut sim, _cues) = arena();
    let mut boss = still_monster(Vec2::new(0.5, 0.0), 20.0);
    boss.is_boss = true;
    sim.spawn_monster(boss);
    sim.spawn_projectile(Source::Player, Vec2::ZERO, Vec2::ZERO);

    let report = sim.update(FRAME, PlayerInput::IDLE);
    assert!(report
        .events
        .contains(&SimEvent::MonsterKilled { position: Vec2::new(0.5, 0.0), boss: true }));

    let (_, pickup) = sim.pickups().iter_alive().next().expect("boss loot");
    assert_eq!(pickup.value, 100.0);
    assert_eq!(pickup.body.scale, 1.0);
}

#[test]
fn monster_projectiles_do_not_hit_monsters() {
    let (mut sim, _cues) = arena();
    sim.spawn_monster(still_monster(Vec2::new(0.5, 0.0), 30.0));
    sim.spawn_projectile(Source::Monster, Vec2::ZERO, Vec2::ZERO);

    sim.update(FRAME, PlayerInput::IDLE);

    let (_, monster) = sim.monsters().iter_alive().next().expect("monster alive");
    assert_eq!(monster.body.health, 30.0);
    assert_eq!(sim.projectiles().alive_count(), 1);
}

#[test]
fn projectile_hits_only_one_monster_across_chunks() {
    let mut config = quiet_config();
    config.workers.threads = Some(8);
    let (mut sim, _cues) = simulation(config);
    sim.start_run();
    sim.player_mut().critical_chance = 0.0;

    for _ in 0..20 {
        sim.spawn_monster(still_monster(Vec2::new(0.5, 0.0), 30.0));
    }
    sim.spawn_projectile(Source::Player, Vec2::ZERO, Vec2::ZERO);

    sim.update(FRAME, PlayerInput::IDLE);

    let damaged = sim
        .monsters()
        .iter_alive()
        .filter(|(_, m)| m.body.health < 30.0)
        .count();
    assert_eq!(damaged, 1);
    assert_eq!(sim.numbers().alive_count(), 1);
}

// ============================================================================
// PROGRESSION
// ============================================================================

#[test]
fn experience_is_collected_next_frame() {
    let (mut sim, cues) = arena();
    sim.spawn_monster(still_monster(Vec2::new(0.5, 0.0), 20.0));
    sim.spawn_projectile(Source::Player, Vec2::ZERO, Vec2::ZERO);
    sim.update(FRAME, PlayerInput::IDLE);
    let _ = cues.drain();

    sim.update(FRAME, PlayerInput::IDLE);

    assert_eq!(sim.pickups().alive_count(), 0);
    assert_eq!(sim.player().experience, 10.0);
    assert_eq!(cues.drain(), vec![SoundCue::PickupXp]);
    assert!(sim.numbers().iter_alive().any(|(_, n)| n.value() == 10));
}

#[test]
fn level_up_pauses_until_acknowledged() {
    let (mut sim, _cues) = arena();
    sim.player_mut().experience = 495.0;
    sim.spawn_monster(still_monster(Vec2::new(0.5, 0.0), 20.0));
    sim.spawn_projectile(Source::Player, Vec2::ZERO, Vec2::ZERO);
    sim.update(FRAME, PlayerInput::IDLE);

    let report = sim.update(FRAME, PlayerInput::IDLE);
    assert!(report.leveled_up());
    assert!(report.events.contains(&SimEvent::LevelUp { level: 2 }));
    assert_eq!(sim.state(), GameState::LevelUp);
    assert_eq!(sim.player().level, 2);

    let frozen = sim.run().duration;
    let report = sim.update(FRAME, PlayerInput::IDLE);
    assert!(!report.ran());
    assert_eq!(sim.run().duration, frozen);

    sim.acknowledge_level_up();
    assert_eq!(sim.state(), GameState::Running);
    assert!(sim.update(FRAME, PlayerInput::IDLE).ran());
    assert_eq!(sim.overlay().next_level_experience, 1189);
}

#[test]
fn every_level_gained_in_a_frame_is_reported() {
    let (mut sim, _cues) = arena();
    // 1185 + 10 crosses 500, the next 10 crosses 1189
    sim.player_mut().experience = 1185.0;
    sim.spawn_monster(still_monster(Vec2::new(0.5, 0.0), 20.0));
    sim.spawn_monster(still_monster(Vec2::new(-0.5, 0.0), 20.0));
    sim.spawn_projectile(Source::Player, Vec2::ZERO, Vec2::ZERO);
    sim.spawn_projectile(Source::Player, Vec2::ZERO, Vec2::ZERO);
    assert_eq!(sim.update(FRAME, PlayerInput::IDLE).kills(), 2);

    let report = sim.update(FRAME, PlayerInput::IDLE);
    let levels: Vec<u32> = report
        .events
        .iter()
        .filter_map(|event| match event {
            SimEvent::LevelUp { level } => Some(*level),
            _ => None,
        })
        .collect();
    assert_eq!(levels, vec![2, 3]);
    assert_eq!(sim.player().level, 3);
    assert_eq!(sim.state(), GameState::LevelUp);
}

// ============================================================================
// STATE MACHINE
// ============================================================================

#[test]
fn new_simulation_waits_for_start() {
    let (mut sim, _cues) = simulation(quiet_config());
    assert_eq!(sim.state(), GameState::Paused);

    sim.resume();
    assert_eq!(sim.state(), GameState::Paused);
    assert!(!sim.update(FRAME, PlayerInput::IDLE).ran());
    assert_eq!(sim.frame(), 0);

    sim.start_run();
    let report = sim.update(FRAME, PlayerInput::IDLE);
    assert!(report.ran());
    assert_eq!(report.events.first(), Some(&SimEvent::RunStarted));
}

#[test]
fn pause_and_resume() {
    let (mut sim, _cues) = arena();
    sim.pause();
    assert_eq!(sim.state(), GameState::Paused);
    assert!(!sim.update(FRAME, PlayerInput::IDLE).ran());

    sim.toggle_pause();
    assert_eq!(sim.state(), GameState::Running);
    sim.toggle_pause();
    assert_eq!(sim.state(), GameState::Paused);
    sim.resume();
    assert!(sim.update(FRAME, PlayerInput::IDLE).ran());
}

#[test]
fn delta_is_clamped() {
    let (mut sim, _cues) = arena();
    let report = sim.update(5.0, PlayerInput::IDLE);
    assert_eq!(report.delta, 0.1);
    assert_eq!(sim.run().duration, 0.1);

    let report = sim.update(f32::NAN, PlayerInput::IDLE);
    assert_eq!(report.delta, 0.0);
}

#[test]
fn invalid_config_is_rejected() {
    let mut config = quiet_config();
    config.spawn.ring_inner = -1.0;
    let bus = CueBus::new(4);
    let result = Simulation::new(
        config,
        MonsterCatalog::single("grunt", MONSTER_SPRITE),
        SPRITES,
        bus.sender(),
    );
    assert!(matches!(result, Err(HordeError::InvalidConfig(_))));
}

// ============================================================================
// SPAWNING
// ============================================================================

#[test]
fn opening_wave_lands_on_the_ring() {
    let mut config = quiet_config();
    config.spawn.initial_wave = true;
    let (mut sim, _cues) = simulation(config);
    sim.start_run();

    let half_width = sim.config().playfield.half_width;
    assert_eq!(sim.monsters().alive_count(), 128);
    for (_, monster) in sim.monsters().iter_alive() {
        let distance = monster.body.position.length();
        assert!(distance >= 1.5 * half_width - 1e-3, "{distance}");
        assert!(distance <= 1.75 * half_width + 1e-3, "{distance}");
    }
}

#[test]
fn player_fires_on_the_timer() {
    let (mut sim, cues) = arena();

    let mut fired = 0;
    for _ in 0..30 {
        let report = sim.update(FRAME, PlayerInput::IDLE);
        fired += report
            .events
            .iter()
            .filter(|e| matches!(e, SimEvent::ProjectileFired { .. }))
            .count();
    }

    // 30 frames advance the fire timer by 12.5 units; a shot needs more than 5
    assert_eq!(fired, 2);
    assert_eq!(cues.drain(), vec![SoundCue::Laser, SoundCue::Laser]);
    assert!(sim
        .projectiles()
        .iter_alive()
        .all(|(_, p)| p.body.sprite_index == SPRITES.projectile));
}

#[test]
fn wave_trigger_spawns_monsters() {
    let (mut sim, _cues) = arena();

    let mut waves = Vec::new();
    for frame in 0..50 {
        let report = sim.update(0.1, PlayerInput::IDLE);
        for event in &report.events {
            if let SimEvent::WaveSpawned { count, .. } = event {
                waves.push((frame, *count));
            }
        }
    }

    assert_eq!(waves.len(), 1);
    assert!((38..=42).contains(&waves[0].0), "{waves:?}");
    assert_eq!(waves[0].1, 128);
}

#[test]
fn waves_escalate_over_the_run() {
    let mut config = quiet_config();
    config.spawn.escalation.interval = 1.0;
    let (mut sim, _cues) = simulation(config);
    sim.start_run();

    let mut escalations = 0;
    for _ in 0..25 {
        let report = sim.update(0.1, PlayerInput::IDLE);
        escalations += report
            .events
            .iter()
            .filter(|e| matches!(e, SimEvent::WaveEscalated { .. }))
            .count();
    }

    assert_eq!(escalations, 2);
    assert_eq!(sim.wave_size(), 160);
    assert!((sim.trigger_duration() - 81.0).abs() < 1e-3);
}

// ============================================================================
// RENDER & OVERLAY
// ============================================================================

#[test]
fn empty_arena_renders_only_the_player() {
    let (mut sim, _cues) = arena();
    let mut instances = Vec::new();
    sim.render_instances(&mut instances);
    assert_eq!(instances.len(), 1);
    assert_eq!(instances[0].sprite_index, SPRITES.player);

    sim.update(FRAME, PlayerInput::IDLE);
    sim.render_instances(&mut instances);
    assert_eq!(instances.len(), 1);
}

#[test]
fn dead_monsters_are_not_rendered() {
    let (mut sim, _cues) = arena();
    sim.spawn_monster(still_monster(Vec2::new(0.5, 0.0), 20.0));
    sim.spawn_projectile(Source::Player, Vec2::ZERO, Vec2::ZERO);
    sim.update(FRAME, PlayerInput::IDLE);

    let mut instances = Vec::new();
    sim.render_instances(&mut instances);

    // pickup, two digits of "25", player
    assert_eq!(instances.len(), 4);
    assert!(instances.iter().all(|i| i.sprite_index != MONSTER_SPRITE));
    assert_eq!(instances.last().map(|i| i.sprite_index), Some(SPRITES.player));
}

#[test]
fn overlay_reflects_the_arena() {
    let (mut sim, _cues) = arena();
    sim.spawn_monster(still_monster(Vec2::new(0.5, 0.0), 30.0));
    sim.spawn_projectile(Source::Player, Vec2::ZERO, Vec2::ZERO);
    sim.update(FRAME, PlayerInput::IDLE);

    let overlay = sim.overlay();
    assert_eq!(overlay.state, GameState::Running);
    assert_eq!(overlay.monsters, 1);
    assert_eq!(overlay.projectiles, 0);
    assert_eq!(overlay.numbers, 1);
    assert_eq!(overlay.level, 1);
    assert_eq!(overlay.next_level_experience, 500);
    assert!(overlay.next_wave_in > 0.0);
    assert_eq!(overlay.stamina, overlay.max_stamina);
}

// ============================================================================
// DETERMINISM
// ============================================================================

#[test]
fn seeded_runs_replay() {
    fn play() -> (Vec<(f32, f32)>, u32, f32) {
        let mut config = quiet_config();
        config.spawn.initial_wave = true;
        let (mut sim, _cues) = simulation(config);
        sim.start_run();
        for frame in 0..300 {
            let input = PlayerInput::moving(if frame % 100 < 50 { 1.0 } else { -1.0 }, 0.0);
            sim.update(FRAME, input);
            if sim.state() == GameState::LevelUp {
                sim.acknowledge_level_up();
            }
        }
        let positions = sim
            .monsters()
            .iter_alive()
            .map(|(_, m)| (m.body.position.x, m.body.position.y))
            .collect();
        (positions, sim.run().monsters_killed, sim.player().experience)
    }

    assert_eq!(play(), play());
}
