//! # HORDE Headless Harness
//!
//! Runs the simulation without a window, audio or assets: level-ups are
//! acknowledged automatically and the player stands still.
//!
//! ```text
//! horde_headless [--config sim.toml] [--catalog monsters.toml]
//!                [--frames 3600] [--delta 0.016] [--seed 42]
//! ```
//!
//! Logging follows `RUST_LOG` (default `info`).

use std::process::ExitCode;

use horde::{
    CueBus, GameState, HordeError, HordeResult, MonsterCatalog, PlayerInput, SimConfig, SimEvent,
    Simulation, SpriteBindings,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Sprite slots of the harness's virtual texture table.
const SPRITES: SpriteBindings = SpriteBindings {
    player: 0,
    projectile: 1,
    experience: 2,
    digits: 10,
};

/// First texture index handed to catalog sprites.
const FIRST_MONSTER_SPRITE: u32 = 32;

struct Options {
    config: Option<String>,
    catalog: Option<String>,
    frames: u64,
    delta: f32,
    seed: Option<u64>,
}

fn parse_args() -> Result<Options, String> {
    let mut options = Options {
        config: None,
        catalog: None,
        frames: 3600,
        delta: 1.0 / 60.0,
        seed: None,
    };

    let mut args = std::env::args().skip(1);
    while let Some(flag) = args.next() {
        let mut value = || args.next().ok_or_else(|| format!("{flag} needs a value"));
        match flag.as_str() {
            "--config" => options.config = Some(value()?),
            "--catalog" => options.catalog = Some(value()?),
            "--frames" => {
                options.frames = value()?
                    .parse()
                    .map_err(|e| format!("--frames: {e}"))?;
            }
            "--delta" => {
                options.delta = value()?.parse().map_err(|e| format!("--delta: {e}"))?;
            }
            "--seed" => {
                options.seed = Some(value()?.parse().map_err(|e| format!("--seed: {e}"))?);
            }
            other => return Err(format!("unknown argument '{other}'")),
        }
    }
    Ok(options)
}

fn load(options: &Options) -> HordeResult<(SimConfig, MonsterCatalog)> {
    let mut config = match &options.config {
        Some(path) => SimConfig::from_file(path)?,
        None => SimConfig::default(),
    };
    if options.seed.is_some() {
        config.seed = options.seed;
    }

    let catalog = match &options.catalog {
        Some(path) => {
            // Every distinct sprite reference gets the next free texture slot
            let mut sprites: Vec<String> = Vec::new();
            MonsterCatalog::from_file(path, |sprite| {
                let index = sprites.iter().position(|known| known == sprite).unwrap_or_else(|| {
                    sprites.push(sprite.to_string());
                    sprites.len() - 1
                });
                u32::try_from(index).ok().map(|i| FIRST_MONSTER_SPRITE + i)
            })?
        }
        None => MonsterCatalog::single("grunt", FIRST_MONSTER_SPRITE),
    };
    Ok((config, catalog))
}

fn run(options: &Options) -> HordeResult<()> {
    let (config, catalog) = load(options)?;
    if !(options.delta.is_finite() && options.delta > 0.0) {
        return Err(HordeError::InvalidConfig(format!(
            "--delta must be positive, got {}",
            options.delta
        )));
    }

    let bus = CueBus::new(config.workers.cue_capacity);
    let cues = bus.receiver();
    let mut sim = Simulation::new(config, catalog, SPRITES, bus.sender())?;
    sim.start_run();

    let mut level_ups = 0u32;
    let mut waves = 0u32;
    let mut played_cues = 0usize;
    for _ in 0..options.frames {
        let report = sim.update(options.delta, PlayerInput::IDLE);
        for event in &report.events {
            match event {
                SimEvent::LevelUp { .. } => level_ups += 1,
                SimEvent::WaveSpawned { .. } => waves += 1,
                _ => {}
            }
        }
        if sim.state() == GameState::LevelUp {
            sim.acknowledge_level_up();
        }
        played_cues += cues.drain().len();
    }

    let overlay = sim.overlay();
    info!(
        frames = sim.frame(),
        kills = overlay.monsters_killed,
        level = overlay.level,
        "headless run finished"
    );

    println!("═══════════════════════════════════════════════════");
    println!("              HORDE HEADLESS SUMMARY");
    println!("═══════════════════════════════════════════════════");
    println!("  Workers:        {}", sim.threads());
    println!("  Run time:       {:.1} s", overlay.run_duration);
    println!("  Waves:          {waves} (size now {})", sim.wave_size());
    println!("  Kills:          {}", overlay.monsters_killed);
    println!("  Level:          {} ({level_ups} level-ups)", overlay.level);
    println!("  Experience:     {:.0} / {}", overlay.experience, overlay.next_level_experience);
    println!(
        "  Alive:          {} monsters, {} projectiles, {} pickups, {} numbers",
        overlay.monsters, overlay.projectiles, overlay.pickups, overlay.numbers
    );
    println!("  Sound cues:     {played_cues}");
    println!();
    println!("{}", sim.stats());
    Ok(())
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .compact()
        .try_init();

    let options = match parse_args() {
        Ok(options) => options,
        Err(message) => {
            eprintln!("error: {message}");
            eprintln!(
                "usage: horde_headless [--config FILE] [--catalog FILE] [--frames N] [--delta SECONDS] [--seed N]"
            );
            return ExitCode::from(2);
        }
    };

    match run(&options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "headless run failed");
            ExitCode::FAILURE
        }
    }
}
