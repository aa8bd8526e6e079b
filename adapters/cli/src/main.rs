#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs headless Flag Rush matches.

mod config;
mod presets;

use std::{path::PathBuf, time::Duration};

use anyhow::{anyhow, Result};
use clap::Parser;
use config::RunnerConfig;
use flag_rush_core::{ArenaBlueprint, Command, Event, TankId};
use flag_rush_system_agent::Agent;
use flag_rush_world::{self as world, query, World};

#[derive(Debug, Parser)]
#[command(name = "flag-rush", about = "Runs headless capture-the-flag tank matches")]
struct Args {
    /// Built-in arena to play.
    #[arg(long, default_value = "map0")]
    map: String,
    /// Tick budget, overriding the config file.
    #[arg(long)]
    ticks: Option<u64>,
    /// Optional TOML file with runner settings.
    #[arg(long)]
    config: Option<PathBuf>,
}

/// Entry point for the Flag Rush command-line runner.
fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => RunnerConfig::load(path)?,
        None => RunnerConfig::default(),
    };
    let max_ticks = args.ticks.unwrap_or(config.max_ticks);
    let dt = Duration::from_secs_f64(1.0 / f64::from(config.tick_hz));

    let blueprint = presets::by_name(&args.map).ok_or_else(|| {
        anyhow!(
            "unknown map {:?}; built-ins are {}",
            args.map,
            presets::NAMES.join(", ")
        )
    })?;

    log::info!(
        "running {} with {} tanks for up to {max_ticks} ticks",
        args.map,
        blueprint.spawn_points().len()
    );

    match run_match(&blueprint, max_ticks, dt) {
        Outcome::Captured { tank, tick } => {
            println!(
                "tank {} captured the flag after {tick} ticks ({:.1}s simulated)",
                tank.get(),
                tick as f64 * dt.as_secs_f64()
            );
        }
        Outcome::TimedOut => {
            println!("no capture within {max_ticks} ticks");
        }
    }

    Ok(())
}

enum Outcome {
    Captured { tank: TankId, tick: u64 },
    TimedOut,
}

/// Drives one match to its conclusion: every agent decides, the resulting
/// commands apply, and the clock advances, once per tick, until a capture
/// or the tick budget runs out.
fn run_match(blueprint: &ArenaBlueprint, max_ticks: u64, dt: Duration) -> Outcome {
    let mut world = World::new();
    let mut events = Vec::new();

    world::apply(
        &mut world,
        Command::LoadArena {
            blueprint: blueprint.clone(),
        },
        &mut events,
    );
    for spawn in blueprint.spawn_points() {
        world::apply(&mut world, Command::SpawnTank { spawn: *spawn }, &mut events);
    }
    world::apply(
        &mut world,
        Command::PlaceFlag {
            at: blueprint.flag_position(),
        },
        &mut events,
    );

    let mut agents: Vec<Agent> = query::tank_view(&world)
        .iter()
        .map(|snapshot| Agent::new(snapshot.id))
        .collect();

    let mut commands = Vec::new();
    for tick in 0..max_ticks {
        commands.clear();
        for agent in &mut agents {
            agent.decide(&world, &mut commands);
        }

        events.clear();
        for command in commands.drain(..) {
            world::apply(&mut world, command, &mut events);
        }
        world::apply(&mut world, Command::Tick { dt }, &mut events);

        for event in &events {
            if let Event::FlagCaptured { tank } = event {
                return Outcome::Captured { tank: *tank, tick };
            }
        }
    }

    Outcome::TimedOut
}
