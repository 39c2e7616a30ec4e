use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use glam::Vec2;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use wildstone::{
    engine::EngineBuilder,
    entity::{EntityClass, ROCK_CLASSES},
    game::{FrameEvents, GameState},
    input::{FrameInput, Key},
    GameConfig,
};

/// Distances from the player at which a swing lands on the aimed point.
const SWING_MIN: f32 = 10.0;
const SWING_REACH: f32 = 14.0;
/// Frames between autopilot clicks; a little longer than the tool cooldown.
const CLICK_INTERVAL: u64 = 15;

#[derive(Debug, Parser)]
#[command(author, version, about = "Headless wildstone runner")]
struct Cli {
    /// Path to the game config YAML file
    #[arg(long, default_value = "scenarios/survival.yaml")]
    config: PathBuf,

    /// Override the world seed
    #[arg(long)]
    seed: Option<u64>,

    /// Number of frames to simulate
    #[arg(long, default_value_t = 600)]
    frames: u64,

    /// Seconds per frame
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f32,

    /// Direction the autopilot walks in
    #[arg(long, value_enum, default_value_t = Heading::East)]
    heading: Heading,

    /// Also write the JSON report to this file
    #[arg(long)]
    report: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Heading {
    North,
    South,
    East,
    West,
}

impl Heading {
    fn key(self) -> Key {
        match self {
            Heading::North => Key::W,
            Heading::South => Key::S,
            Heading::East => Key::D,
            Heading::West => Key::A,
        }
    }
}

#[derive(Debug, Serialize)]
struct InventoryEntry {
    item: &'static str,
    amount: u32,
}

#[derive(Debug, Serialize)]
struct RunReport {
    name: String,
    seed: u64,
    frames: u64,
    player_position: [f32; 2],
    live_entities: usize,
    rocks: usize,
    items_on_ground: usize,
    generated_chunks: usize,
    totals: FrameEvents,
    inventory: Vec<InventoryEntry>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = GameConfig::load(&cli.config)
        .with_context(|| format!("loading config {}", cli.config.display()))?;
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    init_tracing(&config.logging.level);

    let mut engine = EngineBuilder::new(config.seed)
        .with_default_systems()
        .build();
    let mut state = engine.new_game(&config);

    let mut totals = FrameEvents::default();
    let heading = cli.heading;
    engine.run_with_hook(
        &mut state,
        cli.frames,
        cli.dt,
        |frame, state| autopilot(frame, state, heading),
        |summary| {
            totals += summary.events;
            if summary.events.entities_destroyed > 0 {
                info!(frame = summary.frame, live = summary.live_entities, "rock broken");
            }
        },
    )?;

    let report = build_report(&state, cli.frames, totals);
    info!(
        frames = report.frames,
        chunks = report.generated_chunks,
        rocks = report.rocks,
        "run complete"
    );

    let json = serde_json::to_string_pretty(&report)?;
    if let Some(path) = &cli.report {
        fs::write(path, &json).with_context(|| format!("writing report {}", path.display()))?;
    }
    println!("{json}");
    Ok(())
}

fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

/// Walks along `heading` until the nearest rock sits inside the swing window,
/// then stands still and clicks at it.
fn autopilot(frame: u64, state: &GameState, heading: Heading) -> FrameInput {
    let player = state.player_position();
    let center = state.camera.viewport * 0.5;

    if let Some((rock, pos)) = state.nearest_rock() {
        let height = state
            .world
            .entity(rock)
            .map(|r| r.class.bounds_size(&state.sprites).y)
            .unwrap_or_default();
        let aim = pos + Vec2::new(0.0, height * 0.5);
        if (SWING_MIN..=SWING_REACH).contains(&aim.distance(player)) {
            let input = FrameInput::new().pointer(state.camera.world_to_screen(aim));
            return if frame % CLICK_INTERVAL == 0 {
                input.press(Key::MouseLeft)
            } else {
                input
            };
        }
    }
    FrameInput::new().hold(heading.key()).pointer(center)
}

fn build_report(state: &GameState, frames: u64, totals: FrameEvents) -> RunReport {
    let pos = state.player_position();
    let rocks = ROCK_CLASSES
        .into_iter()
        .map(|class| state.count_class(class))
        .sum();

    RunReport {
        name: state.config.name.clone(),
        seed: state.config.seed,
        frames,
        player_position: [pos.x, pos.y],
        live_entities: state.world.entities().live_count(),
        rocks,
        items_on_ground: state.count_class(EntityClass::ItemStone),
        generated_chunks: state.generated_chunk_count(),
        totals,
        inventory: state
            .player
            .item_slots()
            .iter()
            .filter(|slot| !slot.is_empty())
            .map(|slot| InventoryEntry {
                item: slot.class.pretty_name(),
                amount: slot.amount,
            })
            .collect(),
    }
}
