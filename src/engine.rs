use std::time::Instant;

use anyhow::Result;
use glam::Vec2;
use serde::Serialize;

use crate::{
    chunk::ChunkIndex,
    config::GameConfig,
    game::{FrameEvents, GameState},
    generation::{regenerate_chunk, GenerationReport},
    input::{FrameInput, InputSource},
    rng::{RandomStream, RngManager},
    systems::{
        CameraFollowSystem, ChunkStreamingSystem, CooldownSystem, ItemPullSystem, MovementSystem,
        ToolSystem, UiToggleSystem,
    },
};

/// Stream shared by spawn generation, chunk streaming and regeneration.
pub const GENERATION_STREAM: &str = "generation";

pub struct EngineBuilder {
    seed: u64,
    systems: Vec<Box<dyn System>>,
}

impl EngineBuilder {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            systems: Vec::new(),
        }
    }

    pub fn with_system(mut self, system: impl System + 'static) -> Self {
        self.systems.push(Box::new(system));
        self
    }

    /// The frame order of the game loop: timers, camera, UI, movement, tool,
    /// item pull, chunk streaming.
    pub fn with_default_systems(self) -> Self {
        self.with_system(CooldownSystem::new())
            .with_system(CameraFollowSystem::new())
            .with_system(UiToggleSystem::new())
            .with_system(MovementSystem::new())
            .with_system(ToolSystem::new())
            .with_system(ItemPullSystem::new())
            .with_system(ChunkStreamingSystem::new())
    }

    pub fn build(self) -> Engine {
        Engine {
            rng: RngManager::new(self.seed),
            systems: self.systems,
            frame: 0,
        }
    }
}

pub struct Engine {
    rng: RngManager,
    systems: Vec<Box<dyn System>>,
    frame: u64,
}

impl Engine {
    /// Builds a fresh game whose spawn region is drawn from the generation
    /// stream.
    pub fn new_game(&mut self, config: &GameConfig) -> GameState {
        GameState::new(config, self.rng.stream(GENERATION_STREAM))
    }

    pub fn current_frame(&self) -> u64 {
        self.frame
    }

    pub fn system_names(&self) -> Vec<&str> {
        self.systems.iter().map(|s| s.name()).collect()
    }

    /// Runs every system once, in order.
    pub fn step(
        &mut self,
        state: &mut GameState,
        dt: f32,
        input: &dyn InputSource,
    ) -> Result<FrameSummary> {
        self.frame += 1;
        state.events = FrameEvents::default();
        state.tool_used_this_frame = false;

        let ctx = FrameContext {
            frame: self.frame,
            dt,
            input,
            viewport: state.camera.viewport,
        };
        let mut system_reports = Vec::with_capacity(self.systems.len());
        for system in &mut self.systems {
            let rng = self.rng.stream(system.rng_stream());
            let start = Instant::now();
            system.run(&ctx, state, rng)?;
            system_reports.push(SystemRunReport {
                name: system.name().to_string(),
                duration_ms: start.elapsed().as_secs_f64() * 1_000.0,
            });
        }

        Ok(FrameSummary {
            frame: self.frame,
            events: state.events,
            live_entities: state.world.entities().live_count(),
            system_reports,
        })
    }

    pub fn run<F>(&mut self, state: &mut GameState, frames: u64, dt: f32, script: F) -> Result<()>
    where
        F: FnMut(u64, &GameState) -> FrameInput,
    {
        self.run_with_hook(state, frames, dt, script, |_| {})
    }

    /// Steps `frames` times, asking `script` for each frame's input and
    /// handing every summary to `hook`.
    pub fn run_with_hook<F, H>(
        &mut self,
        state: &mut GameState,
        frames: u64,
        dt: f32,
        mut script: F,
        mut hook: H,
    ) -> Result<()>
    where
        F: FnMut(u64, &GameState) -> FrameInput,
        H: FnMut(&FrameSummary),
    {
        for _ in 0..frames {
            let input = script(self.frame + 1, state);
            let summary = self.step(state, dt, &input)?;
            hook(&summary);
        }
        Ok(())
    }

    /// Rebuilds a chunk from its recorded seed. The generation stream is left
    /// at the point just after that chunk's draws.
    pub fn regenerate_chunk(
        &mut self,
        state: &mut GameState,
        index: ChunkIndex,
    ) -> Option<GenerationReport> {
        regenerate_chunk(
            &mut state.world,
            index,
            &state.config.generation,
            &state.sprites,
            self.rng.stream(GENERATION_STREAM),
        )
    }
}

pub struct FrameContext<'a> {
    pub frame: u64,
    pub dt: f32,
    pub input: &'a dyn InputSource,
    pub viewport: Vec2,
}

pub trait System {
    fn name(&self) -> &str;

    /// Name of the random stream handed to `run`.
    fn rng_stream(&self) -> &str {
        self.name()
    }

    fn run(
        &mut self,
        ctx: &FrameContext,
        state: &mut GameState,
        rng: &mut RandomStream,
    ) -> Result<()>;
}

#[derive(Clone, Debug, Serialize)]
pub struct SystemRunReport {
    pub name: String,
    pub duration_ms: f64,
}

#[derive(Clone, Debug, Serialize)]
pub struct FrameSummary {
    pub frame: u64,
    pub events: FrameEvents,
    pub live_entities: usize,
    pub system_reports: Vec<SystemRunReport>,
}
