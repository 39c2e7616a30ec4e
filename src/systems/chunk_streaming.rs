use anyhow::Result;

use crate::{
    engine::{FrameContext, System, GENERATION_STREAM},
    game::GameState,
    generation::ensure_generated,
    rng::RandomStream,
};

/// Generates every chunk the camera can see that has not been generated yet.
pub struct ChunkStreamingSystem;

impl ChunkStreamingSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ChunkStreamingSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for ChunkStreamingSystem {
    fn name(&self) -> &str {
        "chunk_streaming"
    }

    fn rng_stream(&self) -> &str {
        GENERATION_STREAM
    }

    fn run(&mut self, _ctx: &FrameContext, state: &mut GameState, rng: &mut RandomStream) -> Result<()> {
        let visible = state.camera.visible_chunks(&state.world);
        state.events.chunks_generated += ensure_generated(
            &mut state.world,
            &visible,
            &state.config.generation,
            &state.sprites,
            rng,
        );
        Ok(())
    }
}
