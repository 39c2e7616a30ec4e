use anyhow::Result;

use crate::{
    engine::{FrameContext, System},
    game::GameState,
    rng::RandomStream,
};

pub struct CameraFollowSystem;

impl CameraFollowSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CameraFollowSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for CameraFollowSystem {
    fn name(&self) -> &str {
        "camera_follow"
    }

    fn run(&mut self, ctx: &FrameContext, state: &mut GameState, _rng: &mut RandomStream) -> Result<()> {
        let target = state.player_position();
        state.camera.follow(target, ctx.dt);
        Ok(())
    }
}
