use anyhow::Result;

use crate::{
    engine::{FrameContext, System},
    game::GameState,
    rng::RandomStream,
};

pub struct CooldownSystem;

impl CooldownSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CooldownSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for CooldownSystem {
    fn name(&self) -> &str {
        "cooldowns"
    }

    fn run(&mut self, ctx: &FrameContext, state: &mut GameState, _rng: &mut RandomStream) -> Result<()> {
        state.player.tool_cooldown.tick(ctx.dt);
        Ok(())
    }
}
