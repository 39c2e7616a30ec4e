use anyhow::Result;
use tracing::debug;

use crate::{
    engine::{FrameContext, System},
    game::GameState,
    rng::RandomStream,
};

pub struct ItemPullSystem;

impl ItemPullSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ItemPullSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for ItemPullSystem {
    fn name(&self) -> &str {
        "item_pull"
    }

    fn run(&mut self, ctx: &FrameContext, state: &mut GameState, _rng: &mut RandomStream) -> Result<()> {
        let report = state.player.update_item_pull(
            &mut state.world,
            state.player_entity,
            &state.config.pull,
            ctx.dt,
        );
        if !report.collected.is_empty() {
            debug!(frame = ctx.frame, collected = report.collected.len(), "items collected");
        }
        state.events.items_collected += report.collected.len();
        Ok(())
    }
}
