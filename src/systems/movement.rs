use anyhow::Result;
use glam::Vec2;

use crate::{
    engine::{FrameContext, System},
    game::GameState,
    input::movement_axis,
    rng::RandomStream,
    world::UiState,
};

pub struct MovementSystem;

impl MovementSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MovementSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for MovementSystem {
    fn name(&self) -> &str {
        "movement"
    }

    fn run(&mut self, ctx: &FrameContext, state: &mut GameState, _rng: &mut RandomStream) -> Result<()> {
        if state.world.ui_state != UiState::None {
            return Ok(());
        }
        let axis = movement_axis(ctx.input);
        if axis == Vec2::ZERO {
            return Ok(());
        }
        let pos = state.player_position() + axis * state.config.player.move_speed * ctx.dt;
        state.world.set_entity_position(state.player_entity, pos);
        Ok(())
    }
}
