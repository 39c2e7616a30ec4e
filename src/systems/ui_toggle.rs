use anyhow::Result;
use tracing::debug;

use crate::{
    engine::{FrameContext, System},
    game::GameState,
    input::Key,
    rng::RandomStream,
    world::UiState,
};

/// `E` opens and closes the inventory overlay.
pub struct UiToggleSystem;

impl UiToggleSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for UiToggleSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for UiToggleSystem {
    fn name(&self) -> &str {
        "ui_toggle"
    }

    fn run(&mut self, ctx: &FrameContext, state: &mut GameState, _rng: &mut RandomStream) -> Result<()> {
        if ctx.input.just_pressed(Key::E) {
            state.world.ui_state = state.world.ui_state.toggled(UiState::Inventory);
            debug!(frame = ctx.frame, ui = ?state.world.ui_state, "ui toggled");
        }
        Ok(())
    }
}
