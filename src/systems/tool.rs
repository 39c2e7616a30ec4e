use anyhow::Result;
use glam::Vec2;
use tracing::debug;

use crate::{
    engine::{FrameContext, System},
    game::GameState,
    input::Key,
    lifecycle::{damage, DamageOutcome},
    rng::RandomStream,
    spatial::line_cast,
    sprite::{SpriteId, SpriteSizes},
    world::UiState,
};

/// Aims the pickaxe at the pointer and swings it on left click.
///
/// The swing is a short line cast just beyond the tool's tip, from
/// `tool_h + 4` to `tool_h + 8` along the aim direction.
pub struct ToolSystem;

impl ToolSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ToolSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for ToolSystem {
    fn name(&self) -> &str {
        "tool"
    }

    fn run(&mut self, ctx: &FrameContext, state: &mut GameState, rng: &mut RandomStream) -> Result<()> {
        if state.world.ui_state != UiState::None {
            return Ok(());
        }

        let player_pos = state.player_position();
        let target = state.camera.screen_to_world(ctx.input.pointer_screen());
        state.player.aim_at(player_pos, target);

        if !ctx.input.just_pressed(Key::MouseLeft) || !state.player.tool_cooldown.try_start() {
            return Ok(());
        }
        state.tool_used_this_frame = true;
        state.events.tool_swings += 1;

        let tool_h = state.sprites.sprite_size(SpriteId::Pickaxe).y;
        let pivot = player_pos + Vec2::new(0.0, tool_h * 0.5);
        let dir = (target - player_pos).normalize_or_zero();
        let hit = line_cast(
            &state.world,
            pivot + dir * (tool_h + 4.0),
            pivot + dir * (tool_h + 8.0),
            state.config.player.line_cast_step,
        );
        let Some(entity) = hit.entity else {
            return Ok(());
        };

        state.events.tool_hits += 1;
        let outcome = damage(
            &mut state.world,
            entity,
            state.config.player.tool_damage,
            &state.sprites,
            rng,
        );
        if let DamageOutcome::Destroyed { drops } = &outcome {
            state.events.entities_destroyed += 1;
            debug!(frame = ctx.frame, drops = drops.len(), "tool broke entity");
        }
        Ok(())
    }
}
