use std::ops::AddAssign;

use glam::Vec2;
use serde::Serialize;
use tracing::info;

use crate::camera::Camera;
use crate::config::GameConfig;
use crate::entity::{EntityClass, EntityRef};
use crate::generation::ensure_generated;
use crate::player::PlayerData;
use crate::rng::RandomStream;
use crate::sprite::SpriteAtlas;
use crate::world::World;

/// Counters filled by systems during one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FrameEvents {
    pub chunks_generated: usize,
    pub tool_swings: usize,
    pub tool_hits: usize,
    pub entities_destroyed: usize,
    pub items_collected: usize,
}

impl AddAssign for FrameEvents {
    fn add_assign(&mut self, other: Self) {
        self.chunks_generated += other.chunks_generated;
        self.tool_swings += other.tool_swings;
        self.tool_hits += other.tool_hits;
        self.entities_destroyed += other.entities_destroyed;
        self.items_collected += other.items_collected;
    }
}

/// Everything a frame mutates: the world, the player and the camera.
pub struct GameState {
    pub config: GameConfig,
    pub world: World,
    pub player: PlayerData,
    pub player_entity: EntityRef,
    pub camera: Camera,
    pub sprites: SpriteAtlas,
    pub tool_used_this_frame: bool,
    pub events: FrameEvents,
}

impl GameState {
    /// Builds the world, eagerly generates the spawn region and places the
    /// player at the origin.
    pub fn new(config: &GameConfig, rng: &mut RandomStream) -> Self {
        let sprites = SpriteAtlas::new(config.sprites.clone());
        let mut world = World::new(&config.world);

        let spawn = world.chunks().spawn_region(config.world.spawn_radius_chunks);
        let generated = ensure_generated(&mut world, &spawn, &config.generation, &sprites, rng);

        let player_entity = world.create_entity();
        if let Some(record) = world.entity_mut(player_entity) {
            record.setup(EntityClass::Player, &sprites);
        }
        world.set_entity_position(player_entity, Vec2::ZERO);

        info!(
            name = %config.name,
            seed = config.seed,
            spawn_chunks = generated,
            entities = world.entities().live_count(),
            "world ready"
        );

        Self {
            player: PlayerData::new(
                &config.inventory,
                &config.pull,
                config.player.tool_cooldown_secs,
            ),
            camera: Camera::new(&config.camera),
            config: config.clone(),
            world,
            player_entity,
            sprites,
            tool_used_this_frame: false,
            events: FrameEvents::default(),
        }
    }

    pub fn player_position(&self) -> Vec2 {
        self.world
            .entity(self.player_entity)
            .map(|p| p.pos)
            .unwrap_or(Vec2::ZERO)
    }

    pub fn generated_chunk_count(&self) -> usize {
        self.world
            .chunks()
            .iter()
            .filter(|(_, chunk)| chunk.is_generated())
            .count()
    }

    pub fn count_class(&self, class: EntityClass) -> usize {
        self.world
            .entities()
            .iter()
            .filter(|(_, record)| record.class == class)
            .count()
    }

    /// Nearest live entity of a rock class, by distance from the player.
    pub fn nearest_rock(&self) -> Option<(EntityRef, Vec2)> {
        let origin = self.player_position();
        self.world
            .entities()
            .iter()
            .filter(|(_, record)| record.class.is_damageable())
            .map(|(entity, record)| (entity, record.pos))
            .min_by(|a, b| a.1.distance(origin).total_cmp(&b.1.distance(origin)))
    }
}
