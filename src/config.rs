//! Game configuration loaded from YAML

use std::fs;
use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("config parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("config validation error: {0}")]
    Validation(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    pub name: String,
    pub seed: u64,
    #[serde(default)]
    pub world: WorldConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub player: PlayerConfig,
    #[serde(default)]
    pub pull: PullConfig,
    #[serde(default)]
    pub inventory: InventoryConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub sprites: SpriteConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldConfig {
    #[serde(default = "default_world_size_in_chunks")]
    pub world_size_in_chunks: u32,
    #[serde(default = "default_chunk_size")]
    pub chunk_size: f32,
    #[serde(default = "default_max_entity_count")]
    pub max_entity_count: usize,
    #[serde(default = "default_max_entities_in_chunk")]
    pub max_entities_in_chunk: usize,
    /// Chunks within this many grid steps of the origin are generated at startup.
    #[serde(default = "default_spawn_radius_chunks")]
    pub spawn_radius_chunks: u32,
}

fn default_world_size_in_chunks() -> u32 {
    32
}

fn default_chunk_size() -> f32 {
    128.0
}

fn default_max_entity_count() -> usize {
    1024
}

fn default_max_entities_in_chunk() -> usize {
    1024
}

fn default_spawn_radius_chunks() -> u32 {
    2
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            world_size_in_chunks: default_world_size_in_chunks(),
            chunk_size: default_chunk_size(),
            max_entity_count: default_max_entity_count(),
            max_entities_in_chunk: default_max_entities_in_chunk(),
            spawn_radius_chunks: default_spawn_radius_chunks(),
        }
    }
}

impl WorldConfig {
    pub fn chunk_count(&self) -> usize {
        let side = self.world_size_in_chunks as usize;
        side * side
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    #[serde(default = "default_rocks_per_chunk")]
    pub rocks_per_chunk: usize,
    /// Upper bound on placement retries per rock. `None` retries forever.
    #[serde(default)]
    pub placement_attempts: Option<u32>,
}

fn default_rocks_per_chunk() -> usize {
    10
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            rocks_per_chunk: default_rocks_per_chunk(),
            placement_attempts: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerConfig {
    #[serde(default = "default_move_speed")]
    pub move_speed: f32,
    #[serde(default = "default_tool_cooldown_secs")]
    pub tool_cooldown_secs: f32,
    #[serde(default = "default_tool_damage")]
    pub tool_damage: i32,
    #[serde(default = "default_line_cast_step")]
    pub line_cast_step: f32,
}

fn default_move_speed() -> f32 {
    100.0
}

fn default_tool_cooldown_secs() -> f32 {
    0.2
}

fn default_tool_damage() -> i32 {
    1
}

fn default_line_cast_step() -> f32 {
    0.1
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            move_speed: default_move_speed(),
            tool_cooldown_secs: default_tool_cooldown_secs(),
            tool_damage: default_tool_damage(),
            line_cast_step: default_line_cast_step(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullConfig {
    #[serde(default = "default_pull_radius")]
    pub radius: f32,
    #[serde(default = "default_pull_rate")]
    pub rate: f32,
    #[serde(default = "default_capture_distance")]
    pub capture_distance: f32,
    #[serde(default = "default_max_pulled_items")]
    pub max_pulled_items: usize,
}

fn default_pull_radius() -> f32 {
    20.0
}

fn default_pull_rate() -> f32 {
    0.05
}

fn default_capture_distance() -> f32 {
    4.0
}

fn default_max_pulled_items() -> usize {
    16
}

impl Default for PullConfig {
    fn default() -> Self {
        Self {
            radius: default_pull_radius(),
            rate: default_pull_rate(),
            capture_distance: default_capture_distance(),
            max_pulled_items: default_max_pulled_items(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryConfig {
    #[serde(default = "default_inventory_slots")]
    pub slots: usize,
    #[serde(default = "default_row_length")]
    pub row_length: usize,
}

fn default_inventory_slots() -> usize {
    16
}

fn default_row_length() -> usize {
    8
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            slots: default_inventory_slots(),
            row_length: default_row_length(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraConfig {
    #[serde(default = "default_zoom")]
    pub zoom: f32,
    #[serde(default = "default_follow_rate")]
    pub follow_rate: f32,
    #[serde(default = "default_viewport_width")]
    pub viewport_width: f32,
    #[serde(default = "default_viewport_height")]
    pub viewport_height: f32,
}

fn default_zoom() -> f32 {
    5.0
}

fn default_follow_rate() -> f32 {
    30.0
}

fn default_viewport_width() -> f32 {
    1280.0
}

fn default_viewport_height() -> f32 {
    720.0
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            zoom: default_zoom(),
            follow_rate: default_follow_rate(),
            viewport_width: default_viewport_width(),
            viewport_height: default_viewport_height(),
        }
    }
}

impl CameraConfig {
    pub fn viewport(&self) -> Vec2 {
        Vec2::new(self.viewport_width, self.viewport_height)
    }
}

/// Pixel dimensions of each sprite, written as `[width, height]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpriteConfig {
    #[serde(default = "default_player_sprite")]
    pub player: Vec2,
    #[serde(default = "default_pickaxe_sprite")]
    pub pickaxe: Vec2,
    #[serde(default = "default_rock_small_sprite")]
    pub rock_small: Vec2,
    #[serde(default = "default_rock_medium_sprite")]
    pub rock_medium: Vec2,
    #[serde(default = "default_rock_large_sprite")]
    pub rock_large: Vec2,
}

fn default_player_sprite() -> Vec2 {
    Vec2::new(9.0, 14.0)
}

fn default_pickaxe_sprite() -> Vec2 {
    Vec2::new(7.0, 7.0)
}

fn default_rock_small_sprite() -> Vec2 {
    Vec2::new(6.0, 5.0)
}

fn default_rock_medium_sprite() -> Vec2 {
    Vec2::new(10.0, 8.0)
}

fn default_rock_large_sprite() -> Vec2 {
    Vec2::new(16.0, 12.0)
}

impl Default for SpriteConfig {
    fn default() -> Self {
        Self {
            player: default_player_sprite(),
            pickaxe: default_pickaxe_sprite(),
            rock_small: default_rock_small_sprite(),
            rock_medium: default_rock_medium_sprite(),
            rock_large: default_rock_large_sprite(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl GameConfig {
    pub fn new(name: impl Into<String>, seed: u64) -> Self {
        Self {
            name: name.into(),
            seed,
            world: WorldConfig::default(),
            generation: GenerationConfig::default(),
            player: PlayerConfig::default(),
            pull: PullConfig::default(),
            inventory: InventoryConfig::default(),
            camera: CameraConfig::default(),
            sprites: SpriteConfig::default(),
            logging: LoggingConfig::default(),
        }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let world = &self.world;
        if world.world_size_in_chunks == 0 || world.world_size_in_chunks % 2 != 0 {
            return Err(ConfigError::Validation(format!(
                "world_size_in_chunks must be a positive even number, got {}",
                world.world_size_in_chunks
            )));
        }
        if world.chunk_size <= 0.0 {
            return Err(ConfigError::Validation(
                "chunk_size must be greater than zero".into(),
            ));
        }
        if world.max_entity_count == 0 || world.max_entities_in_chunk == 0 {
            return Err(ConfigError::Validation(
                "entity capacities must be greater than zero".into(),
            ));
        }
        if world.spawn_radius_chunks >= world.world_size_in_chunks / 2 {
            return Err(ConfigError::Validation(format!(
                "spawn_radius_chunks {} does not fit a world of {} chunks",
                world.spawn_radius_chunks, world.world_size_in_chunks
            )));
        }

        let spawn_side = 2 * world.spawn_radius_chunks as usize + 1;
        let spawn_rocks = spawn_side * spawn_side * self.generation.rocks_per_chunk;
        if spawn_rocks >= world.max_entity_count {
            return Err(ConfigError::Validation(format!(
                "spawn region needs {spawn_rocks} rocks but the pool holds {}",
                world.max_entity_count
            )));
        }
        if self.generation.rocks_per_chunk > world.max_entities_in_chunk {
            return Err(ConfigError::Validation(
                "rocks_per_chunk exceeds max_entities_in_chunk".into(),
            ));
        }

        for (name, size) in [
            ("rock_small", self.sprites.rock_small),
            ("rock_medium", self.sprites.rock_medium),
            ("rock_large", self.sprites.rock_large),
        ] {
            if size.x <= 0.0 || size.y <= 0.0 {
                return Err(ConfigError::Validation(format!(
                    "sprite {name} must have a positive size"
                )));
            }
            if size.x >= world.chunk_size || size.y >= world.chunk_size {
                return Err(ConfigError::Validation(format!(
                    "sprite {name} does not fit inside a chunk"
                )));
            }
        }

        if self.player.line_cast_step <= 0.0 {
            return Err(ConfigError::Validation(
                "line_cast_step must be greater than zero".into(),
            ));
        }
        if self.camera.zoom <= 0.0 {
            return Err(ConfigError::Validation("zoom must be greater than zero".into()));
        }
        if self.inventory.slots == 0 || self.pull.max_pulled_items == 0 {
            return Err(ConfigError::Validation(
                "inventory and pull capacities must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_prototype_constants() {
        let config = GameConfig::new("survival", 1);
        assert_eq!(config.world.world_size_in_chunks, 32);
        assert_eq!(config.world.chunk_size, 128.0);
        assert_eq!(config.world.chunk_count(), 1024);
        assert_eq!(config.generation.rocks_per_chunk, 10);
        assert_eq!(config.pull.max_pulled_items, 16);
        assert!(config.generation.placement_attempts.is_none());
        config.validate().expect("defaults should validate");
    }

    #[test]
    fn yaml_overrides_only_named_fields() {
        let config = GameConfig::from_yaml_str(
            "name: tiny\nseed: 9\nworld:\n  world_size_in_chunks: 8\n  spawn_radius_chunks: 1\nsprites:\n  rock_large: [20, 14]\n",
        )
        .expect("yaml should parse");
        assert_eq!(config.seed, 9);
        assert_eq!(config.world.world_size_in_chunks, 8);
        assert_eq!(config.world.chunk_size, 128.0);
        assert_eq!(config.sprites.rock_large, Vec2::new(20.0, 14.0));
        assert_eq!(config.sprites.rock_small, default_rock_small_sprite());
    }

    #[test]
    fn odd_world_size_is_rejected() {
        let err = GameConfig::from_yaml_str("name: bad\nseed: 1\nworld:\n  world_size_in_chunks: 7\n")
            .unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn spawn_region_must_fit_the_pool() {
        let mut config = GameConfig::new("crowded", 1);
        config.world.max_entity_count = 100;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn yaml_round_trip_keeps_seed() {
        let config = GameConfig::new("survival", 77);
        let text = config.to_yaml().expect("config should serialize");
        let loaded = GameConfig::from_yaml_str(&text).expect("yaml should parse");
        assert_eq!(loaded.seed, 77);
        assert_eq!(loaded.name, "survival");
    }

    #[test]
    fn load_reads_file_from_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("game.yaml");
        fs::write(&path, "name: disk\nseed: 3\n").expect("write config file");
        let config = GameConfig::load(&path).expect("config should load");
        assert_eq!(config.name, "disk");
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = GameConfig::load(dir.path().join("absent.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
