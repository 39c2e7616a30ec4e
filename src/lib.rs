pub mod camera;
pub mod chunk;
pub mod config;
pub mod engine;
pub mod entity;
pub mod game;
pub mod generation;
pub mod geometry;
pub mod input;
pub mod lifecycle;
pub mod player;
pub mod rng;
pub mod spatial;
pub mod sprite;
pub mod systems;
pub mod world;

pub use config::{ConfigError, GameConfig};
pub use engine::{Engine, EngineBuilder, FrameSummary};
pub use entity::{EntityClass, EntityRef};
pub use game::GameState;
pub use world::{World, WorldError};
