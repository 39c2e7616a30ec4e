mod camera_follow;
mod chunk_streaming;
mod cooldowns;
mod item_pull;
mod movement;
mod tool;
mod ui_toggle;

pub use camera_follow::CameraFollowSystem;
pub use chunk_streaming::ChunkStreamingSystem;
pub use cooldowns::CooldownSystem;
pub use item_pull::ItemPullSystem;
pub use movement::MovementSystem;
pub use tool::ToolSystem;
pub use ui_toggle::UiToggleSystem;
