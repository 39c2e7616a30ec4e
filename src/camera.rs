use glam::Vec2;

use crate::chunk::ChunkIndex;
use crate::config::CameraConfig;
use crate::world::World;

/// Orthographic camera centred on `position`. Screen space has its origin at
/// the bottom-left with y pointing up.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub position: Vec2,
    pub zoom: f32,
    pub viewport: Vec2,
    follow_rate: f32,
}

impl Camera {
    pub fn new(config: &CameraConfig) -> Self {
        Self {
            position: Vec2::ZERO,
            zoom: config.zoom,
            viewport: config.viewport(),
            follow_rate: config.follow_rate,
        }
    }

    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        self.position + (screen - self.viewport * 0.5) / self.zoom
    }

    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        (world - self.position) * self.zoom + self.viewport * 0.5
    }

    /// World-space corners of the view: bottom-left, top-right.
    pub fn view_corners(&self) -> (Vec2, Vec2) {
        (
            self.screen_to_world(Vec2::ZERO),
            self.screen_to_world(self.viewport),
        )
    }

    pub fn visible_chunks(&self, world: &World) -> Vec<ChunkIndex> {
        let (bottom_left, top_right) = self.view_corners();
        world.chunks().chunks_in_view(bottom_left, top_right)
    }

    /// Exponential approach toward `target`, snapping once within 0.001.
    pub fn follow(&mut self, target: Vec2, dt: f32) {
        self.position.x = approach(self.position.x, target.x, dt, self.follow_rate);
        self.position.y = approach(self.position.y, target.y, dt, self.follow_rate);
    }
}

fn approach(value: f32, target: f32, dt: f32, rate: f32) -> f32 {
    let next = value + (target - value) * (1.0 - 2f32.powf(-rate * dt));
    if (next - target).abs() <= 0.001 {
        target
    } else {
        next
    }
}
