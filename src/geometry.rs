//! Axis-aligned ranges over `glam::Vec2`.

use glam::Vec2;
use rand::Rng;

/// Axis-aligned rectangle. Containment is half-open: `min` inclusive, `max` exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Range2 {
    pub min: Vec2,
    pub max: Vec2,
}

impl Range2 {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Rectangle of `size` whose bottom edge is centred on the origin.
    pub fn bottom_center(size: Vec2) -> Self {
        Self {
            min: Vec2::new(-size.x * 0.5, 0.0),
            max: Vec2::new(size.x * 0.5, size.y),
        }
    }

    pub fn shift(self, offset: Vec2) -> Self {
        Self {
            min: self.min + offset,
            max: self.max + offset,
        }
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x && point.x < self.max.x && point.y >= self.min.y && point.y < self.max.y
    }

    /// Closed-interval overlap on both axes; touching edges count.
    pub fn overlaps(&self, other: &Range2) -> bool {
        self.min.x <= other.max.x
            && other.min.x <= self.max.x
            && self.min.y <= other.max.y
            && other.min.y <= self.max.y
    }

    /// Random whole-unit point inside the range. An axis narrower than one
    /// unit collapses to its midpoint.
    pub fn random_point_i<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec2 {
        Vec2::new(
            random_axis_i(rng, self.min.x, self.max.x),
            random_axis_i(rng, self.min.y, self.max.y),
        )
    }
}

fn random_axis_i<R: Rng + ?Sized>(rng: &mut R, min: f32, max: f32) -> f32 {
    let lo = min.ceil() as i32;
    let hi = max.floor() as i32;
    if lo > hi {
        return (min + max) * 0.5;
    }
    rng.gen_range(lo..=hi) as f32
}
