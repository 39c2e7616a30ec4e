//! Input queries the frame systems read from

use std::collections::HashSet;

use glam::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    W,
    A,
    S,
    D,
    E,
    MouseLeft,
}

/// Per-frame input as polled by the platform layer.
pub trait InputSource {
    fn is_down(&self, key: Key) -> bool;
    fn just_pressed(&self, key: Key) -> bool;
    /// Pointer position in screen space (bottom-left origin).
    fn pointer_screen(&self) -> Vec2;
}

/// Plain snapshot of one frame's input.
#[derive(Debug, Clone, Default)]
pub struct FrameInput {
    held: HashSet<Key>,
    pressed: HashSet<Key>,
    pointer: Vec2,
}

impl FrameInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hold(mut self, key: Key) -> Self {
        self.held.insert(key);
        self
    }

    /// Marks `key` as pressed this frame; a pressed key is also down.
    pub fn press(mut self, key: Key) -> Self {
        self.pressed.insert(key);
        self.held.insert(key);
        self
    }

    pub fn pointer(mut self, screen: Vec2) -> Self {
        self.pointer = screen;
        self
    }
}

impl InputSource for FrameInput {
    fn is_down(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    fn just_pressed(&self, key: Key) -> bool {
        self.pressed.contains(&key)
    }

    fn pointer_screen(&self) -> Vec2 {
        self.pointer
    }
}

/// WASD as a unit vector, zero when nothing (or opposing keys) is held.
pub fn movement_axis(input: &dyn InputSource) -> Vec2 {
    let mut axis = Vec2::ZERO;
    if input.is_down(Key::A) {
        axis.x -= 1.0;
    }
    if input.is_down(Key::D) {
        axis.x += 1.0;
    }
    if input.is_down(Key::S) {
        axis.y -= 1.0;
    }
    if input.is_down(Key::W) {
        axis.y += 1.0;
    }
    axis.normalize_or_zero()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagonal_movement_is_normalized() {
        let input = FrameInput::new().hold(Key::W).hold(Key::D);
        let axis = movement_axis(&input);
        assert!((axis.length() - 1.0).abs() < 1e-6);
        assert!(axis.x > 0.0 && axis.y > 0.0);
    }

    #[test]
    fn opposing_keys_cancel() {
        let input = FrameInput::new().hold(Key::A).hold(Key::D);
        assert_eq!(movement_axis(&input), Vec2::ZERO);
    }

    #[test]
    fn press_implies_down() {
        let input = FrameInput::new().press(Key::E);
        assert!(input.just_pressed(Key::E));
        assert!(input.is_down(Key::E));
        assert!(!input.just_pressed(Key::MouseLeft));
    }
}
