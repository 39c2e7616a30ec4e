//! Sprite handles and the size provider used to size entity bounds.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::SpriteConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SpriteId {
    #[default]
    None,
    Player,
    Pickaxe,
    RockSmall,
    RockMedium,
    RockLarge,
}

/// Intrinsic pixel size of a sprite. Image decoding lives outside the core.
pub trait SpriteSizes {
    fn sprite_size(&self, sprite: SpriteId) -> Vec2;
}

/// Size table filled from configuration.
#[derive(Debug, Clone)]
pub struct SpriteAtlas {
    sizes: SpriteConfig,
}

impl SpriteAtlas {
    pub fn new(sizes: SpriteConfig) -> Self {
        Self { sizes }
    }
}

impl Default for SpriteAtlas {
    fn default() -> Self {
        Self::new(SpriteConfig::default())
    }
}

impl SpriteSizes for SpriteAtlas {
    fn sprite_size(&self, sprite: SpriteId) -> Vec2 {
        match sprite {
            SpriteId::None => Vec2::ZERO,
            SpriteId::Player => self.sizes.player,
            SpriteId::Pickaxe => self.sizes.pickaxe,
            SpriteId::RockSmall => self.sizes.rock_small,
            SpriteId::RockMedium => self.sizes.rock_medium,
            SpriteId::RockLarge => self.sizes.rock_large,
        }
    }
}
