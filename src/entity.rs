//! Entity records, class data and the fixed-capacity pool

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::chunk::ChunkIndex;
use crate::geometry::Range2;
use crate::sprite::{SpriteId, SpriteSizes};
use crate::world::WorldError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EntityClass {
    #[default]
    Nil,
    Player,
    RockSmall,
    RockMedium,
    RockLarge,
    ItemStone,
}

/// Items spawned when an entity of some class dies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropSpec {
    pub item: EntityClass,
    pub count: u32,
}

/// Static per-class data: display name, sprite, starting health, drops.
#[derive(Debug, Clone, Copy)]
pub struct ClassInfo {
    pub class: EntityClass,
    pub name: &'static str,
    pub sprite: SpriteId,
    /// Zero means the class cannot be damaged.
    pub health: i32,
    pub is_item: bool,
    /// Whether the bounds are sized from the sprite. Players and items have
    /// zero-size bounds and are never hit by point queries.
    pub solid: bool,
    pub drop: Option<DropSpec>,
}

pub const CLASS_TABLE: [ClassInfo; 6] = [
    ClassInfo {
        class: EntityClass::Nil,
        name: "nil",
        sprite: SpriteId::None,
        health: 0,
        is_item: false,
        solid: false,
        drop: None,
    },
    ClassInfo {
        class: EntityClass::Player,
        name: "Player",
        sprite: SpriteId::Player,
        health: 0,
        is_item: false,
        solid: false,
        drop: None,
    },
    ClassInfo {
        class: EntityClass::RockSmall,
        name: "Small Rock",
        sprite: SpriteId::RockSmall,
        health: 1,
        is_item: false,
        solid: true,
        drop: Some(DropSpec {
            item: EntityClass::ItemStone,
            count: 1,
        }),
    },
    ClassInfo {
        class: EntityClass::RockMedium,
        name: "Medium Rock",
        sprite: SpriteId::RockMedium,
        health: 2,
        is_item: false,
        solid: true,
        drop: Some(DropSpec {
            item: EntityClass::ItemStone,
            count: 2,
        }),
    },
    ClassInfo {
        class: EntityClass::RockLarge,
        name: "Large Rock",
        sprite: SpriteId::RockLarge,
        health: 3,
        is_item: false,
        solid: true,
        drop: Some(DropSpec {
            item: EntityClass::ItemStone,
            count: 3,
        }),
    },
    ClassInfo {
        class: EntityClass::ItemStone,
        name: "Stone",
        sprite: SpriteId::RockSmall,
        health: 0,
        is_item: true,
        solid: false,
        drop: None,
    },
];

/// Rock classes in the order generation picks from.
pub const ROCK_CLASSES: [EntityClass; 3] = [
    EntityClass::RockSmall,
    EntityClass::RockMedium,
    EntityClass::RockLarge,
];

impl EntityClass {
    pub fn info(self) -> &'static ClassInfo {
        &CLASS_TABLE[self as usize]
    }

    pub fn pretty_name(self) -> &'static str {
        self.info().name
    }

    pub fn is_item(self) -> bool {
        self.info().is_item
    }

    pub fn is_damageable(self) -> bool {
        self.info().health > 0
    }

    pub fn bounds_size(self, sprites: &dyn SpriteSizes) -> Vec2 {
        let info = self.info();
        if info.solid {
            sprites.sprite_size(info.sprite)
        } else {
            Vec2::ZERO
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Entity {
    pub is_valid: bool,
    pub class: EntityClass,
    pub identifier: u64,
    pub pos: Vec2,
    pub size: Vec2,
    pub visible: bool,
    pub sprite: SpriteId,
    pub health: i32,
    /// Owning chunk. Only changed through the world's chunk add/remove.
    pub(crate) chunk: Option<ChunkIndex>,
}

impl Entity {
    /// Fills class-derived fields. Identity, position and chunk are untouched.
    pub fn setup(&mut self, class: EntityClass, sprites: &dyn SpriteSizes) {
        let info = class.info();
        self.class = class;
        self.sprite = info.sprite;
        self.visible = true;
        self.size = class.bounds_size(sprites);
        self.health = info.health;
    }

    /// Bounds anchored bottom-centre at `pos`.
    pub fn bounds(&self) -> Range2 {
        Range2::bottom_center(self.size).shift(self.pos)
    }

    pub fn chunk(&self) -> Option<ChunkIndex> {
        self.chunk
    }
}

/// Slot index plus generation; a ref to a destroyed-then-reused slot no
/// longer resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityRef {
    index: u32,
    generation: u32,
}

impl EntityRef {
    pub fn index(&self) -> usize {
        self.index as usize
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }
}

/// Fixed-capacity pool. A slot is free iff its entity is not valid;
/// allocation takes the first free slot.
pub struct EntityPool {
    slots: Vec<Entity>,
    generations: Vec<u32>,
    next_identifier: u64,
    live: usize,
}

impl EntityPool {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![Entity::default(); capacity],
            generations: vec![0; capacity],
            next_identifier: 0,
            live: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn live_count(&self) -> usize {
        self.live
    }

    pub fn allocate(&mut self) -> Result<EntityRef, WorldError> {
        let index = self
            .slots
            .iter()
            .position(|slot| !slot.is_valid)
            .ok_or(WorldError::PoolExhausted {
                capacity: self.slots.len(),
            })?;

        let slot = &mut self.slots[index];
        slot.is_valid = true;
        slot.identifier = self.next_identifier;
        self.next_identifier += 1;
        self.live += 1;
        Ok(EntityRef {
            index: index as u32,
            generation: self.generations[index],
        })
    }

    /// Zeroes the slot and bumps its generation. Returns the old record.
    pub(crate) fn release(&mut self, entity: EntityRef) -> Option<Entity> {
        if !self.is_alive(entity) {
            return None;
        }
        let index = entity.index();
        self.generations[index] = self.generations[index].wrapping_add(1);
        self.live -= 1;
        Some(std::mem::take(&mut self.slots[index]))
    }

    pub fn is_alive(&self, entity: EntityRef) -> bool {
        let index = entity.index();
        index < self.slots.len()
            && self.generations[index] == entity.generation
            && self.slots[index].is_valid
    }

    pub fn get(&self, entity: EntityRef) -> Option<&Entity> {
        if self.is_alive(entity) {
            Some(&self.slots[entity.index()])
        } else {
            None
        }
    }

    pub fn get_mut(&mut self, entity: EntityRef) -> Option<&mut Entity> {
        if self.is_alive(entity) {
            Some(&mut self.slots[entity.index()])
        } else {
            None
        }
    }

    /// Live entities in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (EntityRef, &Entity)> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_valid)
            .map(|(index, slot)| {
                (
                    EntityRef {
                        index: index as u32,
                        generation: self.generations[index],
                    },
                    slot,
                )
            })
    }
}
