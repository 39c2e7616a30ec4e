use glam::Vec2;
use thiserror::Error;
use tracing::trace;

use crate::chunk::{Chunk, ChunkGrid, ChunkIndex};
use crate::config::WorldConfig;
use crate::entity::{Entity, EntityPool, EntityRef};
use crate::geometry::Range2;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WorldError {
    #[error("entity limit reached ({capacity} slots)")]
    PoolExhausted { capacity: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UiState {
    #[default]
    None,
    Inventory,
}

impl UiState {
    pub fn toggled(self, target: UiState) -> UiState {
        if self == target {
            UiState::None
        } else {
            target
        }
    }
}

/// Entity pool, chunk grid and UI state. Chunk membership only changes
/// through `chunk_add_entity` / `chunk_remove_entity`, which keep each
/// entity's back-reference and its chunk's list in step.
pub struct World {
    entities: EntityPool,
    chunks: ChunkGrid,
    pub ui_state: UiState,
}

impl World {
    pub fn new(config: &WorldConfig) -> Self {
        Self {
            entities: EntityPool::new(config.max_entity_count),
            chunks: ChunkGrid::new(config),
            ui_state: UiState::None,
        }
    }

    pub fn entities(&self) -> &EntityPool {
        &self.entities
    }

    pub fn chunks(&self) -> &ChunkGrid {
        &self.chunks
    }

    pub fn chunk(&self, index: ChunkIndex) -> Option<&Chunk> {
        self.chunks.get(index)
    }

    pub(crate) fn chunk_mut(&mut self, index: ChunkIndex) -> Option<&mut Chunk> {
        self.chunks.get_mut(index)
    }

    pub fn entity(&self, entity: EntityRef) -> Option<&Entity> {
        self.entities.get(entity)
    }

    pub fn entity_mut(&mut self, entity: EntityRef) -> Option<&mut Entity> {
        self.entities.get_mut(entity)
    }

    pub fn is_alive(&self, entity: EntityRef) -> bool {
        self.entities.is_alive(entity)
    }

    pub fn entity_bounds(&self, entity: EntityRef) -> Option<Range2> {
        self.entity(entity).map(Entity::bounds)
    }

    pub fn chunk_of(&self, entity: EntityRef) -> Option<ChunkIndex> {
        self.entity(entity).and_then(Entity::chunk)
    }

    pub fn pos_to_chunk_index(&self, pos: Vec2) -> Option<ChunkIndex> {
        self.chunks.pos_to_chunk_index(pos)
    }

    pub fn try_create_entity(&mut self) -> Result<EntityRef, WorldError> {
        self.entities.allocate()
    }

    /// Allocates a slot. Running out of slots is a content error, not a
    /// runtime condition.
    ///
    /// # Panics
    /// When every slot is in use.
    pub fn create_entity(&mut self) -> EntityRef {
        match self.try_create_entity() {
            Ok(entity) => entity,
            Err(err) => panic!("{err}"),
        }
    }

    /// Detaches from the owning chunk and frees the slot. Returns `false`
    /// for a stale reference.
    pub fn destroy_entity(&mut self, entity: EntityRef) -> bool {
        let Some(chunk) = self.entities.get(entity).map(Entity::chunk) else {
            return false;
        };
        if let Some(chunk) = chunk {
            self.chunk_remove_entity(chunk, entity);
        }
        self.entities.release(entity).is_some()
    }

    pub fn chunk_add_entity(&mut self, chunk: ChunkIndex, entity: EntityRef) {
        let Some(current) = self.entities.get(entity).map(Entity::chunk) else {
            return;
        };
        if current == Some(chunk) {
            return;
        }
        if let Some(previous) = current {
            self.chunk_remove_entity(previous, entity);
        }
        let Some(target) = self.chunks.get_mut(chunk) else {
            return;
        };
        target.push(entity);
        if let Some(record) = self.entities.get_mut(entity) {
            record.chunk = Some(chunk);
        }
        trace!(index = entity.index(), chunk, "entity joined chunk");
    }

    pub fn chunk_remove_entity(&mut self, chunk: ChunkIndex, entity: EntityRef) {
        if let Some(source) = self.chunks.get_mut(chunk) {
            source.swap_remove(entity);
        }
        if let Some(record) = self.entities.get_mut(entity) {
            if record.chunk == Some(chunk) {
                record.chunk = None;
            }
        }
        trace!(index = entity.index(), chunk, "entity left chunk");
    }

    /// Re-homes an entity after its position changed. Leaving the world
    /// makes it chunk-less but keeps it alive.
    pub fn update_entity_chunk(&mut self, entity: EntityRef) {
        let Some(record) = self.entities.get(entity) else {
            return;
        };
        let pos = record.pos;
        if let Some(current) = record.chunk {
            if self.chunks.get(current).is_some_and(|c| c.contains(pos)) {
                return;
            }
            self.chunk_remove_entity(current, entity);
        }
        if let Some(next) = self.chunks.pos_to_chunk_index(pos) {
            self.chunk_add_entity(next, entity);
        }
    }

    pub fn set_entity_position(&mut self, entity: EntityRef, pos: Vec2) {
        if let Some(record) = self.entities.get_mut(entity) {
            record.pos = pos;
            self.update_entity_chunk(entity);
        }
    }

    /// Checks the bidirectional chunk invariant over the whole world.
    pub fn membership_is_consistent(&self) -> bool {
        let refs_ok = self.entities.iter().all(|(entity, record)| match record.chunk {
            Some(index) => self.chunks.get(index).is_some_and(|chunk| {
                chunk.entities().iter().filter(|e| **e == entity).count() == 1
            }),
            None => self
                .chunks
                .iter()
                .all(|(_, chunk)| !chunk.entities().contains(&entity)),
        });
        let lists_ok = self.chunks.iter().all(|(index, chunk)| {
            chunk
                .entities()
                .iter()
                .all(|e| self.chunk_of(*e) == Some(index))
        });
        refs_ok && lists_ok
    }
}
