//! Chunk grid - uniform square cells tiling a bounded world centred on the origin

use glam::Vec2;

use crate::config::WorldConfig;
use crate::entity::EntityRef;
use crate::geometry::Range2;
use crate::rng::StreamState;

pub type ChunkIndex = usize;

/// Grid coordinate of a chunk, `(0, 0)` being the bottom-left cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChunkCoord {
    pub x: u32,
    pub y: u32,
}

#[derive(Debug, Clone)]
pub struct Chunk {
    bounds: Range2,
    entities: Vec<EntityRef>,
    capacity: usize,
    pub(crate) generated: bool,
    pub(crate) seed: Option<StreamState>,
}

impl Chunk {
    fn new(bounds: Range2, capacity: usize) -> Self {
        Self {
            bounds,
            entities: Vec::new(),
            capacity,
            generated: false,
            seed: None,
        }
    }

    pub fn bounds(&self) -> Range2 {
        self.bounds
    }

    pub fn contains(&self, pos: Vec2) -> bool {
        self.bounds.contains(pos)
    }

    /// Owned entities, in insertion order up to swap-removals.
    pub fn entities(&self) -> &[EntityRef] {
        &self.entities
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn is_generated(&self) -> bool {
        self.generated
    }

    pub fn seed(&self) -> Option<StreamState> {
        self.seed
    }

    /// Appends without touching the entity's back-reference; pair with
    /// `World::chunk_add_entity`.
    pub(crate) fn push(&mut self, entity: EntityRef) {
        assert!(
            self.entities.len() < self.capacity,
            "chunk entity limit reached ({})",
            self.capacity
        );
        self.entities.push(entity);
    }

    /// Swap-with-last removal. Returns whether the entity was present.
    pub(crate) fn swap_remove(&mut self, entity: EntityRef) -> bool {
        match self.entities.iter().position(|e| *e == entity) {
            Some(slot) => {
                self.entities.swap_remove(slot);
                true
            }
            None => false,
        }
    }
}

pub struct ChunkGrid {
    side: u32,
    chunk_size: f32,
    chunks: Vec<Chunk>,
}

impl ChunkGrid {
    /// Tiles the world row-major from the bottom-left; bounds never change
    /// afterwards.
    pub fn new(config: &WorldConfig) -> Self {
        let side = config.world_size_in_chunks;
        let chunk_size = config.chunk_size;
        let half = (side / 2) as i32;
        let mut chunks = Vec::with_capacity(config.chunk_count());
        for y in -half..half {
            for x in -half..half {
                let min = Vec2::new(x as f32 * chunk_size, y as f32 * chunk_size);
                let bounds = Range2::new(min, min + Vec2::splat(chunk_size));
                chunks.push(Chunk::new(bounds, config.max_entities_in_chunk));
            }
        }
        Self {
            side,
            chunk_size,
            chunks,
        }
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn get(&self, index: ChunkIndex) -> Option<&Chunk> {
        self.chunks.get(index)
    }

    pub(crate) fn get_mut(&mut self, index: ChunkIndex) -> Option<&mut Chunk> {
        self.chunks.get_mut(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ChunkIndex, &Chunk)> {
        self.chunks.iter().enumerate()
    }

    /// Maps a world position to its chunk; `None` outside the world.
    pub fn pos_to_chunk_index(&self, pos: Vec2) -> Option<ChunkIndex> {
        let half_extent = self.chunk_size * self.side as f32 * 0.5;
        let x = ((pos.x + half_extent) / self.chunk_size).floor();
        let y = ((pos.y + half_extent) / self.chunk_size).floor();
        let side = self.side as f32;
        if !(x >= 0.0 && x < side && y >= 0.0 && y < side) {
            return None;
        }
        self.coord_to_index(ChunkCoord {
            x: x as u32,
            y: y as u32,
        })
    }

    pub fn coord_to_index(&self, coord: ChunkCoord) -> Option<ChunkIndex> {
        if coord.x < self.side && coord.y < self.side {
            Some(coord.y as usize * self.side as usize + coord.x as usize)
        } else {
            None
        }
    }

    pub fn index_to_coord(&self, index: ChunkIndex) -> Option<ChunkCoord> {
        if index < self.chunks.len() {
            let side = self.side as usize;
            Some(ChunkCoord {
                x: (index % side) as u32,
                y: (index / side) as u32,
            })
        } else {
            None
        }
    }

    /// Chunks whose grid cell lies within `radius` steps of the cell holding
    /// the world origin, on both axes.
    pub fn spawn_region(&self, radius: u32) -> Vec<ChunkIndex> {
        let half = (self.side / 2) as i64;
        let radius = radius as i64;
        self.iter()
            .filter_map(|(index, _)| {
                let coord = self.index_to_coord(index)?;
                let dx = coord.x as i64 - half;
                let dy = coord.y as i64 - half;
                (dx.abs() <= radius && dy.abs() <= radius).then_some(index)
            })
            .collect()
    }

    /// Chunks covered by the view rectangle. Samples a lattice of points at
    /// most one chunk apart across the view, corners included.
    pub fn chunks_in_view(&self, bottom_left: Vec2, top_right: Vec2) -> Vec<ChunkIndex> {
        let size = (top_right - bottom_left).abs();
        let steps_x = lattice_steps(size.x, self.chunk_size);
        let steps_y = lattice_steps(size.y, self.chunk_size);
        let step_x = (size.x / steps_x as f32).trunc();
        let step_y = (size.y / steps_y as f32).trunc();

        let mut found = Vec::new();
        for x in 0..=steps_x {
            for y in 0..=steps_y {
                let pos = bottom_left + Vec2::new(x as f32 * step_x, y as f32 * step_y);
                if let Some(index) = self.pos_to_chunk_index(pos) {
                    if !found.contains(&index) {
                        found.push(index);
                    }
                }
            }
        }
        found
    }
}

fn lattice_steps(extent: f32, chunk_size: f32) -> u32 {
    if extent >= chunk_size {
        (extent / chunk_size).ceil() as u32
    } else {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(side: u32) -> ChunkGrid {
        ChunkGrid::new(&WorldConfig {
            world_size_in_chunks: side,
            chunk_size: 128.0,
            ..WorldConfig::default()
        })
    }

    #[test]
    fn bounds_tile_the_world() {
        let grid = grid(4);
        assert_eq!(grid.len(), 16);
        let first = grid.get(0).expect("chunk index in range").bounds();
        assert_eq!(first.min, Vec2::new(-256.0, -256.0));
        assert_eq!(first.max, Vec2::new(-128.0, -128.0));
        let last = grid.get(15).expect("chunk index in range").bounds();
        assert_eq!(last.max, Vec2::new(256.0, 256.0));

        let total: f32 = grid.iter().map(|(_, c)| c.bounds().size().x * c.bounds().size().y).sum();
        assert_eq!(total, 512.0 * 512.0);
    }

    #[test]
    fn every_chunk_round_trips() {
        let grid = grid(8);
        for (index, chunk) in grid.iter() {
            let b = chunk.bounds();
            for probe in [b.min, b.center(), b.max - Vec2::splat(0.01)] {
                assert_eq!(grid.pos_to_chunk_index(probe), Some(index));
            }
        }
    }

    #[test]
    fn outside_positions_have_no_chunk() {
        let grid = grid(4);
        assert_eq!(grid.pos_to_chunk_index(Vec2::new(256.0, 0.0)), None);
        assert_eq!(grid.pos_to_chunk_index(Vec2::new(0.0, -256.1)), None);
        assert_eq!(grid.pos_to_chunk_index(Vec2::new(-300.0, 10.0)), None);
        assert_eq!(grid.pos_to_chunk_index(Vec2::new(f32::NAN, 0.0)), None);
    }

    #[test]
    fn origin_sits_in_the_upper_right_centre_cell() {
        let grid = grid(4);
        let index = grid.pos_to_chunk_index(Vec2::ZERO).expect("position should be inside the world");
        assert_eq!(grid.index_to_coord(index), Some(ChunkCoord { x: 2, y: 2 }));
    }

    #[test]
    fn spawn_region_is_a_square_of_chunks() {
        let grid = grid(32);
        assert_eq!(grid.spawn_region(2).len(), 25);
        assert_eq!(grid.spawn_region(0), vec![grid.pos_to_chunk_index(Vec2::ONE).expect("position should be inside the world")]);
    }

    #[test]
    fn view_enumeration_covers_straddled_chunks() {
        let grid = grid(8);
        let visible = grid.chunks_in_view(Vec2::new(-10.0, -10.0), Vec2::new(10.0, 10.0));
        assert_eq!(visible.len(), 4);

        let wide = grid.chunks_in_view(Vec2::new(-128.0, -72.0), Vec2::new(128.0, 72.0));
        assert!(wide.contains(&grid.pos_to_chunk_index(Vec2::new(-100.0, -50.0)).expect("position should be inside the world")));
        assert!(wide.contains(&grid.pos_to_chunk_index(Vec2::new(100.0, 50.0)).expect("position should be inside the world")));
        let mut deduped = wide.clone();
        deduped.sort_unstable();
        deduped.dedup();
        assert_eq!(deduped.len(), wide.len());
    }

    #[test]
    fn swap_remove_keeps_list_dense() {
        let mut grid = grid(2);
        let mut pool = crate::entity::EntityPool::new(3);
        let refs: Vec<_> = (0..3).map(|_| pool.allocate().expect("pool has free slots")).collect();
        let chunk = grid.get_mut(0).expect("chunk index in range");
        for r in &refs {
            chunk.push(*r);
        }
        assert!(chunk.swap_remove(refs[0]));
        assert_eq!(chunk.entities(), &[refs[2], refs[1]]);
        assert!(!chunk.swap_remove(refs[0]));
    }
}
