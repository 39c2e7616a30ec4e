//! Per-chunk procedural population of rocks

use glam::Vec2;
use rand::Rng;
use tracing::{debug, warn};

use crate::chunk::ChunkIndex;
use crate::config::GenerationConfig;
use crate::entity::{EntityClass, ROCK_CLASSES};
use crate::geometry::Range2;
use crate::rng::RandomStream;
use crate::sprite::SpriteSizes;
use crate::world::World;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GenerationReport {
    pub placed: usize,
    /// Rocks abandoned after hitting `placement_attempts`.
    pub skipped: usize,
}

/// Populates a chunk with rocks. Already generated chunks are left alone and
/// yield `None`.
///
/// Placement resamples until a spot free of overlaps is found. Without
/// `placement_attempts` that loop has no bound, so a configuration packing
/// more rock area into a chunk than fits never returns.
pub fn generate_chunk(
    world: &mut World,
    index: ChunkIndex,
    config: &GenerationConfig,
    sprites: &dyn SpriteSizes,
    rng: &mut RandomStream,
) -> Option<GenerationReport> {
    let chunk = world.chunk_mut(index)?;
    if chunk.generated {
        return None;
    }
    chunk.seed = Some(rng.state());
    let chunk_bounds = chunk.bounds();

    let mut report = GenerationReport::default();
    for _ in 0..config.rocks_per_chunk {
        let class = ROCK_CLASSES[rng.gen_range(0..ROCK_CLASSES.len())];
        let size = class.bounds_size(sprites);
        let area = Range2::new(
            chunk_bounds.min + Vec2::new(size.x * 0.5, 0.0),
            chunk_bounds.max - Vec2::new(size.x * 0.5, size.y),
        );

        match place_without_overlap(world, index, area, size, config.placement_attempts, rng) {
            Some(pos) => {
                let rock = world.create_entity();
                if let Some(record) = world.entity_mut(rock) {
                    record.setup(class, sprites);
                    record.pos = pos;
                }
                world.chunk_add_entity(index, rock);
                report.placed += 1;
            }
            None => {
                warn!(chunk = index, ?class, "gave up placing rock");
                report.skipped += 1;
            }
        }
    }

    if let Some(chunk) = world.chunk_mut(index) {
        chunk.generated = true;
    }
    debug!(chunk = index, placed = report.placed, skipped = report.skipped, "chunk generated");
    Some(report)
}

fn place_without_overlap(
    world: &World,
    index: ChunkIndex,
    area: Range2,
    size: Vec2,
    max_attempts: Option<u32>,
    rng: &mut RandomStream,
) -> Option<Vec2> {
    let chunk = world.chunk(index)?;
    let mut attempts = 0u32;
    loop {
        if max_attempts.is_some_and(|max| attempts >= max) {
            return None;
        }
        attempts += 1;

        let pos = area.random_point_i(rng);
        let bounds = Range2::bottom_center(size).shift(pos);
        let overlaps = chunk.entities().iter().any(|other| {
            world
                .entity_bounds(*other)
                .is_some_and(|other| bounds.overlaps(&other))
        });
        if !overlaps {
            return Some(pos);
        }
    }
}

/// Clears every non-player entity from a chunk and replays its generation
/// from the stream state captured the first time, reproducing the layout.
pub fn regenerate_chunk(
    world: &mut World,
    index: ChunkIndex,
    config: &GenerationConfig,
    sprites: &dyn SpriteSizes,
    rng: &mut RandomStream,
) -> Option<GenerationReport> {
    let chunk = world.chunk(index)?;
    let doomed: Vec<_> = chunk
        .entities()
        .iter()
        .copied()
        .filter(|e| world.entity(*e).is_some_and(|r| r.class != EntityClass::Player))
        .collect();
    for entity in doomed {
        world.destroy_entity(entity);
    }

    let chunk = world.chunk_mut(index)?;
    if let Some(seed) = chunk.seed {
        rng.restore(seed);
    }
    chunk.generated = false;
    debug!(chunk = index, "regenerating chunk");
    generate_chunk(world, index, config, sprites, rng)
}

/// Generates each listed chunk that has not been generated yet.
pub fn ensure_generated(
    world: &mut World,
    indices: &[ChunkIndex],
    config: &GenerationConfig,
    sprites: &dyn SpriteSizes,
    rng: &mut RandomStream,
) -> usize {
    indices
        .iter()
        .filter_map(|index| generate_chunk(world, *index, config, sprites, rng))
        .count()
}
