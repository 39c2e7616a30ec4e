//! Spatial queries over the chunk grid

use glam::Vec2;

use crate::chunk::ChunkIndex;
use crate::entity::EntityRef;
use crate::world::World;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HitResult {
    pub blocking_hit: bool,
    pub entity: Option<EntityRef>,
    pub position: Vec2,
}

impl HitResult {
    fn hit(entity: EntityRef, position: Vec2) -> Self {
        Self {
            blocking_hit: true,
            entity: Some(entity),
            position,
        }
    }
}

/// First entity in `chunk`'s list whose bounds contain `pos`.
pub fn find_entity_at_position(world: &World, chunk: ChunkIndex, pos: Vec2) -> Option<EntityRef> {
    let chunk = world.chunk(chunk)?;
    chunk
        .entities()
        .iter()
        .copied()
        .find(|e| world.entity(*e).is_some_and(|record| record.bounds().contains(pos)))
}

/// Entities strictly closer than `radius` to `origin`.
///
/// Only the chunks under the four corners of the bounding square are
/// searched, so a radius wider than a chunk can miss entities in chunks the
/// corners skip over.
pub fn find_entities_in_radius(world: &World, origin: Vec2, radius: f32) -> Vec<EntityRef> {
    let mut chunks: Vec<ChunkIndex> = Vec::with_capacity(4);
    for corner in [
        Vec2::new(radius, -radius),
        Vec2::new(radius, radius),
        Vec2::new(-radius, -radius),
        Vec2::new(-radius, radius),
    ] {
        if let Some(index) = world.pos_to_chunk_index(origin + corner) {
            if !chunks.contains(&index) {
                chunks.push(index);
            }
        }
    }

    let mut found = Vec::new();
    for index in chunks {
        let Some(chunk) = world.chunk(index) else {
            continue;
        };
        for &entity in chunk.entities() {
            let Some(record) = world.entity(entity) else {
                continue;
            };
            if record.pos.distance(origin) < radius {
                found.push(entity);
            }
        }
    }
    found
}

/// Walks from `from` to `to` in `step_size` increments and reports the first
/// sample that lands inside an entity. Gaps between samples can skip entities
/// thinner than the step.
pub fn line_cast(world: &World, from: Vec2, to: Vec2, step_size: f32) -> HitResult {
    if step_size <= 0.0 || step_size.is_nan() {
        return HitResult::default();
    }
    let ray = to - from;
    let length = ray.length();
    let direction = ray.normalize_or_zero();
    let steps = (length / step_size).floor() as u32;

    for step in 0..=steps {
        let test_pos = from + direction * (step as f32 * step_size);
        let Some(chunk) = world.pos_to_chunk_index(test_pos) else {
            continue;
        };
        if let Some(entity) = find_entity_at_position(world, chunk, test_pos) {
            return HitResult::hit(entity, test_pos);
        }
    }
    HitResult::default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WorldConfig;
    use crate::entity::EntityClass;
    use crate::sprite::SpriteAtlas;

    fn world() -> World {
        World::new(&WorldConfig {
            world_size_in_chunks: 4,
            max_entity_count: 64,
            ..WorldConfig::default()
        })
    }

    fn spawn(world: &mut World, class: EntityClass, pos: Vec2) -> EntityRef {
        let e = world.create_entity();
        world
            .entity_mut(e)
            .expect("entity should be live")
            .setup(class, &SpriteAtlas::default());
        world.set_entity_position(e, pos);
        e
    }

    #[test]
    fn point_query_uses_bottom_centre_bounds() {
        let mut world = world();
        let rock = spawn(&mut world, EntityClass::RockLarge, Vec2::new(50.0, 50.0));
        let chunk = world.chunk_of(rock).expect("entity should sit in a chunk");
        assert_eq!(find_entity_at_position(&world, chunk, Vec2::new(50.0, 55.0)), Some(rock));
        assert_eq!(find_entity_at_position(&world, chunk, Vec2::new(50.0, 49.0)), None);
    }

    #[test]
    fn items_are_not_hit_by_point_queries() {
        let mut world = world();
        let item = spawn(&mut world, EntityClass::ItemStone, Vec2::new(5.0, 5.0));
        let chunk = world.chunk_of(item).expect("entity should sit in a chunk");
        assert_eq!(find_entity_at_position(&world, chunk, Vec2::new(5.0, 5.0)), None);
    }

    #[test]
    fn radius_search_is_strict() {
        let mut world = world();
        let near = spawn(&mut world, EntityClass::ItemStone, Vec2::new(10.0, 0.0));
        let edge = spawn(&mut world, EntityClass::ItemStone, Vec2::new(20.0, 0.0));
        let far = spawn(&mut world, EntityClass::ItemStone, Vec2::new(40.0, 0.0));
        let found = find_entities_in_radius(&world, Vec2::ZERO, 20.0);
        assert!(found.contains(&near));
        assert!(!found.contains(&edge));
        assert!(!found.contains(&far));
    }

    #[test]
    fn radius_search_spans_corner_chunks() {
        let mut world = world();
        let a = spawn(&mut world, EntityClass::ItemStone, Vec2::new(-3.0, -3.0));
        let b = spawn(&mut world, EntityClass::ItemStone, Vec2::new(3.0, 3.0));
        assert_ne!(world.chunk_of(a), world.chunk_of(b));
        let found = find_entities_in_radius(&world, Vec2::ZERO, 10.0);
        assert_eq!(found.len(), 2);
    }

    #[test]
    fn line_cast_reports_first_hit_in_travel_order() {
        let mut world = world();
        let near = spawn(&mut world, EntityClass::RockSmall, Vec2::new(10.0, 0.0));
        let _far = spawn(&mut world, EntityClass::RockSmall, Vec2::new(30.0, 0.0));
        let hit = line_cast(&world, Vec2::new(0.0, 1.0), Vec2::new(40.0, 1.0), 0.5);
        assert!(hit.blocking_hit);
        assert_eq!(hit.entity, Some(near));
        assert!(hit.position.x >= 7.0 && hit.position.x < 10.0);
    }

    #[test]
    fn line_cast_misses_empty_space() {
        let mut world = world();
        spawn(&mut world, EntityClass::RockSmall, Vec2::new(10.0, 0.0));
        let hit = line_cast(&world, Vec2::new(0.0, 50.0), Vec2::new(40.0, 50.0), 0.1);
        assert!(!hit.blocking_hit);
        assert!(hit.entity.is_none());
    }

    #[test]
    fn line_cast_entering_the_world_skips_outside_samples() {
        let mut world = world();
        let rock = spawn(&mut world, EntityClass::RockSmall, Vec2::new(-250.0, 0.0));
        let hit = line_cast(&world, Vec2::new(-300.0, 1.0), Vec2::new(-240.0, 1.0), 0.5);
        assert_eq!(hit.entity, Some(rock));
        assert!(hit.position.x >= -253.0 && hit.position.x < -247.0);
    }

    #[test]
    fn degenerate_rays() {
        let mut world = world();
        let rock = spawn(&mut world, EntityClass::RockSmall, Vec2::new(10.0, 0.0));
        let point = line_cast(&world, Vec2::new(10.0, 1.0), Vec2::new(10.0, 1.0), 0.1);
        assert_eq!(point.entity, Some(rock));
        let bad_step = line_cast(&world, Vec2::ZERO, Vec2::new(40.0, 1.0), 0.0);
        assert!(!bad_step.blocking_hit);
    }
}
