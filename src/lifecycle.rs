//! Damage, death and drops

use tracing::debug;

use crate::entity::EntityRef;
use crate::rng::RandomStream;
use crate::sprite::SpriteSizes;
use crate::world::World;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Stale reference or a class without health.
    Ignored,
    Survived { health: i32 },
    Destroyed { drops: Vec<EntityRef> },
}

pub fn damage(
    world: &mut World,
    entity: EntityRef,
    amount: i32,
    sprites: &dyn SpriteSizes,
    rng: &mut RandomStream,
) -> DamageOutcome {
    let Some(record) = world.entity_mut(entity) else {
        return DamageOutcome::Ignored;
    };
    if !record.class.is_damageable() {
        return DamageOutcome::Ignored;
    }
    record.health = (record.health - amount).max(0);
    if record.health > 0 {
        return DamageOutcome::Survived {
            health: record.health,
        };
    }
    DamageOutcome::Destroyed {
        drops: die(world, entity, sprites, rng),
    }
}

/// Spawns the class's drops inside its bounds, then destroys it. Drops are
/// placed while the source is still valid so its bounds can be read.
pub fn die(
    world: &mut World,
    entity: EntityRef,
    sprites: &dyn SpriteSizes,
    rng: &mut RandomStream,
) -> Vec<EntityRef> {
    let Some(record) = world.entity(entity) else {
        return Vec::new();
    };
    let class = record.class;
    let bounds = record.bounds();

    let mut drops = Vec::new();
    if let Some(drop) = class.info().drop {
        for _ in 0..drop.count {
            let item = world.create_entity();
            if let Some(item_record) = world.entity_mut(item) {
                item_record.setup(drop.item, sprites);
                item_record.pos = bounds.random_point_i(rng);
            }
            world.update_entity_chunk(item);
            drops.push(item);
        }
    }

    debug!(index = entity.index(), ?class, drops = drops.len(), "entity died");
    world.destroy_entity(entity);
    drops
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WorldConfig;
    use crate::entity::EntityClass;
    use crate::sprite::SpriteAtlas;
    use glam::Vec2;

    fn rock(world: &mut World, class: EntityClass) -> EntityRef {
        let e = world.create_entity();
        world
            .entity_mut(e)
            .expect("entity should be live")
            .setup(class, &SpriteAtlas::default());
        world.set_entity_position(e, Vec2::new(40.0, 40.0));
        e
    }

    fn world() -> World {
        World::new(&WorldConfig {
            world_size_in_chunks: 4,
            max_entity_count: 16,
            ..WorldConfig::default()
        })
    }

    #[test]
    fn partial_damage_keeps_entity() {
        let mut world = world();
        let mut rng = RandomStream::new(1);
        let e = rock(&mut world, EntityClass::RockMedium);
        let outcome = damage(&mut world, e, 1, &SpriteAtlas::default(), &mut rng);
        assert_eq!(outcome, DamageOutcome::Survived { health: 1 });
        assert!(world.is_alive(e));
    }

    #[test]
    fn overkill_destroys_and_drops_full_table() {
        let mut world = world();
        let mut rng = RandomStream::new(1);
        let e = rock(&mut world, EntityClass::RockMedium);
        let bounds = world.entity_bounds(e).expect("entity should be live");

        let DamageOutcome::Destroyed { drops } =
            damage(&mut world, e, 3, &SpriteAtlas::default(), &mut rng)
        else {
            panic!("rock should die");
        };
        assert!(!world.is_alive(e));
        assert_eq!(drops.len(), 2);
        for item in drops {
            let record = world.entity(item).expect("entity should be live");
            assert_eq!(record.class, EntityClass::ItemStone);
            assert!(record.pos.cmpge(bounds.min).all() && record.pos.cmple(bounds.max).all());
            assert!(record.chunk().is_some());
        }
        assert!(world.membership_is_consistent());
    }

    #[test]
    fn drop_counts_follow_rock_size() {
        for (class, expected) in [
            (EntityClass::RockSmall, 1),
            (EntityClass::RockMedium, 2),
            (EntityClass::RockLarge, 3),
        ] {
            let mut world = world();
            let mut rng = RandomStream::new(5);
            let e = rock(&mut world, class);
            assert_eq!(die(&mut world, e, &SpriteAtlas::default(), &mut rng).len(), expected);
        }
    }

    #[test]
    fn dead_entities_cannot_die_twice() {
        let mut world = world();
        let mut rng = RandomStream::new(1);
        let e = rock(&mut world, EntityClass::RockSmall);
        let atlas = SpriteAtlas::default();
        assert!(matches!(damage(&mut world, e, 1, &atlas, &mut rng), DamageOutcome::Destroyed { .. }));
        assert_eq!(damage(&mut world, e, 1, &atlas, &mut rng), DamageOutcome::Ignored);
        assert_eq!(world.entities().live_count(), 1);
    }

    #[test]
    fn players_and_items_ignore_damage() {
        let mut world = world();
        let mut rng = RandomStream::new(1);
        let player = rock(&mut world, EntityClass::Player);
        let atlas = SpriteAtlas::default();
        assert_eq!(damage(&mut world, player, 5, &atlas, &mut rng), DamageOutcome::Ignored);
        assert!(world.is_alive(player));
    }
}
