//! Player inventory, tool cooldown and item magnetism

use std::f32::consts::FRAC_PI_2;

use glam::Vec2;
use tracing::warn;

use crate::config::{InventoryConfig, PullConfig};
use crate::entity::{EntityClass, EntityRef};
use crate::spatial::find_entities_in_radius;
use crate::world::World;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ItemSlot {
    /// `EntityClass::Nil` marks an empty slot.
    pub class: EntityClass,
    pub amount: u32,
}

impl ItemSlot {
    pub fn is_empty(&self) -> bool {
        self.class == EntityClass::Nil
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PulledItem {
    pub item: EntityRef,
    /// Interpolation factor toward the player; grows without bound.
    pub progress: f32,
}

/// One-shot timer that must finish before it can be started again.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cooldown {
    pub length: f32,
    pub progress: f32,
    pub finished: bool,
}

impl Cooldown {
    pub fn new(length: f32) -> Self {
        Self {
            length,
            progress: 0.0,
            finished: true,
        }
    }

    pub fn tick(&mut self, dt: f32) {
        if self.finished {
            return;
        }
        self.progress += dt;
        if self.progress >= self.length {
            self.finished = true;
        }
    }

    pub fn try_start(&mut self) -> bool {
        if !self.finished {
            return false;
        }
        self.finished = false;
        self.progress = 0.0;
        true
    }
}

pub struct PlayerData {
    item_slots: Vec<ItemSlot>,
    pulled_items: Vec<Option<PulledItem>>,
    pub tool_cooldown: Cooldown,
    pub tool_angle: f32,
    row_length: usize,
}

/// Items that reached the player during one pull update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PullReport {
    pub newly_tracked: usize,
    pub collected: Vec<EntityClass>,
}

impl PlayerData {
    pub fn new(inventory: &InventoryConfig, pull: &PullConfig, tool_cooldown_secs: f32) -> Self {
        Self {
            item_slots: vec![ItemSlot::default(); inventory.slots],
            pulled_items: vec![None; pull.max_pulled_items],
            tool_cooldown: Cooldown::new(tool_cooldown_secs),
            tool_angle: 0.0,
            row_length: inventory.row_length.max(1),
        }
    }

    pub fn item_slots(&self) -> &[ItemSlot] {
        &self.item_slots
    }

    /// Slots grouped into inventory rows for the overlay.
    pub fn item_rows(&self) -> impl Iterator<Item = &[ItemSlot]> {
        self.item_slots.chunks(self.row_length)
    }

    pub fn pulled_items(&self) -> impl Iterator<Item = &PulledItem> {
        self.pulled_items.iter().flatten()
    }

    pub fn count_of(&self, class: EntityClass) -> u32 {
        self.item_slots
            .iter()
            .filter(|slot| slot.class == class)
            .map(|slot| slot.amount)
            .sum()
    }

    /// Merges into the first slot of the same class met before an empty one,
    /// otherwise fills that empty slot. Returns `false` when nothing fits.
    pub fn add_item(&mut self, class: EntityClass, amount: u32) -> bool {
        add_to_slots(&mut self.item_slots, class, amount)
    }

    pub fn is_tracking(&self, item: EntityRef) -> bool {
        self.pulled_items().any(|p| p.item == item)
    }

    /// First-fit into a free pull slot; a full list silently declines.
    pub fn track(&mut self, item: EntityRef) -> bool {
        if self.is_tracking(item) {
            return false;
        }
        match self.pulled_items.iter_mut().find(|slot| slot.is_none()) {
            Some(slot) => {
                *slot = Some(PulledItem {
                    item,
                    progress: 0.0,
                });
                true
            }
            None => false,
        }
    }

    /// Aim angle in the tool sprite's frame (zero points up).
    pub fn aim_at(&mut self, from: Vec2, target: Vec2) {
        let delta = target - from;
        self.tool_angle = -delta.y.atan2(delta.x) + FRAC_PI_2;
    }

    /// Pulls nearby items toward the player, collecting those that arrive.
    ///
    /// Motion is `pos += (player - pos) * progress` with `progress` growing
    /// every frame, so items overshoot once the factor passes 1 and then
    /// settle onto the player.
    pub fn update_item_pull(
        &mut self,
        world: &mut World,
        player: EntityRef,
        config: &PullConfig,
        dt: f32,
    ) -> PullReport {
        let mut report = PullReport::default();
        let Some(player_pos) = world.entity(player).map(|p| p.pos) else {
            return report;
        };

        for entity in find_entities_in_radius(world, player_pos, config.radius) {
            let is_item = world.entity(entity).is_some_and(|r| r.class.is_item());
            if is_item && self.track(entity) {
                report.newly_tracked += 1;
            }
        }

        for slot in &mut self.pulled_items {
            let Some(pulled) = slot else {
                continue;
            };
            let Some(record) = world.entity_mut(pulled.item) else {
                *slot = None;
                continue;
            };

            pulled.progress += dt * config.rate;
            let delta = player_pos - record.pos;
            record.pos += delta * pulled.progress;
            let class = record.class;

            if delta.length() < config.capture_distance {
                let item = pulled.item;
                *slot = None;
                if add_to_slots(&mut self.item_slots, class, 1) {
                    report.collected.push(class);
                }
                world.destroy_entity(item);
            } else {
                world.update_entity_chunk(pulled.item);
            }
        }
        report
    }
}

fn add_to_slots(slots: &mut [ItemSlot], class: EntityClass, amount: u32) -> bool {
    for slot in slots.iter_mut() {
        if slot.is_empty() {
            slot.class = class;
            slot.amount = amount;
            return true;
        }
        if slot.class == class {
            slot.amount += amount;
            return true;
        }
    }
    warn!(?class, amount, "inventory full, item lost");
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WorldConfig;
    use crate::sprite::SpriteAtlas;

    fn player_data() -> PlayerData {
        PlayerData::new(&InventoryConfig::default(), &PullConfig::default(), 0.2)
    }

    fn world_with_player() -> (World, EntityRef) {
        let mut world = World::new(&WorldConfig {
            world_size_in_chunks: 4,
            max_entity_count: 64,
            ..WorldConfig::default()
        });
        let player = world.create_entity();
        world
            .entity_mut(player)
            .expect("entity should be live")
            .setup(EntityClass::Player, &SpriteAtlas::default());
        world.set_entity_position(player, Vec2::new(64.0, 64.0));
        (world, player)
    }

    fn drop_item(world: &mut World, pos: Vec2) -> EntityRef {
        let item = world.create_entity();
        world
            .entity_mut(item)
            .expect("entity should be live")
            .setup(EntityClass::ItemStone, &SpriteAtlas::default());
        world.set_entity_position(item, pos);
        item
    }

    #[test]
    fn cooldown_gates_restarts() {
        let mut cooldown = Cooldown::new(0.2);
        assert!(cooldown.try_start());
        assert!(!cooldown.try_start());
        cooldown.tick(0.1);
        assert!(!cooldown.try_start());
        cooldown.tick(0.1);
        assert!(cooldown.try_start());
    }

    #[test]
    fn inventory_merges_then_fills() {
        let mut data = player_data();
        assert!(data.add_item(EntityClass::ItemStone, 1));
        assert!(data.add_item(EntityClass::ItemStone, 2));
        assert!(data.add_item(EntityClass::RockSmall, 1));
        assert_eq!(data.item_slots()[0].amount, 3);
        assert_eq!(data.item_slots()[1].class, EntityClass::RockSmall);
        assert_eq!(data.count_of(EntityClass::ItemStone), 3);
        assert_eq!(data.item_rows().count(), 2);
    }

    #[test]
    fn full_inventory_rejects_new_classes() {
        let inventory = InventoryConfig {
            slots: 1,
            row_length: 8,
        };
        let mut data = PlayerData::new(&inventory, &PullConfig::default(), 0.2);
        assert!(data.add_item(EntityClass::ItemStone, 1));
        assert!(!data.add_item(EntityClass::RockSmall, 1));
    }

    #[test]
    fn pull_list_saturates_silently() {
        let pull = PullConfig {
            max_pulled_items: 2,
            ..PullConfig::default()
        };
        let mut data = PlayerData::new(&InventoryConfig::default(), &pull, 0.2);
        let (mut world, _) = world_with_player();
        let items: Vec<_> = (0..3)
            .map(|i| drop_item(&mut world, Vec2::new(70.0 + i as f32, 64.0)))
            .collect();
        assert!(data.track(items[0]));
        assert!(!data.track(items[0]));
        assert!(data.track(items[1]));
        assert!(!data.track(items[2]));
        assert_eq!(data.pulled_items().count(), 2);
    }

    #[test]
    fn nearby_items_are_pulled_in_and_collected() {
        let mut data = player_data();
        let (mut world, player) = world_with_player();
        let item = drop_item(&mut world, Vec2::new(74.0, 64.0));
        let far = drop_item(&mut world, Vec2::new(100.0, 64.0));
        let config = PullConfig::default();

        let mut collected = Vec::new();
        for _ in 0..2000 {
            let report = data.update_item_pull(&mut world, player, &config, 1.0 / 60.0);
            collected.extend(report.collected);
            if !world.is_alive(item) {
                break;
            }
        }
        assert_eq!(collected, vec![EntityClass::ItemStone]);
        assert!(!world.is_alive(item));
        assert!(world.is_alive(far));
        assert_eq!(data.count_of(EntityClass::ItemStone), 1);
        assert_eq!(data.pulled_items().count(), 0);
        assert!(world.membership_is_consistent());
    }

    #[test]
    fn fast_pull_overshoots_the_player() {
        let mut data = player_data();
        let (mut world, player) = world_with_player();
        let item = drop_item(&mut world, Vec2::new(74.0, 64.0));
        let config = PullConfig {
            rate: 1.0,
            capture_distance: 0.5,
            ..PullConfig::default()
        };

        // Progress reaches 1.5, 3.0 and 4.5, flinging the item past the player.
        let mut offsets = Vec::new();
        for _ in 0..3 {
            let report = data.update_item_pull(&mut world, player, &config, 1.5);
            assert!(report.collected.is_empty());
            offsets.push(world.entity(item).expect("item still pulled").pos.x - 64.0);
        }
        assert_eq!(offsets, vec![-5.0, 10.0, -35.0]);
        assert_eq!(world.entity(item).expect("item still pulled").pos.y, 64.0);
        assert!(world.membership_is_consistent());
    }

    #[test]
    fn stale_pulled_items_are_released() {
        let mut data = player_data();
        let (mut world, player) = world_with_player();
        let item = drop_item(&mut world, Vec2::new(74.0, 64.0));
        data.track(item);
        world.destroy_entity(item);
        data.update_item_pull(&mut world, player, &PullConfig::default(), 0.016);
        assert_eq!(data.pulled_items().count(), 0);
    }

    #[test]
    fn aim_angle_is_zero_when_pointing_up() {
        let mut data = player_data();
        data.aim_at(Vec2::ZERO, Vec2::new(0.0, 10.0));
        assert!(data.tool_angle.abs() < 1e-6);
    }
}
