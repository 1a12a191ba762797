// Items
//
// Plain pickups and weapons share the `Item` core; `ItemManager` owns both
// kinds behind the `ItemActor` enum.

pub mod item;
pub mod rarity;
pub mod weapon;

pub use item::{Item, ItemComponents, ItemDesc, ItemId, ItemProperties, ItemState, PickupWidget};
pub use rarity::{ItemRarity, STAR_SLOTS};
pub use weapon::{weapon_desc, Weapon, BARREL_SOCKET, THROW_SPEED, THROW_WEAPON_TIME};

use crate::engine::effects::Transform;
use crate::engine::physics::PhysicsWorld;

/// Anything the item manager can hold
#[derive(Debug)]
pub enum ItemActor {
    Item(Item),
    Weapon(Weapon),
}

impl ItemActor {
    pub fn item(&self) -> &Item {
        match self {
            Self::Item(item) => item,
            Self::Weapon(weapon) => &weapon.item,
        }
    }

    pub fn item_mut(&mut self) -> &mut Item {
        match self {
            Self::Item(item) => item,
            Self::Weapon(weapon) => &mut weapon.item,
        }
    }

    pub fn as_weapon(&self) -> Option<&Weapon> {
        match self {
            Self::Weapon(weapon) => Some(weapon),
            Self::Item(_) => None,
        }
    }

    pub fn as_weapon_mut(&mut self) -> Option<&mut Weapon> {
        match self {
            Self::Weapon(weapon) => Some(weapon),
            Self::Item(_) => None,
        }
    }

    pub fn is_weapon(&self) -> bool {
        matches!(self, Self::Weapon(_))
    }

    pub fn id(&self) -> ItemId {
        self.item().id
    }
}

/// Owns every item in the world
#[derive(Debug, Default)]
pub struct ItemManager {
    items: Vec<ItemActor>,
    next_id: ItemId,
}

impl ItemManager {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate_id(&mut self) -> ItemId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Spawn a plain item and run its first-frame setup
    pub fn spawn_item(
        &mut self,
        desc: ItemDesc,
        physics: &mut PhysicsWorld,
        transform: Transform,
    ) -> ItemId {
        let id = self.allocate_id();
        let mut item = Item::spawn(id, desc, physics, transform);
        item.begin_play(physics);

        log::info!("Spawned item {} ({})", item.name, id);
        self.items.push(ItemActor::Item(item));
        id
    }

    /// Spawn a weapon and run its first-frame setup
    pub fn spawn_weapon(
        &mut self,
        desc: ItemDesc,
        physics: &mut PhysicsWorld,
        transform: Transform,
    ) -> ItemId {
        let id = self.allocate_id();
        let mut weapon = Weapon::new(Item::spawn(id, desc, physics, transform));
        weapon.item.begin_play(physics);

        log::info!(
            "Spawned weapon {} ({}, {})",
            weapon.item.name,
            id,
            weapon.item.rarity.display_name()
        );
        self.items.push(ItemActor::Weapon(weapon));
        id
    }

    pub fn get(&self, id: ItemId) -> Option<&ItemActor> {
        self.items.iter().find(|actor| actor.id() == id)
    }

    pub fn get_mut(&mut self, id: ItemId) -> Option<&mut ItemActor> {
        self.items.iter_mut().find(|actor| actor.id() == id)
    }

    pub fn item(&self, id: ItemId) -> Option<&Item> {
        self.get(id).map(ItemActor::item)
    }

    pub fn item_mut(&mut self, id: ItemId) -> Option<&mut Item> {
        self.get_mut(id).map(ItemActor::item_mut)
    }

    pub fn weapon(&self, id: ItemId) -> Option<&Weapon> {
        self.get(id).and_then(ItemActor::as_weapon)
    }

    pub fn weapon_mut(&mut self, id: ItemId) -> Option<&mut Weapon> {
        self.get_mut(id).and_then(ItemActor::as_weapon_mut)
    }

    /// Remove an item and its physics body
    pub fn remove(&mut self, id: ItemId, physics: &mut PhysicsWorld) -> Option<ItemActor> {
        let index = self.items.iter().position(|actor| actor.id() == id)?;
        let actor = self.items.remove(index);
        physics.remove_rigid_body(actor.item().body());
        Some(actor)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ItemActor> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut ItemActor> {
        self.items.iter_mut()
    }

    /// Per-frame item updates
    pub fn tick(&mut self, physics: &mut PhysicsWorld) {
        for weapon in self.items.iter_mut().filter_map(ItemActor::as_weapon_mut) {
            weapon.tick(physics);
        }
    }

    pub fn count(&self) -> usize {
        self.items.len()
    }
}
