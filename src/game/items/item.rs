// Pickup items
//
// An item is a physics body with three colliders: the mesh (only collides
// while falling), the area sphere (overlap trigger for pickup range) and the
// collision box (what the crosshair trace hits). Each state owns a complete
// bundle of collision/physics/visibility settings, applied in full on entry.

use glam::Vec3;
use std::collections::HashMap;

use super::rarity::{ItemRarity, STAR_SLOTS};
use crate::engine::effects::Transform;
use crate::engine::physics::{
    presets, ChannelResponses, ColliderHandle, CollisionChannel, CollisionEnabled,
    CollisionResponse, CollisionSetup, Owner, PhysicsWorld, RigidBodyHandle,
};
use crate::game::characters::ShooterCharacter;

/// Unique identifier for an item
pub type ItemId = u32;

/// Lifecycle state of an item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ItemState {
    /// Lying in the world, can be picked up
    #[default]
    Pickup,
    /// Held by a character
    Equipped,
    /// Thrown/dropped and simulating physics
    Falling,
}

impl ItemState {
    pub const ALL: [ItemState; 3] = [Self::Pickup, Self::Equipped, Self::Falling];
}

/// Everything a state decides about an item's components
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemProperties {
    pub mesh_simulate_physics: bool,
    pub mesh_visible: bool,
    pub mesh_gravity: bool,
    pub mesh: CollisionSetup,
    pub area_sphere: CollisionSetup,
    pub collision_box: CollisionSetup,
    pub pickup_widget_visible: bool,
}

impl ItemProperties {
    /// The full settings bundle for a state
    pub fn for_state(state: ItemState) -> Self {
        let ignore_all = ChannelResponses::all(CollisionResponse::Ignore);
        let mesh_off = CollisionSetup::new(
            CollisionChannel::WorldDynamic,
            CollisionEnabled::NoCollision,
            ignore_all,
        );
        let sphere_off = CollisionSetup::new(
            CollisionChannel::WorldDynamic,
            CollisionEnabled::NoCollision,
            ignore_all,
        );
        let box_off = sphere_off;

        match state {
            ItemState::Pickup => Self {
                mesh_simulate_physics: false,
                mesh_visible: true,
                mesh_gravity: false,
                mesh: mesh_off,
                area_sphere: CollisionSetup::new(
                    CollisionChannel::WorldDynamic,
                    CollisionEnabled::QueryOnly,
                    ChannelResponses::all(CollisionResponse::Overlap),
                ),
                collision_box: CollisionSetup::new(
                    CollisionChannel::WorldDynamic,
                    CollisionEnabled::QueryAndPhysics,
                    ignore_all.with(CollisionChannel::Visibility, CollisionResponse::Block),
                ),
                pickup_widget_visible: false,
            },
            ItemState::Equipped => Self {
                mesh_simulate_physics: false,
                mesh_visible: true,
                mesh_gravity: false,
                mesh: mesh_off,
                area_sphere: sphere_off,
                collision_box: box_off,
                pickup_widget_visible: false,
            },
            ItemState::Falling => Self {
                mesh_simulate_physics: true,
                mesh_visible: true,
                mesh_gravity: true,
                mesh: CollisionSetup::new(
                    CollisionChannel::WorldDynamic,
                    CollisionEnabled::QueryAndPhysics,
                    ignore_all.with(CollisionChannel::WorldStatic, CollisionResponse::Block),
                ),
                area_sphere: sphere_off,
                collision_box: box_off,
                pickup_widget_visible: false,
            },
        }
    }
}

/// Spawn parameters for an item
#[derive(Debug, Clone)]
pub struct ItemDesc {
    pub name: String,
    pub count: i32,
    pub rarity: ItemRarity,
    pub state: ItemState,
    pub mesh_half_extents: Vec3,
    pub area_sphere_radius: f32,
    pub collision_box_half_extents: Vec3,
    pub has_pickup_widget: bool,
    /// Named attachment points relative to the mesh
    pub sockets: Vec<(String, Transform)>,
}

impl Default for ItemDesc {
    fn default() -> Self {
        Self {
            name: "Default".to_string(),
            count: 0,
            rarity: ItemRarity::Common,
            state: ItemState::Pickup,
            mesh_half_extents: Vec3::new(5.0, 10.0, 35.0),
            area_sphere_radius: 150.0,
            collision_box_half_extents: Vec3::new(10.0, 15.0, 40.0),
            has_pickup_widget: true,
            sockets: Vec::new(),
        }
    }
}

/// Floating name/count/stars panel shown while the item is targeted
#[derive(Debug, Clone, Default)]
pub struct PickupWidget {
    visible: bool,
}

impl PickupWidget {
    pub fn is_visible(&self) -> bool {
        self.visible
    }
}

/// Physics handles making up an item
#[derive(Debug, Clone, Copy)]
pub struct ItemComponents {
    pub body: RigidBodyHandle,
    pub mesh: ColliderHandle,
    pub area_sphere: ColliderHandle,
    pub collision_box: ColliderHandle,
}

#[derive(Debug)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub count: i32,
    pub rarity: ItemRarity,
    state: ItemState,
    active_stars: [bool; STAR_SLOTS],
    components: ItemComponents,
    pickup_widget: Option<PickupWidget>,
    mesh_visible: bool,
    sockets: HashMap<String, Transform>,
}

impl Item {
    /// Create the item's body and colliders in the physics world
    pub fn spawn(
        id: ItemId,
        desc: ItemDesc,
        physics: &mut PhysicsWorld,
        transform: Transform,
    ) -> Self {
        let body = physics.add_rigid_body(presets::item_body(transform.location));
        physics.teleport(body, transform);

        let owner = Owner::Item(id);
        let mesh = physics.add_collider(presets::item_mesh(desc.mesh_half_extents), body, owner);
        let area_sphere =
            physics.add_collider(presets::item_area_sphere(desc.area_sphere_radius), body, owner);
        let collision_box = physics.add_collider(
            presets::item_collision_box(desc.collision_box_half_extents),
            body,
            owner,
        );

        Self {
            id,
            name: desc.name,
            count: desc.count,
            rarity: desc.rarity,
            state: desc.state,
            active_stars: [false; STAR_SLOTS],
            components: ItemComponents {
                body,
                mesh,
                area_sphere,
                collision_box,
            },
            pickup_widget: desc.has_pickup_widget.then(PickupWidget::default),
            mesh_visible: true,
            sockets: desc.sockets.into_iter().collect(),
        }
    }

    /// First-frame setup: hide the widget, light the stars, apply the state
    pub fn begin_play(&mut self, physics: &mut PhysicsWorld) {
        self.set_pickup_widget_visible(false);
        self.set_active_stars();
        self.set_item_properties(self.state, physics);
    }

    fn set_active_stars(&mut self) {
        self.active_stars = self.rarity.active_stars();
    }

    pub fn active_stars(&self) -> [bool; STAR_SLOTS] {
        self.active_stars
    }

    pub fn state(&self) -> ItemState {
        self.state
    }

    /// Enter a state and apply its complete settings bundle
    pub fn set_item_state(&mut self, state: ItemState, physics: &mut PhysicsWorld) {
        if self.state != state {
            log::info!("{} ({}) -> {:?}", self.name, self.id, state);
        }
        self.state = state;
        self.set_item_properties(state, physics);
    }

    fn set_item_properties(&mut self, state: ItemState, physics: &mut PhysicsWorld) {
        let properties = ItemProperties::for_state(state);
        let c = self.components;

        self.set_pickup_widget_visible(properties.pickup_widget_visible);
        self.mesh_visible = properties.mesh_visible;

        physics.set_simulate_physics(c.body, properties.mesh_simulate_physics);
        physics.set_enable_gravity(c.body, properties.mesh_gravity);
        physics.apply_collision_setup(c.mesh, properties.mesh);
        physics.apply_collision_setup(c.area_sphere, properties.area_sphere);
        physics.apply_collision_setup(c.collision_box, properties.collision_box);
    }

    /// Read the applied settings back out of the physics world
    pub fn observe(&self, physics: &PhysicsWorld) -> ItemProperties {
        let c = self.components;
        let setup = |handle| {
            physics
                .collision_setup(handle)
                .unwrap_or_else(|| CollisionSetup::disabled(CollisionChannel::WorldDynamic))
        };

        ItemProperties {
            mesh_simulate_physics: physics.is_simulating_physics(c.body),
            mesh_visible: self.mesh_visible,
            mesh_gravity: physics.is_gravity_enabled(c.body),
            mesh: setup(c.mesh),
            area_sphere: setup(c.area_sphere),
            collision_box: setup(c.collision_box),
            pickup_widget_visible: self.is_pickup_widget_visible(),
        }
    }

    /// Area sphere started overlapping another object
    pub fn on_sphere_overlap(&self, other: Option<&mut ShooterCharacter>) {
        if let Some(character) = other {
            character.increment_overlapped_item_count(1);
        }
    }

    /// Area sphere stopped overlapping another object
    pub fn on_sphere_end_overlap(&self, other: Option<&mut ShooterCharacter>) {
        if let Some(character) = other {
            character.increment_overlapped_item_count(-1);
        }
    }

    pub fn set_pickup_widget_visible(&mut self, visible: bool) {
        if let Some(widget) = self.pickup_widget.as_mut() {
            widget.visible = visible;
        }
    }

    pub fn is_pickup_widget_visible(&self) -> bool {
        self.pickup_widget
            .as_ref()
            .map(PickupWidget::is_visible)
            .unwrap_or(false)
    }

    pub fn has_pickup_widget(&self) -> bool {
        self.pickup_widget.is_some()
    }

    pub fn is_mesh_visible(&self) -> bool {
        self.mesh_visible
    }

    pub fn components(&self) -> ItemComponents {
        self.components
    }

    pub fn body(&self) -> RigidBodyHandle {
        self.components.body
    }

    pub fn transform(&self, physics: &PhysicsWorld) -> Option<Transform> {
        physics.body_transform(self.components.body)
    }

    /// World transform of a named socket on the mesh
    pub fn socket_transform(&self, name: &str, physics: &PhysicsWorld) -> Option<Transform> {
        let local = self.sockets.get(name)?;
        let world = self.transform(physics)?;
        Some(world.compose(local))
    }

    /// Move the item with whatever it is attached to
    pub fn attach_to(&self, transform: Transform, physics: &mut PhysicsWorld) {
        physics.teleport(self.components.body, transform);
    }
}
