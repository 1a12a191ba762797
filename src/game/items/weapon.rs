// Weapons: items that can be equipped, fired through and thrown

use glam::{Quat, Vec3};
use rand::Rng;

use super::item::{Item, ItemDesc, ItemId, ItemState};
use super::rarity::ItemRarity;
use crate::engine::effects::Transform;
use crate::engine::physics::PhysicsWorld;
use crate::engine::timer::{TimerEvent, TimerHandle, TimerManager};

/// Muzzle socket name on weapon meshes
pub const BARREL_SOCKET: &str = "BarrelSocket";

/// Seconds a thrown weapon falls before returning to pickup
pub const THROW_WEAPON_TIME: f32 = 0.7;

/// Launch speed of a thrown weapon (cm/s)
pub const THROW_SPEED: f32 = 400.0;

/// Tilt of the throw about the mesh forward axis, degrees
const THROW_TILT_DEG: f32 = -20.0;

/// Upper bound of the random spin about world up, degrees
const THROW_JITTER_DEG: f32 = 30.0;

/// Spawn parameters for a rifle-sized weapon with a muzzle socket
pub fn weapon_desc(name: &str, rarity: ItemRarity) -> ItemDesc {
    ItemDesc {
        name: name.to_string(),
        count: 0,
        rarity,
        sockets: vec![(
            BARREL_SOCKET.to_string(),
            Transform::from_location(Vec3::new(0.0, 6.0, -45.0)),
        )],
        ..ItemDesc::default()
    }
}

/// Rotation keeping only the heading of `rotation`
fn level_rotation(rotation: Quat) -> Quat {
    let forward = rotation * Vec3::NEG_Z;
    if forward.x.abs() < f32::EPSILON && forward.z.abs() < f32::EPSILON {
        return Quat::IDENTITY;
    }
    Quat::from_rotation_y((-forward.x).atan2(-forward.z))
}

#[derive(Debug)]
pub struct Weapon {
    pub item: Item,
    throw_weapon_time: f32,
    throw_weapon_timer: TimerHandle,
    falling: bool,
    throw_speed: f32,
}

impl Weapon {
    pub fn new(item: Item) -> Self {
        Self {
            item,
            throw_weapon_time: THROW_WEAPON_TIME,
            throw_weapon_timer: TimerHandle::default(),
            falling: false,
            throw_speed: THROW_SPEED,
        }
    }

    pub fn id(&self) -> ItemId {
        self.item.id
    }

    pub fn is_falling(&self) -> bool {
        self.falling
    }

    pub fn throw_weapon_time(&self) -> f32 {
        self.throw_weapon_time
    }

    /// Drop the weapon into the world with a sideways toss
    pub fn throw_weapon<R: Rng + ?Sized>(
        &mut self,
        physics: &mut PhysicsWorld,
        timers: &mut TimerManager,
        rng: &mut R,
    ) {
        self.item.set_item_state(ItemState::Falling, physics);

        let body = self.item.body();
        let Some(transform) = physics.body_transform(body) else {
            return;
        };

        let rotation = level_rotation(transform.rotation);
        physics.set_rotation(body, rotation);

        let forward = rotation * Vec3::NEG_Z;
        let right = rotation * Vec3::X;
        let tilted = Quat::from_axis_angle(forward, THROW_TILT_DEG.to_radians()) * right;
        let spin = rng.gen_range(0.0..THROW_JITTER_DEG);
        let direction = Quat::from_axis_angle(Vec3::Y, spin.to_radians()) * tilted;

        physics.add_velocity(body, direction * self.throw_speed);

        self.falling = true;
        timers.set_timer(
            &mut self.throw_weapon_timer,
            self.throw_weapon_time,
            TimerEvent::StopFalling(self.item.id),
        );
        log::info!("{} ({}) thrown", self.item.name, self.item.id);
    }

    /// Forget a throw in progress, e.g. when the weapon is grabbed mid-air
    pub fn cancel_throw(&mut self, timers: &mut TimerManager) {
        timers.clear_timer(&mut self.throw_weapon_timer);
        self.falling = false;
    }

    /// Throw window elapsed: settle back into the pickup state
    pub fn stop_falling(&mut self, physics: &mut PhysicsWorld) {
        self.falling = false;
        self.throw_weapon_timer.invalidate();
        self.item.set_item_state(ItemState::Pickup, physics);
    }

    /// Keep the mesh upright while it falls
    pub fn tick(&mut self, physics: &mut PhysicsWorld) {
        if !self.falling || self.item.state() != ItemState::Falling {
            return;
        }

        let body = self.item.body();
        if let Some(transform) = physics.body_transform(body) {
            physics.set_rotation(body, level_rotation(transform.rotation));
        }
    }

    /// World transform of the muzzle socket
    pub fn barrel_transform(&self, socket: &str, physics: &PhysicsWorld) -> Option<Transform> {
        self.item.socket_transform(socket, physics)
    }
}
