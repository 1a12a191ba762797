use super::collision::{
    ChannelResponses, CollisionChannel, CollisionEnabled, CollisionResponse, CollisionSetup,
};
use glam::Vec3;
use rapier3d::prelude::*;

pub use rapier3d::prelude::{ColliderHandle, RigidBodyHandle};

/// Collider shape plus the collision setup it starts with
pub struct ColliderDesc {
    pub collider: Collider,
    pub setup: CollisionSetup,
}

impl ColliderDesc {
    fn new(builder: ColliderBuilder, setup: CollisionSetup) -> Self {
        let collider = builder
            .collision_groups(setup.interaction_groups())
            .solver_groups(setup.solver_groups())
            .enabled(setup.enabled != CollisionEnabled::NoCollision)
            .build();
        Self { collider, setup }
    }
}

/// Common body and collider configurations for game objects
pub mod presets {
    use super::*;

    /// Character body: kinematic, moved by the character's own movement code
    pub fn character_body(location: Vec3) -> RigidBody {
        RigidBodyBuilder::kinematic_position_based()
            .translation(vector![location.x, location.y, location.z])
            .can_sleep(false)
            .build()
    }

    /// Character capsule. Blocks world and pawns, invisible to crosshair traces
    /// so the owner's own capsule never stops its shots.
    pub fn character_capsule(half_height: Real, radius: Real) -> ColliderDesc {
        let responses = ChannelResponses::all(CollisionResponse::Block)
            .with(CollisionChannel::Visibility, CollisionResponse::Ignore)
            .with(CollisionChannel::Camera, CollisionResponse::Ignore);

        ColliderDesc::new(
            ColliderBuilder::capsule_y(half_height, radius)
                .friction(0.0)
                .active_events(ActiveEvents::COLLISION_EVENTS)
                .active_collision_types(ActiveCollisionTypes::all()),
            CollisionSetup::new(
                CollisionChannel::Pawn,
                CollisionEnabled::QueryAndPhysics,
                responses,
            ),
        )
    }

    /// Static level geometry (floors, walls, crates)
    pub fn static_body(location: Vec3) -> RigidBody {
        RigidBodyBuilder::fixed()
            .translation(vector![location.x, location.y, location.z])
            .build()
    }

    /// Box-shaped static geometry blocking every channel
    pub fn static_block(half_extents: Vec3) -> ColliderDesc {
        ColliderDesc::new(
            ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z).friction(0.8),
            CollisionSetup::new(
                CollisionChannel::WorldStatic,
                CollisionEnabled::QueryAndPhysics,
                ChannelResponses::all(CollisionResponse::Block),
            ),
        )
    }

    /// Item root body. Starts kinematic; the falling state turns it dynamic.
    pub fn item_body(location: Vec3) -> RigidBody {
        RigidBodyBuilder::kinematic_position_based()
            .translation(vector![location.x, location.y, location.z])
            .gravity_scale(0.0)
            .linear_damping(0.1)
            .angular_damping(2.0)
            .can_sleep(false)
            .build()
    }

    /// Item mesh collider, the only one carrying mass
    pub fn item_mesh(half_extents: Vec3) -> ColliderDesc {
        ColliderDesc::new(
            ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
                .density(1.0)
                .friction(0.9)
                .restitution(0.1),
            CollisionSetup::disabled(CollisionChannel::WorldDynamic),
        )
    }

    /// Area-of-interest sphere around an item; fires overlap events with pawns
    pub fn item_area_sphere(radius: Real) -> ColliderDesc {
        ColliderDesc::new(
            ColliderBuilder::ball(radius)
                .sensor(true)
                .density(0.0)
                .active_events(ActiveEvents::COLLISION_EVENTS)
                .active_collision_types(ActiveCollisionTypes::all()),
            CollisionSetup::new(
                CollisionChannel::WorldDynamic,
                CollisionEnabled::QueryOnly,
                ChannelResponses::all(CollisionResponse::Overlap),
            ),
        )
    }

    /// Box the crosshair trace hits to identify an item
    pub fn item_collision_box(half_extents: Vec3) -> ColliderDesc {
        ColliderDesc::new(
            ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z).density(0.0),
            CollisionSetup::new(
                CollisionChannel::WorldDynamic,
                CollisionEnabled::QueryAndPhysics,
                ChannelResponses::all(CollisionResponse::Ignore)
                    .with(CollisionChannel::Visibility, CollisionResponse::Block),
            ),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_character_body_is_kinematic() {
        let body = presets::character_body(Vec3::new(0.0, 100.0, 0.0));
        assert_eq!(body.body_type(), RigidBodyType::KinematicPositionBased);
        assert_eq!(body.translation().y, 100.0);
    }

    #[test]
    fn test_capsule_ignores_visibility() {
        let desc = presets::character_capsule(50.0, 35.0);
        assert!(!desc.setup.blocks_trace(CollisionChannel::Visibility));
        assert!(desc.setup.blocks_trace(CollisionChannel::WorldStatic));
        assert!(!desc.collider.is_sensor());
    }

    #[test]
    fn test_area_sphere_is_sensor() {
        let desc = presets::item_area_sphere(150.0);
        assert!(desc.collider.is_sensor());
        assert!(desc.collider.is_enabled());
    }

    #[test]
    fn test_item_mesh_starts_disabled() {
        let desc = presets::item_mesh(Vec3::new(30.0, 5.0, 5.0));
        assert!(!desc.collider.is_enabled());
        assert_eq!(desc.setup.enabled, CollisionEnabled::NoCollision);
    }

    #[test]
    fn test_static_block_blocks_visibility() {
        let desc = presets::static_block(Vec3::splat(100.0));
        assert!(desc.setup.blocks_trace(CollisionChannel::Visibility));
    }
}
