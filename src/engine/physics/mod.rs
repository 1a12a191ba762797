// Physics layer using rapier3d
//
// Gameplay code talks in collision channels and responses; this module maps
// them onto rapier interaction groups, enabled flags and body types.

pub mod body;
mod collision;
mod world;

pub use body::{presets, ColliderDesc, ColliderHandle, RigidBodyHandle};
pub use collision::{
    ChannelResponses, CollisionChannel, CollisionEnabled, CollisionEvent, CollisionResponse,
    CollisionSetup,
};
pub use world::{
    from_rotation, from_vector, to_rotation, to_vector, OverlapEvent, Owner, PhysicsWorld,
    TraceHit, DEFAULT_GRAVITY,
};
