use glam::{Quat, Vec3};
use rapier3d::na::{Quaternion, UnitQuaternion};
use rapier3d::prelude::*;
use std::collections::HashMap;

use super::body::ColliderDesc;
use super::collision::{
    CollisionChannel, CollisionEnabled, CollisionEvent, CollisionEventQueue, CollisionSetup,
};
use crate::engine::effects::Transform;
use crate::game::characters::CharacterId;
use crate::game::items::ItemId;

/// Default gravity in centimetres per second squared
pub const DEFAULT_GRAVITY: f32 = -980.0;

/// Game object a collider belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Owner {
    Level,
    Character(CharacterId),
    Item(ItemId),
}

/// Result of a blocking line trace
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraceHit {
    /// Impact point in world space
    pub location: Vec3,
    /// Distance from the trace start to the impact
    pub distance: f32,
    pub collider: ColliderHandle,
    pub owner: Option<Owner>,
}

/// Begin/end of an intersection between a sensor and another collider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlapEvent {
    Begin { sensor: Owner, other: Owner },
    End { sensor: Owner, other: Owner },
}

#[derive(Debug, Clone, Copy)]
struct ColliderMeta {
    owner: Owner,
    setup: CollisionSetup,
}

pub fn to_vector(v: Vec3) -> Vector<Real> {
    vector![v.x, v.y, v.z]
}

pub fn from_vector(v: &Vector<Real>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

pub fn to_rotation(q: Quat) -> Rotation<Real> {
    UnitQuaternion::new_normalize(Quaternion::new(q.w, q.x, q.y, q.z))
}

pub fn from_rotation(q: &Rotation<Real>) -> Quat {
    Quat::from_xyzw(q.coords.x, q.coords.y, q.coords.z, q.coords.w)
}

/// Rapier world plus the collision metadata gameplay code needs
pub struct PhysicsWorld {
    gravity: Vector<Real>,
    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    impulse_joint_set: ImpulseJointSet,
    multibody_joint_set: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
    rigid_body_set: RigidBodySet,
    collider_set: ColliderSet,
    collision_event_queue: CollisionEventQueue,
    colliders: HashMap<ColliderHandle, ColliderMeta>,
}

impl PhysicsWorld {
    pub fn new() -> Self {
        Self::with_gravity(DEFAULT_GRAVITY)
    }

    pub fn with_gravity(gravity_y: f32) -> Self {
        let mut integration_parameters = IntegrationParameters::default();
        integration_parameters.dt = 1.0 / 60.0;

        Self {
            gravity: vector![0.0, gravity_y, 0.0],
            integration_parameters,
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            collision_event_queue: CollisionEventQueue::new(),
            colliders: HashMap::new(),
        }
    }

    /// Advance the simulation by `dt` seconds
    pub fn step(&mut self, dt: f32) {
        self.collision_event_queue.clear();
        self.integration_parameters.dt = dt;

        let event_handler = &self.collision_event_queue;

        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            event_handler,
        );
    }

    pub fn add_rigid_body(&mut self, body: RigidBody) -> RigidBodyHandle {
        self.rigid_body_set.insert(body)
    }

    /// Attach a collider to a body and remember who owns it
    pub fn add_collider(
        &mut self,
        desc: ColliderDesc,
        parent: RigidBodyHandle,
        owner: Owner,
    ) -> ColliderHandle {
        let handle =
            self.collider_set
                .insert_with_parent(desc.collider, parent, &mut self.rigid_body_set);
        self.colliders.insert(
            handle,
            ColliderMeta {
                owner,
                setup: desc.setup,
            },
        );
        handle
    }

    /// Remove a body together with its colliders
    pub fn remove_rigid_body(&mut self, handle: RigidBodyHandle) {
        if let Some(body) = self.rigid_body_set.get(handle) {
            for collider in body.colliders() {
                self.colliders.remove(collider);
            }
        }
        self.rigid_body_set.remove(
            handle,
            &mut self.island_manager,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            true,
        );
    }

    pub fn owner_of(&self, collider: ColliderHandle) -> Option<Owner> {
        self.colliders.get(&collider).map(|meta| meta.owner)
    }

    /// Collision setup last applied to a collider
    pub fn collision_setup(&self, collider: ColliderHandle) -> Option<CollisionSetup> {
        self.colliders.get(&collider).map(|meta| meta.setup)
    }

    /// Apply a full collision setup to a collider
    pub fn apply_collision_setup(&mut self, handle: ColliderHandle, setup: CollisionSetup) {
        let Some(collider) = self.collider_set.get_mut(handle) else {
            return;
        };

        collider.set_collision_groups(setup.interaction_groups());
        collider.set_solver_groups(setup.solver_groups());
        collider.set_enabled(setup.enabled != CollisionEnabled::NoCollision);

        if let Some(meta) = self.colliders.get_mut(&handle) {
            meta.setup = setup;
        }
    }

    /// Switch a body between simulated (dynamic) and driven (kinematic)
    pub fn set_simulate_physics(&mut self, handle: RigidBodyHandle, simulate: bool) {
        let Some(body) = self.rigid_body_set.get_mut(handle) else {
            return;
        };

        let body_type = if simulate {
            RigidBodyType::Dynamic
        } else {
            RigidBodyType::KinematicPositionBased
        };
        if body.body_type() != body_type {
            body.set_body_type(body_type, true);
            if !simulate {
                body.set_linvel(Vector::zeros(), false);
                body.set_angvel(Vector::zeros(), false);
            }
        }
    }

    pub fn is_simulating_physics(&self, handle: RigidBodyHandle) -> bool {
        self.rigid_body_set
            .get(handle)
            .map(|body| body.body_type() == RigidBodyType::Dynamic)
            .unwrap_or(false)
    }

    pub fn set_enable_gravity(&mut self, handle: RigidBodyHandle, enabled: bool) {
        if let Some(body) = self.rigid_body_set.get_mut(handle) {
            body.set_gravity_scale(if enabled { 1.0 } else { 0.0 }, true);
        }
    }

    pub fn is_gravity_enabled(&self, handle: RigidBodyHandle) -> bool {
        self.rigid_body_set
            .get(handle)
            .map(|body| body.gravity_scale() != 0.0)
            .unwrap_or(false)
    }

    pub fn is_collider_enabled(&self, handle: ColliderHandle) -> bool {
        self.collider_set
            .get(handle)
            .map(|collider| collider.is_enabled())
            .unwrap_or(false)
    }

    /// World transform of a body
    pub fn body_transform(&self, handle: RigidBodyHandle) -> Option<Transform> {
        self.rigid_body_set.get(handle).map(|body| {
            Transform::from_location_rotation(
                from_vector(body.translation()),
                from_rotation(body.rotation()),
            )
        })
    }

    pub fn linear_velocity(&self, handle: RigidBodyHandle) -> Option<Vec3> {
        self.rigid_body_set
            .get(handle)
            .map(|body| from_vector(body.linvel()))
    }

    /// Move a kinematic body to `transform` during the next step
    pub fn set_kinematic_target(&mut self, handle: RigidBodyHandle, transform: Transform) {
        if let Some(body) = self.rigid_body_set.get_mut(handle) {
            body.set_next_kinematic_translation(to_vector(transform.location));
            body.set_next_kinematic_rotation(to_rotation(transform.rotation));
        }
    }

    /// Place a body immediately, without sweeping
    pub fn teleport(&mut self, handle: RigidBodyHandle, transform: Transform) {
        if let Some(body) = self.rigid_body_set.get_mut(handle) {
            body.set_translation(to_vector(transform.location), true);
            body.set_rotation(to_rotation(transform.rotation), true);
        }
    }

    pub fn set_rotation(&mut self, handle: RigidBodyHandle, rotation: Quat) {
        if let Some(body) = self.rigid_body_set.get_mut(handle) {
            body.set_rotation(to_rotation(rotation), false);
            body.set_angvel(Vector::zeros(), false);
        }
    }

    /// Change a body's velocity directly, ignoring its mass
    pub fn add_velocity(&mut self, handle: RigidBodyHandle, delta_v: Vec3) {
        if let Some(body) = self.rigid_body_set.get_mut(handle) {
            let velocity = body.linvel() + to_vector(delta_v);
            body.set_linvel(velocity, true);
        }
    }

    /// Trace a line and return the first collider blocking `channel`
    pub fn line_trace(
        &self,
        start: Vec3,
        end: Vec3,
        channel: CollisionChannel,
        ignore: Option<RigidBodyHandle>,
    ) -> Option<TraceHit> {
        let delta = end - start;
        let length = delta.length();
        if length <= f32::EPSILON {
            return None;
        }
        let direction = delta / length;

        let ray = Ray::new(point![start.x, start.y, start.z], to_vector(direction));
        let blocks = |handle: ColliderHandle, _: &Collider| {
            self.colliders
                .get(&handle)
                .map(|meta| meta.setup.blocks_trace(channel))
                .unwrap_or(false)
        };

        let mut filter = QueryFilter::default().predicate(&blocks);
        if let Some(body) = ignore {
            filter = filter.exclude_rigid_body(body);
        }

        self.query_pipeline
            .cast_ray(
                &self.rigid_body_set,
                &self.collider_set,
                &ray,
                length,
                true,
                filter,
            )
            .map(|(collider, distance)| TraceHit {
                location: start + direction * distance,
                distance,
                collider,
                owner: self.owner_of(collider),
            })
    }

    /// Raw collision events from the last step
    pub fn collision_events(&self) -> Vec<CollisionEvent> {
        self.collision_event_queue.events()
    }

    /// Sensor overlap begin/end events from the last step, resolved to owners
    pub fn overlap_events(&self) -> Vec<OverlapEvent> {
        self.collision_events()
            .into_iter()
            .filter_map(|event| {
                let (c1, c2, begin) = match event {
                    CollisionEvent::Started {
                        collider1,
                        collider2,
                        sensor: true,
                    } => (collider1, collider2, true),
                    CollisionEvent::Stopped {
                        collider1,
                        collider2,
                        sensor: true,
                    } => (collider1, collider2, false),
                    _ => return None,
                };

                let (sensor, other) = if self.is_sensor(c1) {
                    (c1, c2)
                } else {
                    (c2, c1)
                };
                let sensor = self.owner_of(sensor)?;
                let other = self.owner_of(other)?;

                Some(if begin {
                    OverlapEvent::Begin { sensor, other }
                } else {
                    OverlapEvent::End { sensor, other }
                })
            })
            .collect()
    }

    fn is_sensor(&self, handle: ColliderHandle) -> bool {
        self.collider_set
            .get(handle)
            .map(|collider| collider.is_sensor())
            .unwrap_or(false)
    }

    pub fn gravity(&self) -> Vec3 {
        from_vector(&self.gravity)
    }

    pub fn body_count(&self) -> usize {
        self.rigid_body_set.len()
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}
