use rapier3d::prelude::*;
use std::sync::{Arc, Mutex};

/// Collision channels.
///
/// `WorldStatic`, `WorldDynamic` and `Pawn` are object types a collider can
/// belong to. `Visibility` and `Camera` are trace channels only: a collider
/// never *is* one, it just decides whether traces on them are blocked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollisionChannel {
    WorldStatic = 0,
    WorldDynamic = 1,
    Pawn = 2,
    Visibility = 3,
    Camera = 4,
}

impl CollisionChannel {
    pub const COUNT: usize = 5;

    pub const ALL: [CollisionChannel; Self::COUNT] = [
        Self::WorldStatic,
        Self::WorldDynamic,
        Self::Pawn,
        Self::Visibility,
        Self::Camera,
    ];

    /// Rapier group bit for this channel
    pub fn group(self) -> Group {
        Group::from_bits_truncate(1 << self as u32)
    }
}

/// How a collider reacts to a given channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CollisionResponse {
    #[default]
    Ignore,
    Overlap,
    Block,
}

/// Which kinds of collision a collider takes part in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CollisionEnabled {
    #[default]
    NoCollision,
    /// Traces and overlaps only
    QueryOnly,
    /// Contacts only
    PhysicsOnly,
    QueryAndPhysics,
}

impl CollisionEnabled {
    pub fn has_query(self) -> bool {
        matches!(self, Self::QueryOnly | Self::QueryAndPhysics)
    }

    pub fn has_physics(self) -> bool {
        matches!(self, Self::PhysicsOnly | Self::QueryAndPhysics)
    }
}

/// Per-channel response table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChannelResponses([CollisionResponse; CollisionChannel::COUNT]);

impl ChannelResponses {
    /// Same response on every channel
    pub fn all(response: CollisionResponse) -> Self {
        Self([response; CollisionChannel::COUNT])
    }

    pub fn set_all(&mut self, response: CollisionResponse) -> &mut Self {
        self.0 = [response; CollisionChannel::COUNT];
        self
    }

    pub fn set(&mut self, channel: CollisionChannel, response: CollisionResponse) -> &mut Self {
        self.0[channel as usize] = response;
        self
    }

    /// Builder-style variant of `set`
    pub fn with(mut self, channel: CollisionChannel, response: CollisionResponse) -> Self {
        self.set(channel, response);
        self
    }

    pub fn get(&self, channel: CollisionChannel) -> CollisionResponse {
        self.0[channel as usize]
    }

    /// Group mask of every channel with at least the given response
    fn mask(&self, at_least: CollisionResponse) -> Group {
        CollisionChannel::ALL
            .iter()
            .filter(|c| match at_least {
                CollisionResponse::Block => self.get(**c) == CollisionResponse::Block,
                _ => self.get(**c) != CollisionResponse::Ignore,
            })
            .fold(Group::NONE, |mask, c| mask | c.group())
    }
}

/// Complete collision configuration of one collider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionSetup {
    /// Object type this collider belongs to
    pub object_channel: CollisionChannel,
    pub enabled: CollisionEnabled,
    pub responses: ChannelResponses,
}

impl CollisionSetup {
    pub fn new(
        object_channel: CollisionChannel,
        enabled: CollisionEnabled,
        responses: ChannelResponses,
    ) -> Self {
        Self {
            object_channel,
            enabled,
            responses,
        }
    }

    /// A collider that takes part in nothing
    pub fn disabled(object_channel: CollisionChannel) -> Self {
        Self::new(
            object_channel,
            CollisionEnabled::NoCollision,
            ChannelResponses::all(CollisionResponse::Ignore),
        )
    }

    /// Check whether a trace on `channel` stops at this collider
    pub fn blocks_trace(&self, channel: CollisionChannel) -> bool {
        self.enabled.has_query() && self.responses.get(channel) == CollisionResponse::Block
    }

    /// Groups used for contact and intersection detection
    pub fn interaction_groups(&self) -> InteractionGroups {
        InteractionGroups::new(
            self.object_channel.group(),
            self.responses.mask(CollisionResponse::Overlap),
        )
    }

    /// Groups used by the contact solver
    pub fn solver_groups(&self) -> InteractionGroups {
        if self.enabled.has_physics() {
            InteractionGroups::new(
                self.object_channel.group(),
                self.responses.mask(CollisionResponse::Block),
            )
        } else {
            InteractionGroups::none()
        }
    }
}

/// Raw begin/end contact notification from the physics step
#[derive(Debug, Clone, Copy)]
pub enum CollisionEvent {
    Started {
        collider1: ColliderHandle,
        collider2: ColliderHandle,
        sensor: bool,
    },
    Stopped {
        collider1: ColliderHandle,
        collider2: ColliderHandle,
        sensor: bool,
    },
}

/// Collects collision events while the pipeline steps
pub struct CollisionEventQueue {
    events: Arc<Mutex<Vec<CollisionEvent>>>,
}

impl CollisionEventQueue {
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::with_capacity(32))),
        }
    }

    pub fn clear(&self) {
        if let Ok(mut events) = self.events.lock() {
            events.clear();
        }
    }

    pub fn events(&self) -> Vec<CollisionEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    fn push(&self, event: CollisionEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

impl Default for CollisionEventQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl EventHandler for CollisionEventQueue {
    fn handle_collision_event(
        &self,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        event: rapier3d::prelude::CollisionEvent,
        _contact_pair: Option<&ContactPair>,
    ) {
        match event {
            rapier3d::prelude::CollisionEvent::Started(h1, h2, flags) => {
                self.push(CollisionEvent::Started {
                    collider1: h1,
                    collider2: h2,
                    sensor: flags.contains(CollisionEventFlags::SENSOR),
                });
            }
            rapier3d::prelude::CollisionEvent::Stopped(h1, h2, flags) => {
                self.push(CollisionEvent::Stopped {
                    collider1: h1,
                    collider2: h2,
                    sensor: flags.contains(CollisionEventFlags::SENSOR),
                });
            }
        }
    }

    fn handle_contact_force_event(
        &self,
        _dt: Real,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        _contact_pair: &ContactPair,
        _total_force_magnitude: Real,
    ) {
    }
}
