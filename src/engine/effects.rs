// Effect outputs: particle emitters, beams and sounds
//
// Gameplay code never renders or mixes audio itself. It hands spawn requests
// to an `EffectSink`. Tests use `EffectLog`, which records every request;
// the sandbox binary uses `LogSink`, which only logs and counts them.

use glam::{Quat, Vec3};

/// Sound asset reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoundCue {
    pub name: String,
}

impl SoundCue {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}

/// Particle system asset reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticleSystem {
    pub name: String,
}

impl ParticleSystem {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}

/// Location, rotation and scale of an object or socket
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub location: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Self = Self {
        location: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    pub fn from_location(location: Vec3) -> Self {
        Self {
            location,
            ..Self::IDENTITY
        }
    }

    pub fn from_location_rotation(location: Vec3, rotation: Quat) -> Self {
        Self {
            location,
            rotation,
            scale: Vec3::ONE,
        }
    }

    /// Transform a point from local space into this transform's space
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.location + self.rotation * (self.scale * point)
    }

    /// Compose a child transform expressed relative to `self`
    pub fn compose(&self, child: &Transform) -> Transform {
        Transform {
            location: self.transform_point(child.location),
            rotation: self.rotation * child.rotation,
            scale: self.scale * child.scale,
        }
    }

    /// Local forward axis (-Z) in world space
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }

    /// Local right axis (+X) in world space
    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::X
    }
}

/// Receives effect spawn requests from gameplay code
pub trait EffectSink {
    /// Spawn a one-off particle emitter at a transform
    fn spawn_emitter(&mut self, system: &ParticleSystem, transform: Transform);

    /// Spawn a beam emitter from `transform` whose end point is `target`
    fn spawn_beam(&mut self, system: &ParticleSystem, transform: Transform, target: Vec3);

    /// Play a sound at a world location
    fn play_sound(&mut self, cue: &SoundCue, location: Vec3);
}

/// A recorded effect request
#[derive(Debug, Clone, PartialEq)]
pub enum EffectEvent {
    Emitter {
        system: String,
        transform: Transform,
    },
    Beam {
        system: String,
        transform: Transform,
        target: Vec3,
    },
    Sound {
        cue: String,
        location: Vec3,
    },
}

/// Effect sink that logs and records every request
#[derive(Debug, Default)]
pub struct EffectLog {
    events: Vec<EffectEvent>,
}

impl EffectLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// All requests recorded so far
    pub fn events(&self) -> &[EffectEvent] {
        &self.events
    }

    /// Forget recorded requests
    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Count emitters spawned from a given particle system
    pub fn emitter_count(&self, system: &str) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, EffectEvent::Emitter { system: s, .. } if s == system))
            .count()
    }

    /// Count beams spawned from a given particle system
    pub fn beam_count(&self, system: &str) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, EffectEvent::Beam { system: s, .. } if s == system))
            .count()
    }

    /// Count plays of a given sound
    pub fn sound_count(&self, cue: &str) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, EffectEvent::Sound { cue: c, .. } if c == cue))
            .count()
    }

    /// End point of the most recent beam
    pub fn last_beam_target(&self) -> Option<Vec3> {
        self.events.iter().rev().find_map(|e| match e {
            EffectEvent::Beam { target, .. } => Some(*target),
            _ => None,
        })
    }
}

impl EffectSink for EffectLog {
    fn spawn_emitter(&mut self, system: &ParticleSystem, transform: Transform) {
        log::debug!("Emitter {} at {:?}", system.name, transform.location);
        self.events.push(EffectEvent::Emitter {
            system: system.name.clone(),
            transform,
        });
    }

    fn spawn_beam(&mut self, system: &ParticleSystem, transform: Transform, target: Vec3) {
        log::debug!(
            "Beam {} from {:?} to {:?}",
            system.name,
            transform.location,
            target
        );
        self.events.push(EffectEvent::Beam {
            system: system.name.clone(),
            transform,
            target,
        });
    }

    fn play_sound(&mut self, cue: &SoundCue, location: Vec3) {
        log::debug!("Sound {} at {:?}", cue.name, location);
        self.events.push(EffectEvent::Sound {
            cue: cue.name.clone(),
            location,
        });
    }
}

/// Effect sink that logs each request and keeps only a running count
#[derive(Debug, Default)]
pub struct LogSink {
    requests: u64,
}

impl LogSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of requests seen so far
    pub fn requests(&self) -> u64 {
        self.requests
    }
}

impl EffectSink for LogSink {
    fn spawn_emitter(&mut self, system: &ParticleSystem, transform: Transform) {
        log::debug!("Emitter {} at {:?}", system.name, transform.location);
        self.requests += 1;
    }

    fn spawn_beam(&mut self, system: &ParticleSystem, transform: Transform, target: Vec3) {
        log::debug!(
            "Beam {} from {:?} to {:?}",
            system.name,
            transform.location,
            target
        );
        self.requests += 1;
    }

    fn play_sound(&mut self, cue: &SoundCue, location: Vec3) {
        log::debug!("Sound {} at {:?}", cue.name, location);
        self.requests += 1;
    }
}
