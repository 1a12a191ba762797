// Animation-facing state for the shooter character
//
// Blending is left to whoever draws the character. This module keeps the
// values an animation graph reads each frame and plays one-shot montages.

use glam::Vec3;

use crate::core::math::normalize_axis_deg;

/// A one-shot animation split into named sections
#[derive(Debug, Clone, PartialEq)]
pub struct AnimMontage {
    pub name: String,
    /// Total length in seconds
    pub length: f32,
    /// Section names with their start times, in playback order
    pub sections: Vec<(String, f32)>,
}

impl AnimMontage {
    pub fn new(name: &str, length: f32) -> Self {
        Self {
            name: name.to_string(),
            length,
            sections: Vec::new(),
        }
    }

    pub fn with_section(mut self, name: &str, start: f32) -> Self {
        self.sections.push((name.to_string(), start));
        self
    }

    /// Stock hip-fire recoil montage
    pub fn hip_fire() -> Self {
        Self::new("HipFire", 0.4).with_section("StartFire", 0.0)
    }

    pub fn section_start(&self, section: &str) -> Option<f32> {
        self.sections
            .iter()
            .find(|(name, _)| name == section)
            .map(|(_, start)| *start)
    }
}

#[derive(Debug, Clone)]
struct MontagePlayback {
    montage: AnimMontage,
    position: f32,
}

/// What the animation instance samples from its character each frame
#[derive(Debug, Clone, Copy, Default)]
pub struct AnimSnapshot {
    pub velocity: Vec3,
    pub is_falling: bool,
    /// Movement input is being applied this frame
    pub is_accelerating: bool,
    /// Control yaw in degrees
    pub aim_yaw: f32,
    pub aiming: bool,
}

/// Heading of a horizontal direction, in the control-rotation yaw convention
fn heading_deg(direction: Vec3) -> f32 {
    (-direction.x).atan2(-direction.z).to_degrees()
}

#[derive(Debug, Clone, Default)]
pub struct ShooterAnimInstance {
    speed: f32,
    is_in_air: bool,
    is_accelerating: bool,
    /// Movement heading relative to the aim heading, for strafing
    movement_offset_yaw: f32,
    /// Offset from the last frame the character was moving
    last_movement_offset_yaw: f32,
    aiming: bool,
    montage: Option<MontagePlayback>,
}

impl ShooterAnimInstance {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update_animation_properties(&mut self, _dt: f32, snapshot: &AnimSnapshot) {
        let horizontal = Vec3::new(snapshot.velocity.x, 0.0, snapshot.velocity.z);
        self.speed = horizontal.length();
        self.is_in_air = snapshot.is_falling;
        self.is_accelerating = snapshot.is_accelerating;
        self.aiming = snapshot.aiming;

        self.movement_offset_yaw = if self.speed > 0.0 {
            normalize_axis_deg(heading_deg(horizontal) - snapshot.aim_yaw)
        } else {
            0.0
        };

        if self.speed > 0.0 {
            self.last_movement_offset_yaw = self.movement_offset_yaw;
        }
    }

    /// Start a montage from the beginning, replacing any playing one
    pub fn montage_play(&mut self, montage: &AnimMontage) {
        self.montage = Some(MontagePlayback {
            montage: montage.clone(),
            position: 0.0,
        });
    }

    /// Jump the playing montage to a named section. Unknown sections and an
    /// idle player are ignored.
    pub fn montage_jump_to_section(&mut self, section: &str) {
        let Some(playback) = self.montage.as_mut() else {
            return;
        };
        if let Some(start) = playback.montage.section_start(section) {
            playback.position = start;
        }
    }

    /// Advance the montage, dropping it once it reaches the end
    pub fn tick(&mut self, dt: f32) {
        let finished = match self.montage.as_mut() {
            Some(playback) => {
                playback.position += dt;
                playback.position >= playback.montage.length
            }
            None => false,
        };

        if finished {
            self.montage = None;
        }
    }

    pub fn current_montage(&self) -> Option<&str> {
        self.montage.as_ref().map(|p| p.montage.name.as_str())
    }

    /// Section the playhead is in
    pub fn current_section(&self) -> Option<&str> {
        let playback = self.montage.as_ref()?;
        playback
            .montage
            .sections
            .iter()
            .rev()
            .find(|(_, start)| *start <= playback.position)
            .map(|(name, _)| name.as_str())
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn is_in_air(&self) -> bool {
        self.is_in_air
    }

    pub fn is_accelerating(&self) -> bool {
        self.is_accelerating
    }

    pub fn movement_offset_yaw(&self) -> f32 {
        self.movement_offset_yaw
    }

    pub fn last_movement_offset_yaw(&self) -> f32 {
        self.last_movement_offset_yaw
    }

    pub fn is_aiming(&self) -> bool {
        self.aiming
    }
}
