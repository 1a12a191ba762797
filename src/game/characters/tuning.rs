// Character tuning - the designer-facing numbers for the shooter character
//
// Every character starts from `CharacterTuning::standard()`. Values are in centimetres,
// seconds and degrees.

use glam::{Vec2, Vec3};

use crate::engine::effects::{ParticleSystem, SoundCue};
use crate::error::GameError;
use crate::game::characters::anim_instance::AnimMontage;

/// Turn/look rates in degrees per second at full axis deflection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LookRates {
    /// Rate currently in use, switched between hip and aiming each frame
    pub base_turn_rate: f32,
    pub base_look_up_rate: f32,
    pub hip_turn_rate: f32,
    pub hip_look_up_rate: f32,
    pub aiming_turn_rate: f32,
    pub aiming_look_up_rate: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraSettings {
    /// Distance from the pivot to the camera
    pub arm_length: f32,
    /// Offset of the camera from the end of the arm, in arm space (x right, y up)
    pub socket_offset: Vec3,
    /// Pivot height above the character origin
    pub pivot_height: f32,
    pub default_fov: f32,
    pub zoomed_fov: f32,
    pub zoom_interp_speed: f32,
    /// Crosshair position relative to the viewport centre, in pixels
    pub crosshair_offset: Vec2,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovementSettings {
    pub max_walk_speed: f32,
    /// Horizontal acceleration limit; only the air-control share applies in the air
    pub max_acceleration: f32,
    pub jump_z_velocity: f32,
    /// Fraction of ground acceleration available in the air
    pub air_control: f32,
    /// Downward acceleration while falling
    pub gravity: f32,
    /// Capsule dimensions
    pub capsule_half_height: f32,
    pub capsule_radius: f32,
    /// Hand socket relative to the character origin
    pub right_hand_offset: Vec3,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrosshairTuning {
    pub baseline: f32,
    /// Walk speed range mapped onto `velocity_factor_range`
    pub walk_speed_range: (f32, f32),
    pub velocity_factor_range: (f32, f32),
    pub in_air_target: f32,
    pub in_air_interp_speed: f32,
    pub landed_interp_speed: f32,
    pub aim_target: f32,
    pub aim_interp_speed: f32,
    /// Extra spread added by a shot, decaying over `shoot_time_duration`
    pub shooting_spike: f32,
    pub shoot_time_duration: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CombatTuning {
    /// Seconds between automatic shots
    pub automatic_fire_rate: f32,
    pub trace_range: f32,
    /// How far past the crosshair hit the muzzle trace continues
    pub beam_overshoot: f32,
    pub muzzle_socket: String,
    pub hand_socket: String,
    pub fire_section: String,
}

/// Optional effect and animation references; missing ones are skipped
#[derive(Debug, Clone, Default)]
pub struct CombatAssets {
    pub fire_sound: Option<SoundCue>,
    pub muzzle_flash: Option<ParticleSystem>,
    pub impact_particles: Option<ParticleSystem>,
    pub beam_particles: Option<ParticleSystem>,
    pub hip_fire_montage: Option<AnimMontage>,
}

impl CombatAssets {
    /// Every reference filled with the stock assets
    pub fn standard() -> Self {
        Self {
            fire_sound: Some(SoundCue::new("SniperShot")),
            muzzle_flash: Some(ParticleSystem::new("MuzzleFlash")),
            impact_particles: Some(ParticleSystem::new("ImpactSparks")),
            beam_particles: Some(ParticleSystem::new("SmokeTrail")),
            hip_fire_montage: Some(AnimMontage::hip_fire()),
        }
    }
}

pub const STANDARD_LOOK_RATES: LookRates = LookRates {
    base_turn_rate: 45.0,
    base_look_up_rate: 45.0,
    hip_turn_rate: 90.0,
    hip_look_up_rate: 90.0,
    aiming_turn_rate: 20.0,
    aiming_look_up_rate: 20.0,
};

pub const STANDARD_CAMERA: CameraSettings = CameraSettings {
    arm_length: 300.0,
    socket_offset: Vec3::new(50.0, 70.0, 0.0),
    pivot_height: 70.0,
    default_fov: 90.0,
    zoomed_fov: 35.0,
    zoom_interp_speed: 20.0,
    crosshair_offset: Vec2::new(0.0, -50.0),
};

pub const STANDARD_MOVEMENT: MovementSettings = MovementSettings {
    max_walk_speed: 600.0,
    max_acceleration: 2048.0,
    jump_z_velocity: 600.0,
    air_control: 0.2,
    gravity: 980.0,
    capsule_half_height: 60.0,
    capsule_radius: 35.0,
    right_hand_offset: Vec3::new(25.0, 30.0, -30.0),
};

pub const STANDARD_CROSSHAIR: CrosshairTuning = CrosshairTuning {
    baseline: 0.5,
    walk_speed_range: (0.0, 600.0),
    velocity_factor_range: (0.0, 0.6),
    in_air_target: 2.25,
    in_air_interp_speed: 2.25,
    landed_interp_speed: 30.0,
    aim_target: -0.6,
    aim_interp_speed: 30.0,
    shooting_spike: 0.3,
    shoot_time_duration: 0.05,
};

/// Everything configurable about a shooter character
#[derive(Debug, Clone)]
pub struct CharacterTuning {
    pub look: LookRates,
    pub camera: CameraSettings,
    pub movement: MovementSettings,
    pub crosshair: CrosshairTuning,
    pub combat: CombatTuning,
    pub assets: CombatAssets,
}

impl Default for CharacterTuning {
    fn default() -> Self {
        Self::standard()
    }
}

impl CharacterTuning {
    pub fn standard() -> Self {
        Self {
            look: STANDARD_LOOK_RATES,
            camera: STANDARD_CAMERA,
            movement: STANDARD_MOVEMENT,
            crosshair: STANDARD_CROSSHAIR,
            combat: CombatTuning {
                automatic_fire_rate: 0.1,
                trace_range: 50_000.0,
                beam_overshoot: 1.25,
                muzzle_socket: "BarrelSocket".to_string(),
                hand_socket: "RightHandSocket".to_string(),
                fire_section: "StartFire".to_string(),
            },
            assets: CombatAssets::standard(),
        }
    }

    /// Reject values the gameplay code cannot work with
    pub fn validate(&self) -> Result<(), GameError> {
        fn positive(field: &'static str, value: f32) -> Result<(), GameError> {
            if value > 0.0 && value.is_finite() {
                Ok(())
            } else {
                Err(GameError::InvalidTuning {
                    field,
                    reason: format!("must be positive, got {value}"),
                })
            }
        }

        positive("automatic_fire_rate", self.combat.automatic_fire_rate)?;
        positive("trace_range", self.combat.trace_range)?;
        positive("beam_overshoot", self.combat.beam_overshoot)?;
        positive("shoot_time_duration", self.crosshair.shoot_time_duration)?;
        positive("max_walk_speed", self.movement.max_walk_speed)?;
        positive("arm_length", self.camera.arm_length)?;
        positive("default_fov", self.camera.default_fov)?;
        positive("zoomed_fov", self.camera.zoomed_fov)?;

        let (low, high) = self.crosshair.walk_speed_range;
        if high <= low {
            return Err(GameError::InvalidTuning {
                field: "walk_speed_range",
                reason: format!("empty range [{low}, {high}]"),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_tuning_is_valid() {
        assert!(CharacterTuning::standard().validate().is_ok());
    }

    #[test]
    fn test_standard_values() {
        let tuning = CharacterTuning::default();
        assert_eq!(tuning.look.hip_turn_rate, 90.0);
        assert_eq!(tuning.look.aiming_turn_rate, 20.0);
        assert_eq!(tuning.camera.zoomed_fov, 35.0);
        assert_eq!(tuning.combat.automatic_fire_rate, 0.1);
        assert_eq!(tuning.combat.muzzle_socket, "BarrelSocket");
    }

    #[test]
    fn test_rejects_zero_fire_rate() {
        let mut tuning = CharacterTuning::standard();
        tuning.combat.automatic_fire_rate = 0.0;

        match tuning.validate() {
            Err(GameError::InvalidTuning { field, .. }) => assert_eq!(field, "automatic_fire_rate"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_rejects_empty_walk_speed_range() {
        let mut tuning = CharacterTuning::standard();
        tuning.crosshair.walk_speed_range = (600.0, 600.0);
        assert!(tuning.validate().is_err());
    }

    #[test]
    fn test_assets_are_optional() {
        let mut tuning = CharacterTuning::standard();
        tuning.assets = CombatAssets::default();
        assert!(tuning.validate().is_ok());
        assert!(tuning.assets.fire_sound.is_none());
    }
}
