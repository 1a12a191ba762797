// Third-person follow camera
//
// A boom hangs off the character's pivot and swings with the control
// rotation; the follow camera sits at its end. Field of view is horizontal,
// in degrees.

use glam::{EulerRot, Quat, Vec2, Vec3};

use super::tuning::CameraSettings;
use crate::core::math::{clamp, interp_to, normalize_axis_deg};
use crate::engine::effects::Transform;

/// Pitch limit in degrees, short of straight up/down
pub const MAX_PITCH: f32 = 89.0;

/// Where the player is looking, in degrees. Positive pitch looks up and
/// positive yaw turns left.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ControlRotation {
    pub yaw: f32,
    pub pitch: f32,
}

impl ControlRotation {
    pub fn new(yaw: f32, pitch: f32) -> Self {
        let mut rotation = Self::default();
        rotation.add_yaw(yaw);
        rotation.add_pitch(pitch);
        rotation
    }

    pub fn add_yaw(&mut self, degrees: f32) {
        self.yaw = normalize_axis_deg(self.yaw + degrees);
    }

    pub fn add_pitch(&mut self, degrees: f32) {
        self.pitch = clamp(self.pitch + degrees, -MAX_PITCH, MAX_PITCH);
    }

    pub fn quat(&self) -> Quat {
        Quat::from_euler(
            EulerRot::YXZ,
            self.yaw.to_radians(),
            self.pitch.to_radians(),
            0.0,
        )
    }

    /// Heading only, for movement
    pub fn yaw_quat(&self) -> Quat {
        Quat::from_rotation_y(self.yaw.to_radians())
    }

    pub fn forward(&self) -> Vec3 {
        self.quat() * Vec3::NEG_Z
    }
}

/// Spring arm holding the camera behind the character
#[derive(Debug, Clone, Copy)]
pub struct CameraBoom {
    pub arm_length: f32,
    pub socket_offset: Vec3,
    pub pivot_height: f32,
    /// Swing with the control rotation instead of the character's body
    pub use_pawn_control_rotation: bool,
}

impl CameraBoom {
    pub fn new(settings: &CameraSettings) -> Self {
        Self {
            arm_length: settings.arm_length,
            socket_offset: settings.socket_offset,
            pivot_height: settings.pivot_height,
            use_pawn_control_rotation: true,
        }
    }

    /// Camera transform for a character at `location`
    pub fn camera_transform(
        &self,
        location: Vec3,
        body_rotation: Quat,
        control: ControlRotation,
    ) -> Transform {
        let rotation = if self.use_pawn_control_rotation {
            control.quat()
        } else {
            body_rotation
        };

        let pivot = location + Vec3::Y * self.pivot_height;
        let arm = rotation * Vec3::new(0.0, 0.0, self.arm_length);
        Transform::from_location_rotation(pivot + arm + rotation * self.socket_offset, rotation)
    }
}

/// Camera at the end of the boom; owns the zoom state
#[derive(Debug, Clone, Copy)]
pub struct FollowCamera {
    pub default_fov: f32,
    pub zoomed_fov: f32,
    pub current_fov: f32,
    pub zoom_interp_speed: f32,
}

impl FollowCamera {
    pub fn new(settings: &CameraSettings) -> Self {
        Self {
            default_fov: settings.default_fov,
            zoomed_fov: settings.zoomed_fov,
            current_fov: settings.default_fov,
            zoom_interp_speed: settings.zoom_interp_speed,
        }
    }

    /// Move the field of view towards the aiming or hip target
    pub fn interp_zoom(&mut self, dt: f32, aiming: bool) {
        let target = if aiming {
            self.zoomed_fov
        } else {
            self.default_fov
        };
        self.current_fov = interp_to(self.current_fov, target, dt, self.zoom_interp_speed);
    }
}

/// Boom, follow camera and the resolved view for one character
#[derive(Debug, Clone)]
pub struct ShooterCamera {
    pub boom: CameraBoom,
    pub follow: FollowCamera,
    transform: Transform,
    viewport: Vec2,
}

impl ShooterCamera {
    pub fn new(settings: &CameraSettings, viewport: Vec2) -> Self {
        Self {
            boom: CameraBoom::new(settings),
            follow: FollowCamera::new(settings),
            transform: Transform::IDENTITY,
            viewport,
        }
    }

    /// Re-seat the camera on the boom
    pub fn update(&mut self, location: Vec3, body_rotation: Quat, control: ControlRotation) {
        self.transform = self.boom.camera_transform(location, body_rotation, control);
    }

    pub fn resize(&mut self, viewport: Vec2) {
        self.viewport = viewport;
    }

    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    pub fn transform(&self) -> Transform {
        self.transform
    }

    pub fn location(&self) -> Vec3 {
        self.transform.location
    }

    fn aspect(&self) -> f32 {
        if self.viewport.y > 0.0 {
            self.viewport.x / self.viewport.y
        } else {
            1.0
        }
    }

    /// Half-extents of the view frustum at unit distance
    fn tan_half_fov(&self) -> Vec2 {
        let horizontal = (self.follow.current_fov.to_radians() * 0.5).tan();
        Vec2::new(horizontal, horizontal / self.aspect())
    }

    /// World-space ray (origin, unit direction) through a screen position
    pub fn deproject_screen_to_world(&self, screen: Vec2) -> Option<(Vec3, Vec3)> {
        if self.viewport.x <= 0.0 || self.viewport.y <= 0.0 {
            return None;
        }

        let ndc = Vec2::new(
            screen.x / self.viewport.x * 2.0 - 1.0,
            1.0 - screen.y / self.viewport.y * 2.0,
        );
        let tan_half = self.tan_half_fov();
        let local = Vec3::new(ndc.x * tan_half.x, ndc.y * tan_half.y, -1.0).normalize();

        Some((self.transform.location, self.transform.rotation * local))
    }

    /// Screen position of the crosshair
    pub fn crosshair_screen_location(&self, offset: Vec2) -> Vec2 {
        self.viewport * 0.5 + offset
    }
}
