// Crosshair spread
//
// The spread multiplier scales how far the crosshair arms sit from the
// centre. It is the sum of a baseline and four factors, each updated per frame.

use super::tuning::CrosshairTuning;
use crate::core::math::{interp_to, map_range_clamped};

#[derive(Debug, Clone)]
pub struct CrosshairSpread {
    tuning: CrosshairTuning,
    velocity_factor: f32,
    in_air_factor: f32,
    aim_factor: f32,
    shooting_factor: f32,
}

impl CrosshairSpread {
    pub fn new(tuning: CrosshairTuning) -> Self {
        Self {
            tuning,
            velocity_factor: 0.0,
            in_air_factor: 0.0,
            aim_factor: 0.0,
            shooting_factor: 0.0,
        }
    }

    /// Recompute every factor for this frame.
    ///
    /// `shot_time_remaining` is the time left on the post-shot window, or a
    /// non-positive value when no shot is in flight.
    pub fn update(
        &mut self,
        dt: f32,
        horizontal_speed: f32,
        is_falling: bool,
        is_aiming: bool,
        shot_time_remaining: f32,
    ) {
        let t = &self.tuning;

        self.velocity_factor =
            map_range_clamped(horizontal_speed, t.walk_speed_range, t.velocity_factor_range);

        self.in_air_factor = if is_falling {
            interp_to(self.in_air_factor, t.in_air_target, dt, t.in_air_interp_speed)
        } else {
            interp_to(self.in_air_factor, 0.0, dt, t.landed_interp_speed)
        };

        self.aim_factor = if is_aiming {
            interp_to(self.aim_factor, t.aim_target, dt, t.aim_interp_speed)
        } else {
            interp_to(self.aim_factor, 0.0, dt, t.aim_interp_speed)
        };

        self.shooting_factor = if shot_time_remaining > 0.0 {
            t.shooting_spike * (shot_time_remaining / t.shoot_time_duration).min(1.0)
        } else {
            0.0
        };
    }

    pub fn multiplier(&self) -> f32 {
        self.tuning.baseline
            + self.velocity_factor
            + self.in_air_factor
            + self.aim_factor
            + self.shooting_factor
    }

    pub fn velocity_factor(&self) -> f32 {
        self.velocity_factor
    }

    pub fn in_air_factor(&self) -> f32 {
        self.in_air_factor
    }

    pub fn aim_factor(&self) -> f32 {
        self.aim_factor
    }

    pub fn shooting_factor(&self) -> f32 {
        self.shooting_factor
    }
}
