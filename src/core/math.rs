// Math utilities and helper functions

/// Values closer than this (squared) snap to the interpolation target
const SMALL_NUMBER: f32 = 1.0e-8;

/// Clamp a value between min and max
pub fn clamp<T: PartialOrd>(value: T, min: T, max: T) -> T {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

/// Linear interpolation
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Check if two f32 values are approximately equal
pub fn approx_equal(a: f32, b: f32, epsilon: f32) -> bool {
    (a - b).abs() < epsilon
}

/// Move `current` towards `target` at a frame-rate aware rate.
///
/// Covers `dt * speed` of the remaining distance each call, so the approach
/// slows down as it closes in. A non-positive speed jumps straight to target.
pub fn interp_to(current: f32, target: f32, dt: f32, speed: f32) -> f32 {
    if speed <= 0.0 {
        return target;
    }

    let distance = target - current;
    if distance * distance < SMALL_NUMBER {
        return target;
    }

    current + distance * clamp(dt * speed, 0.0, 1.0)
}

/// Remap `value` from `input` to `output`, clamping to the input range first
pub fn map_range_clamped(value: f32, input: (f32, f32), output: (f32, f32)) -> f32 {
    let span = input.1 - input.0;
    if span.abs() < f32::EPSILON {
        return output.0;
    }

    let t = clamp((value - input.0) / span, 0.0, 1.0);
    lerp(output.0, output.1, t)
}

/// Wrap an angle in degrees into (-180, 180]
pub fn normalize_axis_deg(angle: f32) -> f32 {
    let mut wrapped = angle % 360.0;
    if wrapped > 180.0 {
        wrapped -= 360.0;
    } else if wrapped <= -180.0 {
        wrapped += 360.0;
    }
    wrapped
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_clamp() {
        assert_eq!(clamp(5.0, 0.0, 10.0), 5.0);
        assert_eq!(clamp(-5.0, 0.0, 10.0), 0.0);
        assert_eq!(clamp(15.0, 0.0, 10.0), 10.0);
    }

    #[test]
    fn test_lerp() {
        assert_eq!(lerp(0.0, 10.0, 0.0), 0.0);
        assert_eq!(lerp(0.0, 10.0, 1.0), 10.0);
        assert_eq!(lerp(0.0, 10.0, 0.5), 5.0);
    }

    #[test]
    fn test_approx_equal() {
        assert!(approx_equal(1.0, 1.00001, 0.0001));
        assert!(!approx_equal(1.0, 1.1, 0.01));
    }

    #[test]
    fn test_interp_to_partial_step() {
        // 0.1s at speed 5 covers half the distance
        assert_relative_eq!(interp_to(0.0, 10.0, 0.1, 5.0), 5.0);
    }

    #[test]
    fn test_interp_to_never_overshoots() {
        assert_eq!(interp_to(0.0, 10.0, 1.0, 30.0), 10.0);
        assert_eq!(interp_to(10.0, 0.0, 1.0, 30.0), 0.0);
    }

    #[test]
    fn test_interp_to_zero_speed_snaps() {
        assert_eq!(interp_to(3.0, 7.0, 0.016, 0.0), 7.0);
    }

    #[test]
    fn test_interp_to_snaps_when_close() {
        assert_eq!(interp_to(1.0, 1.000_01, 0.016, 1.0), 1.000_01);
    }

    #[test]
    fn test_map_range_clamped() {
        assert_relative_eq!(map_range_clamped(300.0, (0.0, 600.0), (0.0, 0.6)), 0.3);
        assert_eq!(map_range_clamped(-10.0, (0.0, 600.0), (0.0, 0.6)), 0.0);
        assert_relative_eq!(map_range_clamped(900.0, (0.0, 600.0), (0.0, 0.6)), 0.6);
    }

    #[test]
    fn test_map_range_degenerate_input() {
        assert_eq!(map_range_clamped(5.0, (1.0, 1.0), (2.0, 3.0)), 2.0);
    }

    #[test]
    fn test_normalize_axis_deg() {
        assert_relative_eq!(normalize_axis_deg(190.0), -170.0);
        assert_relative_eq!(normalize_axis_deg(-190.0), 170.0);
        assert_relative_eq!(normalize_axis_deg(180.0), 180.0);
        assert_relative_eq!(normalize_axis_deg(-180.0), 180.0);
        assert_relative_eq!(normalize_axis_deg(45.0), 45.0);
    }
}
