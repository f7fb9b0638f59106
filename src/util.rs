pub mod math {
    pub fn degree_to_radian(degree: f32) -> f32 {
        degree * std::f32::consts::PI / 180.0
    }

    /// Snap `value` to the closest multiple of `step`, leaving values that
    /// already sit on a multiple untouched.
    pub fn snap_to_step(value: f32, step: f32) -> f32 {
        if step <= 0.0 {
            return value;
        }
        let steps = value / step;
        if (steps - steps.round()).abs() <= 1e-4 {
            value
        } else {
            steps.round() * step
        }
    }
}

#[cfg(test)]
mod tests {
    use super::math::*;

    #[test]
    fn half_turn_is_pi() {
        assert!((degree_to_radian(180.0) - std::f32::consts::PI).abs() < 1e-6);
    }

    #[test]
    fn values_on_step_are_kept_exactly() {
        assert_eq!(snap_to_step(3.0, 0.01), 3.0);
        assert_eq!(snap_to_step(-5.0, 0.01), -5.0);
        assert_eq!(snap_to_step(0.0, 0.01), 0.0);
    }

    #[test]
    fn values_between_steps_are_rounded() {
        let snapped = snap_to_step(1.234_56, 0.01);
        assert!((snapped - 1.23).abs() < 1e-5);
        let snapped = snap_to_step(-0.0071, 0.01);
        assert!((snapped + 0.01).abs() < 1e-5);
    }
}
