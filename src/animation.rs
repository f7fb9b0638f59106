use crate::{config::MotionConfig, input::InputState, scene::Scene};

/// Advance the sphere for one frame.
///
/// The easing runs once per frame with fixed factors, so convergence speed
/// depends on the frame rate. The depth nudge reads the pitch error from
/// before the pitch is eased.
pub fn update_frame(scene: &mut Scene, input: &mut InputState, elapsed: f32, motion: &MotionConfig) {
    input.target = input.mouse * motion.pointer_scale;
    let target = input.target;

    let transform = &mut scene.sphere.transform;

    transform.rotation.y = motion.spin_speed * elapsed;
    transform.rotation.y += motion.yaw_easing * (target.x - transform.rotation.y);

    let previous_pitch = transform.rotation.x;
    transform.rotation.x += motion.pitch_easing * (target.y - previous_pitch);
    transform.position.z += motion.depth_nudge * (target.y - previous_pitch);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ShowcaseConfig;

    #[test]
    fn resting_pointer_only_spins() {
        let config = ShowcaseConfig::default();
        let mut scene = Scene::new(&config, 1.0);
        let mut input = InputState::new(800.0, 600.0);

        update_frame(&mut scene, &mut input, 2.0, &config.motion);

        let transform = scene.sphere.transform;
        // Spin of 1.0 eased halfway back toward a zero target.
        assert_eq!(transform.rotation.y, 0.5);
        assert_eq!(transform.rotation.x, 0.0);
        assert_eq!(transform.position.z, 0.0);
    }

    #[test]
    fn pitch_converges_toward_target() {
        let config = ShowcaseConfig::default();
        let mut scene = Scene::new(&config, 1.0);
        let mut input = InputState::new(800.0, 600.0);
        input.on_pointer_move(400.0, 500.0);

        for _ in 0..200 {
            update_frame(&mut scene, &mut input, 0.0, &config.motion);
        }

        assert!((scene.sphere.transform.rotation.x - 0.2).abs() < 1e-3);
        // The depth drifts by -0.05 of every pitch error: in total -(target - 0).
        assert!((scene.sphere.transform.position.z + 0.2).abs() < 1e-3);
    }
}
