use crate::{config::MotionConfig, scene::Scene};

/// Wheel notches are converted to page pixels with this height.
pub const LINE_HEIGHT_PX: f32 = 100.0;

/// Pointer and scroll state read by the frame update.
///
/// The window half-size is captured once when the state is created and is not
/// refreshed on resize, so after a resize the pointer offset is measured from
/// the original center.
#[derive(Debug, Clone, PartialEq)]
pub struct InputState {
    window_half: glam::Vec2,
    /// Pointer offset from the captured window center, in logical pixels.
    pub mouse: glam::Vec2,
    /// Target rotation derived from `mouse` on the latest frame.
    pub target: glam::Vec2,
    /// Page scroll offset in logical pixels.
    pub scroll_y: f32,
}

impl InputState {
    pub fn new(window_width: f32, window_height: f32) -> Self {
        Self {
            window_half: glam::Vec2::new(window_width / 2.0, window_height / 2.0),
            mouse: glam::Vec2::ZERO,
            target: glam::Vec2::ZERO,
            scroll_y: 0.0,
        }
    }

    pub fn window_half(&self) -> glam::Vec2 {
        self.window_half
    }

    /// Pointer moved to `(x, y)` in logical window coordinates.
    pub fn on_pointer_move(&mut self, x: f32, y: f32) {
        self.mouse = glam::Vec2::new(x, y) - self.window_half;
    }

    /// Page scrolled to `scroll_y`. Moves the sphere right away instead of
    /// waiting for the next frame.
    pub fn on_scroll(&mut self, scroll_y: f32, motion: &MotionConfig, scene: &mut Scene) {
        self.scroll_y = scroll_y;
        scene.sphere.transform.position.y = scroll_y * motion.scroll_scale;
    }

    /// Native wheel input: accumulate a page-like offset that never goes above
    /// the top of the page. `delta_y` follows winit, positive when scrolling up.
    pub fn on_wheel(&mut self, delta_y: f32, motion: &MotionConfig, scene: &mut Scene) {
        let scroll_y = (self.scroll_y - delta_y).max(0.0);
        self.on_scroll(scroll_y, motion, scene);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ShowcaseConfig;

    #[test]
    fn pointer_offset_is_relative_to_center() {
        let mut input = InputState::new(800.0, 600.0);
        input.on_pointer_move(500.0, 100.0);
        assert_eq!(input.mouse, glam::Vec2::new(100.0, -200.0));
    }

    #[test]
    fn center_is_captured_once() {
        let input = InputState::new(800.0, 600.0);
        assert_eq!(input.window_half(), glam::Vec2::new(400.0, 300.0));
    }

    #[test]
    fn wheel_never_scrolls_above_the_top() {
        let config = ShowcaseConfig::default();
        let mut scene = Scene::new(&config, 1.0);
        let mut input = InputState::new(800.0, 600.0);

        input.on_wheel(-250.0, &config.motion, &mut scene);
        assert_eq!(input.scroll_y, 250.0);

        input.on_wheel(1000.0, &config.motion, &mut scene);
        assert_eq!(input.scroll_y, 0.0);
        assert_eq!(scene.sphere.transform.position.y, 0.0);
    }
}
