use winit::dpi::PhysicalSize;

use crate::camera::PerspectiveCamera;

/// Logical output size and the capped device pixel ratio the scene is rendered at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub pixel_ratio: f64,
    max_pixel_ratio: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64, device_pixel_ratio: f64, max_pixel_ratio: f64) -> Self {
        Self {
            width,
            height,
            pixel_ratio: device_pixel_ratio.min(max_pixel_ratio),
            max_pixel_ratio,
        }
    }

    pub fn aspect(&self) -> f32 {
        (self.width / self.height) as f32
    }

    /// Size of the scene render target in physical pixels.
    pub fn buffer_size(&self) -> PhysicalSize<u32> {
        PhysicalSize::new(
            ((self.width * self.pixel_ratio).floor() as u32).max(1),
            ((self.height * self.pixel_ratio).floor() as u32).max(1),
        )
    }

    /// Window resized to `width` x `height` logical pixels. Updates the camera
    /// aspect and projection. Returns `false` and changes nothing for an empty
    /// window.
    pub fn resize(
        &mut self,
        width: f64,
        height: f64,
        device_pixel_ratio: f64,
        camera: &mut PerspectiveCamera,
    ) -> bool {
        if width <= 0.0 || height <= 0.0 {
            return false;
        }
        self.width = width;
        self.height = height;

        camera.aspect = self.aspect();
        camera.update_projection_matrix();

        self.pixel_ratio = device_pixel_ratio.min(self.max_pixel_ratio);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_ratio_is_capped() {
        let viewport = Viewport::new(1000.0, 500.0, 3.0, 2.0);
        assert_eq!(viewport.pixel_ratio, 2.0);
        assert_eq!(viewport.buffer_size(), PhysicalSize::new(2000, 1000));
    }

    #[test]
    fn fractional_sizes_round_down() {
        let viewport = Viewport::new(333.0, 100.0, 1.5, 2.0);
        assert_eq!(viewport.buffer_size(), PhysicalSize::new(499, 150));
    }

    #[test]
    fn empty_window_keeps_previous_state() {
        let mut camera = PerspectiveCamera::new(75.0, 2.0, 0.1, 100.0);
        let mut viewport = Viewport::new(800.0, 400.0, 1.0, 2.0);

        assert!(!viewport.resize(0.0, 0.0, 1.0, &mut camera));
        assert_eq!(viewport.width, 800.0);
        assert_eq!(camera.aspect, 2.0);
    }
}
