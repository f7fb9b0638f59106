use crate::{config::CameraConfig, util::math::degree_to_radian};

/// Perspective camera looking down the negative Z axis.
///
/// The projection matrix is cached: changing `aspect`, `fov_y` or the clip
/// planes has no effect until [`PerspectiveCamera::update_projection_matrix`]
/// is called.
#[derive(Debug, Clone)]
pub struct PerspectiveCamera {
    pub position: glam::Vec3,
    pub aspect: f32,
    /// Vertical field of view in degrees.
    pub fov_y: f32,
    pub z_near: f32,
    pub z_far: f32,
    projection: glam::Mat4,
}

impl PerspectiveCamera {
    pub fn new(fov_y: f32, aspect: f32, z_near: f32, z_far: f32) -> Self {
        let mut camera = Self {
            position: glam::Vec3::ZERO,
            aspect,
            fov_y,
            z_near,
            z_far,
            projection: glam::Mat4::IDENTITY,
        };
        camera.update_projection_matrix();
        camera
    }

    pub fn from_config(config: &CameraConfig, aspect: f32) -> Self {
        let mut camera = Self::new(config.fov_y, aspect, config.z_near, config.z_far);
        camera.position = config.position;
        camera
    }

    pub fn update_projection_matrix(&mut self) {
        self.projection = glam::Mat4::perspective_rh(
            degree_to_radian(self.fov_y),
            self.aspect,
            self.z_near,
            self.z_far,
        );
    }

    pub fn projection_matrix(&self) -> glam::Mat4 {
        self.projection
    }

    pub fn view_matrix(&self) -> glam::Mat4 {
        glam::Mat4::look_to_rh(self.position, glam::Vec3::NEG_Z, glam::Vec3::Y)
    }

    pub fn view_projection_matrix(&self) -> glam::Mat4 {
        // glam's perspective_rh already targets the 0..1 depth range wgpu uses.
        self.projection * self.view_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn projection_is_cached_until_updated() {
        let mut camera = PerspectiveCamera::new(75.0, 1.0, 0.1, 100.0);
        let before = camera.projection_matrix();

        camera.aspect = 2.0;
        assert_eq!(camera.projection_matrix(), before);

        camera.update_projection_matrix();
        assert_ne!(camera.projection_matrix(), before);
    }

    #[test]
    fn origin_projects_to_screen_center() {
        let mut camera = PerspectiveCamera::new(75.0, 16.0 / 9.0, 0.1, 100.0);
        camera.position = glam::Vec3::new(0.0, 0.0, 2.0);

        let clip = camera.view_projection_matrix() * glam::Vec4::new(0.0, 0.0, 0.0, 1.0);
        let ndc = clip.truncate() / clip.w;

        assert!(ndc.x.abs() < 1e-6);
        assert!(ndc.y.abs() < 1e-6);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }
}
