use crate::{
    camera::PerspectiveCamera,
    color::Color,
    config::{LightConfig, ShowcaseConfig},
    geometry::SphereGeometry,
};

/// Position and XYZ Euler rotation (radians) of a scene object.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Transform {
    pub position: glam::Vec3,
    pub rotation: glam::Vec3,
}

impl Transform {
    pub fn matrix(&self) -> glam::Mat4 {
        let rotation = glam::Quat::from_euler(
            glam::EulerRot::XYZ,
            self.rotation.x,
            self.rotation.y,
            self.rotation.z,
        );
        glam::Mat4::from_rotation_translation(rotation, self.position)
    }
}

/// Loading state of a material's normal map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalMap {
    /// Requested but not delivered yet; the flat placeholder is bound.
    Pending,
    Loaded,
    /// Load failed; the flat placeholder stays bound for good.
    Unavailable,
}

#[derive(Debug, Clone)]
pub struct StandardMaterial {
    pub color: Color,
    pub metalness: f32,
    pub roughness: f32,
    pub normal_map: NormalMap,
}

#[derive(Debug, Clone)]
pub struct Mesh {
    pub geometry: SphereGeometry,
    pub material: StandardMaterial,
    pub transform: Transform,
}

#[derive(Debug, Clone)]
pub struct PointLight {
    pub name: &'static str,
    pub color: Color,
    pub intensity: f32,
    pub position: glam::Vec3,
}

impl PointLight {
    pub fn new(name: &'static str, color: u32, intensity: f32) -> Self {
        Self {
            name,
            color: Color::from_hex(color),
            intensity,
            position: glam::Vec3::ZERO,
        }
    }
}

/// Index of one of the scene's two point lights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LightId {
    First,
    Second,
}

impl LightId {
    pub const ALL: [LightId; 2] = [LightId::First, LightId::Second];

    pub fn index(self) -> usize {
        match self {
            LightId::First => 0,
            LightId::Second => 1,
        }
    }
}

/// Wireframe marker drawn at a light's position in the light's color. It only
/// stores which light it follows, so it always reflects the light's latest state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLightHelper {
    pub light: LightId,
    pub size: f32,
}

impl PointLightHelper {
    pub fn new(light: LightId, size: f32) -> Self {
        Self { light, size }
    }

    pub fn geometry(&self) -> SphereGeometry {
        SphereGeometry::new(self.size, 4, 2)
    }

    /// World transform of the marker, taken from the tracked light.
    pub fn matrix(&self, scene: &Scene) -> glam::Mat4 {
        glam::Mat4::from_translation(scene.light(self.light).position)
    }

    pub fn color(&self, scene: &Scene) -> Color {
        scene.light(self.light).color
    }
}

/// Borrowed view of one child of the scene root.
#[derive(Debug, Clone, Copy)]
pub enum SceneObject<'a> {
    Mesh(&'a Mesh),
    PointLight(&'a PointLight),
    PointLightHelper(&'a PointLightHelper),
    Camera(&'a PerspectiveCamera),
}

/// Scene root: owns every object that is rendered or lights the scene.
#[derive(Debug, Clone)]
pub struct Scene {
    pub sphere: Mesh,
    lights: [PointLight; 2],
    helpers: [PointLightHelper; 2],
    pub camera: PerspectiveCamera,
}

impl Scene {
    /// Assemble the showcase scene. The sphere's normal map starts out pending.
    pub fn new(config: &ShowcaseConfig, aspect: f32) -> Self {
        let sphere = Mesh {
            geometry: SphereGeometry::new(
                config.sphere.radius,
                config.sphere.width_segments,
                config.sphere.height_segments,
            ),
            material: StandardMaterial {
                color: Color::from_hex(config.sphere.color),
                metalness: config.sphere.metalness,
                roughness: config.sphere.roughness,
                normal_map: NormalMap::Pending,
            },
            transform: Transform::default(),
        };

        let lights = [
            build_light(&config.lights[0], 0.1),
            build_light(&config.lights[1], 2.0),
        ];

        // Helper order follows the lights: the first helper tracks the first light.
        let helpers = [
            PointLightHelper::new(LightId::First, config.helper_size),
            PointLightHelper::new(LightId::Second, config.helper_size),
        ];

        let camera = PerspectiveCamera::from_config(&config.camera, aspect);

        tracing::debug!(
            radius = config.sphere.radius,
            segments = config.sphere.width_segments,
            "scene assembled"
        );

        Self {
            sphere,
            lights,
            helpers,
            camera,
        }
    }

    pub fn light(&self, id: LightId) -> &PointLight {
        &self.lights[id.index()]
    }

    pub fn light_mut(&mut self, id: LightId) -> &mut PointLight {
        &mut self.lights[id.index()]
    }

    pub fn lights(&self) -> &[PointLight; 2] {
        &self.lights
    }

    pub fn helpers(&self) -> &[PointLightHelper; 2] {
        &self.helpers
    }

    /// Every child of the scene root, in insertion order.
    pub fn children(&self) -> impl Iterator<Item = SceneObject<'_>> {
        std::iter::once(SceneObject::Mesh(&self.sphere))
            .chain(self.lights.iter().map(SceneObject::PointLight))
            .chain(self.helpers.iter().map(SceneObject::PointLightHelper))
            .chain(std::iter::once(SceneObject::Camera(&self.camera)))
    }
}

/// Lights are built with their constructor intensity and then overridden with
/// the tuned value, matching how the page sets them up.
fn build_light(config: &LightConfig, constructor_intensity: f32) -> PointLight {
    let mut light = PointLight::new(config.name, config.color, constructor_intensity);
    light.position = config.position;
    light.intensity = config.intensity;
    light
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene() -> Scene {
        Scene::new(&ShowcaseConfig::default(), 16.0 / 9.0)
    }

    #[test]
    fn lights_start_with_tuned_values() {
        let scene = scene();
        let first = scene.light(LightId::First);
        let second = scene.light(LightId::Second);

        assert_eq!(first.intensity, 2.6);
        assert_eq!(first.position, glam::Vec3::new(0.0, 2.0, -1.75));
        assert_eq!(first.color, Color::WHITE);

        assert_eq!(second.intensity, 1.5);
        assert_eq!(second.position, glam::Vec3::new(0.0, -2.0, -1.75));
        assert_eq!(second.color, Color::from_hex(0xff0000));
    }

    #[test]
    fn helpers_follow_their_light() {
        let mut scene = scene();
        let helper = scene.helpers()[1];

        scene.light_mut(LightId::Second).position = glam::Vec3::new(1.0, 2.0, 3.0);
        scene.light_mut(LightId::Second).color = Color::from_hex(0x00ff00);

        assert_eq!(
            helper.matrix(&scene).w_axis.truncate(),
            glam::Vec3::new(1.0, 2.0, 3.0)
        );
        assert_eq!(helper.color(&scene), Color::rgb(0.0, 1.0, 0.0));
    }

    #[test]
    fn material_uses_tuned_surface() {
        let scene = scene();
        let material = &scene.sphere.material;
        assert_eq!(material.metalness, 0.7);
        assert_eq!(material.roughness, 0.2);
        assert_eq!(material.normal_map, NormalMap::Pending);
        assert_eq!(material.color, Color::from_hex(0x292929));
    }

    #[test]
    fn transform_matrix_applies_translation() {
        let transform = Transform {
            position: glam::Vec3::new(0.0, 1.5, -0.25),
            rotation: glam::Vec3::new(0.1, 0.2, 0.0),
        };
        let origin = transform.matrix().transform_point3(glam::Vec3::ZERO);
        assert!((origin - transform.position).length() < 1e-6);
    }
}
