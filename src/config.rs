use glam::Vec3;

#[derive(Debug, Clone)]
pub struct ShowcaseConfig {
    pub sphere: SphereConfig,
    pub lights: [LightConfig; 2],
    pub camera: CameraConfig,
    pub motion: MotionConfig,
    pub panel: PanelConfig,
    pub assets: AssetConfig,
    /// Upper bound applied to the display's device pixel ratio.
    pub max_pixel_ratio: f64,
    /// Radius of the wireframe drawn around each light.
    pub helper_size: f32,
}

#[derive(Debug, Clone)]
pub struct SphereConfig {
    pub radius: f32,
    pub width_segments: u32,
    pub height_segments: u32,
    pub metalness: f32,
    pub roughness: f32,
    pub color: u32,
}

#[derive(Debug, Clone)]
pub struct LightConfig {
    pub name: &'static str,
    pub color: u32,
    pub intensity: f32,
    pub position: Vec3,
    /// Initial value shown by the color control of this light.
    pub control_color: u32,
}

#[derive(Debug, Clone)]
pub struct CameraConfig {
    /// Vertical field of view in degrees.
    pub fov_y: f32,
    pub z_near: f32,
    pub z_far: f32,
    pub position: Vec3,
}

#[derive(Debug, Clone)]
pub struct MotionConfig {
    /// Pointer pixels to radians.
    pub pointer_scale: f32,
    /// Auto spin in radians per second.
    pub spin_speed: f32,
    pub yaw_easing: f32,
    pub pitch_easing: f32,
    pub depth_nudge: f32,
    /// Scroll pixels to world units on the sphere's y axis.
    pub scroll_scale: f32,
}

#[derive(Debug, Clone)]
pub struct PanelConfig {
    pub position_range: (f32, f32),
    pub intensity_range: (f32, f32),
    pub step: f32,
}

#[derive(Debug, Clone)]
pub struct AssetConfig {
    pub normal_map: &'static str,
    /// CSS selector of the canvas the page draws into.
    pub canvas_selector: &'static str,
    pub window_title: &'static str,
}

impl Default for ShowcaseConfig {
    fn default() -> Self {
        Self {
            sphere: SphereConfig {
                radius: 0.5,
                width_segments: 64,
                height_segments: 64,
                metalness: 0.7,
                roughness: 0.2,
                color: 0x292929,
            },
            lights: [
                LightConfig {
                    name: "Light1",
                    color: 0xffffff,
                    intensity: 2.6,
                    position: Vec3::new(0.0, 2.0, -1.75),
                    control_color: 0xff0000,
                },
                LightConfig {
                    name: "Light2",
                    color: 0xff0000,
                    intensity: 1.5,
                    position: Vec3::new(0.0, -2.0, -1.75),
                    control_color: 0xffffff,
                },
            ],
            camera: CameraConfig {
                fov_y: 75.0,
                z_near: 0.1,
                z_far: 100.0,
                position: Vec3::new(0.0, 0.0, 2.0),
            },
            motion: MotionConfig {
                pointer_scale: 0.001,
                spin_speed: 0.5,
                yaw_easing: 0.5,
                pitch_easing: 0.05,
                depth_nudge: -0.05,
                scroll_scale: 0.015,
            },
            panel: PanelConfig {
                position_range: (-5.0, 5.0),
                intensity_range: (0.0, 5.0),
                step: 0.01,
            },
            assets: AssetConfig {
                #[cfg(not(target_arch = "wasm32"))]
                normal_map: "assets/textures/NormalMap.png",
                #[cfg(target_arch = "wasm32")]
                normal_map: "../assets/textures/NormalMap.png",
                canvas_selector: "canvas.webgl",
                window_title: "Sphere Showcase",
            },
            max_pixel_ratio: 2.0,
            helper_size: 1.0,
        }
    }
}
