use crate::{
    color::{hex_to_srgb, srgb_to_hex},
    config::ShowcaseConfig,
    scene::{LightId, PointLight, Scene},
    util::math::snap_to_step,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightParam {
    X,
    Y,
    Z,
    Intensity,
}

impl LightParam {
    pub fn label(self) -> &'static str {
        match self {
            LightParam::X => "x",
            LightParam::Y => "y",
            LightParam::Z => "z",
            LightParam::Intensity => "intensity",
        }
    }

    pub fn get(self, light: &PointLight) -> f32 {
        match self {
            LightParam::X => light.position.x,
            LightParam::Y => light.position.y,
            LightParam::Z => light.position.z,
            LightParam::Intensity => light.intensity,
        }
    }

    /// Position of this parameter's control inside a [`LightFolder`].
    fn slot(self) -> usize {
        match self {
            LightParam::X => 0,
            LightParam::Y => 1,
            LightParam::Z => 2,
            LightParam::Intensity => 3,
        }
    }

    fn set(self, light: &mut PointLight, value: f32) {
        match self {
            LightParam::X => light.position.x = value,
            LightParam::Y => light.position.y = value,
            LightParam::Z => light.position.z = value,
            LightParam::Intensity => light.intensity = value,
        }
    }
}

/// Slider bound to one numeric light attribute.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumberControl {
    pub param: LightParam,
    pub min: f32,
    pub max: f32,
    pub step: f32,
}

impl NumberControl {
    /// Clamp to the range, then snap to the step grid.
    pub fn constrain(&self, value: f32) -> f32 {
        snap_to_step(value.clamp(self.min, self.max), self.step).clamp(self.min, self.max)
    }

    /// Store `value` in the bound attribute and return what was stored.
    pub fn apply(&self, light: &mut PointLight, value: f32) -> f32 {
        let value = self.constrain(value);
        self.param.set(light, value);
        value
    }
}

/// Color control state. The picker edits a plain `0xRRGGBB` number, which is
/// translated into the light's [`crate::color::Color`] on every change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorBinding {
    pub value: u32,
}

impl ColorBinding {
    pub fn on_change(&mut self, value: u32, light: &mut PointLight) {
        self.value = value;
        light.color.set_hex(self.value);
    }
}

#[derive(Debug, Clone)]
pub struct LightFolder {
    pub name: &'static str,
    pub light: LightId,
    pub controls: [NumberControl; 4],
    pub color: ColorBinding,
}

impl LightFolder {
    pub fn control(&self, param: LightParam) -> &NumberControl {
        &self.controls[param.slot()]
    }

    fn ui(&mut self, ui: &mut egui::Ui, scene: &mut Scene) {
        for control in &self.controls {
            let mut value = control.param.get(scene.light(self.light));
            let slider = egui::Slider::new(&mut value, control.min..=control.max)
                .step_by(control.step as f64)
                .text(control.param.label());
            if ui.add(slider).changed() {
                control.apply(scene.light_mut(self.light), value);
            }
        }

        ui.horizontal(|ui| {
            let mut srgb = hex_to_srgb(self.color.value);
            if egui::color_picker::color_edit_button_srgb(ui, &mut srgb).changed() {
                self.color
                    .on_change(srgb_to_hex(srgb), scene.light_mut(self.light));
            }
            ui.label("color");
        });
    }
}

#[derive(Debug, Clone)]
pub struct DebugPanel {
    folders: [LightFolder; 2],
}

impl DebugPanel {
    pub fn new(config: &ShowcaseConfig) -> Self {
        let panel = &config.panel;
        let (pos_min, pos_max) = panel.position_range;
        let (int_min, int_max) = panel.intensity_range;

        let folder = |light: LightId| {
            let light_config = &config.lights[light.index()];
            let position = |param| NumberControl {
                param,
                min: pos_min,
                max: pos_max,
                step: panel.step,
            };
            LightFolder {
                name: light_config.name,
                light,
                controls: [
                    position(LightParam::X),
                    position(LightParam::Y),
                    position(LightParam::Z),
                    NumberControl {
                        param: LightParam::Intensity,
                        min: int_min,
                        max: int_max,
                        step: panel.step,
                    },
                ],
                color: ColorBinding {
                    value: light_config.control_color,
                },
            }
        };

        Self {
            folders: [folder(LightId::First), folder(LightId::Second)],
        }
    }

    pub fn folder(&self, light: LightId) -> &LightFolder {
        &self.folders[light.index()]
    }

    /// Move a numeric control. Returns the value stored on the light.
    pub fn set_number(&self, scene: &mut Scene, light: LightId, param: LightParam, value: f32) -> f32 {
        self.folder(light)
            .control(param)
            .apply(scene.light_mut(light), value)
    }

    /// Pick a new color on a light's color control.
    pub fn set_color(&mut self, scene: &mut Scene, light: LightId, value: u32) {
        self.folders[light.index()]
            .color
            .on_change(value, scene.light_mut(light));
    }

    /// Draw the panel and apply whatever the user changed this frame.
    pub fn show(&mut self, ctx: &egui::Context, scene: &mut Scene) {
        egui::Window::new("Controls")
            .anchor(egui::Align2::RIGHT_TOP, [-12.0, 12.0])
            .resizable(false)
            .show(ctx, |ui| {
                for folder in &mut self.folders {
                    egui::CollapsingHeader::new(folder.name)
                        .default_open(true)
                        .show(ui, |ui| folder.ui(ui, scene));
                }
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;

    fn setup() -> (DebugPanel, Scene) {
        let config = ShowcaseConfig::default();
        (DebugPanel::new(&config), Scene::new(&config, 1.0))
    }

    #[test]
    fn folders_are_named_after_lights() {
        let (panel, _) = setup();
        assert_eq!(panel.folder(LightId::First).name, "Light1");
        assert_eq!(panel.folder(LightId::Second).name, "Light2");
    }

    #[test]
    fn ranges_and_steps() {
        let (panel, _) = setup();
        let folder = panel.folder(LightId::First);

        for param in [LightParam::X, LightParam::Y, LightParam::Z] {
            let control = folder.control(param);
            assert_eq!(control.param, param);
            assert_eq!((control.min, control.max, control.step), (-5.0, 5.0, 0.01));
        }
        let intensity = folder.control(LightParam::Intensity);
        assert_eq!((intensity.min, intensity.max), (0.0, 5.0));
    }

    #[test]
    fn off_grid_values_snap_to_step() {
        let (panel, mut scene) = setup();
        let stored = panel.set_number(&mut scene, LightId::Second, LightParam::Y, 1.23456);
        assert!((stored - 1.23).abs() < 1e-5);
        assert_eq!(scene.light(LightId::Second).position.y, stored);
    }

    #[test]
    fn color_change_keeps_both_representations() {
        let (mut panel, mut scene) = setup();
        assert_eq!(panel.folder(LightId::First).color.value, 0xff0000);
        assert_eq!(scene.light(LightId::First).color, Color::WHITE);

        panel.set_color(&mut scene, LightId::First, 0x00ff00);

        assert_eq!(panel.folder(LightId::First).color.value, 0x00ff00);
        assert_eq!(scene.light(LightId::First).color, Color::rgb(0.0, 1.0, 0.0));
        assert_eq!(scene.light(LightId::Second).color, Color::from_hex(0xff0000));
    }
}
