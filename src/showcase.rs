use wgpu::{CommandEncoderDescriptor, SurfaceError, TextureViewDescriptor};
use winit::{
    dpi::PhysicalSize,
    event::{Event, MouseScrollDelta, WindowEvent},
    event_loop::EventLoopWindowTarget,
};

use crate::{
    animation,
    application::{AppState, Layer, PageEvent, Screen},
    config::ShowcaseConfig,
    gui::Gui,
    input::{InputState, LINE_HEIGHT_PX},
    loader::NormalMapLoader,
    panel::DebugPanel,
    renderer::SceneRenderer,
    scene::{NormalMap, Scene},
    viewport::Viewport,
};

/// The interactive sphere scene: owns the scene state, the input state and
/// everything that draws them.
pub struct SphereShowcase {
    config: ShowcaseConfig,
    scene: Scene,
    input: InputState,
    viewport: Viewport,
    panel: DebugPanel,
    normal_map: NormalMapLoader,
    gui: Gui,
    renderer: SceneRenderer,
}

impl SphereShowcase {
    fn poll_normal_map(&mut self, screen: &Screen) {
        let Some(result) = self.normal_map.poll() else {
            return;
        };
        match result {
            Ok(img) => {
                self.renderer
                    .set_normal_map(&screen.device, &screen.queue, &img);
                self.scene.sphere.material.normal_map = NormalMap::Loaded;
                tracing::info!(
                    path = self.normal_map.path(),
                    width = img.width(),
                    height = img.height(),
                    "normal map loaded"
                );
            }
            Err(err) => {
                self.scene.sphere.material.normal_map = NormalMap::Unavailable;
                tracing::warn!("rendering without normal map: {err}");
            }
        }
    }
}

fn wheel_delta_px(delta: &MouseScrollDelta, scale_factor: f64) -> f32 {
    match delta {
        MouseScrollDelta::LineDelta(_, y) => *y * LINE_HEIGHT_PX,
        MouseScrollDelta::PixelDelta(position) => position.to_logical::<f32>(scale_factor).y,
    }
}

impl Layer for SphereShowcase {
    type LayerErr = ();

    fn start(
        screen: &mut Screen,
        _app: &AppState,
        event_loop: &EventLoopWindowTarget<PageEvent>,
    ) -> Self {
        let config = ShowcaseConfig::default();
        let normal_map = NormalMapLoader::spawn(config.assets.normal_map);

        let window = screen.window();
        let scale_factor = window.scale_factor();
        let logical = window.inner_size().to_logical::<f64>(scale_factor);
        let viewport = Viewport::new(
            logical.width.max(1.0),
            logical.height.max(1.0),
            scale_factor,
            config.max_pixel_ratio,
        );

        let scene = Scene::new(&config, viewport.aspect());
        let input = InputState::new(logical.width as f32, logical.height as f32);
        let panel = DebugPanel::new(&config);
        let gui = Gui::new(event_loop, screen);
        let renderer = SceneRenderer::new(
            &screen.device,
            &screen.queue,
            screen.config.format,
            &scene,
            viewport.buffer_size(),
        );

        tracing::info!(
            width = viewport.width,
            height = viewport.height,
            pixel_ratio = viewport.pixel_ratio,
            "showcase started"
        );

        Self {
            config,
            scene,
            input,
            viewport,
            panel,
            normal_map,
            gui,
            renderer,
        }
    }

    fn process_event(&mut self, event: &Event<PageEvent>, screen: &mut Screen) {
        match event {
            Event::WindowEvent { event, window_id } if *window_id == screen.window().id() => {
                // Page-level handlers see every event, even over the panel.
                self.gui.on_event(event);

                let scale_factor = screen.window().scale_factor();
                match event {
                    WindowEvent::CursorMoved { position, .. } => {
                        let position = position.to_logical::<f32>(scale_factor);
                        self.input.on_pointer_move(position.x, position.y);
                    }
                    WindowEvent::MouseWheel { delta, .. } => {
                        let delta_y = wheel_delta_px(delta, scale_factor);
                        #[cfg(not(target_arch = "wasm32"))]
                        self.input
                            .on_wheel(delta_y, &self.config.motion, &mut self.scene);
                        // The page owns the scroll offset; it reports back through `PageEvent::Scrolled`.
                        #[cfg(target_arch = "wasm32")]
                        crate::wasm::scroll_page_by(-delta_y);
                    }
                    _ => {}
                }
            }
            Event::UserEvent(PageEvent::Scrolled(offset)) => {
                self.input
                    .on_scroll(*offset as f32, &self.config.motion, &mut self.scene);
            }
            _ => {}
        }
    }

    fn resize(&mut self, new_size: PhysicalSize<u32>, _app: &AppState, screen: &mut Screen) {
        let scale_factor = screen.window().scale_factor();
        let logical = new_size.to_logical::<f64>(scale_factor);
        if self.viewport.resize(
            logical.width,
            logical.height,
            scale_factor,
            &mut self.scene.camera,
        ) {
            self.renderer
                .resize_target(&screen.device, self.viewport.buffer_size());
        }
    }

    fn update(&mut self, app: &AppState, screen: &mut Screen) {
        self.poll_normal_map(screen);
        animation::update_frame(
            &mut self.scene,
            &mut self.input,
            app.elapsed_time(),
            &self.config.motion,
        );
    }

    fn render(&mut self, _app: &AppState, screen: &mut Screen) -> Result<(), SurfaceError> {
        let gui_frame = self
            .gui
            .prepare(screen, |ctx| self.panel.show(ctx, &mut self.scene));
        self.renderer.update(&screen.queue, &self.scene);

        let output = screen.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&TextureViewDescriptor::default());
        let mut encoder = screen
            .device
            .create_command_encoder(&CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        self.renderer.encode(&mut encoder, &view);
        let gui_commands = self.gui.encode(screen, &mut encoder, &view, &gui_frame);

        screen.queue.submit(
            gui_commands
                .into_iter()
                .chain(std::iter::once(encoder.finish())),
        );
        output.present();

        Ok(())
    }

    fn shutdown(&mut self, _app: &AppState, _screen: &mut Screen) -> Result<(), Self::LayerErr> {
        tracing::info!("exiting");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use winit::dpi::PhysicalPosition;

    use super::*;

    #[test]
    fn wheel_lines_count_as_fixed_pixels() {
        let delta = MouseScrollDelta::LineDelta(0.0, -1.0);
        assert_eq!(wheel_delta_px(&delta, 1.0), -100.0);
        assert_eq!(wheel_delta_px(&delta, 2.0), -100.0);

        let delta = MouseScrollDelta::LineDelta(0.0, 3.0);
        assert_eq!(wheel_delta_px(&delta, 1.0), 300.0);
    }

    #[test]
    fn wheel_pixels_are_converted_to_logical() {
        let delta = MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, -80.0));
        assert_eq!(wheel_delta_px(&delta, 2.0), -40.0);
        assert_eq!(wheel_delta_px(&delta, 1.0), -80.0);
    }
}
