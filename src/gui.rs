use egui_wgpu::renderer::{Renderer, ScreenDescriptor};
use winit::{event::WindowEvent, event_loop::EventLoopWindowTarget};

use crate::application::{PageEvent, Screen};

/// Tessellated output of one egui pass, ready to be drawn.
pub struct GuiFrame {
    primitives: Vec<egui::ClippedPrimitive>,
    textures: egui::TexturesDelta,
    screen: ScreenDescriptor,
}

/// egui context wired to the window's input and the screen's device.
pub struct Gui {
    context: egui::Context,
    state: egui_winit::State,
    renderer: Renderer,
}

impl Gui {
    pub fn new(event_loop: &EventLoopWindowTarget<PageEvent>, screen: &Screen) -> Self {
        let mut state = egui_winit::State::new(event_loop);
        state.set_pixels_per_point(screen.window().scale_factor() as f32);
        state.set_max_texture_side(screen.device.limits().max_texture_dimension_2d as usize);

        Self {
            context: egui::Context::default(),
            state,
            renderer: Renderer::new(&screen.device, screen.config.format, None, 1),
        }
    }

    /// Feed a window event to egui. Returns whether egui wants it for itself.
    pub fn on_event(&mut self, event: &WindowEvent<'_>) -> bool {
        self.state.on_event(&self.context, event).consumed
    }

    /// Run one egui pass with `build` laying out the widgets.
    pub fn prepare(&mut self, screen: &Screen, build: impl FnOnce(&egui::Context)) -> GuiFrame {
        let raw_input = self.state.take_egui_input(screen.window());
        let output = self.context.run(raw_input, build);
        self.state
            .handle_platform_output(screen.window(), &self.context, output.platform_output);

        GuiFrame {
            primitives: self.context.tessellate(output.shapes),
            textures: output.textures_delta,
            screen: ScreenDescriptor {
                size_in_pixels: [screen.config.width, screen.config.height],
                pixels_per_point: self.context.pixels_per_point(),
            },
        }
    }

    /// Draw `frame` on top of `view`. The returned command buffers must be
    /// submitted before the encoder.
    pub fn encode(
        &mut self,
        screen: &Screen,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        frame: &GuiFrame,
    ) -> Vec<wgpu::CommandBuffer> {
        for (id, delta) in &frame.textures.set {
            self.renderer
                .update_texture(&screen.device, &screen.queue, *id, delta);
        }
        let commands = self.renderer.update_buffers(
            &screen.device,
            &screen.queue,
            encoder,
            &frame.primitives,
            &frame.screen,
        );

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Gui Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: true,
                    },
                })],
                depth_stencil_attachment: None,
            });
            self.renderer
                .render(&mut render_pass, &frame.primitives, &frame.screen);
        }

        for id in &frame.textures.free {
            self.renderer.free_texture(id);
        }
        commands
    }
}
