use std::process::Termination;

use wgpu::SurfaceError;
use winit::{
    dpi::{LogicalSize, PhysicalSize},
    event::*,
    event_loop::{ControlFlow, EventLoopBuilder, EventLoopProxy, EventLoopWindowTarget},
    window::{Window, WindowBuilder},
};

use crate::error::SetupError;

/// Events raised by the hosting page rather than by winit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PageEvent {
    /// The document scrolled to this vertical offset, in CSS pixels.
    Scrolled(f64),
    /// The browser window now has this inner size, in CSS pixels.
    Resized { width: f64, height: f64 },
}

/// Monotonic clock started when the application starts. Never reset.
#[derive(Debug)]
struct Clock {
    #[cfg(not(target_arch = "wasm32"))]
    start: std::time::Instant,
    #[cfg(target_arch = "wasm32")]
    start_ms: f64,
}

impl Clock {
    fn start() -> Self {
        Self {
            #[cfg(not(target_arch = "wasm32"))]
            start: std::time::Instant::now(),
            #[cfg(target_arch = "wasm32")]
            start_ms: Self::now_ms(),
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn elapsed_secs(&self) -> f32 {
        self.start.elapsed().as_secs_f32()
    }

    #[cfg(target_arch = "wasm32")]
    fn elapsed_secs(&self) -> f32 {
        ((Self::now_ms() - self.start_ms) / 1000.0) as f32
    }

    #[cfg(target_arch = "wasm32")]
    fn now_ms() -> f64 {
        web_sys::window()
            .and_then(|window| window.performance())
            .map(|performance| performance.now())
            .unwrap_or(0.0)
    }
}

#[derive(Debug)]
pub struct AppState {
    clock: Clock,
    elapsed_time: f32,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            clock: Clock::start(),
            elapsed_time: 0.0,
        }
    }

    /// Sample the clock for the frame about to be drawn.
    pub fn update(&mut self) {
        self.elapsed_time = self.clock.elapsed_secs();
    }

    /// Seconds since startup, as sampled for the current frame.
    pub fn elapsed_time(&self) -> f32 {
        self.elapsed_time
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

pub struct Application<L: Layer + 'static> {
    layer: Option<L>,
    screen: Screen,
    state: AppState,
}

impl<L: Layer + 'static> Application<L> {
    pub fn new(screen: Screen) -> Self {
        Self {
            screen,
            layer: None,
            state: AppState::new(),
        }
    }

    fn run(
        &mut self,
        event: Event<PageEvent>,
        event_loop: &EventLoopWindowTarget<PageEvent>,
        control_flow: &mut ControlFlow,
    ) {
        // Continuous animation; vsync presentation paces the frames.
        control_flow.set_poll();

        if let Some(layer) = self.layer.as_mut() {
            layer.process_event(&event, &mut self.screen);
        }

        match event {
            Event::NewEvents(StartCause::Init) => {
                self.layer = Some(L::start(&mut self.screen, &self.state, event_loop));
            }
            Event::UserEvent(PageEvent::Resized { width, height }) => {
                // Flows back through `WindowEvent::Resized`.
                self.screen
                    .window()
                    .set_inner_size(LogicalSize::new(width, height));
            }
            Event::WindowEvent {
                window_id,
                ref event,
            } if self.screen.window().id() == window_id => match event {
                WindowEvent::CloseRequested => {
                    control_flow.set_exit_with_code(0);
                    if let Some(layer) = self.layer.as_mut() {
                        if let Err(err) = layer.shutdown(&self.state, &mut self.screen) {
                            tracing::error!("shutdown failed: {:?}", err);
                            control_flow.set_exit_with_code(1);
                        }
                    }
                }
                WindowEvent::Resized(physical_size) => {
                    self.resize(*physical_size);
                }
                WindowEvent::ScaleFactorChanged { new_inner_size, .. } => {
                    self.resize(**new_inner_size);
                }
                _ => {}
            },
            Event::MainEventsCleared => {
                self.screen.window().request_redraw();
            }
            Event::RedrawRequested(window_id) if self.screen.window().id() == window_id => {
                let Some(layer) = self.layer.as_mut() else {
                    return;
                };
                self.state.update();
                layer.update(&self.state, &mut self.screen);

                match layer.render(&self.state, &mut self.screen) {
                    Ok(_) => {}
                    Err(SurfaceError::Lost) => self.screen.resize_to_current(),
                    Err(SurfaceError::OutOfMemory) => control_flow.set_exit_with_code(137),
                    Err(e) => tracing::error!("{:?}", e),
                }
            }
            _ => {}
        }
    }

    fn resize(&mut self, physical_size: PhysicalSize<u32>) {
        self.screen.resize(physical_size);
        if let Some(layer) = self.layer.as_mut() {
            layer.resize(physical_size, &self.state, &mut self.screen);
        }
    }

    /// Open the window, acquire the GPU and run the event loop. `attach`
    /// receives a proxy for forwarding page events before the loop starts.
    pub async fn init(
        window: WindowBuilder,
        attach: impl FnOnce(EventLoopProxy<PageEvent>),
    ) -> Result<(), SetupError> {
        let event_loop = EventLoopBuilder::<PageEvent>::with_user_event().build();
        attach(event_loop.create_proxy());

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor::default());
        let screen = Screen::new(&event_loop, &instance, window).await?;
        tracing::info!(
            width = screen.config.width,
            height = screen.config.height,
            scale_factor = screen.window().scale_factor(),
            "screen ready"
        );

        let mut application = Self::new(screen);
        event_loop.run(move |event, event_loop, control_flow| {
            application.run(event, event_loop, control_flow);
        })
    }
}

pub struct Screen {
    pub surface: wgpu::Surface,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    window: Window,
}

impl Screen {
    pub async fn new(
        event_loop: &EventLoopWindowTarget<PageEvent>,
        instance: &wgpu::Instance,
        builder: WindowBuilder,
    ) -> Result<Self, SetupError> {
        let window = builder.build(event_loop)?;

        // SAFETY:
        // The surface needs to live as long as the window that created it.
        // Screen owns the window so this should be safe.
        let surface = unsafe { instance.create_surface(&window) }?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(SetupError::NoAdapter)?;

        #[cfg(target_arch = "wasm32")]
        let limits = wgpu::Limits::downlevel_webgl2_defaults().using_resolution(adapter.limits());
        #[cfg(not(target_arch = "wasm32"))]
        let limits = wgpu::Limits::default();

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    features: wgpu::Features::empty(),
                    limits,
                    label: None,
                },
                None,
            )
            .await?;
        let size = window.inner_size();
        let mut config = surface
            .get_default_config(&adapter, size.width.max(1), size.height.max(1))
            .ok_or(SetupError::UnsupportedSurface)?;
        let capabilities = surface.get_capabilities(&adapter);
        present_to_display(&mut config, &capabilities.alpha_modes);
        surface.configure(&device, &config);

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
        })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    /// Resize the screen to new window size.
    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Resize the screen to current window inner size.
    pub fn resize_to_current(&mut self) {
        self.resize(self.window.inner_size());
    }
}

/// Lock presentation to the display refresh and keep the cleared background
/// transparent when the compositor allows it.
///
/// The frame loop polls, so without vsync it would run as fast as the GPU can.
pub fn present_to_display(
    config: &mut wgpu::SurfaceConfiguration,
    alpha_modes: &[wgpu::CompositeAlphaMode],
) {
    config.present_mode = wgpu::PresentMode::AutoVsync;
    config.alpha_mode = [
        wgpu::CompositeAlphaMode::PreMultiplied,
        wgpu::CompositeAlphaMode::PostMultiplied,
    ]
    .into_iter()
    .find(|mode| alpha_modes.contains(mode))
    .unwrap_or(wgpu::CompositeAlphaMode::Auto);
}

pub trait Layer: Sized {
    type LayerErr: Termination + std::fmt::Debug + 'static;

    fn start(
        screen: &mut Screen,
        app: &AppState,
        event_loop: &EventLoopWindowTarget<PageEvent>,
    ) -> Self;
    fn process_event(&mut self, event: &Event<PageEvent>, screen: &mut Screen);
    fn resize(&mut self, new_size: PhysicalSize<u32>, app: &AppState, screen: &mut Screen);
    fn update(&mut self, app: &AppState, screen: &mut Screen);
    fn render(&mut self, app: &AppState, screen: &mut Screen) -> Result<(), SurfaceError>;
    fn shutdown(&mut self, app: &AppState, screen: &mut Screen) -> Result<(), Self::LayerErr>;
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;

    #[test]
    fn clock_is_monotonic() {
        let mut state = AppState::new();
        state.update();
        let first = state.elapsed_time();
        std::thread::sleep(std::time::Duration::from_millis(2));
        state.update();

        assert!(state.elapsed_time() > first);
    }

    fn surface_config() -> wgpu::SurfaceConfiguration {
        wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: wgpu::TextureFormat::Bgra8UnormSrgb,
            width: 640,
            height: 480,
            present_mode: wgpu::PresentMode::Mailbox,
            alpha_mode: wgpu::CompositeAlphaMode::Auto,
            view_formats: vec![],
        }
    }

    #[test]
    fn presentation_waits_for_vsync() {
        // Adapters may list Mailbox or Immediate first.
        for first in [wgpu::PresentMode::Mailbox, wgpu::PresentMode::Immediate] {
            let mut config = surface_config();
            config.present_mode = first;
            present_to_display(&mut config, &[wgpu::CompositeAlphaMode::Opaque]);
            assert_eq!(config.present_mode, wgpu::PresentMode::AutoVsync);
        }
    }

    #[test]
    fn transparent_alpha_mode_is_preferred() {
        let mut config = surface_config();
        present_to_display(
            &mut config,
            &[
                wgpu::CompositeAlphaMode::Opaque,
                wgpu::CompositeAlphaMode::PostMultiplied,
                wgpu::CompositeAlphaMode::PreMultiplied,
            ],
        );
        assert_eq!(config.alpha_mode, wgpu::CompositeAlphaMode::PreMultiplied);

        let mut config = surface_config();
        present_to_display(
            &mut config,
            &[wgpu::CompositeAlphaMode::Opaque, wgpu::CompositeAlphaMode::PostMultiplied],
        );
        assert_eq!(config.alpha_mode, wgpu::CompositeAlphaMode::PostMultiplied);

        let mut config = surface_config();
        present_to_display(&mut config, &[wgpu::CompositeAlphaMode::Opaque]);
        assert_eq!(config.alpha_mode, wgpu::CompositeAlphaMode::Auto);
    }
}
