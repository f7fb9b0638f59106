#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use sphere_showcase_lib::{
        application::Application, config::ShowcaseConfig, showcase::SphereShowcase,
    };
    use winit::window::WindowBuilder;

    tracing_subscriber::fmt::init();

    let config = ShowcaseConfig::default();
    let window = WindowBuilder::new()
        .with_title(config.assets.window_title)
        .with_transparent(true);

    if let Err(err) = pollster::block_on(Application::<SphereShowcase>::init(window, |_| {})) {
        tracing::error!("{err}");
        std::process::exit(1);
    }
}

// The browser build starts from `sphere_showcase_lib::wasm::start`.
#[cfg(target_arch = "wasm32")]
fn main() {}
