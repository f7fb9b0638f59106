//! Browser entry point.

use wasm_bindgen::{closure::Closure, prelude::*, JsCast};
use web_sys::HtmlCanvasElement;
use winit::{
    dpi::LogicalSize, event_loop::EventLoopProxy, platform::web::WindowBuilderExtWebSys,
    window::WindowBuilder,
};

use crate::{
    application::{Application, PageEvent},
    config::ShowcaseConfig,
    error::SetupError,
    showcase::SphereShowcase,
};

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    wasm_bindgen_futures::spawn_local(async {
        match run().await {
            Ok(()) => {}
            Err(SetupError::MissingCanvas(selector)) => {
                tracing::warn!(selector, "no canvas to draw into, nothing will render");
            }
            Err(err) => tracing::error!("{err}"),
        }
    });
}

async fn run() -> Result<(), SetupError> {
    let config = ShowcaseConfig::default();
    let selector = config.assets.canvas_selector;
    let canvas = find_canvas(selector).ok_or(SetupError::MissingCanvas(selector))?;

    let (width, height) = window_inner_size().unwrap_or((
        canvas.client_width() as f64,
        canvas.client_height() as f64,
    ));
    let builder = WindowBuilder::new()
        .with_title(config.assets.window_title)
        .with_canvas(Some(canvas))
        .with_inner_size(LogicalSize::new(width, height));

    Application::<SphereShowcase>::init(builder, attach_page_listeners).await
}

fn find_canvas(selector: &str) -> Option<HtmlCanvasElement> {
    let document = web_sys::window()?.document()?;
    document
        .query_selector(selector)
        .ok()
        .flatten()?
        .dyn_into::<HtmlCanvasElement>()
        .ok()
}

fn window_inner_size() -> Option<(f64, f64)> {
    let window = web_sys::window()?;
    let width = window.inner_width().ok()?.as_f64()?;
    let height = window.inner_height().ok()?.as_f64()?;
    Some((width, height))
}

/// Scroll the document by `delta_y` CSS pixels.
pub fn scroll_page_by(delta_y: f32) {
    if let Some(window) = web_sys::window() {
        window.scroll_by_with_x_and_y(0.0, delta_y as f64);
    }
}

/// Register the page's scroll and resize listeners. They live as long as the
/// page and are never removed.
fn attach_page_listeners(proxy: EventLoopProxy<PageEvent>) {
    let Some(window) = web_sys::window() else {
        return;
    };

    let scroll_proxy = proxy.clone();
    let on_scroll = Closure::<dyn FnMut(web_sys::Event)>::new(move |_event: web_sys::Event| {
        let offset = web_sys::window()
            .and_then(|window| window.scroll_y().ok())
            .unwrap_or(0.0);
        let _ = scroll_proxy.send_event(PageEvent::Scrolled(offset));
    });

    let on_resize = Closure::<dyn FnMut(web_sys::Event)>::new(move |_event: web_sys::Event| {
        if let Some((width, height)) = window_inner_size() {
            let _ = proxy.send_event(PageEvent::Resized { width, height });
        }
    });

    if let Some(document) = window.document() {
        if let Err(err) =
            document.add_event_listener_with_callback("scroll", on_scroll.as_ref().unchecked_ref())
        {
            tracing::warn!("could not listen for scroll events: {err:?}");
        }
    }
    if let Err(err) =
        window.add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())
    {
        tracing::warn!("could not listen for resize events: {err:?}");
    }

    on_scroll.forget();
    on_resize.forget();
}
