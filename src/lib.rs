pub mod animation;
pub mod application;
pub mod camera;
pub mod color;
pub mod config;
pub mod error;
pub mod geometry;
pub mod gui;
pub mod input;
pub mod loader;
pub mod panel;
pub mod renderer;
pub mod scene;
pub mod showcase;
pub mod texture;
pub mod util;
pub mod viewport;

#[cfg(target_arch = "wasm32")]
pub mod wasm;
