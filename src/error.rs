use thiserror::Error;

/// Failures while opening the window and acquiring the GPU.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),
    #[error("failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),
    #[error("no compatible graphics adapter found")]
    NoAdapter,
    #[error("failed to acquire graphics device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
    #[error("surface is not supported by the adapter")]
    UnsupportedSurface,
    #[error("no element matches `{0}` in the page")]
    MissingCanvas(&'static str),
}

/// Failures while loading the sphere's normal map.
#[derive(Debug, Error)]
pub enum TextureLoadError {
    #[error("failed to read `{path}`: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to fetch `{path}`: {reason}")]
    Fetch { path: String, reason: String },
    #[error("failed to decode `{path}`: {source}")]
    Decode {
        path: String,
        #[source]
        source: image::ImageError,
    },
    #[error("texture loader went away before delivering `{0}`")]
    Disconnected(String),
}
