use std::sync::mpsc::{self, Receiver, TryRecvError};

use image::RgbaImage;

use crate::error::TextureLoadError;

pub type LoadResult = Result<RgbaImage, TextureLoadError>;

/// Loads the normal map off the frame loop; the result is picked up by polling.
pub struct NormalMapLoader {
    path: String,
    receiver: Receiver<LoadResult>,
    finished: bool,
}

impl NormalMapLoader {
    /// Start loading `path` in the background.
    pub fn spawn(path: &str) -> Self {
        let (sender, receiver) = mpsc::channel();
        let owned = path.to_owned();

        #[cfg(not(target_arch = "wasm32"))]
        {
            let spawned = std::thread::Builder::new()
                .name("normal-map-loader".to_owned())
                .spawn(move || {
                    let _ = sender.send(load_file(&owned));
                });
            if let Err(err) = spawned {
                tracing::warn!("could not start texture loader thread: {err}");
            }
        }

        #[cfg(target_arch = "wasm32")]
        wasm_bindgen_futures::spawn_local(async move {
            let result = match web::fetch_bytes(&owned).await {
                Ok(bytes) => decode(&owned, &bytes),
                Err(err) => Err(err),
            };
            let _ = sender.send(result);
        });

        tracing::debug!(path, "normal map requested");

        Self {
            path: path.to_owned(),
            receiver,
            finished: false,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// The load outcome, delivered exactly once.
    pub fn poll(&mut self) -> Option<LoadResult> {
        if self.finished {
            return None;
        }
        match self.receiver.try_recv() {
            Ok(result) => {
                self.finished = true;
                Some(result)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.finished = true;
                Some(Err(TextureLoadError::Disconnected(self.path.clone())))
            }
        }
    }
}

pub fn decode(path: &str, bytes: &[u8]) -> LoadResult {
    let image = image::load_from_memory(bytes).map_err(|source| TextureLoadError::Decode {
        path: path.to_owned(),
        source,
    })?;
    Ok(image.to_rgba8())
}

#[cfg(not(target_arch = "wasm32"))]
pub fn load_file(path: &str) -> LoadResult {
    let bytes = std::fs::read(path).map_err(|source| TextureLoadError::Io {
        path: path.to_owned(),
        source,
    })?;
    decode(path, &bytes)
}

#[cfg(target_arch = "wasm32")]
mod web {
    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::JsFuture;

    use crate::error::TextureLoadError;

    pub async fn fetch_bytes(path: &str) -> Result<Vec<u8>, TextureLoadError> {
        let fail = |reason: String| TextureLoadError::Fetch {
            path: path.to_owned(),
            reason,
        };

        let window = web_sys::window().ok_or_else(|| fail("window not available".to_owned()))?;
        let response = JsFuture::from(window.fetch_with_str(path))
            .await
            .map_err(|err| fail(format!("{err:?}")))?;
        let response: web_sys::Response = response
            .dyn_into()
            .map_err(|_| fail("fetch did not return a response".to_owned()))?;
        if !response.ok() {
            return Err(fail(format!("HTTP {}", response.status())));
        }

        let buffer = response
            .array_buffer()
            .map_err(|err| fail(format!("{err:?}")))?;
        let buffer = JsFuture::from(buffer)
            .await
            .map_err(|err| fail(format!("{err:?}")))?;
        Ok(js_sys::Uint8Array::new(&buffer).to_vec())
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use std::time::{Duration, Instant};

    use super::*;

    fn wait(loader: &mut NormalMapLoader) -> LoadResult {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            if let Some(result) = loader.poll() {
                return result;
            }
            assert!(Instant::now() < deadline, "loader never finished");
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn decodes_png_to_rgba() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("normal.png");
        let image = RgbaImage::from_pixel(4, 2, image::Rgba([128, 128, 255, 255]));
        image.save(&path).unwrap();

        let mut loader = NormalMapLoader::spawn(path.to_str().unwrap());
        let loaded = wait(&mut loader).unwrap();

        assert_eq!(loaded.dimensions(), (4, 2));
        assert_eq!(loaded.get_pixel(3, 1).0, [128, 128, 255, 255]);
        assert!(loader.poll().is_none());
    }

    #[test]
    fn missing_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.png");

        let mut loader = NormalMapLoader::spawn(path.to_str().unwrap());
        match wait(&mut loader) {
            Err(TextureLoadError::Io { path: reported, .. }) => {
                assert!(reported.ends_with("missing.png"))
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        let result = decode("broken.png", b"definitely not a png");
        assert!(matches!(result, Err(TextureLoadError::Decode { .. })));
    }
}
