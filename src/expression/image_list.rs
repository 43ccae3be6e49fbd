//! Image-list palettes: decoded images sampled per category on the GPU.

use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use anyhow::Context;

use crate::foundation::error::{VizError, VizResult};
use crate::foundation::ids::TextureHandle;

/// Straight-alpha RGBA8 pixels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub rgba8: Vec<u8>,
}

/// Source of image bytes for `imageList(...)` palettes.
pub trait ImageLoader: Sync {
    fn load(&self, url: &str) -> VizResult<DecodedImage>;
}

/// Loads images from the filesystem, resolving relative urls against `root`.
#[derive(Clone, Debug, Default)]
pub struct FileImageLoader {
    pub root: PathBuf,
}

impl FileImageLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, url: &str) -> PathBuf {
        let path = Path::new(url);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}

impl ImageLoader for FileImageLoader {
    fn load(&self, url: &str) -> VizResult<DecodedImage> {
        let path = self.resolve(url);
        let bytes = std::fs::read(&path)
            .with_context(|| format!("read image '{}'", path.display()))?;
        decode_image(&bytes).map_err(|e| VizError::image(format!("{url}: {e}")))
    }
}

pub fn decode_image(bytes: &[u8]) -> VizResult<DecodedImage> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(DecodedImage {
        width,
        height,
        rgba8: rgba.into_raw(),
    })
}

#[derive(Debug)]
pub(crate) struct ImageListNode {
    pub(crate) urls: Vec<String>,
    pub(crate) images: Vec<Option<Arc<DecodedImage>>>,
    pub(crate) textures: RwLock<Vec<Option<TextureHandle>>>,
}

impl ImageListNode {
    pub(crate) fn new(urls: Vec<String>) -> VizResult<Self> {
        if urls.is_empty() {
            return Err(VizError::validation(
                "imageList: expected at least one image",
            ));
        }
        let n = urls.len();
        Ok(Self {
            urls,
            images: vec![None; n],
            textures: RwLock::new(vec![None; n]),
        })
    }

    pub(crate) fn is_loaded(&self) -> bool {
        self.images.iter().all(Option::is_some)
    }
}

pub(crate) fn sampler_name(node: impl std::fmt::Display, index: usize) -> String {
    format!("imageTex{node}_{index}")
}

#[cfg(test)]
#[path = "../../tests/unit/expression/image_list.rs"]
mod tests;
