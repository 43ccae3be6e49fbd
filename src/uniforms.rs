//! Host side of the GPU binding contract.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::expression::image_list::DecodedImage;
use crate::expression::interp::LookupTable;
use crate::foundation::ids::TextureHandle;

/// Receives per-draw uniforms and textures from [`ExprArena::pre_draw`](crate::ExprArena::pre_draw).
///
/// Names are derived from node ids (`rampMax<id>`, `rampTexture<id>`,
/// `classifier<id>_bp<k>`, `now<id>`, `imageTex<id>_<k>`), so one sink can
/// serve every node of a tree.
pub trait UniformSink {
    fn set_float(&mut self, name: &str, value: f32);
    fn upload_lookup_table(&mut self, name: &str, table: &LookupTable) -> TextureHandle;
    /// Rebind a texture uploaded earlier.
    fn bind_texture(&mut self, name: &str, handle: TextureHandle);
    fn upload_image(&mut self, name: &str, image: &DecodedImage) -> TextureHandle;
}

/// Recording sink, useful for tests and for inspecting what a draw would upload.
#[derive(Debug, Default)]
pub struct InMemoryUniforms {
    pub floats: BTreeMap<String, f32>,
    pub tables: BTreeMap<String, Arc<LookupTable>>,
    pub bound: BTreeMap<String, TextureHandle>,
    pub uploads: usize,
    pub binds: usize,
    next_handle: u64,
}

impl InMemoryUniforms {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn float(&self, name: &str) -> Option<f32> {
        self.floats.get(name).copied()
    }

    fn next(&mut self) -> TextureHandle {
        self.next_handle += 1;
        TextureHandle(self.next_handle)
    }
}

impl UniformSink for InMemoryUniforms {
    fn set_float(&mut self, name: &str, value: f32) {
        self.floats.insert(name.to_owned(), value);
    }

    fn upload_lookup_table(&mut self, name: &str, table: &LookupTable) -> TextureHandle {
        let handle = self.next();
        self.uploads += 1;
        self.tables.insert(name.to_owned(), Arc::new(table.clone()));
        self.bound.insert(name.to_owned(), handle);
        handle
    }

    fn bind_texture(&mut self, name: &str, handle: TextureHandle) {
        self.binds += 1;
        self.bound.insert(name.to_owned(), handle);
    }

    fn upload_image(&mut self, name: &str, _image: &DecodedImage) -> TextureHandle {
        let handle = self.next();
        self.uploads += 1;
        self.bound.insert(name.to_owned(), handle);
        handle
    }
}
