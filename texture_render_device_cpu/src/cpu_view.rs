/// Views - CPU implementations of the view traits
///
/// Each view keeps its texture alive and shares the texture's texel storage,
/// so the context can read and write texels without downcasting the texture.

use std::any::Any;
use std::sync::{Arc, Mutex};
use texture_render::rtt::device::{
    Texture, RenderTargetView, ShaderResourceView, DepthStencilView,
    RenderTargetViewDesc, ShaderResourceViewDesc, DepthStencilViewDesc,
};
use crate::cpu_texture::TexelStore;

/// CPU render target view
pub struct CpuRenderTargetView {
    texture: Arc<dyn Texture>,
    pub(crate) store: Arc<TexelStore>,
    desc: RenderTargetViewDesc,
    name: Mutex<Option<String>>,
}

impl CpuRenderTargetView {
    pub(crate) fn new(texture: Arc<dyn Texture>, store: Arc<TexelStore>, desc: RenderTargetViewDesc) -> Self {
        Self { texture, store, desc, name: Mutex::new(None) }
    }
}

impl RenderTargetView for CpuRenderTargetView {
    fn texture(&self) -> &Arc<dyn Texture> {
        &self.texture
    }

    fn desc(&self) -> &RenderTargetViewDesc {
        &self.desc
    }

    fn set_debug_name(&self, name: &str) {
        *self.name.lock().unwrap() = Some(name.to_string());
    }

    fn debug_name(&self) -> Option<String> {
        self.name.lock().unwrap().clone()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// CPU shader resource view
pub struct CpuShaderResourceView {
    texture: Arc<dyn Texture>,
    pub(crate) store: Arc<TexelStore>,
    desc: ShaderResourceViewDesc,
    name: Mutex<Option<String>>,
}

impl CpuShaderResourceView {
    pub(crate) fn new(texture: Arc<dyn Texture>, store: Arc<TexelStore>, desc: ShaderResourceViewDesc) -> Self {
        Self { texture, store, desc, name: Mutex::new(None) }
    }
}

impl ShaderResourceView for CpuShaderResourceView {
    fn texture(&self) -> &Arc<dyn Texture> {
        &self.texture
    }

    fn desc(&self) -> &ShaderResourceViewDesc {
        &self.desc
    }

    fn set_debug_name(&self, name: &str) {
        *self.name.lock().unwrap() = Some(name.to_string());
    }

    fn debug_name(&self) -> Option<String> {
        self.name.lock().unwrap().clone()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// CPU depth/stencil view
pub struct CpuDepthStencilView {
    texture: Arc<dyn Texture>,
    pub(crate) store: Arc<TexelStore>,
    desc: DepthStencilViewDesc,
    name: Mutex<Option<String>>,
}

impl CpuDepthStencilView {
    pub(crate) fn new(texture: Arc<dyn Texture>, store: Arc<TexelStore>, desc: DepthStencilViewDesc) -> Self {
        Self { texture, store, desc, name: Mutex::new(None) }
    }
}

impl DepthStencilView for CpuDepthStencilView {
    fn texture(&self) -> &Arc<dyn Texture> {
        &self.texture
    }

    fn desc(&self) -> &DepthStencilViewDesc {
        &self.desc
    }

    fn set_debug_name(&self, name: &str) {
        *self.name.lock().unwrap() = Some(name.to_string());
    }

    fn debug_name(&self) -> Option<String> {
        self.name.lock().unwrap().clone()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
