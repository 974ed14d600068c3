/// Mock device and context for unit tests (no backend required)
///
/// The mock device records every resource it creates and can be told to fail
/// a chosen creation call. The mock context keeps bound state like a real
/// context and records each issued command as a string.

use std::any::Any;
use std::sync::{Arc, Mutex};

use crate::device::{
    GraphicsDevice, DeviceContext, BoundTargets, ClearFlags,
    Texture, TextureDesc, TextureInfo,
    RenderTargetView, ShaderResourceView, DepthStencilView,
    RenderTargetViewDesc, ShaderResourceViewDesc, DepthStencilViewDesc,
    Viewport,
};
use crate::error::{Error, Result};

// ============================================================================
// Mock Texture
// ============================================================================

#[derive(Debug)]
pub struct MockTexture {
    pub info: TextureInfo,
}

impl MockTexture {
    pub fn new(desc: &TextureDesc) -> Self {
        Self {
            info: TextureInfo {
                width: desc.width,
                height: desc.height,
                format: desc.format,
                usage: desc.usage,
                mip_levels: desc.mipmap.mip_levels(desc.width, desc.height),
                samples: desc.samples,
                generates_mips: desc.mipmap.is_generated(),
            },
        }
    }
}

impl Texture for MockTexture {
    fn info(&self) -> &TextureInfo {
        &self.info
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

// ============================================================================
// Mock Views
// ============================================================================

pub struct MockRenderTargetView {
    pub texture: Arc<dyn Texture>,
    pub desc: RenderTargetViewDesc,
    pub name: Mutex<Option<String>>,
}

impl RenderTargetView for MockRenderTargetView {
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

pub struct MockShaderResourceView {
    pub texture: Arc<dyn Texture>,
    pub desc: ShaderResourceViewDesc,
    pub name: Mutex<Option<String>>,
}

impl ShaderResourceView for MockShaderResourceView {
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

pub struct MockDepthStencilView {
    pub texture: Arc<dyn Texture>,
    pub desc: DepthStencilViewDesc,
    pub name: Mutex<Option<String>>,
}

impl DepthStencilView for MockDepthStencilView {
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

// ============================================================================
// Mock Device
// ============================================================================

/// Creation calls of the mock device, in the order OffscreenRenderTarget issues them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockCall {
    ColorTexture,
    RenderTargetView,
    ShaderResourceView,
    DepthStencilTexture,
    DepthStencilView,
}

/// Mock device that tracks created resources without a backend
#[derive(Debug, Default)]
pub struct MockDevice {
    /// Names of every created resource, in creation order
    pub created: Mutex<Vec<String>>,
    /// Creation call that returns an error instead of a resource
    pub fail_on: Option<MockCall>,
}

impl MockDevice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(call: MockCall) -> Self {
        Self {
            created: Mutex::new(Vec::new()),
            fail_on: Some(call),
        }
    }

    pub fn get_created(&self) -> Vec<String> {
        self.created.lock().unwrap().clone()
    }

    fn check(&self, call: MockCall) -> Result<()> {
        if self.fail_on == Some(call) {
            return Err(Error::AllocationFailed(format!("mock failure on {:?}", call)));
        }
        Ok(())
    }
}

impl GraphicsDevice for MockDevice {
    fn create_texture(&self, desc: &TextureDesc) -> Result<Arc<dyn Texture>> {
        let call = if desc.format.is_depth() {
            MockCall::DepthStencilTexture
        } else {
            MockCall::ColorTexture
        };
        self.check(call)?;
        self.created.lock().unwrap()
            .push(format!("texture_{}x{}_{:?}", desc.width, desc.height, desc.format));
        Ok(Arc::new(MockTexture::new(desc)))
    }

    fn create_render_target_view(
        &self,
        texture: &Arc<dyn Texture>,
        desc: &RenderTargetViewDesc,
    ) -> Result<Arc<dyn RenderTargetView>> {
        self.check(MockCall::RenderTargetView)?;
        self.created.lock().unwrap().push(format!("rtv_mip{}", desc.mip_slice));
        Ok(Arc::new(MockRenderTargetView {
            texture: Arc::clone(texture),
            desc: *desc,
            name: Mutex::new(None),
        }))
    }

    fn create_shader_resource_view(
        &self,
        texture: &Arc<dyn Texture>,
        desc: &ShaderResourceViewDesc,
    ) -> Result<Arc<dyn ShaderResourceView>> {
        self.check(MockCall::ShaderResourceView)?;
        self.created.lock().unwrap().push(format!("srv_{:?}", desc.mip_levels));
        Ok(Arc::new(MockShaderResourceView {
            texture: Arc::clone(texture),
            desc: *desc,
            name: Mutex::new(None),
        }))
    }

    fn create_depth_stencil_view(
        &self,
        texture: &Arc<dyn Texture>,
        desc: &DepthStencilViewDesc,
    ) -> Result<Arc<dyn DepthStencilView>> {
        self.check(MockCall::DepthStencilView)?;
        self.created.lock().unwrap().push(format!("dsv_mip{}", desc.mip_slice));
        Ok(Arc::new(MockDepthStencilView {
            texture: Arc::clone(texture),
            desc: *desc,
            name: Mutex::new(None),
        }))
    }
}

// ============================================================================
// Mock Context
// ============================================================================

/// Mock context keeping bound state and recording issued commands
#[derive(Default)]
pub struct MockContext {
    pub commands: Vec<String>,
    pub bound: BoundTargets,
    pub bound_viewports: Vec<Viewport>,
    pub last_clear_color: Option<[f32; 4]>,
    pub last_clear_depth_stencil: Option<(ClearFlags, f32, u8)>,
}

impl MockContext {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DeviceContext for MockContext {
    fn clear_render_target_view(&mut self, _view: &Arc<dyn RenderTargetView>, color: [f32; 4]) {
        self.commands.push("clear_render_target_view".to_string());
        self.last_clear_color = Some(color);
    }

    fn clear_depth_stencil_view(
        &mut self,
        _view: &Arc<dyn DepthStencilView>,
        flags: ClearFlags,
        depth: f32,
        stencil: u8,
    ) {
        self.commands.push("clear_depth_stencil_view".to_string());
        self.last_clear_depth_stencil = Some((flags, depth, stencil));
    }

    fn set_render_targets(
        &mut self,
        color: Option<Arc<dyn RenderTargetView>>,
        depth_stencil: Option<Arc<dyn DepthStencilView>>,
    ) {
        self.commands.push("set_render_targets".to_string());
        self.bound = BoundTargets { color, depth_stencil };
    }

    fn render_targets(&self) -> BoundTargets {
        self.bound.clone()
    }

    fn set_viewports(&mut self, viewports: &[Viewport]) {
        self.commands.push("set_viewports".to_string());
        self.bound_viewports = viewports.to_vec();
    }

    fn viewports(&self) -> Vec<Viewport> {
        self.bound_viewports.clone()
    }

    fn generate_mips(&mut self, _view: &Arc<dyn ShaderResourceView>) {
        self.commands.push("generate_mips".to_string());
    }
}

#[cfg(test)]
#[path = "mock_device_tests.rs"]
mod tests;
