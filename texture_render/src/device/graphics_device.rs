/// GraphicsDevice trait - resource creation capability

use std::sync::Arc;
use crate::error::Result;
use crate::device::{
    Texture, TextureDesc,
    RenderTargetView, ShaderResourceView, DepthStencilView,
    RenderTargetViewDesc, ShaderResourceViewDesc, DepthStencilViewDesc,
};

/// Resource creation interface
///
/// Implemented by backend-specific devices. Creation calls are independent of
/// any device context and may fail; failures are reported, never retried.
pub trait GraphicsDevice: Send + Sync {
    /// Create a 2D texture
    ///
    /// # Arguments
    ///
    /// * `desc` - Dimensions, format, usage flags and mip policy
    fn create_texture(&self, desc: &TextureDesc) -> Result<Arc<dyn Texture>>;

    /// Create a color render target view over one mip level of `texture`
    fn create_render_target_view(
        &self,
        texture: &Arc<dyn Texture>,
        desc: &RenderTargetViewDesc,
    ) -> Result<Arc<dyn RenderTargetView>>;

    /// Create a shader resource view over a mip range of `texture`
    fn create_shader_resource_view(
        &self,
        texture: &Arc<dyn Texture>,
        desc: &ShaderResourceViewDesc,
    ) -> Result<Arc<dyn ShaderResourceView>>;

    /// Create a depth/stencil view over one mip level of `texture`
    fn create_depth_stencil_view(
        &self,
        texture: &Arc<dyn Texture>,
        desc: &DepthStencilViewDesc,
    ) -> Result<Arc<dyn DepthStencilView>>;
}
