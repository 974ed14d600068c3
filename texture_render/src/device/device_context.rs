/// DeviceContext trait - pipeline state and command capability

use std::sync::Arc;
use bitflags::bitflags;
use crate::device::{RenderTargetView, ShaderResourceView, DepthStencilView, Viewport};

bitflags! {
    /// Planes cleared by `DeviceContext::clear_depth_stencil_view`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ClearFlags: u32 {
        const DEPTH = 1 << 0;
        const STENCIL = 1 << 1;
    }
}

/// Render target and depth/stencil views bound to the output stage
#[derive(Clone, Default)]
pub struct BoundTargets {
    pub color: Option<Arc<dyn RenderTargetView>>,
    pub depth_stencil: Option<Arc<dyn DepthStencilView>>,
}

/// Device context interface
///
/// Commands are recorded into the context's command stream; none of them block
/// on the GPU. Queries return the state as last set through this context.
pub trait DeviceContext {
    /// Fill a color target view with a single RGBA value
    fn clear_render_target_view(&mut self, view: &Arc<dyn RenderTargetView>, color: [f32; 4]);

    /// Fill the selected planes of a depth/stencil view
    fn clear_depth_stencil_view(
        &mut self,
        view: &Arc<dyn DepthStencilView>,
        flags: ClearFlags,
        depth: f32,
        stencil: u8,
    );

    /// Bind the active render destination, replacing what was bound
    fn set_render_targets(
        &mut self,
        color: Option<Arc<dyn RenderTargetView>>,
        depth_stencil: Option<Arc<dyn DepthStencilView>>,
    );

    /// Currently bound render destination
    fn render_targets(&self) -> BoundTargets;

    /// Bind the active viewports, replacing what was bound
    fn set_viewports(&mut self, viewports: &[Viewport]);

    /// Currently bound viewports
    fn viewports(&self) -> Vec<Viewport>;

    /// Regenerate every level below the most detailed one from its content
    fn generate_mips(&mut self, view: &Arc<dyn ShaderResourceView>);
}
