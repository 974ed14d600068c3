/// Offscreen render target: renders a sub-pass into a texture.
///
/// Owns a color texture (optionally with a full mip chain) and a private
/// depth/stencil surface of the same size. `begin()` saves whatever the host
/// context had bound, clears the offscreen surfaces and redirects rendering into
/// them; `end()` restores the saved state and regenerates the mip chain.
/// The result is sampled through `output_texture()`.

use std::sync::Arc;
use glam::UVec2;
use crate::error::{Error, Result};
use crate::device::{
    GraphicsDevice, DeviceContext, BoundTargets, ClearFlags,
    Texture, TextureDesc, TextureFormat, TextureUsage, MipmapMode,
    RenderTargetView, ShaderResourceView, DepthStencilView,
    RenderTargetViewDesc, ShaderResourceViewDesc, DepthStencilViewDesc,
    MipRange, Viewport,
};
use crate::{rtt_debug, rtt_error, rtt_trace, rtt_warn};
use super::offscreen_pass::OffscreenPass;

const SOURCE: &str = "rtt::OffscreenRenderTarget";

/// Pixel format of the color texture
pub const COLOR_FORMAT: TextureFormat = TextureFormat::R8G8B8A8_UNORM;
/// Pixel format of the depth/stencil surface
pub const DEPTH_STENCIL_FORMAT: TextureFormat = TextureFormat::D24_UNORM_S8_UINT;
/// Color written by `begin()` (opaque black)
pub const CLEAR_COLOR: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
/// Depth written by `begin()`
pub const CLEAR_DEPTH: f32 = 1.0;
/// Stencil written by `begin()`
pub const CLEAR_STENCIL: u8 = 0;

/// Construction parameters for an offscreen render target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OffscreenTargetDesc {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Allocate a full mip chain and regenerate it after every pass
    pub generate_mips: bool,
    /// Debug name applied to the internal views after construction
    pub label: Option<String>,
}

impl OffscreenTargetDesc {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            generate_mips: false,
            label: None,
        }
    }

    pub fn with_mips(mut self, generate_mips: bool) -> Self {
        self.generate_mips = generate_mips;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// Host pipeline state captured by `begin()`
struct SavedState {
    targets: BoundTargets,
    viewports: Vec<Viewport>,
}

pub struct OffscreenRenderTarget {
    /// Mip policy chosen at construction
    generate_mips: bool,
    /// Write view over mip 0 of the color texture
    color_target_view: Arc<dyn RenderTargetView>,
    /// Read view over every mip level of the color texture
    color_sample_view: Arc<dyn ShaderResourceView>,
    /// Write view over the private depth/stencil surface
    depth_stencil_view: Arc<dyn DepthStencilView>,
    /// Viewport covering the whole texture
    output_viewport: Viewport,
    /// Host state to restore in `end()` (Some only while rendering)
    saved: Option<SavedState>,
}

impl OffscreenRenderTarget {
    /// Helper to log a construction failure before propagating it unchanged
    fn log_and_return_error(step: &str, error: Error) -> Error {
        rtt_error!(SOURCE, "Failed to create {}: {}", step, error);
        error
    }

    /// Allocate the color texture, the depth/stencil surface and their views
    ///
    /// Dimension limits are enforced by the device. The first failing step
    /// aborts construction and its error is returned as is; resources created
    /// by earlier steps are released.
    pub fn new<D: GraphicsDevice + ?Sized>(
        device: &D,
        width: u32,
        height: u32,
        generate_mips: bool,
    ) -> Result<Self> {
        // Color texture
        let mipmap = if generate_mips {
            MipmapMode::Generate { max_levels: None }
        } else {
            MipmapMode::None
        };
        let color_texture = device
            .create_texture(&TextureDesc {
                width,
                height,
                format: COLOR_FORMAT,
                usage: TextureUsage::RENDER_TARGET | TextureUsage::SAMPLED,
                mipmap,
                samples: 1,
            })
            .map_err(|e| Self::log_and_return_error("color texture", e))?;

        // Only mip 0 is ever written, the rest of the chain is regenerated
        let color_target_view = device
            .create_render_target_view(&color_texture, &RenderTargetViewDesc {
                format: Some(COLOR_FORMAT),
                mip_slice: 0,
            })
            .map_err(|e| Self::log_and_return_error("color target view", e))?;

        let color_sample_view = device
            .create_shader_resource_view(&color_texture, &ShaderResourceViewDesc {
                format: Some(COLOR_FORMAT),
                most_detailed_mip: 0,
                mip_levels: MipRange::All,
            })
            .map_err(|e| Self::log_and_return_error("color sample view", e))?;

        let depth_stencil_texture = device
            .create_texture(&TextureDesc {
                width,
                height,
                format: DEPTH_STENCIL_FORMAT,
                usage: TextureUsage::DEPTH_STENCIL,
                mipmap: MipmapMode::None,
                samples: 1,
            })
            .map_err(|e| Self::log_and_return_error("depth/stencil texture", e))?;

        let depth_stencil_view = device
            .create_depth_stencil_view(&depth_stencil_texture, &DepthStencilViewDesc {
                format: Some(DEPTH_STENCIL_FORMAT),
                mip_slice: 0,
            })
            .map_err(|e| Self::log_and_return_error("depth/stencil view", e))?;

        rtt_debug!(SOURCE, "Created {}x{} offscreen target ({} mip levels)",
            width, height, color_texture.info().mip_levels);

        Ok(Self {
            generate_mips,
            color_target_view,
            color_sample_view,
            depth_stencil_view,
            output_viewport: Viewport::from_size(width, height),
            saved: None,
        })
    }

    /// Create a target from a descriptor, applying its debug label if any
    pub fn from_desc<D: GraphicsDevice + ?Sized>(device: &D, desc: &OffscreenTargetDesc) -> Result<Self> {
        let target = Self::new(device, desc.width, desc.height, desc.generate_mips)?;
        if let Some(label) = &desc.label {
            target.set_debug_object_name(label);
        }
        Ok(target)
    }

    /// Redirect rendering of `context` into this target
    ///
    /// Saves the bound render target, depth/stencil view and viewports, clears
    /// the color surface to opaque black and depth/stencil to 1.0/0, then binds
    /// both surfaces and the full-texture viewport. Must be paired with `end()`.
    pub fn begin<C: DeviceContext + ?Sized>(&mut self, context: &mut C) {
        if self.saved.is_some() {
            rtt_warn!(SOURCE, "begin() called while already rendering, keeping the state saved by the first begin()");
        } else {
            self.saved = Some(SavedState {
                targets: context.render_targets(),
                viewports: context.viewports(),
            });
        }

        context.clear_render_target_view(&self.color_target_view, CLEAR_COLOR);
        context.clear_depth_stencil_view(
            &self.depth_stencil_view,
            ClearFlags::DEPTH | ClearFlags::STENCIL,
            CLEAR_DEPTH,
            CLEAR_STENCIL,
        );

        context.set_render_targets(
            Some(Arc::clone(&self.color_target_view)),
            Some(Arc::clone(&self.depth_stencil_view)),
        );
        context.set_viewports(std::slice::from_ref(&self.output_viewport));

        rtt_trace!(SOURCE, "Rendering into {}x{} offscreen target",
            self.width(), self.height());
    }

    /// Like `begin()`, but returns a guard that calls `end()` when dropped
    ///
    /// The guard dereferences to the context so draws can be issued through it.
    pub fn begin_scoped<'a, C: DeviceContext + ?Sized>(
        &'a mut self,
        context: &'a mut C,
    ) -> OffscreenPass<'a, C> {
        self.begin(&mut *context);
        OffscreenPass::new(self, context)
    }

    /// Restore the state saved by `begin()` and regenerate the mip chain
    pub fn end<C: DeviceContext + ?Sized>(&mut self, context: &mut C) {
        let saved = self.saved.take();
        match &saved {
            Some(state) => {
                context.set_viewports(&state.viewports);
                context.set_render_targets(
                    state.targets.color.clone(),
                    state.targets.depth_stencil.clone(),
                );
            }
            None => {
                rtt_warn!(SOURCE, "end() called without a matching begin(), bound state left untouched");
            }
        }

        if self.generate_mips {
            context.generate_mips(&self.color_sample_view);
        }

        // Release our hold on the host's views
        drop(saved);

        rtt_trace!(SOURCE, "Restored host render state");
    }

    /// Shader-readable view over the rendered image (all mip levels)
    pub fn output_texture(&self) -> &Arc<dyn ShaderResourceView> {
        &self.color_sample_view
    }

    /// Backing color texture
    pub fn color_texture(&self) -> &Arc<dyn Texture> {
        self.color_sample_view.texture()
    }

    /// Tag the three internal views for graphics debuggers
    ///
    /// Views are named `<name>.TextureDSV`, `<name>.TextureSRV` and
    /// `<name>.TextureRTV`. Only active in debug builds with the
    /// `debug-object-names` feature.
    pub fn set_debug_object_name(&self, name: &str) {
        #[cfg(all(debug_assertions, feature = "debug-object-names"))]
        {
            self.depth_stencil_view.set_debug_name(&format!("{}.TextureDSV", name));
            self.color_sample_view.set_debug_name(&format!("{}.TextureSRV", name));
            self.color_target_view.set_debug_name(&format!("{}.TextureRTV", name));
        }
        #[cfg(not(all(debug_assertions, feature = "debug-object-names")))]
        let _ = name;
    }

    pub fn width(&self) -> u32 {
        self.color_texture().info().width
    }

    pub fn height(&self) -> u32 {
        self.color_texture().info().height
    }

    pub fn size(&self) -> UVec2 {
        UVec2::new(self.width(), self.height())
    }

    /// Whether the mip chain is regenerated by `end()`
    pub fn generates_mips(&self) -> bool {
        self.generate_mips
    }

    /// Number of mip levels of the color texture
    pub fn mip_levels(&self) -> u32 {
        self.color_texture().info().mip_levels
    }

    /// Viewport bound by `begin()`
    pub fn viewport(&self) -> &Viewport {
        &self.output_viewport
    }

    /// True between `begin()` and `end()`
    pub fn is_rendering(&self) -> bool {
        self.saved.is_some()
    }
}

impl Drop for OffscreenRenderTarget {
    fn drop(&mut self) {
        if self.saved.is_some() {
            rtt_warn!(SOURCE, "Offscreen target dropped while rendering, host state was never restored");
        }
    }
}

#[cfg(test)]
#[path = "offscreen_render_target_tests.rs"]
mod tests;
