/// View traits and descriptors
///
/// A view is a typed window over a texture restricting how it may be accessed:
/// written as a color target, written as a depth/stencil target, or read by
/// shaders. Every view holds a strong reference to its texture, so the texture
/// stays alive for as long as any of its views does.

use std::any::Any;
use std::sync::Arc;
use crate::device::{Texture, TextureFormat};

/// Range of mip levels exposed by a shader resource view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MipRange {
    /// Every level from `most_detailed_mip` to the end of the chain
    All,
    /// A fixed number of levels starting at `most_detailed_mip`
    Count(u32),
}

impl MipRange {
    /// Resolve the range against the texture's actual mip count
    pub fn resolve(&self, most_detailed_mip: u32, texture_mip_levels: u32) -> u32 {
        let available = texture_mip_levels.saturating_sub(most_detailed_mip);
        match self {
            MipRange::All => available,
            MipRange::Count(count) => (*count).min(available),
        }
    }
}

/// Descriptor for creating a render target view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderTargetViewDesc {
    /// View format (None = texture format)
    pub format: Option<TextureFormat>,
    /// Mip level written through this view
    pub mip_slice: u32,
}

/// Descriptor for creating a shader resource view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShaderResourceViewDesc {
    /// View format (None = texture format)
    pub format: Option<TextureFormat>,
    /// First (largest) mip level visible to shaders
    pub most_detailed_mip: u32,
    /// Number of visible levels
    pub mip_levels: MipRange,
}

/// Descriptor for creating a depth/stencil view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepthStencilViewDesc {
    /// View format (None = texture format)
    pub format: Option<TextureFormat>,
    /// Mip level written through this view
    pub mip_slice: u32,
}

/// Render target view trait (color write access to one mip level)
pub trait RenderTargetView: Send + Sync {
    /// Texture this view writes into
    fn texture(&self) -> &Arc<dyn Texture>;

    /// Descriptor the view was created with
    fn desc(&self) -> &RenderTargetViewDesc;

    /// Attach a human-readable name for graphics debuggers
    fn set_debug_name(&self, name: &str);

    /// Name attached with `set_debug_name`, if any
    fn debug_name(&self) -> Option<String>;

    /// Downcast support for backends
    fn as_any(&self) -> &dyn Any;
}

/// Shader resource view trait (read access to a range of mip levels)
pub trait ShaderResourceView: Send + Sync {
    /// Texture this view reads from
    fn texture(&self) -> &Arc<dyn Texture>;

    /// Descriptor the view was created with
    fn desc(&self) -> &ShaderResourceViewDesc;

    /// Attach a human-readable name for graphics debuggers
    fn set_debug_name(&self, name: &str);

    /// Name attached with `set_debug_name`, if any
    fn debug_name(&self) -> Option<String>;

    /// Downcast support for backends
    fn as_any(&self) -> &dyn Any;

    /// Number of mip levels visible through this view
    fn mip_levels(&self) -> u32 {
        let desc = self.desc();
        desc.mip_levels
            .resolve(desc.most_detailed_mip, self.texture().info().mip_levels)
    }
}

/// Depth/stencil view trait (depth and stencil write access to one mip level)
pub trait DepthStencilView: Send + Sync {
    /// Texture this view writes into
    fn texture(&self) -> &Arc<dyn Texture>;

    /// Descriptor the view was created with
    fn desc(&self) -> &DepthStencilViewDesc;

    /// Attach a human-readable name for graphics debuggers
    fn set_debug_name(&self, name: &str);

    /// Name attached with `set_debug_name`, if any
    fn debug_name(&self) -> Option<String>;

    /// Downcast support for backends
    fn as_any(&self) -> &dyn Any;
}
