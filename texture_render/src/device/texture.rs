/// Texture trait, texture descriptor, and texture info

use std::any::Any;
use bitflags::bitflags;

/// Texture pixel format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(non_camel_case_types)]
pub enum TextureFormat {
    // Color formats
    R8G8B8A8_UNORM,
    R8G8B8A8_SRGB,
    B8G8R8A8_UNORM,

    // Depth/stencil formats
    D24_UNORM_S8_UINT,
    D32_FLOAT,
}

impl TextureFormat {
    /// Size of one texel in bytes
    pub fn bytes_per_pixel(&self) -> u32 {
        match self {
            TextureFormat::R8G8B8A8_UNORM
            | TextureFormat::R8G8B8A8_SRGB
            | TextureFormat::B8G8R8A8_UNORM => 4,
            TextureFormat::D24_UNORM_S8_UINT => 4,
            TextureFormat::D32_FLOAT => 4,
        }
    }

    /// Returns true for depth and depth/stencil formats
    pub fn is_depth(&self) -> bool {
        matches!(self, TextureFormat::D24_UNORM_S8_UINT | TextureFormat::D32_FLOAT)
    }

    /// Returns true if the format carries a stencil plane
    pub fn has_stencil(&self) -> bool {
        matches!(self, TextureFormat::D24_UNORM_S8_UINT)
    }
}

bitflags! {
    /// How a texture may be bound to the pipeline
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TextureUsage: u32 {
        /// Readable from shaders through a shader resource view
        const SAMPLED = 1 << 0;
        /// Writable as a color render target
        const RENDER_TARGET = 1 << 1;
        /// Writable as a depth/stencil target
        const DEPTH_STENCIL = 1 << 2;
    }
}

/// Mip chain policy for a texture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MipmapMode {
    /// Exactly one mip level
    None,

    /// Allocate a mip chain and mark the texture as eligible for
    /// device-side mip regeneration. `max_levels: None` means the full
    /// chain down to 1x1.
    Generate { max_levels: Option<u32> },
}

impl MipmapMode {
    /// Number of levels in a full chain: `floor(log2(max(width, height))) + 1`
    pub fn max_mip_levels(width: u32, height: u32) -> u32 {
        let largest = width.max(height).max(1);
        u32::BITS - largest.leading_zeros()
    }

    /// Number of mip levels this mode produces for the given dimensions
    pub fn mip_levels(&self, width: u32, height: u32) -> u32 {
        match self {
            MipmapMode::None => 1,
            MipmapMode::Generate { max_levels } => {
                let full = Self::max_mip_levels(width, height);
                match max_levels {
                    Some(max) => full.min((*max).max(1)),
                    None => full,
                }
            }
        }
    }

    /// Returns true if the texture may have its chain regenerated by the device
    pub fn is_generated(&self) -> bool {
        matches!(self, MipmapMode::Generate { .. })
    }
}

// ===== TEXTURE DESC =====

/// Descriptor for creating a 2D texture
#[derive(Debug, Clone)]
pub struct TextureDesc {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Pixel format
    pub format: TextureFormat,
    /// Usage flags
    pub usage: TextureUsage,
    /// Mip chain policy
    pub mipmap: MipmapMode,
    /// Number of samples (1 = no MSAA)
    pub samples: u32,
}

// ===== TEXTURE INFO =====

/// Read-only properties of a created texture.
///
/// Returned by `Texture::info()` without exposing backend-specific details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureInfo {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Pixel format
    pub format: TextureFormat,
    /// Usage flags
    pub usage: TextureUsage,
    /// Number of mip levels actually allocated
    pub mip_levels: u32,
    /// Number of samples
    pub samples: u32,
    /// Whether the device may regenerate the mip chain of this texture
    pub generates_mips: bool,
}

impl TextureInfo {
    /// Width and height of a given mip level (never smaller than 1x1)
    pub fn mip_size(&self, mip_level: u32) -> (u32, u32) {
        (
            (self.width >> mip_level).max(1),
            (self.height >> mip_level).max(1),
        )
    }
}

// ===== TEXTURE TRAIT =====

/// Texture resource trait
///
/// Implemented by backend-specific texture types. The texture is destroyed
/// when the last `Arc` handle (including the ones held by views) is dropped.
pub trait Texture: Send + Sync {
    /// Get the read-only properties of this texture
    fn info(&self) -> &TextureInfo;

    /// Downcast support for backends
    fn as_any(&self) -> &dyn Any;
}

#[cfg(test)]
#[path = "texture_tests.rs"]
mod tests;
