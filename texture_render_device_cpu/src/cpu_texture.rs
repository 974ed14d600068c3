/// Texture - CPU implementation of the Texture trait
///
/// Every mip level lives in system memory. Color formats store one `[u8; 4]`
/// per texel; depth formats store one packed `u32` per texel (D24S8: depth in
/// the low 24 bits as unorm, stencil in the high 8 bits; D32: the f32 bits).

use std::any::Any;
use std::sync::{Arc, Mutex};
use glam::Vec4;
use texture_render::rtt::device::{Texture, TextureFormat, TextureInfo};
use crate::cpu_device::Allocation;

const UNORM24_MAX: f32 = 0x00FF_FFFF as f32;

/// Texels of one mip level
pub(crate) enum MipData {
    Color(Vec<[u8; 4]>),
    DepthStencil(Vec<u32>),
}

/// Texel storage shared between a texture and its views
pub(crate) struct TexelStore {
    pub(crate) format: TextureFormat,
    /// Width and height of each mip level
    pub(crate) sizes: Vec<(u32, u32)>,
    pub(crate) levels: Mutex<Vec<MipData>>,
}

impl TexelStore {
    fn new(info: &TextureInfo) -> Self {
        let sizes: Vec<(u32, u32)> = (0..info.mip_levels).map(|mip| info.mip_size(mip)).collect();
        let levels = sizes
            .iter()
            .map(|&(width, height)| {
                let texel_count = (width as usize) * (height as usize);
                if info.format.is_depth() {
                    MipData::DepthStencil(vec![0; texel_count])
                } else {
                    MipData::Color(vec![[0; 4]; texel_count])
                }
            })
            .collect();

        Self {
            format: info.format,
            sizes,
            levels: Mutex::new(levels),
        }
    }

    /// Linear texel index, None when out of bounds
    pub(crate) fn index(&self, mip: u32, x: u32, y: u32) -> Option<usize> {
        let &(width, height) = self.sizes.get(mip as usize)?;
        if x >= width || y >= height {
            return None;
        }
        Some((y as usize) * (width as usize) + x as usize)
    }

    pub(crate) fn fill_color(&self, mip: u32, texel: [u8; 4]) {
        let mut levels = self.levels.lock().unwrap();
        if let Some(MipData::Color(texels)) = levels.get_mut(mip as usize) {
            texels.fill(texel);
        }
    }

    /// Overwrite the selected planes of every texel of a depth level
    pub(crate) fn fill_depth_stencil(&self, mip: u32, depth: Option<f32>, stencil: Option<u8>) {
        let format = self.format;
        let mut levels = self.levels.lock().unwrap();
        if let Some(MipData::DepthStencil(texels)) = levels.get_mut(mip as usize) {
            for texel in texels.iter_mut() {
                *texel = update_depth_stencil(format, *texel, depth, stencil);
            }
        }
    }

    pub(crate) fn color(&self, mip: u32, x: u32, y: u32) -> Option<[u8; 4]> {
        let index = self.index(mip, x, y)?;
        match self.levels.lock().unwrap().get(mip as usize)? {
            MipData::Color(texels) => texels.get(index).copied(),
            MipData::DepthStencil(_) => None,
        }
    }

    pub(crate) fn depth_stencil_raw(&self, mip: u32, x: u32, y: u32) -> Option<u32> {
        let index = self.index(mip, x, y)?;
        match self.levels.lock().unwrap().get(mip as usize)? {
            MipData::DepthStencil(texels) => texels.get(index).copied(),
            MipData::Color(_) => None,
        }
    }
}

// ===== COLOR ENCODING =====

/// Encode a linear RGBA color into a texel of `format` (channels in memory order)
pub(crate) fn encode_color(format: TextureFormat, color: Vec4) -> [u8; 4] {
    let color = match format {
        TextureFormat::R8G8B8A8_SRGB => Vec4::new(
            linear_to_srgb(color.x),
            linear_to_srgb(color.y),
            linear_to_srgb(color.z),
            color.w,
        ),
        _ => color,
    };
    let [r, g, b, a] = color
        .clamp(Vec4::ZERO, Vec4::ONE)
        .to_array()
        .map(|channel| (channel * 255.0).round() as u8);
    match format {
        TextureFormat::B8G8R8A8_UNORM => [b, g, r, a],
        _ => [r, g, b, a],
    }
}

/// Decode a texel of `format` into a linear RGBA color
pub(crate) fn decode_color(format: TextureFormat, texel: [u8; 4]) -> Vec4 {
    let [r, g, b, a] = to_rgba_order(format, texel).map(|channel| channel as f32 / 255.0);
    match format {
        TextureFormat::R8G8B8A8_SRGB => {
            Vec4::new(srgb_to_linear(r), srgb_to_linear(g), srgb_to_linear(b), a)
        }
        _ => Vec4::new(r, g, b, a),
    }
}

/// Reorder a stored texel to RGBA
pub(crate) fn to_rgba_order(format: TextureFormat, texel: [u8; 4]) -> [u8; 4] {
    match format {
        TextureFormat::B8G8R8A8_UNORM => [texel[2], texel[1], texel[0], texel[3]],
        _ => texel,
    }
}

fn linear_to_srgb(value: f32) -> f32 {
    if value <= 0.003_130_8 {
        value * 12.92
    } else {
        1.055 * value.powf(1.0 / 2.4) - 0.055
    }
}

fn srgb_to_linear(value: f32) -> f32 {
    if value <= 0.040_45 {
        value / 12.92
    } else {
        ((value + 0.055) / 1.055).powf(2.4)
    }
}

// ===== DEPTH/STENCIL PACKING =====

/// Depth value as it would read back after being stored in `format`
pub(crate) fn quantize_depth(format: TextureFormat, depth: f32) -> f32 {
    match format {
        TextureFormat::D24_UNORM_S8_UINT => unorm24_to_depth(depth_to_unorm24(depth)),
        _ => depth.clamp(0.0, 1.0),
    }
}

pub(crate) fn unpack_depth(format: TextureFormat, raw: u32) -> f32 {
    match format {
        TextureFormat::D24_UNORM_S8_UINT => unorm24_to_depth(raw & 0x00FF_FFFF),
        _ => f32::from_bits(raw),
    }
}

pub(crate) fn unpack_stencil(format: TextureFormat, raw: u32) -> u8 {
    match format {
        TextureFormat::D24_UNORM_S8_UINT => (raw >> 24) as u8,
        _ => 0,
    }
}

/// Replace the depth and/or stencil planes of a packed texel
pub(crate) fn update_depth_stencil(
    format: TextureFormat,
    raw: u32,
    depth: Option<f32>,
    stencil: Option<u8>,
) -> u32 {
    match format {
        TextureFormat::D24_UNORM_S8_UINT => {
            let depth_bits = depth.map(depth_to_unorm24).unwrap_or(raw & 0x00FF_FFFF);
            let stencil_bits = stencil.map(u32::from).unwrap_or(raw >> 24);
            (stencil_bits << 24) | depth_bits
        }
        _ => depth.map(|d| d.clamp(0.0, 1.0).to_bits()).unwrap_or(raw),
    }
}

fn depth_to_unorm24(depth: f32) -> u32 {
    (depth.clamp(0.0, 1.0) * UNORM24_MAX).round() as u32
}

fn unorm24_to_depth(bits: u32) -> f32 {
    bits as f32 / UNORM24_MAX
}

// ===== CPU TEXTURE =====

/// CPU texture implementation
pub struct CpuTexture {
    /// Read-only texture properties
    pub(crate) info: TextureInfo,
    /// Texel storage, shared with views
    pub(crate) store: Arc<TexelStore>,
    /// Registry entry, released when the texture is dropped
    pub(crate) _allocation: Allocation,
}

impl CpuTexture {
    pub(crate) fn new(info: TextureInfo, allocation: Allocation) -> Self {
        let store = Arc::new(TexelStore::new(&info));
        Self {
            info,
            store,
            _allocation: allocation,
        }
    }

    /// Bytes of system memory used by all mip levels
    pub fn byte_size(info: &TextureInfo) -> u64 {
        (0..info.mip_levels)
            .map(|mip| {
                let (width, height) = info.mip_size(mip);
                u64::from(width) * u64::from(height) * u64::from(info.format.bytes_per_pixel())
            })
            .sum()
    }

    /// Color texel at `(x, y)` of a mip level, channels in RGBA order
    pub fn read_texel(&self, mip: u32, x: u32, y: u32) -> Option<[u8; 4]> {
        self.store
            .color(mip, x, y)
            .map(|texel| to_rgba_order(self.info.format, texel))
    }

    /// Depth at `(x, y)` of a mip level, in [0, 1]
    pub fn read_depth(&self, mip: u32, x: u32, y: u32) -> Option<f32> {
        self.store
            .depth_stencil_raw(mip, x, y)
            .map(|raw| unpack_depth(self.info.format, raw))
    }

    /// Stencil at `(x, y)` of a mip level
    pub fn read_stencil(&self, mip: u32, x: u32, y: u32) -> Option<u8> {
        self.store
            .depth_stencil_raw(mip, x, y)
            .map(|raw| unpack_stencil(self.info.format, raw))
    }

    /// Raw bytes of a whole mip level, row-major, tightly packed
    pub fn mip_bytes(&self, mip: u32) -> Option<Vec<u8>> {
        let levels = self.store.levels.lock().unwrap();
        let bytes = match levels.get(mip as usize)? {
            MipData::Color(texels) => bytemuck::cast_slice::<[u8; 4], u8>(texels).to_vec(),
            MipData::DepthStencil(texels) => bytemuck::cast_slice::<u32, u8>(texels).to_vec(),
        };
        Some(bytes)
    }
}

impl Texture for CpuTexture {
    fn info(&self) -> &TextureInfo {
        &self.info
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
#[path = "cpu_texture_tests.rs"]
mod tests;
