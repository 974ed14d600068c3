/// CpuDevice - CPU implementation of the GraphicsDevice trait
///
/// Textures live in system memory and are tracked in a registry so callers
/// can observe how many are alive and how much memory they hold.

use std::sync::{Arc, Mutex};
use slotmap::{new_key_type, SlotMap};
use texture_render::rtt::{Error, Result};
use texture_render::rtt::device::{
    GraphicsDevice, Texture, TextureDesc, TextureFormat, TextureInfo, TextureUsage,
    RenderTargetView, ShaderResourceView, DepthStencilView,
    RenderTargetViewDesc, ShaderResourceViewDesc, DepthStencilViewDesc,
};
use texture_render::{rtt_bail, rtt_debug, rtt_error, rtt_trace};
use crate::cpu_texture::CpuTexture;
use crate::cpu_view::{CpuRenderTargetView, CpuShaderResourceView, CpuDepthStencilView};

pub(crate) const SOURCE: &str = "rtt::cpu";

// ===== CONFIGURATION =====

/// CPU device configuration
#[derive(Debug, Clone)]
pub struct CpuDeviceConfig {
    /// Largest accepted texture width or height
    pub max_texture_dimension: u32,
    /// Total bytes textures may hold at once (None = unlimited)
    pub memory_budget: Option<u64>,
    /// Check usage, format and mip range compatibility when creating views
    pub enable_validation: bool,
}

impl Default for CpuDeviceConfig {
    fn default() -> Self {
        Self {
            max_texture_dimension: 16384,
            memory_budget: None,
            enable_validation: cfg!(debug_assertions),
        }
    }
}

// ===== REGISTRY =====

new_key_type! {
    /// Stable key of a live texture in the device registry
    pub struct TextureKey;
}

/// Registry entry of one live texture
#[derive(Debug, Clone)]
pub struct TextureRecord {
    pub width: u32,
    pub height: u32,
    pub format: TextureFormat,
    pub mip_levels: u32,
    pub bytes: u64,
}

#[derive(Default)]
pub(crate) struct Registry {
    textures: SlotMap<TextureKey, TextureRecord>,
    allocated_bytes: u64,
}

/// Registry membership of a texture, removed on drop
pub(crate) struct Allocation {
    registry: Arc<Mutex<Registry>>,
    key: TextureKey,
}

impl Drop for Allocation {
    fn drop(&mut self) {
        let mut registry = self.registry.lock().unwrap();
        if let Some(record) = registry.textures.remove(self.key) {
            registry.allocated_bytes -= record.bytes;
            rtt_trace!(SOURCE, "Released {}x{} {:?} texture ({} bytes)",
                record.width, record.height, record.format, record.bytes);
        }
    }
}

// ===== CPU DEVICE =====

/// CPU graphics device
pub struct CpuDevice {
    config: CpuDeviceConfig,
    registry: Arc<Mutex<Registry>>,
    /// Creation calls left before every call fails with OutOfMemory
    remaining_creations: Mutex<Option<u32>>,
}

impl CpuDevice {
    pub fn new(config: CpuDeviceConfig) -> Self {
        rtt_debug!(SOURCE, "Created CPU device (max dimension {}, budget {:?}, validation {})",
            config.max_texture_dimension, config.memory_budget, config.enable_validation);
        Self {
            config,
            registry: Arc::new(Mutex::new(Registry::default())),
            remaining_creations: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &CpuDeviceConfig {
        &self.config
    }

    /// Number of textures currently alive
    pub fn live_texture_count(&self) -> usize {
        self.registry.lock().unwrap().textures.len()
    }

    /// Bytes held by all live textures
    pub fn allocated_bytes(&self) -> u64 {
        self.registry.lock().unwrap().allocated_bytes
    }

    /// Snapshot of the registry entries of all live textures
    pub fn live_textures(&self) -> Vec<TextureRecord> {
        self.registry.lock().unwrap().textures.values().cloned().collect()
    }

    /// Let the next `calls` creation calls (textures and views) succeed, then
    /// fail every following one with `Error::OutOfMemory`. `None` lifts the limit.
    pub fn fail_after(&self, calls: Option<u32>) {
        *self.remaining_creations.lock().unwrap() = calls;
    }

    fn consume_creation(&self, what: &str) -> Result<()> {
        let mut remaining = self.remaining_creations.lock().unwrap();
        match remaining.as_mut() {
            Some(0) => {
                rtt_error!(SOURCE, "Out of memory while creating {}", what);
                Err(Error::OutOfMemory)
            }
            Some(count) => {
                *count -= 1;
                Ok(())
            }
            None => Ok(()),
        }
    }

    fn invalid(&self, message: String) -> Error {
        rtt_error!(SOURCE, "{}", message);
        Error::InvalidResource(message)
    }

    /// Downcast a trait texture to this backend's texture
    fn cpu_texture<'t>(&self, texture: &'t Arc<dyn Texture>) -> Result<&'t CpuTexture> {
        match texture.as_any().downcast_ref::<CpuTexture>() {
            Some(cpu_texture) => Ok(cpu_texture),
            None => rtt_bail!(SOURCE, "Texture was not created by the CPU device"),
        }
    }

    fn check_view_format(&self, view: &str, texture: &TextureInfo, format: Option<TextureFormat>) -> Result<()> {
        match format {
            Some(format) if self.config.enable_validation && format != texture.format => Err(self.invalid(
                format!("{} format {:?} does not match texture format {:?}", view, format, texture.format),
            )),
            _ => Ok(()),
        }
    }

    fn check_mip_slice(&self, view: &str, texture: &TextureInfo, mip_slice: u32) -> Result<()> {
        if mip_slice >= texture.mip_levels {
            return Err(self.invalid(format!(
                "{} mip slice {} out of range (texture has {} levels)",
                view, mip_slice, texture.mip_levels
            )));
        }
        Ok(())
    }
}

impl Default for CpuDevice {
    fn default() -> Self {
        Self::new(CpuDeviceConfig::default())
    }
}

impl GraphicsDevice for CpuDevice {
    fn create_texture(&self, desc: &TextureDesc) -> Result<Arc<dyn Texture>> {
        if desc.width == 0 || desc.height == 0 {
            return Err(self.invalid(format!(
                "Texture dimensions must be non-zero (got {}x{})", desc.width, desc.height
            )));
        }
        let max = self.config.max_texture_dimension;
        if desc.width > max || desc.height > max {
            return Err(self.invalid(format!(
                "Texture dimensions {}x{} exceed the device limit of {}", desc.width, desc.height, max
            )));
        }
        if desc.samples != 1 {
            return Err(self.invalid(format!(
                "Multi-sampled textures are not supported (samples = {})", desc.samples
            )));
        }
        if self.config.enable_validation {
            if desc.usage.contains(TextureUsage::DEPTH_STENCIL) && !desc.format.is_depth() {
                return Err(self.invalid(format!(
                    "DEPTH_STENCIL usage requires a depth format (got {:?})", desc.format
                )));
            }
            if desc.usage.contains(TextureUsage::RENDER_TARGET) && desc.format.is_depth() {
                return Err(self.invalid(format!(
                    "RENDER_TARGET usage requires a color format (got {:?})", desc.format
                )));
            }
        }

        self.consume_creation("texture")?;

        let info = TextureInfo {
            width: desc.width,
            height: desc.height,
            format: desc.format,
            usage: desc.usage,
            mip_levels: desc.mipmap.mip_levels(desc.width, desc.height),
            samples: desc.samples,
            generates_mips: desc.mipmap.is_generated(),
        };
        let bytes = CpuTexture::byte_size(&info);

        let key = {
            let mut registry = self.registry.lock().unwrap();
            if let Some(budget) = self.config.memory_budget {
                if registry.allocated_bytes + bytes > budget {
                    rtt_error!(SOURCE, "Out of memory: {} bytes requested, {} of {} in use",
                        bytes, registry.allocated_bytes, budget);
                    return Err(Error::OutOfMemory);
                }
            }
            registry.allocated_bytes += bytes;
            registry.textures.insert(TextureRecord {
                width: info.width,
                height: info.height,
                format: info.format,
                mip_levels: info.mip_levels,
                bytes,
            })
        };

        rtt_trace!(SOURCE, "Created {}x{} {:?} texture ({} mips, {} bytes)",
            info.width, info.height, info.format, info.mip_levels, bytes);

        let allocation = Allocation {
            registry: Arc::clone(&self.registry),
            key,
        };
        Ok(Arc::new(CpuTexture::new(info, allocation)))
    }

    fn create_render_target_view(
        &self,
        texture: &Arc<dyn Texture>,
        desc: &RenderTargetViewDesc,
    ) -> Result<Arc<dyn RenderTargetView>> {
        let cpu_texture = self.cpu_texture(texture)?;
        let info = texture.info();
        if self.config.enable_validation && !info.usage.contains(TextureUsage::RENDER_TARGET) {
            return Err(self.invalid("Render target view requires RENDER_TARGET usage".to_string()));
        }
        self.check_view_format("Render target view", info, desc.format)?;
        self.check_mip_slice("Render target view", info, desc.mip_slice)?;
        self.consume_creation("render target view")?;

        Ok(Arc::new(CpuRenderTargetView::new(
            Arc::clone(texture),
            Arc::clone(&cpu_texture.store),
            *desc,
        )))
    }

    fn create_shader_resource_view(
        &self,
        texture: &Arc<dyn Texture>,
        desc: &ShaderResourceViewDesc,
    ) -> Result<Arc<dyn ShaderResourceView>> {
        let cpu_texture = self.cpu_texture(texture)?;
        let info = texture.info();
        if self.config.enable_validation && !info.usage.contains(TextureUsage::SAMPLED) {
            return Err(self.invalid("Shader resource view requires SAMPLED usage".to_string()));
        }
        self.check_view_format("Shader resource view", info, desc.format)?;
        if desc.mip_levels.resolve(desc.most_detailed_mip, info.mip_levels) == 0 {
            return Err(self.invalid(format!(
                "Shader resource view exposes no mip level (most detailed {}, range {:?}, texture has {})",
                desc.most_detailed_mip, desc.mip_levels, info.mip_levels
            )));
        }
        self.consume_creation("shader resource view")?;

        Ok(Arc::new(CpuShaderResourceView::new(
            Arc::clone(texture),
            Arc::clone(&cpu_texture.store),
            *desc,
        )))
    }

    fn create_depth_stencil_view(
        &self,
        texture: &Arc<dyn Texture>,
        desc: &DepthStencilViewDesc,
    ) -> Result<Arc<dyn DepthStencilView>> {
        let cpu_texture = self.cpu_texture(texture)?;
        let info = texture.info();
        if self.config.enable_validation && !info.usage.contains(TextureUsage::DEPTH_STENCIL) {
            return Err(self.invalid("Depth/stencil view requires DEPTH_STENCIL usage".to_string()));
        }
        if !info.format.is_depth() {
            return Err(self.invalid(format!(
                "Depth/stencil view requires a depth format (got {:?})", info.format
            )));
        }
        self.check_view_format("Depth/stencil view", info, desc.format)?;
        self.check_mip_slice("Depth/stencil view", info, desc.mip_slice)?;
        self.consume_creation("depth/stencil view")?;

        Ok(Arc::new(CpuDepthStencilView::new(
            Arc::clone(texture),
            Arc::clone(&cpu_texture.store),
            *desc,
        )))
    }
}
