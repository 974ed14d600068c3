/*!
# Texture Render - CPU Device Backend

Reference implementation of the texture_render device traits that keeps every
texture in system memory.

It executes clears, target binding and mip generation directly on texel
storage, and adds a minimal quad rasterizer with readback helpers. Offscreen
rendering results can therefore be inspected pixel by pixel without a GPU.

```no_run
use texture_render::rtt::OffscreenRenderTarget;
use texture_render_device_cpu::{CpuContext, CpuDevice, Quad};
use texture_render::glam::Vec4;

let device = CpuDevice::default();
let mut context = CpuContext::new();
let mut target = OffscreenRenderTarget::new(&device, 256, 256, true)?;

{
    let mut pass = target.begin_scoped(&mut context);
    pass.draw_quad(&Quad::fullscreen(0.5, Vec4::new(1.0, 0.0, 0.0, 1.0)));
}

let texel = context.read_color(target.output_texture(), 0, 0, 0);
# Ok::<(), texture_render::rtt::Error>(())
```
*/

mod cpu_device;
mod cpu_texture;
mod cpu_view;
mod cpu_context;

pub use cpu_device::{CpuDevice, CpuDeviceConfig, TextureKey, TextureRecord};
pub use cpu_texture::CpuTexture;
pub use cpu_view::{CpuRenderTargetView, CpuShaderResourceView, CpuDepthStencilView};
pub use cpu_context::{CpuContext, Quad};
