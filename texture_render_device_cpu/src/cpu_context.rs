/// CpuContext - CPU implementation of the DeviceContext trait
///
/// Keeps the bound output state, executes clears and mip generation directly
/// on texel storage, and offers a minimal rasterizer (`draw_quad`) plus
/// readback helpers so rendered results can be inspected.

use std::sync::Arc;
use glam::{Vec2, Vec4};
use rustc_hash::FxHashMap;
use texture_render::rtt::device::{
    DeviceContext, BoundTargets, ClearFlags, TextureFormat, Viewport,
    RenderTargetView, ShaderResourceView, DepthStencilView,
};
use texture_render::{rtt_trace, rtt_warn};
use crate::cpu_device::SOURCE;
use crate::cpu_texture::{
    MipData, decode_color, encode_color, quantize_depth, to_rgba_order,
    unpack_depth, unpack_stencil, update_depth_stencil,
};
use crate::cpu_view::{CpuRenderTargetView, CpuShaderResourceView, CpuDepthStencilView};

/// Axis-aligned, solid-colored rectangle rasterized by `CpuContext::draw_quad`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quad {
    /// One corner in normalized device coordinates ([-1, 1], +Y up)
    pub min: Vec2,
    /// Opposite corner in normalized device coordinates
    pub max: Vec2,
    /// Depth in [0, 1], mapped through the viewport depth range
    pub depth: f32,
    /// Linear RGBA color
    pub color: Vec4,
}

impl Quad {
    pub fn new(min: Vec2, max: Vec2, depth: f32, color: Vec4) -> Self {
        Self { min, max, depth, color }
    }

    /// Quad covering the whole viewport
    pub fn fullscreen(depth: f32, color: Vec4) -> Self {
        Self::new(Vec2::NEG_ONE, Vec2::ONE, depth, color)
    }
}

/// CPU device context
#[derive(Default)]
pub struct CpuContext {
    bound: BoundTargets,
    viewports: Vec<Viewport>,
    /// Number of times each command was issued
    counters: FxHashMap<&'static str, u32>,
}

impl CpuContext {
    pub fn new() -> Self {
        Self::default()
    }

    fn count(&mut self, command: &'static str) {
        *self.counters.entry(command).or_insert(0) += 1;
    }

    /// Number of times `command` (a DeviceContext method name or `"draw_quad"`)
    /// was issued on this context
    pub fn command_count(&self, command: &str) -> u32 {
        self.counters.get(command).copied().unwrap_or(0)
    }

    pub fn reset_counters(&mut self) {
        self.counters.clear();
    }

    /// Rasterize `quad` into the bound color target through the first bound
    /// viewport, depth-testing (LESS) against the bound depth/stencil view
    ///
    /// Returns the number of pixels written.
    pub fn draw_quad(&mut self, quad: &Quad) -> u32 {
        self.count("draw_quad");

        let Some(color_view) = self.bound.color.as_ref() else {
            rtt_warn!(SOURCE, "draw_quad() without a bound render target");
            return 0;
        };
        let Some(rtv) = color_view.as_any().downcast_ref::<CpuRenderTargetView>() else {
            rtt_warn!(SOURCE, "draw_quad() with a render target from another device");
            return 0;
        };
        let Some(viewport) = self.viewports.first().copied() else {
            rtt_warn!(SOURCE, "draw_quad() without a bound viewport");
            return 0;
        };
        let dsv = self.bound.depth_stencil
            .as_ref()
            .and_then(|view| view.as_any().downcast_ref::<CpuDepthStencilView>());
        if let Some(dsv) = dsv {
            if Arc::ptr_eq(&dsv.store, &rtv.store) {
                rtt_warn!(SOURCE, "draw_quad() with color and depth views over the same texture");
                return 0;
            }
        }

        let mip = rtv.desc().mip_slice;
        let Some(&(width, height)) = rtv.store.sizes.get(mip as usize) else {
            return 0;
        };

        // NDC to pixel space (+Y down)
        let to_pixels = |ndc: Vec2| {
            Vec2::new(
                viewport.x + (ndc.x + 1.0) * 0.5 * viewport.width,
                viewport.y + (1.0 - ndc.y) * 0.5 * viewport.height,
            )
        };
        let (a, b) = (to_pixels(quad.min), to_pixels(quad.max));
        let viewport_min = Vec2::new(viewport.x, viewport.y);
        let viewport_max = viewport_min + Vec2::new(viewport.width, viewport.height);
        let lo = a.min(b).max(viewport_min).max(Vec2::ZERO);
        let hi = a.max(b).min(viewport_max).min(Vec2::new(width as f32, height as f32));
        if hi.x <= lo.x || hi.y <= lo.y {
            return 0;
        }

        // Pixel (x, y) is covered when its center lies in [lo, hi)
        let first = (lo - Vec2::splat(0.5)).ceil().max(Vec2::ZERO);
        let last = (hi - Vec2::splat(0.5)).ceil().max(Vec2::ZERO);
        let (x0, y0) = (first.x as u32, first.y as u32);
        let (x1, y1) = ((last.x as u32).min(width), (last.y as u32).min(height));

        let depth = viewport.min_depth + quad.depth.clamp(0.0, 1.0) * (viewport.max_depth - viewport.min_depth);
        let texel = encode_color(rtv.store.format, quad.color);

        let mut color_levels = rtv.store.levels.lock().unwrap();
        let Some(MipData::Color(color_texels)) = color_levels.get_mut(mip as usize) else {
            return 0;
        };
        let mut depth_levels = dsv.map(|view| view.store.levels.lock().unwrap());

        let mut written = 0;
        for y in y0..y1 {
            for x in x0..x1 {
                if let (Some(dsv), Some(levels)) = (dsv, depth_levels.as_mut()) {
                    let depth_mip = dsv.desc().mip_slice;
                    let format = dsv.store.format;
                    let Some(index) = dsv.store.index(depth_mip, x, y) else {
                        continue;
                    };
                    let Some(MipData::DepthStencil(depth_texels)) = levels.get_mut(depth_mip as usize) else {
                        continue;
                    };
                    let stored = unpack_depth(format, depth_texels[index]);
                    if quantize_depth(format, depth) >= stored {
                        continue;
                    }
                    depth_texels[index] = update_depth_stencil(format, depth_texels[index], Some(depth), None);
                }

                color_texels[(y as usize) * (width as usize) + x as usize] = texel;
                written += 1;
            }
        }

        rtt_trace!(SOURCE, "draw_quad() wrote {} pixels", written);
        written
    }

    /// Texel at `(x, y)` of level `mip` of a shader resource view (relative to
    /// its most detailed level), channels in RGBA order
    pub fn read_color(&self, view: &Arc<dyn ShaderResourceView>, mip: u32, x: u32, y: u32) -> Option<[u8; 4]> {
        let srv = view.as_any().downcast_ref::<CpuShaderResourceView>()?;
        if mip >= view.mip_levels() {
            return None;
        }
        let level = srv.desc().most_detailed_mip + mip;
        srv.store
            .color(level, x, y)
            .map(|texel| to_rgba_order(srv.store.format, texel))
    }

    /// Depth at `(x, y)` of a depth/stencil view
    pub fn read_depth(&self, view: &Arc<dyn DepthStencilView>, x: u32, y: u32) -> Option<f32> {
        let dsv = view.as_any().downcast_ref::<CpuDepthStencilView>()?;
        dsv.store
            .depth_stencil_raw(dsv.desc().mip_slice, x, y)
            .map(|raw| unpack_depth(dsv.store.format, raw))
    }

    /// Stencil at `(x, y)` of a depth/stencil view
    pub fn read_stencil(&self, view: &Arc<dyn DepthStencilView>, x: u32, y: u32) -> Option<u8> {
        let dsv = view.as_any().downcast_ref::<CpuDepthStencilView>()?;
        dsv.store
            .depth_stencil_raw(dsv.desc().mip_slice, x, y)
            .map(|raw| unpack_stencil(dsv.store.format, raw))
    }
}

/// 2x2 box filter from one level to the next (edge texels clamped)
fn downsample(
    format: TextureFormat,
    src: &[[u8; 4]],
    (src_width, src_height): (u32, u32),
    dst: &mut [[u8; 4]],
    (dst_width, dst_height): (u32, u32),
) {
    for y in 0..dst_height {
        for x in 0..dst_width {
            let mut sum = Vec4::ZERO;
            for (dx, dy) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
                let sx = (2 * x + dx).min(src_width - 1);
                let sy = (2 * y + dy).min(src_height - 1);
                sum += decode_color(format, src[(sy as usize) * (src_width as usize) + sx as usize]);
            }
            dst[(y as usize) * (dst_width as usize) + x as usize] = encode_color(format, sum * 0.25);
        }
    }
}

impl DeviceContext for CpuContext {
    fn clear_render_target_view(&mut self, view: &Arc<dyn RenderTargetView>, color: [f32; 4]) {
        self.count("clear_render_target_view");
        let Some(rtv) = view.as_any().downcast_ref::<CpuRenderTargetView>() else {
            rtt_warn!(SOURCE, "clear_render_target_view() with a view from another device");
            return;
        };
        let texel = encode_color(rtv.store.format, Vec4::from_array(color));
        rtv.store.fill_color(rtv.desc().mip_slice, texel);
    }

    fn clear_depth_stencil_view(
        &mut self,
        view: &Arc<dyn DepthStencilView>,
        flags: ClearFlags,
        depth: f32,
        stencil: u8,
    ) {
        self.count("clear_depth_stencil_view");
        let Some(dsv) = view.as_any().downcast_ref::<CpuDepthStencilView>() else {
            rtt_warn!(SOURCE, "clear_depth_stencil_view() with a view from another device");
            return;
        };
        dsv.store.fill_depth_stencil(
            dsv.desc().mip_slice,
            flags.contains(ClearFlags::DEPTH).then_some(depth),
            flags.contains(ClearFlags::STENCIL).then_some(stencil),
        );
    }

    fn set_render_targets(
        &mut self,
        color: Option<Arc<dyn RenderTargetView>>,
        depth_stencil: Option<Arc<dyn DepthStencilView>>,
    ) {
        self.count("set_render_targets");
        self.bound = BoundTargets { color, depth_stencil };
    }

    fn render_targets(&self) -> BoundTargets {
        self.bound.clone()
    }

    fn set_viewports(&mut self, viewports: &[Viewport]) {
        self.count("set_viewports");
        self.viewports = viewports.to_vec();
    }

    fn viewports(&self) -> Vec<Viewport> {
        self.viewports.clone()
    }

    fn generate_mips(&mut self, view: &Arc<dyn ShaderResourceView>) {
        self.count("generate_mips");
        let Some(srv) = view.as_any().downcast_ref::<CpuShaderResourceView>() else {
            rtt_warn!(SOURCE, "generate_mips() with a view from another device");
            return;
        };
        if !view.texture().info().generates_mips {
            rtt_warn!(SOURCE, "generate_mips() on a texture created without mip generation");
            return;
        }

        let first = srv.desc().most_detailed_mip as usize;
        let last = first + view.mip_levels() as usize;
        let store = &srv.store;
        let mut levels = store.levels.lock().unwrap();
        for level in first..last.saturating_sub(1) {
            let (head, tail) = levels.split_at_mut(level + 1);
            if let (MipData::Color(src), MipData::Color(dst)) = (&head[level], &mut tail[0]) {
                downsample(store.format, src, store.sizes[level], dst, store.sizes[level + 1]);
            }
        }

        rtt_trace!(SOURCE, "Generated mip levels {}..{}", first + 1, last);
    }
}
