//! Offscreen render target module
//!
//! Provides the render-to-texture target and the scope guard used to
//! bracket a sub-pass rendered into it.

mod offscreen_render_target;
mod offscreen_pass;

pub use offscreen_render_target::{
    OffscreenRenderTarget, OffscreenTargetDesc,
    COLOR_FORMAT, DEPTH_STENCIL_FORMAT, CLEAR_COLOR, CLEAR_DEPTH, CLEAR_STENCIL,
};
pub use offscreen_pass::OffscreenPass;
