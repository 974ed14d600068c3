/*!
# Texture Render

Offscreen render-to-texture core.

This crate allocates a color texture (with optional mip chain) and a matching
depth/stencil surface, and swaps the active rendering destination of a device
context between whatever the host had bound and this offscreen surface for the
duration of a sub-pass. The rendered image is then exposed as a shader-readable
view for later draws (mirrors, portals, shadow maps, UI render textures).

## Architecture

The core never talks to a graphics API directly. It consumes two narrow
capability traits implemented by a backend crate:

- **GraphicsDevice**: creates textures and views from descriptors
- **DeviceContext**: clears views, binds targets/viewports, queries bound
  state, regenerates mip chains

and builds **OffscreenRenderTarget** on top of them.
*/

// Internal modules
mod error;
pub mod log;
pub mod device;
pub mod target;

// Main rtt namespace module
pub mod rtt {
    // Error types
    pub use crate::error::{Error, Result};

    // Offscreen target and its scope guard
    pub use crate::target::{OffscreenRenderTarget, OffscreenTargetDesc, OffscreenPass};

    // Logging sub-module (types and logger slot, NOT macros)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger, set_logger, reset_logger};
    }

    // Device capability traits and descriptors
    pub mod device {
        pub use crate::device::*;
    }
}

// Re-export math library at crate root
pub use glam;
