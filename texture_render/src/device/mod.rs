/// Device module - capability traits consumed by the offscreen target

// Module declarations
pub mod graphics_device;
pub mod device_context;
pub mod texture;
pub mod view;
pub mod viewport;

// Re-export everything
pub use graphics_device::*;
pub use device_context::*;
pub use texture::*;
pub use view::*;
pub use viewport::*;

// Mock device and context for tests (no backend required)
#[cfg(test)]
pub mod mock_device;
