/// Scope guard for an offscreen sub-pass.
///
/// Returned by `OffscreenRenderTarget::begin_scoped()`. Dereferences to the
/// device context so the client can issue draws, and calls `end()` on drop,
/// including when the client's render code returns early.

use std::ops::{Deref, DerefMut};
use crate::device::DeviceContext;
use super::OffscreenRenderTarget;

pub struct OffscreenPass<'a, C: DeviceContext + ?Sized> {
    target: &'a mut OffscreenRenderTarget,
    context: &'a mut C,
}

impl<'a, C: DeviceContext + ?Sized> OffscreenPass<'a, C> {
    /// Internal only, created via OffscreenRenderTarget::begin_scoped()
    pub(crate) fn new(target: &'a mut OffscreenRenderTarget, context: &'a mut C) -> Self {
        Self { target, context }
    }

    /// Target being rendered into
    pub fn target(&self) -> &OffscreenRenderTarget {
        self.target
    }

    /// End the pass now (same as dropping the guard)
    pub fn finish(self) {}
}

impl<C: DeviceContext + ?Sized> Deref for OffscreenPass<'_, C> {
    type Target = C;

    fn deref(&self) -> &C {
        self.context
    }
}

impl<C: DeviceContext + ?Sized> DerefMut for OffscreenPass<'_, C> {
    fn deref_mut(&mut self) -> &mut C {
        self.context
    }
}

impl<C: DeviceContext + ?Sized> Drop for OffscreenPass<'_, C> {
    fn drop(&mut self) {
        self.target.end(&mut *self.context);
    }
}
