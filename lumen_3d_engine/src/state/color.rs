use bitflags::bitflags;
use glam::Vec4;

/// Current draw color (used when no color array is bound).
///
/// Interned: obtain instances through `RenderStateCache::color`.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorState {
    color: Vec4,
}

impl ColorState {
    pub(crate) fn new(color: Vec4) -> Self {
        Self { color }
    }

    pub fn color(&self) -> Vec4 {
        self.color
    }
}

bitflags! {
    /// Color channels written to the framebuffer
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ColorMask: u8 {
        const RED = 1 << 0;
        const GREEN = 1 << 1;
        const BLUE = 1 << 2;
        const ALPHA = 1 << 3;
    }
}

/// Color write mask.
///
/// Interned: obtain instances through `RenderStateCache::color_mask`.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorMaskState {
    mask: ColorMask,
}

impl ColorMaskState {
    pub(crate) fn new(mask: ColorMask) -> Self {
        Self { mask }
    }

    pub fn mask(&self) -> ColorMask {
        self.mask
    }
}
