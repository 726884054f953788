use super::enums::{BlendFactor, CompareFunc};

/// Alpha test and blend function.
///
/// Interned: obtain instances through `RenderStateCache::alpha`.
#[derive(Debug, Clone, PartialEq)]
pub struct AlphaState {
    test_func: CompareFunc,
    test_ref: f32,
    src_blend: BlendFactor,
    dest_blend: BlendFactor,
}

impl AlphaState {
    pub(crate) fn new(
        test_func: CompareFunc,
        test_ref: f32,
        src_blend: BlendFactor,
        dest_blend: BlendFactor,
    ) -> Self {
        Self { test_func, test_ref, src_blend, dest_blend }
    }

    pub fn test_func(&self) -> CompareFunc {
        self.test_func
    }

    pub fn test_ref(&self) -> f32 {
        self.test_ref
    }

    pub fn src_blend(&self) -> BlendFactor {
        self.src_blend
    }

    pub fn dest_blend(&self) -> BlendFactor {
        self.dest_blend
    }

    /// Whether the alpha test discards anything
    pub fn is_tested(&self) -> bool {
        self.test_func != CompareFunc::Always
    }

    /// Whether blending is enabled (anything but `One, Zero`)
    pub fn is_blended(&self) -> bool {
        !(self.src_blend == BlendFactor::One && self.dest_blend == BlendFactor::Zero)
    }
}
