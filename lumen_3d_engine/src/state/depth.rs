use super::enums::CompareFunc;

/// Depth test function and depth write mask.
///
/// Interned: obtain instances through `RenderStateCache::depth`.
#[derive(Debug, Clone, PartialEq)]
pub struct DepthState {
    test_func: CompareFunc,
    mask: bool,
}

impl DepthState {
    pub(crate) fn new(test_func: CompareFunc, mask: bool) -> Self {
        Self { test_func, mask }
    }

    pub fn test_func(&self) -> CompareFunc {
        self.test_func
    }

    /// Whether depth values are written
    pub fn mask(&self) -> bool {
        self.mask
    }
}
