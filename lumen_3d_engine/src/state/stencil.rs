use super::enums::{CompareFunc, StencilOp};

/// Stencil parameters used to request a `StencilState`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StencilParams {
    pub test_func: CompareFunc,
    pub test_ref: i32,
    pub test_mask: u32,
    pub fail_op: StencilOp,
    pub depth_fail_op: StencilOp,
    pub pass_op: StencilOp,
    pub write_mask: u32,
}

impl Default for StencilParams {
    fn default() -> Self {
        Self {
            test_func: CompareFunc::Always,
            test_ref: 0,
            test_mask: u32::MAX,
            fail_op: StencilOp::Keep,
            depth_fail_op: StencilOp::Keep,
            pass_op: StencilOp::Keep,
            write_mask: u32::MAX,
        }
    }
}

/// Stencil test and operations.
///
/// Interned: obtain instances through `RenderStateCache::stencil`.
#[derive(Debug, Clone, PartialEq)]
pub struct StencilState {
    params: StencilParams,
}

impl StencilState {
    pub(crate) fn new(params: StencilParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &StencilParams {
        &self.params
    }

    /// Whether the stencil state has any effect
    pub fn is_enabled(&self) -> bool {
        let p = &self.params;
        p.test_func != CompareFunc::Always
            || p.fail_op != StencilOp::Keep
            || p.depth_fail_op != StencilOp::Keep
            || p.pass_op != StencilOp::Keep
    }
}
