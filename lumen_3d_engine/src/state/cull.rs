use super::enums::CullFace;

/// Face culling; `None` disables culling.
///
/// Interned: obtain instances through `RenderStateCache::cull`.
#[derive(Debug, Clone, PartialEq)]
pub struct CullState {
    face: Option<CullFace>,
}

impl CullState {
    pub(crate) fn new(face: Option<CullFace>) -> Self {
        Self { face }
    }

    pub fn face(&self) -> Option<CullFace> {
        self.face
    }

    pub fn is_enabled(&self) -> bool {
        self.face.is_some()
    }
}
