use glam::Mat4;

/// Modelview transform.
///
/// Not interned: each element produces its own per frame.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformState {
    modelview: Mat4,
}

impl TransformState {
    pub fn new(modelview: Mat4) -> Self {
        Self { modelview }
    }

    pub fn identity() -> Self {
        Self { modelview: Mat4::IDENTITY }
    }

    pub fn modelview(&self) -> &Mat4 {
        &self.modelview
    }

    pub fn is_identity(&self) -> bool {
        self.modelview == Mat4::IDENTITY
    }
}
