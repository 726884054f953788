/// Texture unit bindings.
///
/// Not interned: texture states compare structurally and may be used as
/// map keys (texture handles compare by id).

use std::hash::{Hash, Hasher};
use std::sync::Arc;
use glam::Mat4;

/// Texture target dimensionality
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureTarget {
    Texture1D,
    Texture2D,
    Texture3D,
    CubeMap,
}

/// Decoded, uploaded texture (opaque to this crate)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TextureHandle {
    pub id: u32,
    pub name: String,
    pub target: TextureTarget,
}

/// Texture environment function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureEnvMode {
    Modulate,
    Replace,
    Decal,
    Blend,
    Add,
    /// Requires the texture-env-combine capability
    Combine,
}

/// One texture unit
#[derive(Debug, Clone, PartialEq)]
pub struct TextureUnit {
    pub texture: Arc<TextureHandle>,
    pub env_mode: TextureEnvMode,
    /// Texture coordinate set read by this unit
    pub coord_set: u32,
    pub transform: Mat4,
}

impl TextureUnit {
    pub fn new(texture: Arc<TextureHandle>, coord_set: u32) -> Self {
        Self {
            texture,
            env_mode: TextureEnvMode::Modulate,
            coord_set,
            transform: Mat4::IDENTITY,
        }
    }
}

impl Eq for TextureUnit {}

impl Hash for TextureUnit {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.texture.id.hash(state);
        self.env_mode.hash(state);
        self.coord_set.hash(state);
        for value in self.transform.to_cols_array() {
            value.to_bits().hash(state);
        }
    }
}

/// Texture units in order; `None` leaves a unit disabled
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct TextureState {
    units: Vec<Option<TextureUnit>>,
}

impl TextureState {
    pub fn new(units: Vec<Option<TextureUnit>>) -> Self {
        Self { units }
    }

    /// No texturing
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn units(&self) -> &[Option<TextureUnit>] {
        &self.units
    }

    /// Number of units, counting trailing disabled ones
    pub fn unit_count(&self) -> usize {
        self.units.len()
    }

    /// Texture coordinate sets read by the enabled units
    pub fn coord_sets(&self) -> impl Iterator<Item = u32> + '_ {
        self.units.iter().flatten().map(|unit| unit.coord_set)
    }

    pub fn requires_combine(&self) -> bool {
        self.units.iter().flatten().any(|unit| unit.env_mode == TextureEnvMode::Combine)
    }
}
