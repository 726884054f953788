/// The 13 render state types and the shared-handle enum wrapping them.

use std::sync::Arc;
use crate::error::Result;
use crate::renderer::Renderer;
use super::{
    AlphaState, ArrayState, ColorMaskState, ColorState, CullState, DepthState, FogState,
    LightState, MaterialState, ShaderState, StencilState, TextureState, TransformState,
};

/// Number of render state types (slots in a `RenderStateSet`)
pub const STATE_COUNT: usize = 13;

/// Render state discriminator, stable in 0..=12
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RenderStateType {
    Alpha = 0,
    Array = 1,
    Color = 2,
    ColorMask = 3,
    Cull = 4,
    Depth = 5,
    Fog = 6,
    Light = 7,
    Material = 8,
    Shader = 9,
    Stencil = 10,
    Texture = 11,
    Transform = 12,
}

impl RenderStateType {
    /// All types in index order
    pub const ALL: [RenderStateType; STATE_COUNT] = [
        RenderStateType::Alpha,
        RenderStateType::Array,
        RenderStateType::Color,
        RenderStateType::ColorMask,
        RenderStateType::Cull,
        RenderStateType::Depth,
        RenderStateType::Fog,
        RenderStateType::Light,
        RenderStateType::Material,
        RenderStateType::Shader,
        RenderStateType::Stencil,
        RenderStateType::Texture,
        RenderStateType::Transform,
    ];

    /// Slot index in a state set
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

/// A shared, immutable render state of any type.
///
/// Cloning clones the `Arc`. Equality is reference equality first, then
/// structural equality of the wrapped state.
#[derive(Debug, Clone)]
pub enum RenderState {
    Alpha(Arc<AlphaState>),
    Array(Arc<ArrayState>),
    Color(Arc<ColorState>),
    ColorMask(Arc<ColorMaskState>),
    Cull(Arc<CullState>),
    Depth(Arc<DepthState>),
    Fog(Arc<FogState>),
    Light(Arc<LightState>),
    Material(Arc<MaterialState>),
    Shader(Arc<ShaderState>),
    Stencil(Arc<StencilState>),
    Texture(Arc<TextureState>),
    Transform(Arc<TransformState>),
}

impl RenderState {
    pub fn state_type(&self) -> RenderStateType {
        match self {
            RenderState::Alpha(_) => RenderStateType::Alpha,
            RenderState::Array(_) => RenderStateType::Array,
            RenderState::Color(_) => RenderStateType::Color,
            RenderState::ColorMask(_) => RenderStateType::ColorMask,
            RenderState::Cull(_) => RenderStateType::Cull,
            RenderState::Depth(_) => RenderStateType::Depth,
            RenderState::Fog(_) => RenderStateType::Fog,
            RenderState::Light(_) => RenderStateType::Light,
            RenderState::Material(_) => RenderStateType::Material,
            RenderState::Shader(_) => RenderStateType::Shader,
            RenderState::Stencil(_) => RenderStateType::Stencil,
            RenderState::Texture(_) => RenderStateType::Texture,
            RenderState::Transform(_) => RenderStateType::Transform,
        }
    }

    /// Push this state to the rendering context
    pub fn apply(&self, renderer: &mut dyn Renderer) -> Result<()> {
        renderer.apply_state(self)
    }

    /// Same shared instance
    pub fn ptr_eq(&self, other: &RenderState) -> bool {
        self.identity() == other.identity()
    }

    /// Address of the shared instance, used for state grouping when sorting
    pub fn identity(&self) -> usize {
        match self {
            RenderState::Alpha(s) => Arc::as_ptr(s) as usize,
            RenderState::Array(s) => Arc::as_ptr(s) as usize,
            RenderState::Color(s) => Arc::as_ptr(s) as usize,
            RenderState::ColorMask(s) => Arc::as_ptr(s) as usize,
            RenderState::Cull(s) => Arc::as_ptr(s) as usize,
            RenderState::Depth(s) => Arc::as_ptr(s) as usize,
            RenderState::Fog(s) => Arc::as_ptr(s) as usize,
            RenderState::Light(s) => Arc::as_ptr(s) as usize,
            RenderState::Material(s) => Arc::as_ptr(s) as usize,
            RenderState::Shader(s) => Arc::as_ptr(s) as usize,
            RenderState::Stencil(s) => Arc::as_ptr(s) as usize,
            RenderState::Texture(s) => Arc::as_ptr(s) as usize,
            RenderState::Transform(s) => Arc::as_ptr(s) as usize,
        }
    }
}

impl PartialEq for RenderState {
    fn eq(&self, other: &Self) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        match (self, other) {
            (RenderState::Alpha(a), RenderState::Alpha(b)) => a == b,
            (RenderState::Array(a), RenderState::Array(b)) => a == b,
            (RenderState::Color(a), RenderState::Color(b)) => a == b,
            (RenderState::ColorMask(a), RenderState::ColorMask(b)) => a == b,
            (RenderState::Cull(a), RenderState::Cull(b)) => a == b,
            (RenderState::Depth(a), RenderState::Depth(b)) => a == b,
            (RenderState::Fog(a), RenderState::Fog(b)) => a == b,
            (RenderState::Light(a), RenderState::Light(b)) => a == b,
            (RenderState::Material(a), RenderState::Material(b)) => a == b,
            (RenderState::Shader(a), RenderState::Shader(b)) => a == b,
            (RenderState::Stencil(a), RenderState::Stencil(b)) => a == b,
            (RenderState::Texture(a), RenderState::Texture(b)) => a == b,
            (RenderState::Transform(a), RenderState::Transform(b)) => a == b,
            _ => false,
        }
    }
}

macro_rules! impl_from_state {
    ($($variant:ident => $ty:ty),* $(,)?) => {
        $(
            impl From<Arc<$ty>> for RenderState {
                fn from(state: Arc<$ty>) -> Self {
                    RenderState::$variant(state)
                }
            }
        )*
    };
}

impl_from_state! {
    Alpha => AlphaState,
    Array => ArrayState,
    Color => ColorState,
    ColorMask => ColorMaskState,
    Cull => CullState,
    Depth => DepthState,
    Fog => FogState,
    Light => LightState,
    Material => MaterialState,
    Shader => ShaderState,
    Stencil => StencilState,
    Texture => TextureState,
    Transform => TransformState,
}
