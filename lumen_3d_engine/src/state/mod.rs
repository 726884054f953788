//! Render state set
//!
//! Thirteen orthogonal, immutable pieces of pipeline state. A pass is
//! described by a sparse `RenderStateSet` overlaid on the full defaults of a
//! `RenderStateCache`; the renderer applies the result through a
//! `StateTracker` so unchanged states are skipped.

mod alpha;
mod array;
mod cache;
mod color;
mod cull;
mod depth;
mod enums;
mod fog;
mod light;
mod material;
mod render_state;
mod shader;
mod state_set;
mod stencil;
mod texture;
mod transform;

pub use alpha::AlphaState;
pub use array::{ArrayBuffer, ArrayDataType, ArrayState, ClientArray};
pub use cache::RenderStateCache;
pub use color::{ColorMask, ColorMaskState, ColorState};
pub use cull::CullState;
pub use depth::DepthState;
pub use enums::{BlendFactor, CompareFunc, CullFace, StencilOp};
pub use fog::{FogMode, FogState};
pub use light::{Light, LightKind, LightState};
pub use material::{MaterialParams, MaterialState};
pub use render_state::{RenderState, RenderStateType, STATE_COUNT};
pub use shader::{ShaderProgram, ShaderState, Uniform, UniformValue};
pub use state_set::RenderStateSet;
pub use stencil::{StencilParams, StencilState};
pub use texture::{TextureEnvMode, TextureHandle, TextureState, TextureTarget, TextureUnit};
pub use transform::TransformState;

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
