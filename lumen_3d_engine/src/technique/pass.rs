/// One rendering pass of a technique: the state overrides it applies.

use crate::geometry::{PassSummary, SummaryFlags};
use crate::renderer::RendererCaps;
use crate::state::{RenderState, RenderStateSet, RenderStateType};

#[derive(Debug, Clone, Default)]
pub struct PassConfig {
    states: RenderStateSet,
}

impl PassConfig {
    /// # Arguments
    ///
    /// * `states` - Sparse overrides on top of the default state set
    pub fn new(states: RenderStateSet) -> Self {
        Self { states }
    }

    pub fn states(&self) -> &RenderStateSet {
        &self.states
    }

    /// Pass enables fixed-function lighting
    pub fn is_lit(&self) -> bool {
        matches!(self.states.get(RenderStateType::Light), Some(RenderState::Light(light)) if light.is_enabled())
    }

    /// Vertex data this pass reads.
    ///
    /// Shader attributes and texture coordinate sets come from the shader
    /// and texture states. Lit passes read normals; unlit passes and
    /// color-material passes read per-vertex colors.
    pub fn summary(&self) -> PassSummary {
        let mut summary = PassSummary::new();
        if let Some(RenderState::Shader(shader)) = self.states.get(RenderStateType::Shader) {
            summary.attributes.extend(shader.attributes().iter().cloned());
        }
        if let Some(RenderState::Texture(texture)) = self.states.get(RenderStateType::Texture) {
            summary.tex_coord_sets.extend(texture.coord_sets());
        }
        let lit = self.is_lit();
        let color_material = matches!(
            self.states.get(RenderStateType::Material),
            Some(RenderState::Material(material)) if material.color_material()
        );
        if lit {
            summary.flags |= SummaryFlags::NORMAL;
        }
        if !lit || color_material {
            summary.flags |= SummaryFlags::COLOR;
        }
        summary
    }

    /// Whether the renderer can execute this pass
    pub fn is_supported(&self, caps: &RendererCaps) -> bool {
        self.states.iter().all(|state| match state {
            RenderState::Shader(shader) => shader.program().is_none() || caps.shaders,
            RenderState::Texture(texture) => {
                texture.unit_count() <= caps.max_texture_units as usize
                    && (!texture.requires_combine() || caps.texture_env_combine)
            }
            RenderState::Light(light) => light.lights().len() <= caps.max_lights as usize,
            _ => true,
        })
    }
}
