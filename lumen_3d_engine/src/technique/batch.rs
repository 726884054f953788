/// A fully resolved draw: complete state set plus draw command.

use std::hash::{Hash, Hasher};
use rustc_hash::FxHasher;
use crate::renderer::DrawCommand;
use crate::state::{RenderStateSet, RenderStateType};

#[derive(Debug, Clone)]
pub struct Batch {
    pub states: RenderStateSet,
    pub command: DrawCommand,
    /// View-space distance used for depth sorting
    pub depth: f32,
}

impl Batch {
    pub fn new(states: RenderStateSet, command: DrawCommand, depth: f32) -> Self {
        Self { states, command, depth }
    }

    /// Groups batches sharing their expensive states (shader, texture,
    /// material, alpha) when sorting
    pub fn state_key(&self) -> u32 {
        let mut hasher = FxHasher::default();
        for state_type in [
            RenderStateType::Shader,
            RenderStateType::Texture,
            RenderStateType::Material,
            RenderStateType::Alpha,
        ] {
            self.states.get(state_type).map(|state| state.identity()).hash(&mut hasher);
        }
        hasher.finish() as u32
    }
}
