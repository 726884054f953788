/// Renderer trait - the rendering context states are applied to

use std::sync::Arc;
use crate::error::Result;
use crate::state::RenderState;
use super::buffer::{BufferObject, BufferTarget};
use super::draw_command::DrawCommand;

/// Hardware capabilities consulted by pass support checks and the
/// geometry composer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RendererCaps {
    /// Buffer objects available (otherwise client-side arrays are used)
    pub vertex_buffer_objects: bool,
    /// Programmable shaders available
    pub shaders: bool,
    /// Texture env combine available
    pub texture_env_combine: bool,
    /// Number of texture units
    pub max_texture_units: u32,
    /// Number of fixed-function lights
    pub max_lights: u32,
}

impl Default for RendererCaps {
    fn default() -> Self {
        Self {
            vertex_buffer_objects: true,
            shaders: true,
            texture_env_combine: true,
            max_texture_units: 8,
            max_lights: 8,
        }
    }
}

impl RendererCaps {
    /// Minimal fixed-function hardware
    pub fn fixed_function() -> Self {
        Self {
            vertex_buffer_objects: false,
            shaders: false,
            texture_env_combine: false,
            max_texture_units: 2,
            max_lights: 8,
        }
    }
}

/// Renderer statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RendererStats {
    /// Number of draw calls
    pub draw_calls: u32,
    /// Number of render states pushed to the context
    pub state_changes: u32,
    /// Number of primitives assembled
    pub primitives: u32,
    /// Number of buffer uploads
    pub buffer_uploads: u32,
}

/// Main renderer trait
///
/// Implemented by backend-specific renderers. Receives finalized per-axis
/// state application calls and draw commands.
pub trait Renderer: Send + Sync {
    /// Hardware capabilities
    fn capabilities(&self) -> &RendererCaps;

    /// Create an empty buffer object
    ///
    /// # Arguments
    ///
    /// * `target` - Binding target of the new buffer
    fn create_buffer_object(&mut self, target: BufferTarget) -> Result<Arc<dyn BufferObject>>;

    /// Push one state's parameters to the context
    fn apply_state(&mut self, state: &RenderState) -> Result<()>;

    /// Submit a draw using the currently applied states
    fn draw(&mut self, command: &DrawCommand) -> Result<()>;

    /// Statistics since the last `reset_stats`
    fn stats(&self) -> RendererStats;

    fn reset_stats(&mut self);
}
