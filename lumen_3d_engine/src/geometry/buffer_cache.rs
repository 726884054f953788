/// Bounded caches for values derived from stored geometry.

use std::sync::Arc;
use crate::config::BufferCacheConfig;
use crate::renderer::DrawCommand;
use crate::state::ArrayState;
use crate::utils::LruCache;
use super::array_config::ArrayId;
use super::stored::GeometryId;

/// Identity of an interleaved array state: stride mode, backing storage and
/// the ordered ids of the source arrays
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct ArrayStateKey {
    pub aligned: bool,
    /// Buffer object (otherwise client memory)
    pub buffer_objects: bool,
    pub arrays: Vec<ArrayId>,
}

/// Array states and draw commands shared across geometries.
///
/// Eviction only costs a rebuild; entries are recomputed on demand.
pub struct GeometryBufferCache {
    pub(crate) array_states: LruCache<ArrayStateKey, Arc<ArrayState>>,
    /// Keyed by geometry and whether buffer objects were used
    pub(crate) draw_commands: LruCache<(GeometryId, bool), DrawCommand>,
    aligned_strides: bool,
}

impl GeometryBufferCache {
    pub fn new(config: &BufferCacheConfig) -> Self {
        Self {
            array_states: LruCache::new(config.array_state_capacity),
            draw_commands: LruCache::new(config.draw_command_capacity),
            aligned_strides: config.aligned_strides,
        }
    }

    /// Default stride mode for array states built through this cache
    pub fn aligned_strides(&self) -> bool {
        self.aligned_strides
    }

    pub fn array_state_count(&self) -> usize {
        self.array_states.len()
    }

    pub fn draw_command_count(&self) -> usize {
        self.draw_commands.len()
    }

    /// Cache hits across both tables
    pub fn hits(&self) -> u64 {
        self.array_states.hits() + self.draw_commands.hits()
    }

    pub fn misses(&self) -> u64 {
        self.array_states.misses() + self.draw_commands.misses()
    }

    /// Drop the draw commands of one geometry
    pub fn forget_geometry(&mut self, id: GeometryId) {
        self.draw_commands.remove(&(id, true));
        self.draw_commands.remove(&(id, false));
    }

    pub fn clear(&mut self) {
        self.array_states.clear();
        self.draw_commands.clear();
    }
}

impl Default for GeometryBufferCache {
    fn default() -> Self {
        Self::new(&BufferCacheConfig::default())
    }
}
