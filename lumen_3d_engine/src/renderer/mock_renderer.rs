/// Mock Renderer for unit tests (no GPU required)
///
/// Records created buffers, uploads, applied states and draw commands so
/// tests can verify what reached the rendering context.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use crate::error::{Error, Result};
use crate::renderer::{
    BufferObject, BufferTarget, DrawCommand, Renderer, RendererCaps, RendererStats,
};
use crate::state::RenderState;

// ============================================================================
// Mock Buffer Object
// ============================================================================

#[derive(Debug)]
pub struct MockBufferObject {
    pub id: u32,
    pub target: BufferTarget,
    pub data: Mutex<Vec<u8>>,
    pub uploads: AtomicU32,
}

impl MockBufferObject {
    pub fn new(id: u32, target: BufferTarget) -> Self {
        Self {
            id,
            target,
            data: Mutex::new(Vec::new()),
            uploads: AtomicU32::new(0),
        }
    }

    pub fn contents(&self) -> Vec<u8> {
        self.data.lock().unwrap().clone()
    }

    /// Contents reinterpreted as floats
    pub fn floats(&self) -> Vec<f32> {
        bytemuck::pod_collect_to_vec(&self.contents())
    }

    pub fn upload_count(&self) -> u32 {
        self.uploads.load(Ordering::Relaxed)
    }
}

impl BufferObject for MockBufferObject {
    fn id(&self) -> u32 {
        self.id
    }

    fn target(&self) -> BufferTarget {
        self.target
    }

    fn set_data(&self, data: &[u8]) -> Result<()> {
        *self.data.lock().unwrap() = data.to_vec();
        self.uploads.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn size(&self) -> u64 {
        self.data.lock().unwrap().len() as u64
    }
}

// ============================================================================
// Mock Renderer
// ============================================================================

pub struct MockRenderer {
    pub caps: RendererCaps,
    pub buffers: Vec<Arc<MockBufferObject>>,
    pub applied_states: Vec<RenderState>,
    pub draws: Vec<DrawCommand>,
    pub fail_buffer_creation: bool,
    next_buffer_id: u32,
    stats: RendererStats,
}

impl MockRenderer {
    pub fn new() -> Self {
        Self::with_caps(RendererCaps::default())
    }

    pub fn with_caps(caps: RendererCaps) -> Self {
        Self {
            caps,
            buffers: Vec::new(),
            applied_states: Vec::new(),
            draws: Vec::new(),
            fail_buffer_creation: false,
            next_buffer_id: 1,
            stats: RendererStats::default(),
        }
    }

    pub fn buffer(&self, id: u32) -> Option<&Arc<MockBufferObject>> {
        self.buffers.iter().find(|b| b.id == id)
    }
}

impl Renderer for MockRenderer {
    fn capabilities(&self) -> &RendererCaps {
        &self.caps
    }

    fn create_buffer_object(&mut self, target: BufferTarget) -> Result<Arc<dyn BufferObject>> {
        if self.fail_buffer_creation || !self.caps.vertex_buffer_objects {
            return Err(Error::BackendError("buffer objects unavailable".to_string()));
        }
        let buffer = Arc::new(MockBufferObject::new(self.next_buffer_id, target));
        self.next_buffer_id += 1;
        self.buffers.push(Arc::clone(&buffer));
        Ok(buffer)
    }

    fn apply_state(&mut self, state: &RenderState) -> Result<()> {
        self.applied_states.push(state.clone());
        self.stats.state_changes += 1;
        Ok(())
    }

    fn draw(&mut self, command: &DrawCommand) -> Result<()> {
        self.stats.draw_calls += 1;
        self.stats.primitives += command.primitive_count();
        self.draws.push(command.clone());
        Ok(())
    }

    fn stats(&self) -> RendererStats {
        let uploads: u32 = self.buffers.iter().map(|b| b.upload_count()).sum();
        RendererStats { buffer_uploads: uploads, ..self.stats }
    }

    fn reset_stats(&mut self) {
        self.stats = RendererStats::default();
    }
}
