/// Everything an element needs to emit batches for one view.

use crate::camera::Camera;
use crate::geometry::GeometryBufferCache;
use crate::renderer::Renderer;
use crate::state::RenderStateCache;
use super::render_queue::RenderQueues;
use super::scheme::SchemeRegistry;

pub struct EnqueueContext<'a> {
    pub camera: &'a Camera,
    pub renderer: &'a mut dyn Renderer,
    pub states: &'a mut RenderStateCache,
    pub buffers: &'a mut GeometryBufferCache,
    pub queues: &'a mut RenderQueues,
    pub schemes: &'a SchemeRegistry,
    /// Requested scheme (`None` for the untagged techniques)
    pub scheme: Option<&'a str>,
}

impl<'a> EnqueueContext<'a> {
    pub fn new(
        camera: &'a Camera,
        renderer: &'a mut dyn Renderer,
        states: &'a mut RenderStateCache,
        buffers: &'a mut GeometryBufferCache,
        queues: &'a mut RenderQueues,
        schemes: &'a SchemeRegistry,
    ) -> Self {
        Self { camera, renderer, states, buffers, queues, schemes, scheme: None }
    }

    pub fn with_scheme(mut self, scheme: &'a str) -> Self {
        self.scheme = Some(scheme);
        self
    }
}
