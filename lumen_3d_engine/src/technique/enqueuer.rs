/// Enqueuers: how a technique turns geometry into queued batches.
///
/// `EnqueuerConfig` is the shared description. `compile` resolves it
/// against one geometry and one influence set into a `CompiledEnqueuer`
/// holding the finished state sets and draw commands; only the transform
/// and sort depth change from frame to frame.

use std::sync::Arc;
use crate::error::Result;
use crate::geometry::{GeometryBufferCache, StoredGeometry};
use crate::renderer::{DrawCommand, Renderer, RendererCaps};
use crate::scene::InfluenceSet;
use crate::state::{RenderState, RenderStateCache, RenderStateSet, TransformState};
use super::batch::Batch;
use super::pass::PassConfig;
use super::render_queue::{QueueGroup, RenderQueues};

#[derive(Debug, Clone)]
pub enum EnqueuerConfig {
    /// One batch per pass, at a fixed priority in a named queue
    Normal {
        queue: String,
        priority: i32,
        passes: Vec<PassConfig>,
    },
    /// Children are placed in one sub-group of the named queue.
    ///
    /// Children keep their own priorities inside the group; their queue
    /// names are ignored.
    Grouped {
        queue: String,
        priority: i32,
        enqueuers: Vec<EnqueuerConfig>,
    },
}

impl EnqueuerConfig {
    pub fn normal(queue: impl Into<String>, priority: i32, passes: Vec<PassConfig>) -> Self {
        EnqueuerConfig::Normal { queue: queue.into(), priority, passes }
    }

    pub fn grouped(queue: impl Into<String>, priority: i32, enqueuers: Vec<EnqueuerConfig>) -> Self {
        EnqueuerConfig::Grouped { queue: queue.into(), priority, enqueuers }
    }

    pub fn queue(&self) -> &str {
        match self {
            EnqueuerConfig::Normal { queue, .. } | EnqueuerConfig::Grouped { queue, .. } => queue,
        }
    }

    pub fn priority(&self) -> i32 {
        match self {
            EnqueuerConfig::Normal { priority, .. } | EnqueuerConfig::Grouped { priority, .. } => *priority,
        }
    }

    /// Every pass, depth first
    pub fn passes(&self) -> Vec<&PassConfig> {
        match self {
            EnqueuerConfig::Normal { passes, .. } => passes.iter().collect(),
            EnqueuerConfig::Grouped { enqueuers, .. } => {
                enqueuers.iter().flat_map(EnqueuerConfig::passes).collect()
            }
        }
    }

    pub fn is_supported(&self, caps: &RendererCaps) -> bool {
        self.passes().iter().all(|pass| pass.is_supported(caps))
    }

    /// Resolve states and draw commands for `geometry`.
    ///
    /// Batch states are the defaults, then the influence fog, then the
    /// pass overrides, then the influence lights when the pass is lit, and
    /// finally the geometry's array state for the pass.
    pub fn compile(
        &self,
        geometry: &StoredGeometry,
        renderer: &mut dyn Renderer,
        states: &RenderStateCache,
        buffers: &mut GeometryBufferCache,
        influences: &InfluenceSet,
    ) -> Result<CompiledEnqueuer> {
        match self {
            EnqueuerConfig::Normal { queue, priority, passes } => {
                let aligned = buffers.aligned_strides();
                let mut batches = Vec::with_capacity(passes.len());
                for pass in passes {
                    let array = geometry.create_array_state(renderer, buffers, &pass.summary(), aligned)?;
                    let command = geometry.create_draw_command(renderer, buffers)?;

                    let mut set = states.defaults().clone();
                    if let Some(fog) = &influences.fog {
                        set.set(RenderState::Fog(Arc::clone(fog)));
                    }
                    RenderStateSet::copy(pass.states(), &mut set);
                    if pass.is_lit() {
                        if let Some(lights) = &influences.lights {
                            set.set(RenderState::Light(Arc::clone(lights)));
                        }
                    }
                    set.set(RenderState::Array(array));
                    batches.push((set, command));
                }
                Ok(CompiledEnqueuer::Normal { queue: queue.clone(), priority: *priority, batches })
            }
            EnqueuerConfig::Grouped { queue, priority, enqueuers } => {
                let children = enqueuers
                    .iter()
                    .map(|child| child.compile(geometry, renderer, states, buffers, influences))
                    .collect::<Result<Vec<_>>>()?;
                Ok(CompiledEnqueuer::Grouped { queue: queue.clone(), priority: *priority, children })
            }
        }
    }
}

/// An enqueuer bound to one geometry
#[derive(Debug, Clone)]
pub enum CompiledEnqueuer {
    Normal {
        queue: String,
        priority: i32,
        batches: Vec<(RenderStateSet, DrawCommand)>,
    },
    Grouped {
        queue: String,
        priority: i32,
        children: Vec<CompiledEnqueuer>,
    },
}

impl CompiledEnqueuer {
    pub fn batch_count(&self) -> usize {
        match self {
            CompiledEnqueuer::Normal { batches, .. } => batches.len(),
            CompiledEnqueuer::Grouped { children, .. } => children.iter().map(Self::batch_count).sum(),
        }
    }

    /// Emit this frame's batches into `queues`
    ///
    /// # Arguments
    ///
    /// * `transform` - Modelview transform for this frame
    /// * `depth` - View-space depth used for sorting
    pub fn enqueue(
        &self,
        queues: &mut RenderQueues,
        transform: &Arc<TransformState>,
        depth: f32,
    ) -> Result<()> {
        let queue = match self {
            CompiledEnqueuer::Normal { queue, .. } | CompiledEnqueuer::Grouped { queue, .. } => queue,
        };
        let group = queues.group_mut(queue)?;
        self.add_to(group, transform, depth);
        Ok(())
    }

    fn add_to(&self, group: &mut QueueGroup, transform: &Arc<TransformState>, depth: f32) {
        match self {
            CompiledEnqueuer::Normal { priority, batches, .. } => {
                for (states, command) in batches {
                    let mut states = states.clone();
                    states.set(RenderState::Transform(Arc::clone(transform)));
                    group.add_batch(*priority, Batch::new(states, command.clone(), depth));
                }
            }
            CompiledEnqueuer::Grouped { priority, children, .. } => {
                let mut sub = QueueGroup::new(group.sort_mode());
                for child in children {
                    child.add_to(&mut sub, transform, depth);
                }
                group.add_group(*priority, sub);
            }
        }
    }
}
