/// Model: the standard renderable element: geometry drawn with a material.

use std::sync::Arc;
use glam::Mat4;
use crate::error::Result;
use crate::geometry::StoredGeometry;
use crate::renderer::RendererCaps;
use crate::state::TransformState;
use crate::technique::{CompiledEnqueuer, EnqueueContext, Material, TechniqueConfig};
use super::bounds::AABB;
use super::element::{SceneElement, TickPolicy};
use super::influence::InfluenceSet;

/// Enqueuer compiled for one technique, influence set and set of renderer
/// capabilities
struct CompiledModel {
    technique: Arc<TechniqueConfig>,
    caps: RendererCaps,
    influences: InfluenceSet,
    enqueuer: CompiledEnqueuer,
}

pub struct Model {
    geometry: Arc<StoredGeometry>,
    material: Arc<Material>,
    transform: Mat4,
    tick_policy: TickPolicy,
    compiled: Option<CompiledModel>,
}

impl Model {
    pub fn new(geometry: Arc<StoredGeometry>, material: Arc<Material>) -> Self {
        Self {
            geometry,
            material,
            transform: Mat4::IDENTITY,
            tick_policy: TickPolicy::Never,
            compiled: None,
        }
    }

    pub fn with_transform(mut self, transform: Mat4) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_tick_policy(mut self, tick_policy: TickPolicy) -> Self {
        self.tick_policy = tick_policy;
        self
    }

    pub fn geometry(&self) -> &Arc<StoredGeometry> {
        &self.geometry
    }

    pub fn material(&self) -> &Arc<Material> {
        &self.material
    }

    pub fn transform(&self) -> &Mat4 {
        &self.transform
    }

    /// Technique currently compiled (if any)
    pub fn technique(&self) -> Option<&Arc<TechniqueConfig>> {
        self.compiled.as_ref().map(|compiled| &compiled.technique)
    }
}

impl SceneElement for Model {
    fn bounds(&self) -> AABB {
        self.geometry.bounds().transformed(&self.transform)
    }

    fn tick_policy(&self) -> TickPolicy {
        self.tick_policy
    }

    fn enqueue(&mut self, ctx: &mut EnqueueContext, influences: &InfluenceSet) -> Result<()> {
        let caps = *ctx.renderer.capabilities();
        let Some(technique) = self.material.technique(ctx.scheme, ctx.schemes, &caps) else {
            return Ok(());
        };

        let stale = match &self.compiled {
            Some(compiled) => {
                !Arc::ptr_eq(&compiled.technique, &technique)
                    || compiled.caps != caps
                    || compiled.influences != *influences
            }
            None => true,
        };
        if stale {
            let enqueuer = technique.enqueuer.compile(
                &self.geometry,
                ctx.renderer,
                ctx.states,
                ctx.buffers,
                influences,
            )?;
            self.compiled = Some(CompiledModel {
                technique,
                caps,
                influences: influences.clone(),
                enqueuer,
            });
        }

        let Some(compiled) = &self.compiled else {
            return Ok(());
        };
        let transform = Arc::new(TransformState::new(*ctx.camera.view_matrix() * self.transform));
        let depth = ctx.camera.view_depth(self.bounds().center());
        compiled.enqueuer.enqueue(ctx.queues, &transform, depth)
    }

    fn set_transform(&mut self, transform: Mat4) {
        self.transform = transform;
    }

    fn reset(&mut self) {
        self.transform = Mat4::IDENTITY;
        self.compiled = None;
    }
}
