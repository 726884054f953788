/// Scene members that are ticked and rendered.

use glam::Mat4;
use slotmap::new_key_type;
use crate::error::Result;
use crate::technique::EnqueueContext;
use super::bounds::AABB;
use super::influence::InfluenceSet;

new_key_type! {
    /// Stable handle to an element in a `Scene`
    pub struct ElementKey;
}

/// When an element's `tick` runs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TickPolicy {
    /// Never ticked
    #[default]
    Never,
    /// Ticked only in frames where it was enqueued
    WhenVisible,
    /// Ticked every frame regardless of visibility
    Always,
}

/// Passed to `SceneElement::tick`.
///
/// Removal of the ticking element itself is immediate once its tick
/// returns; removal of other elements is deferred to the end of the pass.
#[derive(Debug)]
pub struct TickContext {
    key: ElementKey,
    remove_self: bool,
    removals: Vec<ElementKey>,
}

impl TickContext {
    pub(crate) fn new(key: ElementKey) -> Self {
        Self { key, remove_self: false, removals: Vec::new() }
    }

    /// Key of the element being ticked
    pub fn key(&self) -> ElementKey {
        self.key
    }

    /// Remove the ticking element from the scene
    pub fn remove_self(&mut self) {
        self.remove_self = true;
    }

    /// Remove another element after the tick pass
    pub fn remove(&mut self, key: ElementKey) {
        if key == self.key {
            self.remove_self = true;
        } else {
            self.removals.push(key);
        }
    }

    pub(crate) fn into_parts(self) -> (bool, Vec<ElementKey>) {
        (self.remove_self, self.removals)
    }
}

/// An object owned by a `Scene`.
///
/// Elements report world-space bounds for the spatial index. A bounds
/// change must be bracketed by `Scene::bounds_will_change` and
/// `Scene::bounds_did_change` (or go through `Scene::update_bounds`).
pub trait SceneElement: Send {
    /// World-space bounds
    fn bounds(&self) -> AABB;

    /// Read when the element is added (see `Scene::refresh_tick_policy`)
    fn tick_policy(&self) -> TickPolicy {
        TickPolicy::Never
    }

    /// Advance by `elapsed` seconds
    fn tick(&mut self, _elapsed: f32, _ctx: &mut TickContext) {}

    /// Emit batches for the current view
    ///
    /// # Arguments
    ///
    /// * `ctx` - Camera, renderer, caches and render queues of this pass
    /// * `influences` - Fog and lighting of the influences touching the element
    fn enqueue(&mut self, ctx: &mut EnqueueContext, influences: &InfluenceSet) -> Result<()>;

    /// Replace the world transform
    fn set_transform(&mut self, _transform: Mat4) {}

    /// Return to the freshly created state (before reuse from a pool)
    fn reset(&mut self) {}

    fn was_added(&mut self) {}

    fn will_be_removed(&mut self) {}
}
