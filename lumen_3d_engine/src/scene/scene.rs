/// Scene: owns elements, influences and viewer effects.
///
/// Members are stored in SlotMaps for O(1) insert/remove with stable keys
/// and indexed by their world-space bounds. Elements are indexed in a
/// `SceneIndex` (a `HashSceneIndex` by default); influences and viewer
/// effects are few and use a `BruteForceSceneIndex`.
///
/// Frame flow: `enqueue` culls against the camera frustum and asks every
/// visible element for batches; `tick` then advances `Always` elements and
/// the `WhenVisible` elements enqueued since the previous tick.

use glam::{Mat4, Vec3};
use rustc_hash::FxHashSet;
use slotmap::SlotMap;
use crate::config::EngineConfig;
use crate::error::Result;
use crate::engine_trace;
use crate::state::RenderStateCache;
use crate::technique::EnqueueContext;
use super::bounds::AABB;
use super::element::{ElementKey, SceneElement, TickContext, TickPolicy};
use super::hash_scene::HashSceneIndex;
use super::influence::{InfluenceKey, InfluenceSet, SceneInfluence};
use super::scene_index::{BruteForceSceneIndex, QueryStats, SceneIndex};
use super::transient::{ConfigRef, ModelFactory, TransientPool};
use super::viewer_effect::{EffectKey, ViewerEffect, ViewerState};
use super::visit::{VisitCounter, VisitStamp};

/// Outcome of one `Scene::enqueue`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnqueueStats {
    /// Visitation id of the pass
    pub visit: u32,
    pub query: QueryStats,
    /// Elements asked to enqueue
    pub enqueued: u32,
}

struct ElementRecord {
    element: Box<dyn SceneElement>,
    /// Bounds as last read (indexed unless the element is mid-change)
    bounds: AABB,
    policy: TickPolicy,
    stamp: VisitStamp,
    /// Resolved influences and the influence generation they were built for
    influences: Option<(u64, InfluenceSet)>,
    transient: Option<ConfigRef>,
}

pub struct Scene {
    elements: SlotMap<ElementKey, ElementRecord>,
    element_index: Box<dyn SceneIndex<ElementKey>>,
    /// Iterated in reverse during tick
    always_tick: Vec<ElementKey>,
    /// `WhenVisible` elements enqueued since the last tick
    visible: Vec<ElementKey>,
    visible_set: FxHashSet<ElementKey>,
    /// Between `bounds_will_change` and `bounds_did_change`
    changing: FxHashSet<ElementKey>,
    visits: VisitCounter,
    influences: SlotMap<InfluenceKey, Box<dyn SceneInfluence>>,
    influence_index: BruteForceSceneIndex<InfluenceKey>,
    /// Bumped whenever the influence set changes
    influence_generation: u64,
    effects: SlotMap<EffectKey, Box<dyn ViewerEffect>>,
    effect_index: BruteForceSceneIndex<EffectKey>,
    active_effects: Vec<EffectKey>,
    transients: TransientPool,
    max_influence_lights: usize,
    scratch: Vec<ElementKey>,
}

impl Scene {
    /// Create an empty scene indexed by a `HashSceneIndex`
    pub fn new(config: &EngineConfig) -> Self {
        Self::with_index(config, Box::new(HashSceneIndex::new(&config.spatial)))
    }

    /// Create an empty scene with a custom element index
    pub fn with_index(config: &EngineConfig, element_index: Box<dyn SceneIndex<ElementKey>>) -> Self {
        Self {
            elements: SlotMap::with_key(),
            element_index,
            always_tick: Vec::new(),
            visible: Vec::new(),
            visible_set: FxHashSet::default(),
            changing: FxHashSet::default(),
            visits: VisitCounter::new(),
            influences: SlotMap::with_key(),
            influence_index: BruteForceSceneIndex::new(),
            influence_generation: 0,
            effects: SlotMap::with_key(),
            effect_index: BruteForceSceneIndex::new(),
            active_effects: Vec::new(),
            transients: TransientPool::new(config.scene.transient_pool_capacity),
            max_influence_lights: config.scene.max_influence_lights,
            scratch: Vec::new(),
        }
    }

    // ===== ELEMENTS =====

    /// Add an element; its bounds and tick policy are read now
    pub fn add(&mut self, element: Box<dyn SceneElement>) -> ElementKey {
        let bounds = element.bounds();
        let policy = element.tick_policy();
        let key = self.elements.insert(ElementRecord {
            element,
            bounds,
            policy,
            stamp: VisitStamp::new(),
            influences: None,
            transient: None,
        });
        self.element_index.insert(key, &bounds);
        if policy == TickPolicy::Always {
            self.always_tick.push(key);
        }
        if let Some(record) = self.elements.get_mut(key) {
            record.element.was_added();
        }
        key
    }

    /// Remove an element. Transient elements go back to their pool.
    ///
    /// Returns false if the key is invalid.
    pub fn remove(&mut self, key: ElementKey) -> bool {
        let Some(mut record) = self.elements.remove(key) else {
            return false;
        };
        self.element_index.remove(key);
        if let Some(pos) = self.always_tick.iter().position(|&k| k == key) {
            self.always_tick.remove(pos);
        }
        if self.visible_set.remove(&key) {
            self.visible.retain(|&k| k != key);
        }
        self.changing.remove(&key);

        record.element.will_be_removed();
        if let Some(config) = record.transient {
            if !self.transients.release(config, record.element) {
                engine_trace!("lumen3d::Scene", "Transient pool full, dropping model");
            }
        }
        true
    }

    pub fn contains(&self, key: ElementKey) -> bool {
        self.elements.contains_key(key)
    }

    pub fn element(&self, key: ElementKey) -> Option<&dyn SceneElement> {
        match self.elements.get(key) {
            Some(record) => Some(&*record.element),
            None => None,
        }
    }

    /// Mutable access. Bounds changes must still be bracketed by
    /// `bounds_will_change` / `bounds_did_change`.
    pub fn element_mut(&mut self, key: ElementKey) -> Option<&mut dyn SceneElement> {
        match self.elements.get_mut(key) {
            Some(record) => Some(&mut *record.element),
            None => None,
        }
    }

    pub fn element_keys(&self) -> impl Iterator<Item = ElementKey> + '_ {
        self.elements.keys()
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Bounds as last read from the element
    pub fn bounds(&self, key: ElementKey) -> Option<AABB> {
        self.elements.get(key).map(|record| record.bounds)
    }

    pub fn element_index(&self) -> &dyn SceneIndex<ElementKey> {
        &*self.element_index
    }

    /// Remove all elements, influences and effects (pools are kept)
    pub fn clear(&mut self) {
        let keys: Vec<ElementKey> = self.elements.keys().collect();
        for key in keys {
            self.remove(key);
        }
        self.influences.clear();
        self.influence_index.clear();
        self.influence_generation += 1;
        self.effects.clear();
        self.effect_index.clear();
        self.active_effects.clear();
    }

    // ===== BOUNDS PROTOCOL =====

    /// Take the element out of the spatial index before its bounds change.
    ///
    /// Returns false if the key is invalid.
    pub fn bounds_will_change(&mut self, key: ElementKey) -> bool {
        if !self.elements.contains_key(key) {
            return false;
        }
        if self.changing.insert(key) {
            self.element_index.remove(key);
        }
        true
    }

    /// Re-read the element's bounds and reinsert it.
    ///
    /// Also valid without a preceding `bounds_will_change`.
    pub fn bounds_did_change(&mut self, key: ElementKey) -> bool {
        let Some(record) = self.elements.get_mut(key) else {
            return false;
        };
        record.bounds = record.element.bounds();
        record.influences = None;
        self.changing.remove(&key);
        self.element_index.insert(key, &record.bounds);
        true
    }

    /// Mutate an element inside a bounds-change bracket
    pub fn update_bounds<F>(&mut self, key: ElementKey, mutate: F) -> bool
    where
        F: FnOnce(&mut dyn SceneElement),
    {
        if !self.bounds_will_change(key) {
            return false;
        }
        if let Some(element) = self.element_mut(key) {
            mutate(element);
        }
        self.bounds_did_change(key)
    }

    /// Move an element (transform plus bounds update)
    pub fn set_transform(&mut self, key: ElementKey, transform: Mat4) -> bool {
        self.update_bounds(key, |element| element.set_transform(transform))
    }

    // ===== TICKING =====

    /// Re-read an element's tick policy.
    ///
    /// Leaving `WhenVisible` drops a pending visible tick.
    pub fn refresh_tick_policy(&mut self, key: ElementKey) -> bool {
        let Some(record) = self.elements.get_mut(key) else {
            return false;
        };
        let policy = record.element.tick_policy();
        if policy == record.policy {
            return true;
        }
        match record.policy {
            TickPolicy::Always => self.always_tick.retain(|&k| k != key),
            // Pending visible ticks belong to the old policy
            TickPolicy::WhenVisible => {
                if self.visible_set.remove(&key) {
                    self.visible.retain(|&k| k != key);
                }
            }
            TickPolicy::Never => {}
        }
        if policy == TickPolicy::Always {
            self.always_tick.push(key);
        }
        record.policy = policy;
        true
    }

    pub fn always_tick_count(&self) -> usize {
        self.always_tick.len()
    }

    /// `WhenVisible` elements waiting for the next tick
    pub fn visible(&self) -> &[ElementKey] {
        &self.visible
    }

    /// Tick `Always` elements (last added first), then the `WhenVisible`
    /// elements enqueued since the previous tick, then clear the visible
    /// set. Removals requested for other elements apply at the end.
    pub fn tick(&mut self, elapsed: f32) {
        let mut deferred = Vec::new();

        let mut index = self.always_tick.len();
        while index > 0 {
            index -= 1;
            if let Some(&key) = self.always_tick.get(index) {
                self.tick_element(key, elapsed, &mut deferred);
            }
        }

        let visible = std::mem::take(&mut self.visible);
        self.visible_set.clear();
        for key in visible {
            self.tick_element(key, elapsed, &mut deferred);
        }

        for key in deferred {
            self.remove(key);
        }
    }

    fn tick_element(&mut self, key: ElementKey, elapsed: f32, deferred: &mut Vec<ElementKey>) {
        let Some(record) = self.elements.get_mut(key) else {
            return;
        };
        let mut ctx = TickContext::new(key);
        record.element.tick(elapsed, &mut ctx);
        let (remove_self, removals) = ctx.into_parts();
        deferred.extend(removals);
        if remove_self {
            self.remove(key);
        }
    }

    // ===== ENQUEUE =====

    /// Ask every element intersecting the camera frustum for batches.
    ///
    /// Each element is visited at most once per pass and receives the
    /// influences touching its bounds. If an element fails, the error is
    /// returned and no element of the pass is scheduled for a visible tick.
    pub fn enqueue(&mut self, ctx: &mut EnqueueContext) -> Result<EnqueueStats> {
        let visit = self.visits.next();
        let mut keys = std::mem::take(&mut self.scratch);
        keys.clear();
        let query = self.element_index.query_frustum(ctx.camera.frustum(), &mut keys);
        let mut stats = EnqueueStats { visit, query, enqueued: 0 };
        let pending = self.visible.len();
        let result = self.enqueue_keys(&keys, visit, ctx, &mut stats);
        self.scratch = keys;
        if let Err(err) = result {
            self.discard_visible_since(pending);
            return Err(err);
        }
        Ok(stats)
    }

    /// Undo the visible entries of a failed pass. Its visit stamps need no
    /// reset: the next pass draws a fresh visit id.
    fn discard_visible_since(&mut self, pending: usize) {
        for key in self.visible.drain(pending..) {
            self.visible_set.remove(&key);
        }
    }

    fn enqueue_keys(
        &mut self,
        keys: &[ElementKey],
        visit: u32,
        ctx: &mut EnqueueContext,
        stats: &mut EnqueueStats,
    ) -> Result<()> {
        let generation = self.influence_generation;
        for &key in keys {
            let Some(record) = self.elements.get_mut(key) else {
                continue;
            };
            if !record.stamp.update_last_visit(visit) {
                continue;
            }

            let influences = match &record.influences {
                Some((built, set)) if *built == generation => set.clone(),
                _ => {
                    let set = resolve_influences(
                        &self.influence_index,
                        &self.influences,
                        &record.bounds,
                        ctx.states,
                        self.max_influence_lights,
                    );
                    record.influences = Some((generation, set.clone()));
                    set
                }
            };
            record.element.enqueue(ctx, &influences)?;
            stats.enqueued += 1;

            if record.policy == TickPolicy::WhenVisible && self.visible_set.insert(key) {
                self.visible.push(key);
            }
        }
        Ok(())
    }

    // ===== TRANSIENTS =====

    /// Add a pooled (or newly created) model for `config` at `transform`
    pub fn spawn_transient(
        &mut self,
        config: &ConfigRef,
        factory: &mut dyn ModelFactory,
        transform: Mat4,
    ) -> Result<ElementKey> {
        let mut element = self.transients.acquire(config, factory)?;
        element.set_transform(transform);
        let key = self.add(element);
        if let Some(record) = self.elements.get_mut(key) {
            record.transient = Some(config.clone());
        }
        Ok(key)
    }

    pub fn transients(&self) -> &TransientPool {
        &self.transients
    }

    // ===== INFLUENCES =====

    pub fn add_influence(&mut self, influence: Box<dyn SceneInfluence>) -> InfluenceKey {
        let bounds = influence.bounds();
        let key = self.influences.insert(influence);
        self.influence_index.insert(key, &bounds);
        self.influence_generation += 1;
        key
    }

    pub fn remove_influence(&mut self, key: InfluenceKey) -> bool {
        if self.influences.remove(key).is_none() {
            return false;
        }
        self.influence_index.remove(key);
        self.influence_generation += 1;
        true
    }

    pub fn influence_count(&self) -> usize {
        self.influences.len()
    }

    /// Influences touching `bounds`, resolved to fog and light states
    pub fn influences_at(&self, bounds: &AABB, states: &mut RenderStateCache) -> InfluenceSet {
        resolve_influences(&self.influence_index, &self.influences, bounds, states, self.max_influence_lights)
    }

    // ===== VIEWER EFFECTS =====

    pub fn add_effect(&mut self, effect: Box<dyn ViewerEffect>) -> EffectKey {
        let bounds = effect.bounds();
        let key = self.effects.insert(effect);
        self.effect_index.insert(key, &bounds);
        key
    }

    /// Remove an effect, deactivating it first if active
    pub fn remove_effect(&mut self, key: EffectKey, state: &mut ViewerState) -> bool {
        let Some(mut effect) = self.effects.remove(key) else {
            return false;
        };
        self.effect_index.remove(key);
        if let Some(pos) = self.active_effects.iter().position(|&k| k == key) {
            self.active_effects.remove(pos);
            effect.deactivate(state);
        }
        true
    }

    pub fn active_effects(&self) -> &[EffectKey] {
        &self.active_effects
    }

    /// Deactivate effects the eye left, activate those it entered, then
    /// update every active effect.
    pub fn update_viewer_effects(&mut self, eye: Vec3, state: &mut ViewerState) {
        let mut inside = Vec::new();
        self.effect_index.query_bounds(&AABB::new(eye, eye), &mut inside);

        let mut active = Vec::with_capacity(inside.len());
        for key in std::mem::take(&mut self.active_effects) {
            if inside.contains(&key) {
                active.push(key);
            } else if let Some(effect) = self.effects.get_mut(key) {
                effect.deactivate(state);
            }
        }
        for key in inside {
            if active.contains(&key) {
                continue;
            }
            if let Some(effect) = self.effects.get_mut(key) {
                effect.activate(state);
                active.push(key);
            }
        }
        for &key in &active {
            if let Some(effect) = self.effects.get_mut(key) {
                effect.update(state);
            }
        }
        self.active_effects = active;
    }
}

fn resolve_influences(
    index: &BruteForceSceneIndex<InfluenceKey>,
    influences: &SlotMap<InfluenceKey, Box<dyn SceneInfluence>>,
    bounds: &AABB,
    states: &mut RenderStateCache,
    max_lights: usize,
) -> InfluenceSet {
    if influences.is_empty() {
        return InfluenceSet::empty();
    }
    let mut keys = Vec::new();
    index.query_bounds(bounds, &mut keys);
    let contributions = keys.iter()
        .filter_map(|&key| influences.get(key))
        .map(|influence| influence.contribution());
    InfluenceSet::resolve(contributions, states, max_lights)
}

#[cfg(test)]
#[path = "scene_tests.rs"]
mod tests;
