/// Pools of reusable transient models (effects, projectiles, debris).

use rustc_hash::FxHashMap;
use crate::error::Result;
use crate::engine_trace;
use super::element::SceneElement;

/// Reference to the model configuration a transient is built from
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConfigRef(pub String);

impl ConfigRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

impl From<&str> for ConfigRef {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

/// Creates models for configurations with no pooled instance
pub trait ModelFactory {
    fn create(&mut self, config: &ConfigRef) -> Result<Box<dyn SceneElement>>;
}

/// Previously used models, pooled per configuration.
///
/// Each per-configuration pool holds at most `capacity` models; extra
/// released models are dropped.
pub struct TransientPool {
    pools: FxHashMap<ConfigRef, Vec<Box<dyn SceneElement>>>,
    capacity: usize,
}

impl TransientPool {
    pub fn new(capacity: usize) -> Self {
        Self { pools: FxHashMap::default(), capacity }
    }

    /// A reset pooled model, or a new one from `factory`
    pub fn acquire(
        &mut self,
        config: &ConfigRef,
        factory: &mut dyn ModelFactory,
    ) -> Result<Box<dyn SceneElement>> {
        if let Some(mut model) = self.pools.get_mut(config).and_then(Vec::pop) {
            model.reset();
            engine_trace!("lumen3d::TransientPool", "Reusing pooled model '{}'", config.0);
            return Ok(model);
        }
        factory.create(config)
    }

    /// Return a model to its pool; `false` if the pool was full
    pub fn release(&mut self, config: ConfigRef, model: Box<dyn SceneElement>) -> bool {
        let pool = self.pools.entry(config).or_default();
        if pool.len() >= self.capacity {
            return false;
        }
        pool.push(model);
        true
    }

    /// Models pooled for `config`
    pub fn pooled(&self, config: &ConfigRef) -> usize {
        self.pools.get(config).map_or(0, Vec::len)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.pools.clear();
    }
}
