/// Materials: an ordered list of techniques with a capability-filtered
/// cache.

use std::sync::{Arc, Mutex};
use crate::engine_debug;
use crate::renderer::RendererCaps;
use super::scheme::SchemeRegistry;
use super::technique::TechniqueConfig;

#[derive(Debug)]
struct Processed {
    caps: RendererCaps,
    techniques: Vec<Arc<TechniqueConfig>>,
}

#[derive(Debug)]
pub struct Material {
    name: String,
    techniques: Vec<Arc<TechniqueConfig>>,
    processed: Mutex<Option<Processed>>,
}

impl Material {
    /// # Arguments
    ///
    /// * `techniques` - In preference order
    pub fn new(name: impl Into<String>, techniques: Vec<TechniqueConfig>) -> Self {
        Self {
            name: name.into(),
            techniques: techniques.into_iter().map(Arc::new).collect(),
            processed: Mutex::new(None),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// All techniques, supported or not
    pub fn techniques(&self) -> &[Arc<TechniqueConfig>] {
        &self.techniques
    }

    /// Techniques `caps` can run, in preference order.
    ///
    /// Cached until called with different capabilities.
    pub fn supported_techniques(&self, caps: &RendererCaps) -> Vec<Arc<TechniqueConfig>> {
        let mut processed = match self.processed.lock() {
            Ok(lock) => lock,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(cached) = processed.as_ref().filter(|p| p.caps == *caps) {
            return cached.techniques.clone();
        }

        let techniques: Vec<_> = self.techniques.iter()
            .filter(|technique| technique.is_supported(caps))
            .cloned()
            .collect();
        if techniques.len() < self.techniques.len() {
            engine_debug!("lumen3d::Material", "Material '{}': {} of {} techniques unsupported",
                self.name, self.techniques.len() - techniques.len(), self.techniques.len());
        }
        *processed = Some(Processed { caps: *caps, techniques: techniques.clone() });
        techniques
    }

    /// Technique to render with under `scheme`.
    ///
    /// An exact scheme match wins; otherwise the first technique the
    /// registry deems compatible (with no scheme requested, the first
    /// untagged technique). `None` means nothing to render.
    pub fn technique(
        &self,
        scheme: Option<&str>,
        schemes: &SchemeRegistry,
        caps: &RendererCaps,
    ) -> Option<Arc<TechniqueConfig>> {
        let techniques = self.supported_techniques(caps);
        if let Some(name) = scheme {
            if let Some(exact) = techniques.iter().find(|t| t.scheme() == Some(name)) {
                return Some(Arc::clone(exact));
            }
        }
        techniques.into_iter().find(|t| schemes.is_compatible(scheme, t.scheme()))
    }
}
