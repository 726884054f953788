/// A way of rendering a material under one scheme.

use crate::renderer::RendererCaps;
use super::enqueuer::EnqueuerConfig;

#[derive(Debug, Clone)]
pub struct TechniqueConfig {
    pub name: String,
    /// `None` for techniques usable when no scheme is requested
    pub scheme: Option<String>,
    pub enqueuer: EnqueuerConfig,
}

impl TechniqueConfig {
    pub fn new(name: impl Into<String>, enqueuer: EnqueuerConfig) -> Self {
        Self { name: name.into(), scheme: None, enqueuer }
    }

    pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = Some(scheme.into());
        self
    }

    pub fn scheme(&self) -> Option<&str> {
        self.scheme.as_deref()
    }

    /// Every pass is supported by `caps`
    pub fn is_supported(&self, caps: &RendererCaps) -> bool {
        self.enqueuer.is_supported(caps)
    }
}
