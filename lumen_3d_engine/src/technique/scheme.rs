/// Render schemes: named rendering modes ("default", "shadow", "glow", ...)
/// used to pick one of a material's techniques.

use rustc_hash::FxHashMap;

/// A requested scheme and the technique schemes it accepts as fallbacks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderScheme {
    name: String,
    compatible: Vec<String>,
    accepts_undefined: bool,
}

impl RenderScheme {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), compatible: Vec::new(), accepts_undefined: false }
    }

    /// Also accept techniques tagged with `scheme`
    pub fn with_compatible(mut self, scheme: impl Into<String>) -> Self {
        self.compatible.push(scheme.into());
        self
    }

    /// Also accept techniques with no scheme
    pub fn accepting_undefined(mut self) -> Self {
        self.accepts_undefined = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn compatible(&self) -> &[String] {
        &self.compatible
    }

    pub fn accepts_undefined(&self) -> bool {
        self.accepts_undefined
    }

    /// Whether a technique tagged `technique_scheme` may serve this scheme
    pub fn accepts(&self, technique_scheme: Option<&str>) -> bool {
        match technique_scheme {
            Some(scheme) => scheme == self.name || self.compatible.iter().any(|c| c == scheme),
            None => self.accepts_undefined,
        }
    }
}

/// Known schemes by name
#[derive(Debug, Clone, Default)]
pub struct SchemeRegistry {
    schemes: FxHashMap<String, RenderScheme>,
}

impl SchemeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) a scheme
    pub fn register(&mut self, scheme: RenderScheme) {
        self.schemes.insert(scheme.name.clone(), scheme);
    }

    pub fn get(&self, name: &str) -> Option<&RenderScheme> {
        self.schemes.get(name)
    }

    pub fn len(&self) -> usize {
        self.schemes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemes.is_empty()
    }

    /// Whether a technique tagged `technique` may serve a request for
    /// `requested`.
    ///
    /// With no requested scheme only untagged techniques qualify. An
    /// unregistered requested scheme only accepts exact matches.
    pub fn is_compatible(&self, requested: Option<&str>, technique: Option<&str>) -> bool {
        match requested {
            None => technique.is_none(),
            Some(name) => match self.schemes.get(name) {
                Some(scheme) => scheme.accepts(technique),
                None => technique == Some(name),
            },
        }
    }
}
