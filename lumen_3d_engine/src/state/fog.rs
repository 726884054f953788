use glam::Vec4;

/// Fog falloff equation
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FogMode {
    Linear { start: f32, end: f32 },
    Exponential { density: f32 },
    ExponentialSquared { density: f32 },
}

/// Fog parameters; `mode == None` disables fog.
///
/// Interned: obtain instances through `RenderStateCache::fog`.
#[derive(Debug, Clone, PartialEq)]
pub struct FogState {
    mode: Option<FogMode>,
    color: Vec4,
}

impl FogState {
    pub(crate) fn new(mode: Option<FogMode>, color: Vec4) -> Self {
        Self { mode, color }
    }

    pub fn mode(&self) -> Option<FogMode> {
        self.mode
    }

    pub fn color(&self) -> Vec4 {
        self.color
    }

    pub fn is_enabled(&self) -> bool {
        self.mode.is_some()
    }

    /// Fraction of the original color kept at `distance` (1 = no fog)
    pub fn factor(&self, distance: f32) -> f32 {
        let factor = match self.mode {
            None => 1.0,
            Some(FogMode::Linear { start, end }) => {
                if end <= start {
                    if distance < end { 1.0 } else { 0.0 }
                } else {
                    (end - distance) / (end - start)
                }
            }
            Some(FogMode::Exponential { density }) => (-density * distance).exp(),
            Some(FogMode::ExponentialSquared { density }) => {
                let d = density * distance;
                (-d * d).exp()
            }
        };
        factor.clamp(0.0, 1.0)
    }
}
