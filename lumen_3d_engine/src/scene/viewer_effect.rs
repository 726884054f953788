/// Viewer effects: volumes that change global view parameters while the
/// camera is inside them.

use glam::Vec4;
use slotmap::new_key_type;
use super::bounds::AABB;

new_key_type! {
    /// Stable handle to a viewer effect in a `Scene`
    pub struct EffectKey;
}

/// Global view parameters modified by effects
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewerState {
    pub background_color: Vec4,
}

impl Default for ViewerState {
    fn default() -> Self {
        Self { background_color: Vec4::new(0.0, 0.0, 0.0, 1.0) }
    }
}

pub trait ViewerEffect: Send + Sync {
    /// World-space volume in which the effect is active
    fn bounds(&self) -> AABB;

    /// Camera entered the volume
    fn activate(&mut self, _state: &mut ViewerState) {}

    /// Camera left the volume (or the effect was removed while active)
    fn deactivate(&mut self, _state: &mut ViewerState) {}

    /// Called every update while active
    fn update(&mut self, _state: &mut ViewerState) {}
}

/// Overrides the background color while active
#[derive(Debug, Clone)]
pub struct BackgroundColorEffect {
    bounds: AABB,
    color: Vec4,
    previous: Option<Vec4>,
}

impl BackgroundColorEffect {
    pub fn new(bounds: AABB, color: Vec4) -> Self {
        Self { bounds, color, previous: None }
    }

    pub fn is_active(&self) -> bool {
        self.previous.is_some()
    }
}

impl ViewerEffect for BackgroundColorEffect {
    fn bounds(&self) -> AABB {
        self.bounds
    }

    fn activate(&mut self, state: &mut ViewerState) {
        self.previous = Some(state.background_color);
        state.background_color = self.color;
    }

    fn deactivate(&mut self, state: &mut ViewerState) {
        if let Some(previous) = self.previous.take() {
            state.background_color = previous;
        }
    }

    fn update(&mut self, state: &mut ViewerState) {
        state.background_color = self.color;
    }
}
