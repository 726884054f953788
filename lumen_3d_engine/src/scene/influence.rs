/// Scene influences: volumes that change the fog and lighting of the
/// elements they touch.

use std::sync::Arc;
use glam::Vec4;
use slotmap::new_key_type;
use crate::state::{FogMode, FogState, Light, LightState, RenderState, RenderStateCache, RenderStateSet};
use super::bounds::AABB;

new_key_type! {
    /// Stable handle to an influence in a `Scene`
    pub struct InfluenceKey;
}

/// What one influence contributes
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InfluenceContribution {
    Fog { mode: FogMode, color: Vec4 },
    AmbientLight(Vec4),
    Light(Light),
}

pub trait SceneInfluence: Send + Sync {
    /// World-space volume of effect
    fn bounds(&self) -> AABB;

    fn contribution(&self) -> InfluenceContribution;
}

/// Fog inside a volume
#[derive(Debug, Clone)]
pub struct FogInfluence {
    pub bounds: AABB,
    pub mode: FogMode,
    pub color: Vec4,
}

impl SceneInfluence for FogInfluence {
    fn bounds(&self) -> AABB {
        self.bounds
    }

    fn contribution(&self) -> InfluenceContribution {
        InfluenceContribution::Fog { mode: self.mode, color: self.color }
    }
}

/// Ambient light added inside a volume
#[derive(Debug, Clone)]
pub struct AmbientLightInfluence {
    pub bounds: AABB,
    pub color: Vec4,
}

impl SceneInfluence for AmbientLightInfluence {
    fn bounds(&self) -> AABB {
        self.bounds
    }

    fn contribution(&self) -> InfluenceContribution {
        InfluenceContribution::AmbientLight(self.color)
    }
}

/// A light source affecting elements inside a volume
#[derive(Debug, Clone)]
pub struct LightInfluence {
    pub bounds: AABB,
    pub light: Light,
}

impl SceneInfluence for LightInfluence {
    fn bounds(&self) -> AABB {
        self.bounds
    }

    fn contribution(&self) -> InfluenceContribution {
        InfluenceContribution::Light(self.light)
    }
}

/// Fog and light states resolved for one element.
///
/// `None` leaves the pass (or default) state in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InfluenceSet {
    pub fog: Option<Arc<FogState>>,
    pub lights: Option<Arc<LightState>>,
}

impl InfluenceSet {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Combine contributions: the first fog wins, ambient colors add up,
    /// and at most `max_lights` lights are kept.
    pub fn resolve<I>(contributions: I, states: &mut RenderStateCache, max_lights: usize) -> Self
    where
        I: IntoIterator<Item = InfluenceContribution>,
    {
        let mut fog = None;
        let mut ambient: Option<Vec4> = None;
        let mut lights = Vec::new();
        for contribution in contributions {
            match contribution {
                InfluenceContribution::Fog { mode, color } => {
                    if fog.is_none() {
                        fog = Some(states.fog(Some(mode), color));
                    }
                }
                InfluenceContribution::AmbientLight(color) => {
                    *ambient.get_or_insert(Vec4::ZERO) += color;
                }
                InfluenceContribution::Light(light) => {
                    if lights.len() < max_lights {
                        lights.push(light);
                    }
                }
            }
        }

        let lights = if ambient.is_some() || !lights.is_empty() {
            let base = LightState::disabled().global_ambient();
            let ambient = ambient.map(|a| a.min(Vec4::ONE)).unwrap_or(base);
            Some(Arc::new(LightState::new(lights, ambient)))
        } else {
            None
        };
        Self { fog, lights }
    }

    pub fn is_empty(&self) -> bool {
        self.fog.is_none() && self.lights.is_none()
    }

    /// Write the resolved states into `set`
    pub fn apply_to(&self, set: &mut RenderStateSet) {
        if let Some(fog) = &self.fog {
            set.set(RenderState::Fog(Arc::clone(fog)));
        }
        if let Some(lights) = &self.lights {
            set.set(RenderState::Light(Arc::clone(lights)));
        }
    }
}
