/// Fixed-function lighting.
///
/// Not interned: light states are assembled per element from the scene
/// influences that touch it.

use glam::{Vec3, Vec4};

/// Light source geometry
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightKind {
    /// Infinitely distant light shining along `direction`
    Directional { direction: Vec3 },
    /// Positional light with constant/linear/quadratic attenuation
    Point { position: Vec3, attenuation: Vec3 },
    /// Positional light restricted to a cone
    Spot { position: Vec3, direction: Vec3, cutoff: f32, exponent: f32 },
}

/// One light source
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub kind: LightKind,
    pub ambient: Vec4,
    pub diffuse: Vec4,
    pub specular: Vec4,
}

impl Light {
    pub fn directional(direction: Vec3, diffuse: Vec4) -> Self {
        Self {
            kind: LightKind::Directional { direction: direction.normalize_or_zero() },
            ambient: Vec4::new(0.0, 0.0, 0.0, 1.0),
            diffuse,
            specular: diffuse,
        }
    }

    pub fn point(position: Vec3, diffuse: Vec4) -> Self {
        Self {
            kind: LightKind::Point { position, attenuation: Vec3::new(1.0, 0.0, 0.0) },
            ambient: Vec4::new(0.0, 0.0, 0.0, 1.0),
            diffuse,
            specular: diffuse,
        }
    }
}

/// Enabled lights and the global ambient term
#[derive(Debug, Clone, PartialEq)]
pub struct LightState {
    lights: Vec<Light>,
    global_ambient: Vec4,
    enabled: bool,
}

impl LightState {
    pub fn new(lights: Vec<Light>, global_ambient: Vec4) -> Self {
        Self { lights, global_ambient, enabled: true }
    }

    /// Lighting off
    pub fn disabled() -> Self {
        Self {
            lights: Vec::new(),
            global_ambient: Vec4::new(0.2, 0.2, 0.2, 1.0),
            enabled: false,
        }
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    pub fn global_ambient(&self) -> Vec4 {
        self.global_ambient
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}
