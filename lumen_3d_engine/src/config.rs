//! Engine configuration
//!
//! Plain value types with sensible defaults. Components take the sub-config
//! they need by reference; the `Engine` singleton keeps a validated copy.

use crate::error::{Error, Result};
use crate::log::LogSeverity;

/// Top-level engine configuration
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Entries below this severity are dropped before reaching the logger
    pub log_level: LogSeverity,
    /// Spatial hash layout
    pub spatial: SpatialConfig,
    /// Geometry buffer cache sizes and layout mode
    pub buffers: BufferCacheConfig,
    /// Scene container settings
    pub scene: SceneConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            log_level: LogSeverity::Info,
            spatial: SpatialConfig::default(),
            buffers: BufferCacheConfig::default(),
            scene: SceneConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Validate every sub-configuration
    pub fn validate(&self) -> Result<()> {
        self.spatial.validate()?;
        self.buffers.validate()?;
        self.scene.validate()
    }
}

/// Multi-resolution spatial hash layout
///
/// Level `ii` (0 = coarsest) uses cells of size
/// `finest_cell_size * 2^(levels - 1 - ii)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpatialConfig {
    /// Edge length of a cell at the finest level
    pub finest_cell_size: f32,
    /// Number of levels
    pub levels: usize,
}

impl Default for SpatialConfig {
    fn default() -> Self {
        Self {
            finest_cell_size: 4.0,
            levels: 4,
        }
    }
}

impl SpatialConfig {
    /// Largest level exponent accepted (cell sizes up to finest * 2^20)
    pub const MAX_LEVELS: usize = 21;

    pub fn validate(&self) -> Result<()> {
        if !(self.finest_cell_size.is_finite() && self.finest_cell_size > 0.0) {
            return Err(Error::InitializationFailed(format!(
                "finest_cell_size must be positive and finite, got {}",
                self.finest_cell_size
            )));
        }
        if self.levels == 0 || self.levels > Self::MAX_LEVELS {
            return Err(Error::InitializationFailed(format!(
                "levels must be in 1..={}, got {}",
                Self::MAX_LEVELS,
                self.levels
            )));
        }
        Ok(())
    }

    /// Cell size of level `ii` (0 = coarsest)
    pub fn cell_size(&self, ii: usize) -> f32 {
        let shift = (self.levels - 1 - ii.min(self.levels - 1)) as i32;
        self.finest_cell_size * 2f32.powi(shift)
    }
}

/// Geometry buffer cache settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BufferCacheConfig {
    /// Maximum number of cached interleaved array states
    pub array_state_capacity: usize,
    /// Maximum number of cached element buffers / draw commands
    pub draw_command_capacity: usize,
    /// Round interleaved strides up to the next power of two
    pub aligned_strides: bool,
}

impl Default for BufferCacheConfig {
    fn default() -> Self {
        Self {
            array_state_capacity: 256,
            draw_command_capacity: 256,
            aligned_strides: false,
        }
    }
}

impl BufferCacheConfig {
    pub fn validate(&self) -> Result<()> {
        if self.array_state_capacity == 0 || self.draw_command_capacity == 0 {
            return Err(Error::InitializationFailed(
                "buffer cache capacities must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Scene container settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneConfig {
    /// Maximum pooled transient models kept per config reference
    pub transient_pool_capacity: usize,
    /// Maximum lights resolved from influences for one element (0 disables
    /// influence lights; ambient contributions still apply)
    pub max_influence_lights: usize,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            transient_pool_capacity: 16,
            max_influence_lights: 8,
        }
    }
}

impl SceneConfig {
    /// Most lights one element can receive from influences (the
    /// fixed-function light unit count)
    pub const MAX_INFLUENCE_LIGHTS: usize = 8;

    pub fn validate(&self) -> Result<()> {
        if self.max_influence_lights > Self::MAX_INFLUENCE_LIGHTS {
            return Err(Error::InitializationFailed(format!(
                "max_influence_lights must be at most {}, got {}",
                Self::MAX_INFLUENCE_LIGHTS,
                self.max_influence_lights
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
