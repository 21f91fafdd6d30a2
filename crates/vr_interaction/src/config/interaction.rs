//! Tuning for targeting and hover feedback

use serde::{Deserialize, Serialize};

use super::{Config, ConfigError};

/// Length of a controller's ray indicator when nothing is targeted
pub const DEFAULT_RAY_LENGTH: f32 = 5.0;

/// Opacity applied to hovered materials
pub const DEFAULT_HOVER_OPACITY: f32 = 0.5;

/// Interaction tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    /// Ray indicator length used when the ray hits nothing
    pub default_ray_length: f32,
    /// Opacity of hovered materials, in `[0, 1]`
    pub hover_opacity: f32,
    /// Hits farther than this are ignored; `None` means unlimited
    pub max_ray_distance: Option<f32>,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            default_ray_length: DEFAULT_RAY_LENGTH,
            hover_opacity: DEFAULT_HOVER_OPACITY,
            max_ray_distance: None,
        }
    }
}

impl InteractionConfig {
    /// Check value ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.hover_opacity) {
            return Err(ConfigError::Invalid(format!(
                "hover_opacity must be within [0, 1], got {}",
                self.hover_opacity
            )));
        }
        if !(self.default_ray_length > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "default_ray_length must be positive, got {}",
                self.default_ray_length
            )));
        }
        if let Some(max) = self.max_ray_distance {
            if !(max > 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "max_ray_distance must be positive, got {max}"
                )));
            }
        }
        Ok(())
    }
}

impl Config for InteractionConfig {}
