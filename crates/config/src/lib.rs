//! Shared configuration for the survey3d painting viewport
//!
//! This crate is the single source of truth for the colors, brush limits and
//! history depth used by the mesh painting core. Values can be loaded from the
//! survey's JSON configuration; any field left out falls back to its default.

mod color;

pub use color::Rgb;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[cfg(feature = "bevy")]
use bevy::prelude::Resource;

/// Baseline color of an unpainted vertex
pub const DEFAULT_COLOR: Rgb = Rgb::from_hex(0xffffff);

/// Brush color for the paint tool
pub const DEFAULT_PAINT_COLOR: Rgb = Rgb::from_hex(0x424242);

/// Color used to show fields that were already saved
pub const DEFAULT_FIELD_COLOR: Rgb = Rgb::from_hex(0xabcabc);

/// Number of snapshots the undo history keeps
pub const DEFAULT_HISTORY_CAPACITY: usize = 20;

/// Default brush radius in world units
pub const DEFAULT_BRUSH_RADIUS: f32 = 0.05;

/// Smallest brush radius the slider allows, in world units
pub const DEFAULT_MIN_BRUSH_RADIUS: f32 = 0.005;

/// Largest brush radius the slider allows, in world units
pub const DEFAULT_MAX_BRUSH_RADIUS: f32 = 0.25;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid color '{0}', expected #rrggbb")]
    InvalidColor(String),
    #[error("History capacity must be at least 1")]
    ZeroHistoryCapacity,
    #[error("Invalid brush radius range: min={min}, default={default}, max={max}")]
    InvalidBrushRange { min: f32, default: f32, max: f32 },
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Brush radius limits, in world units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrushSettings {
    pub default_radius: f32,
    pub min_radius: f32,
    pub max_radius: f32,
}

impl Default for BrushSettings {
    fn default() -> Self {
        Self {
            default_radius: DEFAULT_BRUSH_RADIUS,
            min_radius: DEFAULT_MIN_BRUSH_RADIUS,
            max_radius: DEFAULT_MAX_BRUSH_RADIUS,
        }
    }
}

impl BrushSettings {
    /// Clamp a requested radius into the configured range
    pub fn clamp_radius(&self, radius: f32) -> f32 {
        if radius.is_nan() {
            return self.default_radius;
        }
        radius.clamp(self.min_radius, self.max_radius)
    }
}

/// Painting viewport configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "bevy", derive(Resource))]
#[serde(default)]
pub struct ViewportConfig {
    /// Color every vertex starts with; erasing writes this color back
    pub default_color: Rgb,
    /// Color written by the paint tool
    pub paint_color: Rgb,
    /// Color for displaying previously saved fields
    pub field_color: Rgb,
    /// Maximum number of undo snapshots, including the baseline
    pub history_capacity: usize,
    pub brush: BrushSettings,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            default_color: DEFAULT_COLOR,
            paint_color: DEFAULT_PAINT_COLOR,
            field_color: DEFAULT_FIELD_COLOR,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            brush: BrushSettings::default(),
        }
    }
}

impl ViewportConfig {
    /// Parse and validate a JSON config
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the painting core cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.history_capacity == 0 {
            return Err(ConfigError::ZeroHistoryCapacity);
        }

        let BrushSettings {
            default_radius,
            min_radius,
            max_radius,
        } = self.brush;
        let ordered = min_radius <= default_radius && default_radius <= max_radius;
        if !(min_radius > 0.0 && ordered) {
            return Err(ConfigError::InvalidBrushRange {
                min: min_radius,
                default: default_radius,
                max: max_radius,
            });
        }

        Ok(())
    }
}
