//! Per-deployment tuning for a stage session.
//!
//! Trackers disagree on a couple of conventions (where gaze "center" is, how
//! far a user may zoom), so those are settings rather than constants. Every
//! field has a default, and hosts may supply any subset as JSON.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_ANCHOR_FRACTION, DEFAULT_SCALE, DEFAULT_ZOOM_SENSITIVITY};

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("invalid stage config JSON: {0}")]
    Parse(String),
    #[error("`{field}` must be a finite number greater than zero, got {value}")]
    NotPositive { field: &'static str, value: f64 },
    #[error("`anchor.{axis}` must be finite, got {value}")]
    Anchor { axis: &'static str, value: f64 },
    #[error("scale bounds are inverted: min {min} > max {max}")]
    InvertedBounds { min: f64, max: f64 },
}

/// How the tracker's `iris.y` relates to the rig's eye-ball range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IrisYOffset {
    /// Already centered on zero; pass through.
    #[default]
    Raw,
    /// Reported in `[0, 1]`; shift down by one half.
    Centered,
}

/// Rig anchor as a fraction of the canvas size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Anchor {
    pub x: f64,
    pub y: f64,
}

impl Default for Anchor {
    fn default() -> Self {
        Self { x: DEFAULT_ANCHOR_FRACTION, y: DEFAULT_ANCHOR_FRACTION }
    }
}

/// Floor and ceiling applied to the final rig scale each tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleBounds {
    pub min: f64,
    pub max: f64,
}

impl ScaleBounds {
    /// Never panics: with inverted bounds `max` wins, and a NaN bound is
    /// ignored.
    #[must_use]
    pub fn clamp(&self, scale: f64) -> f64 {
        scale.max(self.min).min(self.max)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StageConfig {
    pub zoom_sensitivity: f64,
    pub default_scale: f64,
    pub anchor: Anchor,
    pub iris_y: IrisYOffset,
    /// Drive rig position and scale from `head_translation` when the tracker
    /// sends it.
    pub positional_tracking: bool,
    pub scale_bounds: Option<ScaleBounds>,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            zoom_sensitivity: DEFAULT_ZOOM_SENSITIVITY,
            default_scale: DEFAULT_SCALE,
            anchor: Anchor::default(),
            iris_y: IrisYOffset::default(),
            positional_tracking: false,
            scale_bounds: None,
        }
    }
}

impl StageConfig {
    /// Parse a (possibly partial) JSON config and validate it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON and any error from
    /// [`StageConfig::validate`].
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    ///
    /// Returns the first violated constraint: sensitivity and default scale
    /// must be finite and positive, the anchor finite, and bounds (when set)
    /// positive with `min <= max`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("zoom_sensitivity", self.zoom_sensitivity)?;
        positive("default_scale", self.default_scale)?;
        if !self.anchor.x.is_finite() {
            return Err(ConfigError::Anchor { axis: "x", value: self.anchor.x });
        }
        if !self.anchor.y.is_finite() {
            return Err(ConfigError::Anchor { axis: "y", value: self.anchor.y });
        }
        if let Some(bounds) = self.scale_bounds {
            positive("scale_bounds.min", bounds.min)?;
            positive("scale_bounds.max", bounds.max)?;
            if bounds.min > bounds.max {
                return Err(ConfigError::InvertedBounds { min: bounds.min, max: bounds.max });
            }
        }
        Ok(())
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field, value })
    }
}
