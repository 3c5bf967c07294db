//! Command-line and environment configuration for the headless host.
//!
//! Every flag also reads a `FACERIG_*` environment variable. Stage settings
//! are assembled into a [`StageConfig`] and validated before anything
//! connects.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::time::Duration;

use clap::{Parser, ValueEnum};
use stage::config::{Anchor, IrisYOffset, ScaleBounds, StageConfig};
use stage::consts::{DEFAULT_ANCHOR_FRACTION, DEFAULT_SCALE, DEFAULT_ZOOM_SENSITIVITY};

use crate::error::RunnerError;

pub const DEFAULT_URL: &str = "ws://127.0.0.1:6789";
pub const DEFAULT_FPS: u32 = 60;
pub const DEFAULT_LOG_EVERY: u64 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum IrisYArg {
    Raw,
    Centered,
}

impl From<IrisYArg> for IrisYOffset {
    fn from(arg: IrisYArg) -> Self {
        match arg {
            IrisYArg::Raw => Self::Raw,
            IrisYArg::Centered => Self::Centered,
        }
    }
}

#[derive(Parser, Debug, Clone)]
#[command(name = "facerig", about = "Drive a rig from a face tracking feed, headless")]
pub struct Cli {
    /// Tracking feed websocket URL.
    #[arg(long, env = "FACERIG_URL", default_value = DEFAULT_URL)]
    pub url: String,

    /// Display ticks per second.
    #[arg(long, env = "FACERIG_FPS", default_value_t = DEFAULT_FPS)]
    pub fps: u32,

    #[arg(long, env = "FACERIG_WIDTH", default_value_t = 1920.0)]
    pub width: f64,

    #[arg(long, env = "FACERIG_HEIGHT", default_value_t = 1080.0)]
    pub height: f64,

    /// Scale change per wheel pixel.
    #[arg(long, env = "FACERIG_ZOOM_SENSITIVITY", default_value_t = DEFAULT_ZOOM_SENSITIVITY)]
    pub zoom_sensitivity: f64,

    #[arg(long, env = "FACERIG_DEFAULT_SCALE", default_value_t = DEFAULT_SCALE)]
    pub default_scale: f64,

    /// Initial rig position as fractions of the canvas size.
    #[arg(long, env = "FACERIG_ANCHOR_X", default_value_t = DEFAULT_ANCHOR_FRACTION)]
    pub anchor_x: f64,

    #[arg(long, env = "FACERIG_ANCHOR_Y", default_value_t = DEFAULT_ANCHOR_FRACTION)]
    pub anchor_y: f64,

    #[arg(long, env = "FACERIG_IRIS_Y", value_enum, default_value_t = IrisYArg::Raw)]
    pub iris_y: IrisYArg,

    /// Let head translation move and scale the rig.
    #[arg(long, env = "FACERIG_POSITIONAL")]
    pub positional: bool,

    #[arg(long, env = "FACERIG_MIN_SCALE", requires = "max_scale")]
    pub min_scale: Option<f64>,

    #[arg(long, env = "FACERIG_MAX_SCALE", requires = "min_scale")]
    pub max_scale: Option<f64>,

    /// Stop after this many ticks instead of running until the feed closes.
    #[arg(long, env = "FACERIG_TICKS")]
    pub ticks: Option<u64>,

    /// Log the rig pose every N draws (0 disables).
    #[arg(long, env = "FACERIG_LOG_EVERY", default_value_t = DEFAULT_LOG_EVERY)]
    pub log_every: u64,
}

/// Validated runner settings.
#[derive(Debug, Clone, PartialEq)]
pub struct RunnerConfig {
    pub url: String,
    pub tick_interval: Duration,
    pub width: f64,
    pub height: f64,
    pub stage: StageConfig,
    pub max_ticks: Option<u64>,
    pub log_every: u64,
}

impl Cli {
    /// # Errors
    ///
    /// Returns [`RunnerError::Argument`] for a zero tick rate or a
    /// non-positive canvas size, and [`RunnerError::Config`] when the stage
    /// settings fail validation.
    pub fn into_config(self) -> Result<RunnerConfig, RunnerError> {
        if self.fps == 0 {
            return Err(RunnerError::Argument { field: "fps", reason: "must be at least 1".to_owned() });
        }
        for (field, value) in [("width", self.width), ("height", self.height)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(RunnerError::Argument { field, reason: format!("must be positive, got {value}") });
            }
        }

        let scale_bounds = match (self.min_scale, self.max_scale) {
            (Some(min), Some(max)) => Some(ScaleBounds { min, max }),
            _ => None,
        };
        let stage = StageConfig {
            zoom_sensitivity: self.zoom_sensitivity,
            default_scale: self.default_scale,
            anchor: Anchor { x: self.anchor_x, y: self.anchor_y },
            iris_y: self.iris_y.into(),
            positional_tracking: self.positional,
            scale_bounds,
        };
        stage.validate()?;

        Ok(RunnerConfig {
            url: self.url,
            tick_interval: Duration::from_secs_f64(1.0 / f64::from(self.fps)),
            width: self.width,
            height: self.height,
            stage,
            max_ticks: self.ticks,
            log_every: self.log_every,
        })
    }
}
