//! Recording doubles for the rig and surface traits.

use std::collections::BTreeMap;

use crate::rig::{PoseProvider, Rig, RigControls, Surface, SurfaceError};

/// Rig that records every call instead of animating.
#[derive(Debug)]
pub struct RecordingRig {
    pub position: (f64, f64),
    pub scale: f64,
    pub auto_blink: bool,
    pub idle_motion_suppressed: bool,
    pub params: BTreeMap<String, f64>,
    pub param_writes: usize,
    pub updates: usize,
    /// Number of ticks in which the idle motion would have run.
    pub idle_updates: usize,
}

impl Default for RecordingRig {
    fn default() -> Self {
        Self {
            position: (0.0, 0.0),
            scale: 1.0,
            auto_blink: true,
            idle_motion_suppressed: false,
            params: BTreeMap::new(),
            param_writes: 0,
            updates: 0,
            idle_updates: 0,
        }
    }
}

impl RecordingRig {
    pub fn param(&self, id: &str) -> Option<f64> {
        self.params.get(id).copied()
    }
}

impl RigControls for RecordingRig {
    fn set_param(&mut self, id: &str, value: f64) {
        self.params.insert(id.to_owned(), value);
        self.param_writes += 1;
    }
}

impl Rig for RecordingRig {
    fn set_position(&mut self, x: f64, y: f64) {
        self.position = (x, y);
    }

    fn set_scale(&mut self, scale: f64) {
        self.scale = scale;
    }

    fn set_auto_blink(&mut self, enabled: bool) {
        self.auto_blink = enabled;
    }

    fn suppress_idle_motion(&mut self) {
        self.idle_motion_suppressed = true;
    }

    fn update(&mut self, pose: &mut dyn PoseProvider) -> bool {
        self.updates += 1;
        let posed = pose.apply(self);
        if !posed {
            self.idle_updates += 1;
        }
        posed
    }
}

/// Surface that counts draws and can be told to fail.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub draws: usize,
    pub composites: usize,
    /// Scale of the rig at each draw.
    pub drawn_scales: Vec<f64>,
    pub fail_draw: bool,
}

impl Surface<RecordingRig> for RecordingSurface {
    fn draw(&mut self, rig: &RecordingRig) -> Result<(), SurfaceError> {
        if self.fail_draw {
            return Err(SurfaceError("context lost".to_owned()));
        }
        self.draws += 1;
        self.drawn_scales.push(rig.scale);
        Ok(())
    }

    fn composite(&mut self) -> Result<(), SurfaceError> {
        self.composites += 1;
        Ok(())
    }
}
