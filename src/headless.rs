//! In-memory rig and surface for running a session without a display.
//!
//! The rig keeps whatever the session last wrote to it; the surface counts
//! draws and emits the pose as a structured log line every `log_every` draws.

use std::collections::BTreeMap;

use stage::params::RigParam;
use stage::rig::{Rig, RigControls, Surface, SurfaceError};

#[derive(Debug, Clone, Default)]
pub struct HeadlessRig {
    position: (f64, f64),
    scale: f64,
    params: BTreeMap<String, f64>,
}

impl HeadlessRig {
    #[must_use]
    pub fn position(&self) -> (f64, f64) {
        self.position
    }

    #[must_use]
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Parameter values by id, as last written.
    #[must_use]
    pub fn params(&self) -> &BTreeMap<String, f64> {
        &self.params
    }

    fn param(&self, param: RigParam) -> f64 {
        self.params.get(param.id()).copied().unwrap_or_default()
    }
}

impl RigControls for HeadlessRig {
    fn set_param(&mut self, id: &str, value: f64) {
        match self.params.get_mut(id) {
            Some(slot) => *slot = value,
            None => {
                self.params.insert(id.to_owned(), value);
            }
        }
    }
}

impl Rig for HeadlessRig {
    fn set_position(&mut self, x: f64, y: f64) {
        self.position = (x, y);
    }

    fn set_scale(&mut self, scale: f64) {
        self.scale = scale;
    }

    fn set_auto_blink(&mut self, enabled: bool) {
        tracing::debug!(enabled, "rig auto-blink");
    }

    fn suppress_idle_motion(&mut self) {
        tracing::debug!("rig idle motion suppressed");
    }
}

#[derive(Debug, Clone, Default)]
pub struct HeadlessSurface {
    draws: u64,
    log_every: u64,
}

impl HeadlessSurface {
    #[must_use]
    pub fn new(log_every: u64) -> Self {
        Self { draws: 0, log_every }
    }

    #[must_use]
    pub fn draws(&self) -> u64 {
        self.draws
    }
}

impl Surface<HeadlessRig> for HeadlessSurface {
    fn draw(&mut self, rig: &HeadlessRig) -> Result<(), SurfaceError> {
        self.draws += 1;
        if self.log_every > 0 && self.draws % self.log_every == 0 {
            let (x, y) = rig.position();
            tracing::info!(
                draws = self.draws,
                x,
                y,
                scale = rig.scale(),
                yaw = rig.param(RigParam::AngleX),
                pitch = rig.param(RigParam::AngleY),
                roll = rig.param(RigParam::AngleZ),
                mouth_open = rig.param(RigParam::MouthOpenY),
                "pose"
            );
        }
        Ok(())
    }

    fn composite(&mut self) -> Result<(), SurfaceError> {
        Ok(())
    }
}
