//! Interfaces to the rig and the drawing surface.
//!
//! The rig asset and the surface it is drawn onto are owned by the host. The
//! core only needs: a settable placement, a named float-parameter interface,
//! an auto-blink switch, and an update step that takes its pose from a
//! [`PoseProvider`] instead of the rig's own idle motion.

#[cfg(test)]
#[path = "rig_test.rs"]
mod rig_test;

use crate::params::RigParameterSet;

/// Error raised by a [`Surface`] while drawing or presenting.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("surface error: {0}")]
pub struct SurfaceError(pub String);

/// Named float parameters on a rig.
pub trait RigControls {
    fn set_param(&mut self, id: &str, value: f64);
}

/// Supplies the pose for one rig update.
pub trait PoseProvider {
    /// Write this tick's parameter values into `controls`.
    ///
    /// Returns `true` when a pose was applied.
    fn apply(&mut self, controls: &mut dyn RigControls) -> bool;
}

pub trait Rig: RigControls {
    fn set_position(&mut self, x: f64, y: f64);

    fn set_scale(&mut self, scale: f64);

    /// Toggle the rig's built-in blink animation.
    fn set_auto_blink(&mut self, enabled: bool);

    /// Stop the rig's own idle/breathing motion from writing parameters, so
    /// only the pose passed to [`Rig::update`] reaches the model.
    fn suppress_idle_motion(&mut self);

    /// Advance one tick with `pose` standing in for the idle motion.
    fn update(&mut self, pose: &mut dyn PoseProvider) -> bool
    where
        Self: Sized,
    {
        pose.apply(self)
    }
}

/// The render target a rig is drawn into and the visible surface it is
/// composited onto.
pub trait Surface<R: ?Sized> {
    /// # Errors
    ///
    /// Returns [`SurfaceError`] if the rig could not be drawn.
    fn draw(&mut self, rig: &R) -> Result<(), SurfaceError>;

    /// # Errors
    ///
    /// Returns [`SurfaceError`] if the target could not be presented.
    fn composite(&mut self) -> Result<(), SurfaceError>;
}

/// Pose provider backed by the latest tracked parameters.
///
/// Writes all twelve parameters when a set is available. Before the first
/// accepted frame it leaves the rig untouched.
pub struct TrackedPose<'a> {
    params: Option<&'a RigParameterSet>,
}

impl<'a> TrackedPose<'a> {
    #[must_use]
    pub fn new(params: Option<&'a RigParameterSet>) -> Self {
        Self { params }
    }
}

impl PoseProvider for TrackedPose<'_> {
    fn apply(&mut self, controls: &mut dyn RigControls) -> bool {
        let Some(params) = self.params else {
            return false;
        };
        for (param, value) in params.iter() {
            controls.set_param(param.id(), value);
        }
        true
    }
}

/// Parameter writes captured for replay at a later point.
///
/// For rigs that advance on their own schedule: [`Rig::update`] stages the
/// pose here and the rig's motion hook replays it when the model updates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StagedPose {
    writes: Vec<(String, f64)>,
}

impl StagedPose {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    /// Write every staged value into `controls`, in staging order.
    pub fn replay(&self, controls: &mut dyn RigControls) {
        for (id, value) in &self.writes {
            controls.set_param(id, *value);
        }
    }
}

impl RigControls for StagedPose {
    fn set_param(&mut self, id: &str, value: f64) {
        match self.writes.iter_mut().find(|(staged, _)| staged.as_str() == id) {
            Some(slot) => slot.1 = value,
            None => self.writes.push((id.to_owned(), value)),
        }
    }
}
