//! Per-tick render step.
//!
//! Reads the placement and the latest tracked parameters, pushes both into
//! the rig, and draws. Holds no state between ticks.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use crate::params::RigParameterSet;
use crate::rig::{Rig, Surface, SurfaceError, TrackedPose};
use crate::viewport::Placement;

/// Apply `placement` and `params` to `rig`, draw it into the render target,
/// and composite the target onto the visible surface.
///
/// Returns whether a tracked pose was applied this tick.
///
/// # Errors
///
/// Returns [`SurfaceError`] if drawing or compositing fails.
pub fn render_frame<R, S>(
    rig: &mut R,
    surface: &mut S,
    placement: Placement,
    params: Option<&RigParameterSet>,
) -> Result<bool, SurfaceError>
where
    R: Rig,
    S: Surface<R>,
{
    rig.set_position(placement.x, placement.y);
    rig.set_scale(placement.scale);

    let mut pose = TrackedPose::new(params);
    let posed = rig.update(&mut pose);

    surface.draw(rig)?;
    surface.composite()?;
    Ok(posed)
}
