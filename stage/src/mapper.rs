//! Tracking frame → rig parameter mapping.
//!
//! The tracker's axes are mirrored and offset relative to the rig's: pitch
//! arrives around 180° and inverted, roll inverted. This module is the only
//! place those conventions are corrected. Body angles follow the head at
//! [`BODY_ANGLE_DAMPING`] to give some secondary motion. Inputs are not
//! clamped; the rig clamps to its own parameter ranges.

#[cfg(test)]
#[path = "mapper_test.rs"]
mod mapper_test;

use frames::{TrackingFrame, Vec3};

use crate::config::IrisYOffset;
use crate::consts::{
    ANGLE_Y_OFFSET_DEG, BODY_ANGLE_DAMPING, CENTERED_IRIS_Y_OFFSET, HEAD_DEPTH_DIVISOR, HEAD_DEPTH_MAX,
    HEAD_TRANSLATION_GAIN, POSITIONAL_BASE_SCALE,
};
use crate::params::{RigParam, RigParameterSet};
use crate::viewport::{Placement, Point};

#[derive(Debug, Clone, Copy, Default)]
pub struct ParameterMapper {
    iris_y: IrisYOffset,
}

impl ParameterMapper {
    #[must_use]
    pub fn new(iris_y: IrisYOffset) -> Self {
        Self { iris_y }
    }

    /// Compute every rig parameter from one frame.
    #[must_use]
    pub fn map(&self, frame: &TrackingFrame) -> RigParameterSet {
        let angle_x = frame.head_rotation.y;
        let angle_y = -frame.head_rotation.x + ANGLE_Y_OFFSET_DEG;
        let angle_z = -frame.head_rotation.z;
        let eye_ball_y = match self.iris_y {
            IrisYOffset::Raw => frame.iris.y,
            IrisYOffset::Centered => frame.iris.y - CENTERED_IRIS_Y_OFFSET,
        };

        RigParameterSet::from_fn(|param| match param {
            RigParam::AngleX => angle_x,
            RigParam::AngleY => angle_y,
            RigParam::AngleZ => angle_z,
            RigParam::BodyAngleX => angle_x * BODY_ANGLE_DAMPING,
            RigParam::BodyAngleY => angle_y * BODY_ANGLE_DAMPING,
            RigParam::BodyAngleZ => angle_z * BODY_ANGLE_DAMPING,
            RigParam::EyeBallX => frame.iris.x,
            RigParam::EyeBallY => eye_ball_y,
            RigParam::MouthOpenY => frame.mouth.y,
            RigParam::MouthForm => frame.mouth.x,
            RigParam::EyeLOpen => frame.eye.left,
            RigParam::EyeROpen => frame.eye.right,
        })
    }
}

/// Placement driven by head position: the head offset moves the rig away
/// from the user's anchor, and depth shrinks it, on top of wheel zoom.
#[must_use]
pub fn head_placement(translation: Vec3, base_center: Point, scale_offset: f64) -> Placement {
    let depth = (translation.z / HEAD_DEPTH_DIVISOR).clamp(0.0, HEAD_DEPTH_MAX);
    Placement {
        x: translation.x * HEAD_TRANSLATION_GAIN + base_center.x,
        y: translation.y * HEAD_TRANSLATION_GAIN + base_center.y,
        scale: POSITIONAL_BASE_SCALE - depth - scale_offset,
    }
}
