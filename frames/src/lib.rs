//! Tracking-frame wire schema for the realtime pose feed.
//!
//! The tracker publishes one JSON text message per detected face pose. This
//! crate owns that representation and its validation: a message either
//! decodes into a complete [`TrackingFrame`] or is rejected as a whole with a
//! [`FrameError`]. Nothing downstream ever sees a partially populated frame.

use serde::{Deserialize, Serialize};

/// Error returned by [`decode_frame`] and [`TrackingFrame::validate`].
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The payload is not JSON, or a required field is missing or non-numeric.
    #[error("malformed tracking frame: {0}")]
    Json(#[from] serde_json::Error),
    /// A numeric field holds NaN or an infinity.
    #[error("non-finite value in tracking frame field `{field}`")]
    NonFinite { field: &'static str },
}

/// A three-axis value: head rotation in degrees or head translation in
/// source-camera units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// A two-axis value (iris offset, mouth shape).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

/// Eyelid openness per eye, nominally in `[0, 1]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Eyes {
    pub left: f64,
    pub right: f64,
}

/// One pose sample from the tracker.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackingFrame {
    /// Head rotation about x (pitch), y (yaw), and z (roll), in degrees.
    pub head_rotation: Vec3,
    /// Head position relative to the camera. Only sent by trackers that
    /// estimate depth.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub head_translation: Option<Vec3>,
    /// Gaze offset, conceptually in `[-1, 1]` on both axes.
    pub iris: Vec2,
    /// `x` is the horizontal mouth form, `y` the openness.
    pub mouth: Vec2,
    pub eye: Eyes,
}

impl TrackingFrame {
    /// Check that every numeric field is finite.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::NonFinite`] naming the first offending field.
    pub fn validate(&self) -> Result<(), FrameError> {
        let mut fields = vec![
            ("head_rotation.x", self.head_rotation.x),
            ("head_rotation.y", self.head_rotation.y),
            ("head_rotation.z", self.head_rotation.z),
            ("iris.x", self.iris.x),
            ("iris.y", self.iris.y),
            ("mouth.x", self.mouth.x),
            ("mouth.y", self.mouth.y),
            ("eye.left", self.eye.left),
            ("eye.right", self.eye.right),
        ];
        if let Some(t) = self.head_translation {
            fields.extend([
                ("head_translation.x", t.x),
                ("head_translation.y", t.y),
                ("head_translation.z", t.z),
            ]);
        }

        match fields.into_iter().find(|(_, v)| !v.is_finite()) {
            Some((field, _)) => Err(FrameError::NonFinite { field }),
            None => Ok(()),
        }
    }
}

/// Decode and validate one text message.
///
/// Unknown fields are ignored so newer trackers can add data without
/// breaking older displays.
///
/// # Errors
///
/// Returns [`FrameError::Json`] for invalid JSON, missing required fields, or
/// non-numeric values, and [`FrameError::NonFinite`] for NaN/infinite values.
pub fn decode_frame(text: &str) -> Result<TrackingFrame, FrameError> {
    let frame: TrackingFrame = serde_json::from_str(text)?;
    frame.validate()?;
    Ok(frame)
}

/// Decode and validate one binary message carrying UTF-8 JSON.
///
/// # Errors
///
/// Same as [`decode_frame`]; bytes that are not UTF-8 surface as
/// [`FrameError::Json`].
pub fn decode_frame_bytes(bytes: &[u8]) -> Result<TrackingFrame, FrameError> {
    let frame: TrackingFrame = serde_json::from_slice(bytes)?;
    frame.validate()?;
    Ok(frame)
}

/// Encode a frame as the JSON text the tracker sends.
///
/// # Errors
///
/// Returns [`FrameError::NonFinite`] instead of writing NaN/infinite values
/// out as `null`.
pub fn encode_frame(frame: &TrackingFrame) -> Result<String, FrameError> {
    frame.validate()?;
    Ok(serde_json::to_string(frame)?)
}

#[cfg(test)]
#[path = "lib_test.rs"]
mod tests;
