//! Shared numeric constants for the stage crate.

// ── Viewport ────────────────────────────────────────────────────

/// Scale change per wheel delta unit (pixels).
pub const DEFAULT_ZOOM_SENSITIVITY: f64 = 0.0001;

/// Rig scale at session start.
pub const DEFAULT_SCALE: f64 = 0.4;

/// Rig anchor as a fraction of the canvas size (canvas center).
pub const DEFAULT_ANCHOR_FRACTION: f64 = 0.5;

// ── Parameter mapping ───────────────────────────────────────────

/// Offset that brings the tracker's pitch into the rig's angle range.
pub const ANGLE_Y_OFFSET_DEG: f64 = 180.0;

/// Fraction of head rotation carried over to the body.
pub const BODY_ANGLE_DAMPING: f64 = 0.3;

/// Subtracted from `iris.y` when the tracker reports gaze in `[0, 1]`.
pub const CENTERED_IRIS_Y_OFFSET: f64 = 0.5;

// ── Positional tracking ─────────────────────────────────────────

/// Screen pixels per unit of head translation.
pub const HEAD_TRANSLATION_GAIN: f64 = 10.0;

/// Head depth (camera units) that maps to one unit of scale reduction.
pub const HEAD_DEPTH_DIVISOR: f64 = 60.0;

/// Upper bound of the depth term; keeps the scale above `0.1` before
/// user zoom is applied.
pub const HEAD_DEPTH_MAX: f64 = 1.4;

/// Rig scale when the head sits at the camera plane.
pub const POSITIONAL_BASE_SCALE: f64 = 1.5;
