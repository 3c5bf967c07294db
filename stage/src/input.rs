//! Pointer and wheel input → viewport mutations.
//!
//! The host forwards raw DOM events as [`InputEvent`]s. Pointer-down starts a
//! drag, pointer-move follows it, pointer-up (wherever it happens, not only
//! over the canvas) ends it, and the wheel zooms. The returned
//! [`InputResponse`] tells the host whether to suppress the browser default.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::viewport::{Point, ViewportTransform};

/// Wheel / trackpad scroll delta.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelDelta {
    /// Horizontal scroll amount in pixels. Unused.
    pub dx: f64,
    /// Vertical scroll amount in pixels (positive = down).
    pub dy: f64,
}

/// A raw input event in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerDown(Point),
    PointerMove(Point),
    PointerUp,
    Wheel(WheelDelta),
}

/// What the host should do with the originating DOM event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputResponse {
    /// Call `preventDefault()` (page scroll must not happen on wheel).
    pub prevent_default: bool,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct InputController;

impl InputController {
    /// Translate one event into a viewport mutation.
    pub fn handle(viewport: &mut ViewportTransform, event: &InputEvent) -> InputResponse {
        match *event {
            InputEvent::PointerDown(point) => viewport.begin_drag(point),
            InputEvent::PointerMove(point) => viewport.update_drag(point),
            InputEvent::PointerUp => viewport.end_drag(),
            InputEvent::Wheel(delta) => {
                viewport.apply_zoom(delta.dy);
                return InputResponse { prevent_default: true };
            }
        }
        InputResponse::default()
    }
}
