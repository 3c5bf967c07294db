#[cfg(test)]
#[path = "viewport_test.rs"]
mod viewport_test;

use crate::config::StageConfig;

/// A point in canvas space (CSS pixels).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Where and how large the rig is drawn this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub x: f64,
    pub y: f64,
    pub scale: f64,
}

/// Pan/zoom state applied to the rig's on-screen placement.
///
/// `center` is the rig anchor in canvas pixels. `scale` is the manual zoom
/// factor. `scale_offset` accumulates the same wheel input with the opposite
/// sign so positional tracking can subtract it from its own depth-derived
/// scale. `drag_offset` is the pointer-to-center distance captured on press
/// and only meaningful while `dragging` is set.
#[derive(Debug, Clone, Copy)]
pub struct ViewportTransform {
    center: Point,
    scale: f64,
    scale_offset: f64,
    drag_offset: Point,
    dragging: bool,
    zoom_sensitivity: f64,
}

impl ViewportTransform {
    #[must_use]
    pub fn new(center: Point, scale: f64, zoom_sensitivity: f64) -> Self {
        Self {
            center,
            scale,
            scale_offset: 0.0,
            drag_offset: Point::default(),
            dragging: false,
            zoom_sensitivity,
        }
    }

    /// Session-start transform: anchored at `config.anchor` of the canvas, at
    /// the configured default scale.
    #[must_use]
    pub fn for_canvas(width: f64, height: f64, config: &StageConfig) -> Self {
        let center = Point::new(width * config.anchor.x, height * config.anchor.y);
        Self::new(center, config.default_scale, config.zoom_sensitivity)
    }

    // --- Mutation ---

    /// Start a drag at `pointer`.
    ///
    /// A second press before release keeps the original grab offset.
    pub fn begin_drag(&mut self, pointer: Point) {
        if self.dragging {
            return;
        }
        self.drag_offset = Point::new(pointer.x - self.center.x, pointer.y - self.center.y);
        self.dragging = true;
    }

    /// Follow the pointer while dragging; ignored otherwise.
    pub fn update_drag(&mut self, pointer: Point) {
        if !self.dragging {
            return;
        }
        self.center = Point::new(pointer.x - self.drag_offset.x, pointer.y - self.drag_offset.y);
    }

    pub fn end_drag(&mut self) {
        self.dragging = false;
    }

    /// Zoom by a wheel delta. Positive `delta_y` (scroll down) shrinks the rig.
    ///
    /// Unbounded; see [`crate::config::ScaleBounds`] for the downstream clamp.
    pub fn apply_zoom(&mut self, delta_y: f64) {
        let step = delta_y * self.zoom_sensitivity;
        self.scale -= step;
        self.scale_offset += step;
    }

    // --- Queries ---

    /// The placement to apply when no tracking-driven position is in effect.
    #[must_use]
    pub fn current(&self) -> Placement {
        Placement { x: self.center.x, y: self.center.y, scale: self.scale }
    }

    /// The user-positioned anchor that head translation is added to.
    #[must_use]
    pub fn base_center(&self) -> Point {
        self.center
    }

    /// Net wheel zoom since session start, in scale units.
    ///
    /// Opposite sign to the manual scale change: zooming in makes this
    /// negative, and positional tracking subtracts it from the depth scale.
    #[must_use]
    pub fn scale_offset(&self) -> f64 {
        self.scale_offset
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }
}
