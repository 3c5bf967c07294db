//! Session: the single owner of all mutable display state.
//!
//! Input, socket, and tick handlers all go through a `&mut Session`, so each
//! runs to completion against a consistent view: a tick always sees the most
//! recently completed mutation from either input stream, never one half-way
//! through.
//!
//! ```text
//!   Active ──(connection lost | teardown)──▶ Terminated
//! ```
//!
//! There is no way back from `Terminated`; a new connection needs a new
//! session.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use crate::config::StageConfig;
use crate::ingest::{Ingested, TrackingIngest};
use crate::input::{InputController, InputEvent, InputResponse};
use crate::mapper::{self, ParameterMapper};
use crate::render;
use crate::rig::{Rig, Surface, SurfaceError};
use crate::viewport::{Placement, ViewportTransform};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("tracking connection lost: {0}")]
    ConnectionLost(String),
    #[error(transparent)]
    Surface(#[from] SurfaceError),
    #[error("rig asset failed to load: {0}")]
    AssetLoad(String),
}

/// Why a session stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Termination {
    ConnectionLost(String),
    TornDown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Active,
    Terminated(Termination),
}

/// Result of one display tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickStatus {
    /// The rig was drawn; `posed` is false until the first frame arrives.
    Drawn { posed: bool },
    /// The session is terminated; nothing was drawn and the host should stop
    /// scheduling ticks.
    Halted,
}

pub struct Session<R, S> {
    config: StageConfig,
    viewport: ViewportTransform,
    ingest: TrackingIngest,
    rig: R,
    surface: S,
    state: SessionState,
    ticks: u64,
}

impl<R, S> Session<R, S>
where
    R: Rig,
    S: Surface<R>,
{
    /// Start a session on a `width` × `height` canvas.
    ///
    /// Disables the rig's auto-blink and idle motion for the session's
    /// lifetime; blinking and pose are driven by tracking instead.
    pub fn new(config: StageConfig, mut rig: R, surface: S, width: f64, height: f64) -> Self {
        rig.set_auto_blink(false);
        rig.suppress_idle_motion();
        let viewport = ViewportTransform::for_canvas(width, height, &config);
        let ingest = TrackingIngest::new(ParameterMapper::new(config.iris_y));
        log::info!("stage session started on {width}x{height} canvas");
        Self { config, viewport, ingest, rig, surface, state: SessionState::Active, ticks: 0 }
    }

    // --- Event handlers ---

    /// Apply a pointer or wheel event. Ignored once terminated.
    pub fn on_input(&mut self, event: &InputEvent) -> InputResponse {
        if !self.is_active() {
            return InputResponse::default();
        }
        InputController::handle(&mut self.viewport, event)
    }

    /// Handle one text message from the tracking feed. Ignored once
    /// terminated.
    pub fn on_message(&mut self, text: &str) -> Option<Ingested> {
        self.is_active().then(|| self.ingest.receive(text))
    }

    /// Handle one binary message from the tracking feed.
    pub fn on_binary_message(&mut self, bytes: &[u8]) -> Option<Ingested> {
        self.is_active().then(|| self.ingest.receive_bytes(bytes))
    }

    /// Mark the feed as gone. Returns the error for the host to surface.
    pub fn on_connection_lost(&mut self, reason: impl Into<String>) -> SessionError {
        let reason = reason.into();
        if self.is_active() {
            log::warn!("tracking connection lost: {reason}");
            self.state = SessionState::Terminated(Termination::ConnectionLost(reason.clone()));
        }
        SessionError::ConnectionLost(reason)
    }

    /// Stop the session because its surface is going away.
    pub fn teardown(&mut self) {
        if self.is_active() {
            log::info!("stage session torn down after {} ticks", self.ticks);
            self.state = SessionState::Terminated(Termination::TornDown);
        }
    }

    /// Run one display tick: place, pose, draw, composite.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Surface`] if the surface fails. The session
    /// stays active; the next tick tries again.
    pub fn tick(&mut self) -> Result<TickStatus, SessionError> {
        if !self.is_active() {
            return Ok(TickStatus::Halted);
        }
        let placement = self.placement();
        let posed = render::render_frame(
            &mut self.rig,
            &mut self.surface,
            placement,
            self.ingest.latest_params(),
        )?;
        self.ticks += 1;
        Ok(TickStatus::Drawn { posed })
    }

    // --- Queries ---

    /// The placement the next tick will apply.
    ///
    /// With positional tracking enabled and a frame carrying head
    /// translation, the head drives position and depth around the user's
    /// anchor; otherwise the viewport alone decides. Configured scale bounds
    /// apply last.
    #[must_use]
    pub fn placement(&self) -> Placement {
        let tracked = self
            .config
            .positional_tracking
            .then(|| self.ingest.latest_frame().and_then(|frame| frame.head_translation))
            .flatten();
        let mut placement = match tracked {
            Some(translation) => {
                mapper::head_placement(translation, self.viewport.base_center(), self.viewport.scale_offset())
            }
            None => self.viewport.current(),
        };
        if let Some(bounds) = self.config.scale_bounds {
            placement.scale = bounds.clamp(placement.scale);
        }
        placement
    }

    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.state == SessionState::Active
    }

    #[must_use]
    pub fn viewport(&self) -> &ViewportTransform {
        &self.viewport
    }

    #[must_use]
    pub fn ingest(&self) -> &TrackingIngest {
        &self.ingest
    }

    #[must_use]
    pub fn config(&self) -> &StageConfig {
        &self.config
    }

    #[must_use]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    #[must_use]
    pub fn rig(&self) -> &R {
        &self.rig
    }

    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }
}
