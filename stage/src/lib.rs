//! Tracking-driven character display core.
//!
//! This crate drives a 2D rig whose pose comes from a live tracking feed. It
//! owns everything between the raw inputs and the draw call: turning pointer
//! and wheel events into pan/zoom state, ingesting and validating tracking
//! frames, mapping them onto rig parameters, and running the per-tick
//! place/pose/draw step. Loading the rig asset, creating the surface, and
//! wiring DOM events are left to the host; with the `web` feature,
//! [`web::WebStage`] is that host for the browser.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`session`] | Session state object and lifecycle; entry point for every handler |
//! | [`viewport`] | Pan/zoom transform and drag state |
//! | [`input`] | Pointer/wheel event translation |
//! | [`ingest`] | Single-slot tracking frame store |
//! | [`mapper`] | Tracking frame → rig parameter formulas |
//! | [`params`] | The closed set of rig parameters |
//! | [`rig`] | Rig, pose provider, and surface interfaces |
//! | [`render`] | Per-tick render step |
//! | [`config`] | Per-deployment settings |
//! | [`consts`] | Shared numeric constants |

pub mod config;
pub mod consts;
pub mod ingest;
pub mod input;
pub mod mapper;
pub mod params;
pub mod render;
pub mod rig;
pub mod session;
pub mod viewport;
#[cfg(feature = "web")]
pub mod web;

#[cfg(test)]
mod test_support;
