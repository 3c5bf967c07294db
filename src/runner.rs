//! Headless run loop.
//!
//! One task owns the session and multiplexes the tick interval with the
//! tracking feed, so every handler runs to completion with exclusive access.

#[cfg(test)]
#[path = "runner_test.rs"]
mod runner_test;

use std::collections::BTreeMap;

use frames::TrackingFrame;
use futures_util::{Stream, StreamExt};
use serde::Serialize;
use stage::session::{Session, SessionState, Termination, TickStatus};
use tokio::time::MissedTickBehavior;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::{self, Message};

use crate::config::RunnerConfig;
use crate::error::RunnerError;
use crate::headless::{HeadlessRig, HeadlessSurface};

type HeadlessSession = Session<HeadlessRig, HeadlessSurface>;

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "reason", rename_all = "snake_case")]
pub enum Outcome {
    /// The tick limit was reached.
    Completed,
    ConnectionLost(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub ticks: u64,
    pub draws: u64,
    pub accepted: u64,
    pub dropped: u64,
    pub outcome: Outcome,
    pub position: (f64, f64),
    pub scale: f64,
    /// Rig parameters as of the last draw.
    pub params: BTreeMap<String, f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_frame: Option<TrackingFrame>,
}

impl RunSummary {
    #[must_use]
    pub fn connection_lost(&self) -> bool {
        matches!(self.outcome, Outcome::ConnectionLost(_))
    }
}

/// Connect to the configured feed and drive a session until it ends.
///
/// # Errors
///
/// Returns [`RunnerError::WsConnect`] if the feed cannot be reached. A feed
/// that drops after connecting is reported in the summary instead.
pub async fn run(config: &RunnerConfig) -> Result<RunSummary, RunnerError> {
    let (stream, _) = connect_async(config.url.as_str())
        .await
        .map_err(|error| RunnerError::WsConnect(Box::new(error)))?;
    tracing::info!(url = %config.url, "tracking feed connected");
    Ok(drive(config, stream).await)
}

/// Drive a session from `feed` until the feed ends or the tick limit is hit.
pub async fn drive<S>(config: &RunnerConfig, mut feed: S) -> RunSummary
where
    S: Stream<Item = Result<Message, tungstenite::Error>> + Unpin,
{
    let mut session = Session::new(
        config.stage.clone(),
        HeadlessRig::default(),
        HeadlessSurface::new(config.log_every),
        config.width,
        config.height,
    );
    let mut interval = tokio::time::interval(config.tick_interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                if config.max_ticks.is_some_and(|max| session.ticks() >= max) {
                    session.teardown();
                    break;
                }
                match session.tick() {
                    Ok(TickStatus::Drawn { .. }) => {}
                    Ok(TickStatus::Halted) => break,
                    Err(error) => tracing::warn!(%error, "tick failed"),
                }
            }
            message = feed.next() => {
                if let Some(reason) = handle_message(&mut session, message) {
                    session.on_connection_lost(reason);
                    break;
                }
            }
        }
    }

    let summary = summarize(&session);
    tracing::info!(
        ticks = summary.ticks,
        accepted = summary.accepted,
        dropped = summary.dropped,
        "run finished"
    );
    summary
}

/// Feed one socket event into the session. Returns the reason when the feed
/// is gone.
fn handle_message(
    session: &mut HeadlessSession,
    message: Option<Result<Message, tungstenite::Error>>,
) -> Option<String> {
    match message {
        Some(Ok(Message::Text(text))) => {
            session.on_message(text.as_str());
            None
        }
        Some(Ok(Message::Binary(bytes))) => {
            session.on_binary_message(&bytes);
            None
        }
        Some(Ok(Message::Close(frame))) => Some(frame.map_or_else(
            || "closed by peer".to_owned(),
            |frame| format!("closed by peer ({}): {}", u16::from(frame.code), frame.reason.as_str()),
        )),
        Some(Ok(_)) => None,
        Some(Err(error)) => Some(error.to_string()),
        None => Some("stream ended".to_owned()),
    }
}

fn summarize(session: &HeadlessSession) -> RunSummary {
    let outcome = match session.state() {
        SessionState::Terminated(Termination::ConnectionLost(reason)) => Outcome::ConnectionLost(reason.clone()),
        SessionState::Terminated(Termination::TornDown) | SessionState::Active => Outcome::Completed,
    };
    let rig = session.rig();
    RunSummary {
        ticks: session.ticks(),
        draws: session.surface().draws(),
        accepted: session.ingest().accepted(),
        dropped: session.ingest().dropped(),
        outcome,
        position: rig.position(),
        scale: rig.scale(),
        params: rig.params().clone(),
        last_frame: session.ingest().latest_frame().copied(),
    }
}
