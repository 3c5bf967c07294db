//! Tracking feed ingestion.
//!
//! Every inbound message is decoded and validated in full before anything is
//! stored. A rejected message is counted and logged, and the previously
//! accepted frame and parameters stay in place. An accepted message replaces
//! both slots at once; nothing is queued, so frames that arrive faster than
//! the display ticks simply overwrite each other.

#[cfg(test)]
#[path = "ingest_test.rs"]
mod ingest_test;

use frames::{FrameError, TrackingFrame};

use crate::mapper::ParameterMapper;
use crate::params::RigParameterSet;

/// What happened to one inbound message.
#[derive(Debug)]
pub enum Ingested {
    Accepted,
    Dropped(FrameError),
}

impl Ingested {
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }
}

/// Single-slot store for the newest frame and its mapped parameters.
#[derive(Debug, Default)]
pub struct TrackingIngest {
    mapper: ParameterMapper,
    latest_frame: Option<TrackingFrame>,
    latest_params: Option<RigParameterSet>,
    accepted: u64,
    dropped: u64,
}

impl TrackingIngest {
    #[must_use]
    pub fn new(mapper: ParameterMapper) -> Self {
        Self { mapper, ..Self::default() }
    }

    /// Handle one text message from the feed.
    pub fn receive(&mut self, text: &str) -> Ingested {
        self.store(frames::decode_frame(text))
    }

    /// Handle one binary message from the feed (UTF-8 JSON).
    pub fn receive_bytes(&mut self, bytes: &[u8]) -> Ingested {
        self.store(frames::decode_frame_bytes(bytes))
    }

    fn store(&mut self, decoded: Result<TrackingFrame, FrameError>) -> Ingested {
        match decoded {
            Ok(frame) => {
                self.latest_params = Some(self.mapper.map(&frame));
                self.latest_frame = Some(frame);
                self.accepted += 1;
                Ingested::Accepted
            }
            Err(err) => {
                self.dropped += 1;
                log::debug!("dropping tracking message ({} dropped so far): {err}", self.dropped);
                Ingested::Dropped(err)
            }
        }
    }

    // --- Queries ---

    #[must_use]
    pub fn latest_frame(&self) -> Option<&TrackingFrame> {
        self.latest_frame.as_ref()
    }

    #[must_use]
    pub fn latest_params(&self) -> Option<&RigParameterSet> {
        self.latest_params.as_ref()
    }

    #[must_use]
    pub fn accepted(&self) -> u64 {
        self.accepted
    }

    #[must_use]
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}
