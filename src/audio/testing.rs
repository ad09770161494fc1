//! Deterministic audio backends for tests
//!
//! These implement the capture/playback capability traits without touching
//! real hardware: the fake capture emits a fixed chunk script on every
//! `start`, the fake playback records what it was asked to play.

use crate::audio::{AudioChunk, CaptureBackend, PlaybackBackend};
use crate::{ChairsideError, Result};
use crossbeam_channel::Sender;
use parking_lot::Mutex;
use std::sync::Arc;

/// Capture backend that emits a fixed sequence of chunks on every start
pub struct FakeCapture {
    chunks: Vec<AudioChunk>,
    deny_access: bool,
    started: bool,
}

impl FakeCapture {
    pub fn new(chunks: Vec<AudioChunk>) -> Self {
        Self {
            chunks,
            deny_access: false,
            started: false,
        }
    }

    /// A backend whose microphone permission is always denied
    pub fn denied() -> Self {
        Self {
            chunks: Vec::new(),
            deny_access: true,
            started: false,
        }
    }
}

impl CaptureBackend for FakeCapture {
    fn start(&mut self, chunk_tx: Sender<AudioChunk>) -> Result<()> {
        if self.deny_access {
            return Err(ChairsideError::MicAccessError(
                "permission denied".to_string(),
            ));
        }
        self.started = true;
        // Chunks are delivered synchronously, in order, as the hardware would
        for chunk in &self.chunks {
            chunk_tx
                .send(chunk.clone())
                .map_err(|e| ChairsideError::ChannelError(e.to_string()))?;
        }
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        self.started = false;
        Ok(())
    }
}

/// Playback backend that records every asset it is asked to play
#[derive(Clone, Default)]
pub struct FakePlayback {
    played: Arc<Mutex<Vec<Vec<u8>>>>,
}

impl FakePlayback {
    pub fn new() -> Self {
        Self::default()
    }

    /// All assets played so far, in order
    pub fn played(&self) -> Vec<Vec<u8>> {
        self.played.lock().clone()
    }
}

impl PlaybackBackend for FakePlayback {
    fn play(&mut self, bytes: &[u8]) -> Result<()> {
        self.played.lock().push(bytes.to_vec());
        Ok(())
    }
}
