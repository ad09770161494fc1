//! Recorder: owns the chunk sequence for one capture session
//!
//! Chunks arrive over a channel in capture order and are consumed exactly
//! once at `stop()`, where they are concatenated into a single asset.
//! Concatenation order must match arrival order or the encoded audio is
//! corrupt.

use crate::audio::{AudioChunk, CaptureBackend};
use crate::Result;
use crossbeam_channel::{unbounded, Receiver, Sender};
use tracing::{debug, info, warn};

/// Finalized recording, ready for upload
///
/// Transient: exists only between `stop()` and the end of the upload.
#[derive(Clone, Debug)]
pub struct RecordedAudio {
    pub bytes: Vec<u8>,
}

impl RecordedAudio {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Mediates microphone access and buffers captured chunks
pub struct Recorder {
    backend: Box<dyn CaptureBackend>,
    chunk_tx: Sender<AudioChunk>,
    chunk_rx: Receiver<AudioChunk>,
    capturing: bool,
}

impl Recorder {
    pub fn new(backend: Box<dyn CaptureBackend>) -> Self {
        // Unbounded: a dropped chunk would corrupt the concatenated asset
        let (chunk_tx, chunk_rx) = unbounded();
        Self {
            backend,
            chunk_tx,
            chunk_rx,
            capturing: false,
        }
    }

    /// Request microphone access and begin capturing
    ///
    /// Any chunks left over from a previous session are discarded first.
    /// On failure no state changes: the recorder stays idle.
    pub fn start(&mut self) -> Result<()> {
        if self.capturing {
            warn!("Already capturing, ignoring start request");
            return Ok(());
        }

        let discarded = self.chunk_rx.try_iter().count();
        if discarded > 0 {
            debug!("Discarded {} stale chunks", discarded);
        }

        self.backend.start(self.chunk_tx.clone())?;
        self.capturing = true;
        info!("Capture started");
        Ok(())
    }

    /// Stop capturing and finalize the recorded asset
    ///
    /// The hardware is released before the chunks are assembled, regardless
    /// of what happens to the asset downstream. Calling this without an
    /// active capture is a programming error; the state machine never does.
    pub fn stop(&mut self) -> RecordedAudio {
        debug_assert!(self.capturing, "stop() called without an active capture");

        if let Err(e) = self.backend.stop() {
            warn!("Capture backend failed to stop cleanly: {}", e);
        }
        self.capturing = false;

        let mut bytes = Vec::new();
        let mut chunks = 0usize;
        for chunk in self.chunk_rx.try_iter() {
            bytes.extend_from_slice(&chunk);
            chunks += 1;
        }
        info!("Capture stopped: {} chunks, {} bytes", chunks, bytes.len());

        RecordedAudio { bytes }
    }

    /// Check if a capture session is active
    pub fn is_capturing(&self) -> bool {
        self.capturing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::testing::FakeCapture;

    fn recorder_with_chunks(chunks: Vec<AudioChunk>) -> Recorder {
        Recorder::new(Box::new(FakeCapture::new(chunks)))
    }

    #[test]
    fn test_asset_is_ordered_concatenation() {
        let mut recorder =
            recorder_with_chunks(vec![vec![1, 2], vec![3], vec![], vec![4, 5, 6]]);
        recorder.start().unwrap();
        let asset = recorder.stop();
        assert_eq!(asset.bytes, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_chunks_cleared_on_next_start() {
        let mut recorder = recorder_with_chunks(vec![vec![9, 9]]);
        recorder.start().unwrap();
        let first = recorder.stop();
        assert_eq!(first.bytes, vec![9, 9]);

        // The fake emits its chunks on every start; a second session must
        // contain only its own chunks, nothing from the first.
        recorder.start().unwrap();
        let second = recorder.stop();
        assert_eq!(second.bytes, vec![9, 9]);
    }

    #[test]
    fn test_failed_start_leaves_recorder_idle() {
        let mut recorder = Recorder::new(Box::new(FakeCapture::denied()));
        assert!(recorder.start().is_err());
        assert!(!recorder.is_capturing());
    }

    #[test]
    fn test_capturing_flag_tracks_session() {
        let mut recorder = recorder_with_chunks(vec![vec![1]]);
        assert!(!recorder.is_capturing());
        recorder.start().unwrap();
        assert!(recorder.is_capturing());
        recorder.stop();
        assert!(!recorder.is_capturing());
    }
}
