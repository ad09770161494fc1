//! Audio capture and playback
//!
//! The session core never touches hardware directly: capture and playback
//! sit behind narrow capability traits so tests can inject deterministic
//! fakes. The real backends (cpal input, symphonia decode + cpal output)
//! are compiled behind the `audio-io` feature.

pub mod recorder;
pub mod testing;

#[cfg(feature = "audio-io")]
pub mod capture;
#[cfg(feature = "audio-io")]
pub mod playback;

pub use recorder::{RecordedAudio, Recorder};

#[cfg(feature = "audio-io")]
pub use capture::CpalCapture;
#[cfg(feature = "audio-io")]
pub use playback::CpalPlayback;

use crate::Result;
use crossbeam_channel::Sender;

/// One opaque fragment of encoded audio emitted during capture.
pub type AudioChunk = Vec<u8>;

/// Microphone capture capability
///
/// `start` acquires the device and begins emitting chunks on the provided
/// channel in capture order; `stop` releases the hardware before returning.
pub trait CaptureBackend: Send {
    fn start(&mut self, chunk_tx: Sender<AudioChunk>) -> Result<()>;
    fn stop(&mut self) -> Result<()>;
}

/// Speaker playback capability for one reply audio asset.
pub trait PlaybackBackend: Send {
    fn play(&mut self, bytes: &[u8]) -> Result<()>;
}
