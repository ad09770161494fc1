//! Microphone capture backend built on cpal
//!
//! The device is acquired inside `start` rather than at construction so
//! that a missing or denied microphone surfaces as a `MicAccessError` at
//! the moment the user presses record, not at startup.

use crate::audio::{AudioChunk, CaptureBackend};
use crate::{ChairsideError, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::Stream;
use crossbeam_channel::Sender;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Capture backend using the default cpal input device
///
/// Samples are downmixed to mono and emitted as s16le byte chunks in
/// arrival order.
pub struct CpalCapture {
    stream: Option<Stream>,
    is_capturing: Arc<Mutex<bool>>,
}

impl CpalCapture {
    pub fn new() -> Self {
        Self {
            stream: None,
            is_capturing: Arc::new(Mutex::new(false)),
        }
    }
}

impl Default for CpalCapture {
    fn default() -> Self {
        Self::new()
    }
}

impl CaptureBackend for CpalCapture {
    fn start(&mut self, chunk_tx: Sender<AudioChunk>) -> Result<()> {
        let host = cpal::default_host();

        let device = host.default_input_device().ok_or_else(|| {
            ChairsideError::MicAccessError("No input device available".into())
        })?;

        info!(
            "Using input device: {}",
            device.name().unwrap_or_else(|_| "Unknown".to_string())
        );

        let config: cpal::StreamConfig = device
            .default_input_config()
            .map_err(|e| {
                ChairsideError::MicAccessError(format!("Failed to get input config: {}", e))
            })?
            .into();

        let channels = config.channels as usize;
        let is_capturing = Arc::clone(&self.is_capturing);

        let err_fn = |err| {
            error!("Audio input stream error: {}", err);
        };

        let stream = device
            .build_input_stream(
                &config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    if !*is_capturing.lock() {
                        return;
                    }

                    // Downmix to mono, then encode as s16le bytes
                    let mut chunk = Vec::with_capacity(data.len() / channels * 2);
                    for frame in data.chunks(channels) {
                        let sample = frame.iter().sum::<f32>() / channels as f32;
                        let sample = (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
                        chunk.extend_from_slice(&sample.to_le_bytes());
                    }

                    if let Err(e) = chunk_tx.send(chunk) {
                        debug!("Failed to send audio chunk: {}", e);
                    }
                },
                err_fn,
                None,
            )
            .map_err(|e| {
                ChairsideError::MicAccessError(format!("Failed to build input stream: {}", e))
            })?;

        stream.play().map_err(|e| {
            ChairsideError::MicAccessError(format!("Failed to start input stream: {}", e))
        })?;

        *self.is_capturing.lock() = true;
        self.stream = Some(stream);

        info!("Started audio capture");
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        *self.is_capturing.lock() = false;

        if let Some(stream) = self.stream.take() {
            drop(stream);
            info!("Stopped audio capture");
        }

        Ok(())
    }
}

impl Drop for CpalCapture {
    fn drop(&mut self) {
        let _ = self.stop();
    }
}
