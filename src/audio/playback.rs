//! Reply audio playback
//!
//! The server replies with an encoded audio body (mpeg in practice). It is
//! decoded with symphonia to mono f32 samples and played on the default
//! cpal output device from a worker thread, so the session loop never
//! blocks on the speaker.

use crate::audio::PlaybackBackend;
use crate::{ChairsideError, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use parking_lot::Mutex;
use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};
use std::sync::Arc;
use std::time::Duration;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::{error, info};

/// Playback backend: symphonia decode feeding the default output device
pub struct CpalPlayback;

impl CpalPlayback {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CpalPlayback {
    fn default() -> Self {
        Self::new()
    }
}

impl PlaybackBackend for CpalPlayback {
    fn play(&mut self, bytes: &[u8]) -> Result<()> {
        // Decode on the caller's thread so malformed audio is reported,
        // then hand the samples to a worker for the actual playback.
        let decoded = decode_to_mono(bytes)?;
        info!(
            "Playing reply audio: {} samples at {}Hz",
            decoded.samples.len(),
            decoded.sample_rate
        );

        std::thread::spawn(move || {
            if let Err(e) = play_samples(decoded) {
                error!("Reply playback failed: {}", e);
            }
        });

        Ok(())
    }
}

/// Decoded audio, mono interleaved
struct DecodedAudio {
    samples: Vec<f32>,
    sample_rate: u32,
}

/// Decode an encoded audio asset to mono f32 samples
fn decode_to_mono(bytes: &[u8]) -> Result<DecodedAudio> {
    let cursor = std::io::Cursor::new(bytes.to_vec());
    let mss = MediaSourceStream::new(Box::new(cursor), Default::default());

    let probed = symphonia::default::get_probe()
        .format(
            &Hint::new(),
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| ChairsideError::PlaybackError(format!("Unrecognized audio format: {}", e)))?;

    let mut format = probed.format;
    let track = format
        .default_track()
        .ok_or_else(|| ChairsideError::PlaybackError("No audio track in reply".into()))?;
    let track_id = track.id;
    let sample_rate = track
        .codec_params
        .sample_rate
        .ok_or_else(|| ChairsideError::PlaybackError("Unknown sample rate".into()))?;

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| ChairsideError::PlaybackError(format!("Unsupported codec: {}", e)))?;

    let mut samples = Vec::new();

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            // End of stream surfaces as an IO error from the reader
            Err(SymphoniaError::IoError(_)) => break,
            Err(SymphoniaError::ResetRequired) => break,
            Err(e) => {
                return Err(ChairsideError::PlaybackError(format!(
                    "Failed to read audio packet: {}",
                    e
                )))
            }
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(decoded) => decoded,
            // Skip over recoverable decode glitches
            Err(SymphoniaError::DecodeError(_)) => continue,
            Err(e) => {
                return Err(ChairsideError::PlaybackError(format!(
                    "Failed to decode audio: {}",
                    e
                )))
            }
        };

        let spec = *decoded.spec();
        let channels = spec.channels.count().max(1);

        let mut buf = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
        buf.copy_interleaved_ref(decoded);

        // Downmix interleaved frames to mono
        for frame in buf.samples().chunks(channels) {
            samples.push(frame.iter().sum::<f32>() / channels as f32);
        }
    }

    if samples.is_empty() {
        return Err(ChairsideError::PlaybackError(
            "Reply audio decoded to no samples".into(),
        ));
    }

    Ok(DecodedAudio {
        samples,
        sample_rate,
    })
}

/// Play mono samples on the default output device until exhausted
fn play_samples(decoded: DecodedAudio) -> Result<()> {
    let host = cpal::default_host();

    let device = host
        .default_output_device()
        .ok_or_else(|| ChairsideError::PlaybackError("No output device available".into()))?;

    let config: cpal::StreamConfig = device
        .default_output_config()
        .map_err(|e| ChairsideError::PlaybackError(format!("Failed to get output config: {}", e)))?
        .into();

    let channels = config.channels as usize;
    let device_rate = config.sample_rate.0;
    let samples = resample(&decoded.samples, decoded.sample_rate, device_rate)?;
    let total = samples.len();

    let position = Arc::new(Mutex::new(0usize));
    let position_writer = Arc::clone(&position);

    let err_fn = |err| {
        error!("Audio output stream error: {}", err);
    };

    let stream = device
        .build_output_stream(
            &config,
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                let mut pos = position_writer.lock();
                for frame in data.chunks_mut(channels) {
                    let sample = if *pos < samples.len() {
                        let s = samples[*pos];
                        *pos += 1;
                        s
                    } else {
                        0.0
                    };
                    for out in frame.iter_mut() {
                        *out = sample;
                    }
                }
            },
            err_fn,
            None,
        )
        .map_err(|e| {
            ChairsideError::PlaybackError(format!("Failed to build output stream: {}", e))
        })?;

    stream
        .play()
        .map_err(|e| ChairsideError::PlaybackError(format!("Failed to start playback: {}", e)))?;

    // Hold the stream open until every sample has been consumed
    while *position.lock() < total {
        std::thread::sleep(Duration::from_millis(50));
    }
    std::thread::sleep(Duration::from_millis(100));
    drop(stream);

    Ok(())
}

/// Sinc resample mono samples between sample rates
fn resample(samples: &[f32], from_rate: u32, to_rate: u32) -> Result<Vec<f32>> {
    if from_rate == to_rate || samples.is_empty() {
        return Ok(samples.to_vec());
    }

    let ratio = to_rate as f64 / from_rate as f64;

    let params = SincInterpolationParameters {
        sinc_len: 256,
        f_cutoff: 0.95,
        interpolation: SincInterpolationType::Linear,
        oversampling_factor: 256,
        window: WindowFunction::BlackmanHarris2,
    };

    // SincFixedIn consumes a fixed number of frames per call
    let chunk_size = 1024;

    let mut resampler = SincFixedIn::<f32>::new(ratio, 2.0, params, chunk_size, 1)
        .map_err(|e| ChairsideError::PlaybackError(format!("Failed to create resampler: {}", e)))?;

    let mut out = Vec::with_capacity((samples.len() as f64 * ratio * 1.1) as usize);

    let mut offset = 0;
    while offset < samples.len() {
        let remaining = samples.len() - offset;
        let take = remaining.min(chunk_size);

        // The final chunk is zero-padded up to chunk_size
        let mut input = vec![0.0f32; chunk_size];
        input[..take].copy_from_slice(&samples[offset..offset + take]);

        let output = resampler
            .process(&[input], None)
            .map_err(|e| ChairsideError::PlaybackError(format!("Resampling failed: {}", e)))?;

        let produced = output[0].len();
        let wanted = if remaining < chunk_size {
            ((take as f64) * ratio).ceil() as usize
        } else {
            produced
        };
        out.extend_from_slice(&output[0][..wanted.min(produced)]);

        offset += take;
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resample_identity() {
        let samples = vec![0.0, 0.5, 1.0];
        assert_eq!(resample(&samples, 44100, 44100).unwrap(), samples);
    }

    #[test]
    fn test_resample_upsampling() {
        let samples: Vec<f32> = (0..2048).map(|i| (i as f32 * 0.05).sin()).collect();
        let out = resample(&samples, 22050, 44100).unwrap();
        assert!(out.len() > samples.len() + samples.len() / 2);
    }

    #[test]
    fn test_resample_downsampling() {
        let samples: Vec<f32> = (0..3072).map(|i| (i as f32 * 0.05).sin()).collect();
        let out = resample(&samples, 48000, 16000).unwrap();
        assert!(!out.is_empty());
        assert!(out.len() < samples.len());
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(decode_to_mono(&[0u8; 64]).is_err());
    }
}
