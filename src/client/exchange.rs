//! One conversational turn over the wire
//!
//! The recorded audio is uploaded as multipart form data; the response
//! carries three logically distinct pieces over two channels: both
//! transcripts as UTF-8 response headers and the assistant's spoken reply
//! as the binary body. Conversation end is signalled by a header whose
//! value is compared byte-for-byte against the literal `True` — that
//! string-typed boolean is part of the server contract and is preserved
//! exactly, not normalized.

use crate::audio::RecordedAudio;
use crate::config::ChairsideConfig;
use crate::{ChairsideError, Result};
use reqwest::header::HeaderMap;
use reqwest::multipart::{Form, Part};
use tracing::{debug, info, warn};

/// Multipart field name for the uploaded audio.
pub const AUDIO_FIELD: &str = "audio_data";

/// Filename declared for the uploaded audio.
pub const AUDIO_FILENAME: &str = "recording.webm";

/// Media type declared for the uploaded audio.
pub const AUDIO_MIME: &str = "audio/webm";

/// Header carrying the user's transcribed speech.
pub const USER_TRANSCRIPT_HEADER: &str = "x-user-transcript";

/// Header carrying the assistant's reply text.
pub const AI_TRANSCRIPT_HEADER: &str = "x-ai-transcript";

/// Header signalling conversation end; only the exact value `True` counts.
pub const CONVERSATION_OVER_HEADER: &str = "x-conversation-over";

const CONVERSATION_OVER_VALUE: &[u8] = b"True";

/// Decoded result of one conversational turn
#[derive(Clone, Debug)]
pub struct ExchangeReply {
    pub user_transcript: String,
    pub assistant_transcript: String,
    pub reply_audio: Vec<u8>,
    pub conversation_over: bool,
}

/// Client for the conversational turn endpoint
#[derive(Clone)]
pub struct ExchangeClient {
    http: reqwest::Client,
    url: String,
}

impl ExchangeClient {
    pub fn new(http: reqwest::Client, config: &ChairsideConfig) -> Self {
        Self {
            http,
            url: config.voice_chat_url(),
        }
    }

    /// Upload one recorded turn and decode the reply
    pub async fn send(&self, audio: RecordedAudio) -> Result<ExchangeReply> {
        debug!("Uploading {} bytes to {}", audio.len(), self.url);

        let part = Part::bytes(audio.bytes)
            .file_name(AUDIO_FILENAME)
            .mime_str(AUDIO_MIME)
            .map_err(|e| ChairsideError::ExchangeError(format!("Invalid media type: {}", e)))?;
        let form = Form::new().part(AUDIO_FIELD, part);

        let response = self
            .http
            .post(&self.url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| ChairsideError::ExchangeError(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ChairsideError::ExchangeError(format!(
                "Server error: {}",
                status.canonical_reason().unwrap_or(status.as_str())
            )));
        }

        let headers = response.headers().clone();
        let user_transcript = header_text(&headers, USER_TRANSCRIPT_HEADER)?;
        let assistant_transcript = header_text(&headers, AI_TRANSCRIPT_HEADER)?;
        let conversation_over = headers
            .get(CONVERSATION_OVER_HEADER)
            .map(|v| v.as_bytes() == CONVERSATION_OVER_VALUE)
            .unwrap_or(false);

        let reply_audio = response
            .bytes()
            .await
            .map_err(|e| ChairsideError::ExchangeError(format!("Failed to read reply audio: {}", e)))?
            .to_vec();

        info!(
            "Turn complete: {} reply bytes, conversation_over={}",
            reply_audio.len(),
            conversation_over
        );

        Ok(ExchangeReply {
            user_transcript,
            assistant_transcript,
            reply_audio,
            conversation_over,
        })
    }
}

/// Decode a UTF-8 transcript header
///
/// An absent header yields an empty transcript rather than failing the
/// whole turn; invalid UTF-8 is a hard error.
fn header_text(headers: &HeaderMap, name: &str) -> Result<String> {
    match headers.get(name) {
        Some(value) => std::str::from_utf8(value.as_bytes())
            .map(|s| s.to_string())
            .map_err(|_| {
                ChairsideError::ExchangeError(format!("Header {} is not valid UTF-8", name))
            }),
        None => {
            warn!("Response missing {} header", name);
            Ok(String::new())
        }
    }
}
