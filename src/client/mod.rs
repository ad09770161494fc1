//! HTTP clients for the two server exchanges
//!
//! One conversational turn (`/voice-chat`) and the one-shot post-conversation
//! summary (`/get-summary`). Both share a [`reqwest::Client`] built from the
//! configured timeout.

pub mod exchange;
pub mod summary;

pub use exchange::{ExchangeClient, ExchangeReply};
pub use summary::SummaryClient;

use crate::config::ChairsideConfig;
use crate::{ChairsideError, Result};

/// Build the HTTP client shared by both exchanges
pub fn build_http_client(config: &ChairsideConfig) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(config.request_timeout)
        .build()
        .map_err(|e| ChairsideError::ConfigError(format!("Failed to build HTTP client: {}", e)))
}
