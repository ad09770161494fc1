//! Post-conversation summary fetch
//!
//! A single POST with no body; the server replies with a JSON object
//! carrying the summary text.

use crate::config::ChairsideConfig;
use crate::{ChairsideError, Result};
use serde::Deserialize;
use tracing::{debug, info};

#[derive(Debug, Deserialize)]
struct SummaryResponse {
    summary_text: String,
}

/// Client for the summary endpoint
#[derive(Clone)]
pub struct SummaryClient {
    http: reqwest::Client,
    url: String,
}

impl SummaryClient {
    pub fn new(http: reqwest::Client, config: &ChairsideConfig) -> Self {
        Self {
            http,
            url: config.summary_url(),
        }
    }

    /// Fetch the conversation summary
    pub async fn fetch(&self) -> Result<String> {
        debug!("Requesting summary from {}", self.url);

        let response = self
            .http
            .post(&self.url)
            .send()
            .await
            .map_err(|e| ChairsideError::SummaryError(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ChairsideError::SummaryError(format!(
                "Server error: {}",
                status.canonical_reason().unwrap_or(status.as_str())
            )));
        }

        let body: SummaryResponse = response
            .json()
            .await
            .map_err(|e| ChairsideError::SummaryError(format!("Malformed summary body: {}", e)))?;

        info!("Summary received: {} chars", body.summary_text.len());
        Ok(body.summary_text)
    }
}
