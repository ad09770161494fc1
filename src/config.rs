//! Client configuration
//!
//! The server base URL and request timeout can be set programmatically or
//! picked up from the environment at startup.

use std::time::Duration;

/// Path of the conversational turn endpoint, fixed by the server contract.
pub const VOICE_CHAT_PATH: &str = "/voice-chat";

/// Path of the summary endpoint, fixed by the server contract.
pub const SUMMARY_PATH: &str = "/get-summary";

/// Configuration for the Chairside client
#[derive(Clone, Debug)]
pub struct ChairsideConfig {
    /// Base URL of the intake server (no trailing slash)
    pub server_url: String,

    /// Timeout applied to each HTTP request
    pub request_timeout: Duration,
}

impl Default for ChairsideConfig {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:5000".to_string(),
            request_timeout: Duration::from_secs(60),
        }
    }
}

impl ChairsideConfig {
    /// Create a configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a configuration from the environment
    ///
    /// Honors `CHAIRSIDE_SERVER_URL` and `CHAIRSIDE_TIMEOUT_SECS`; anything
    /// unset falls back to the defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var("CHAIRSIDE_SERVER_URL") {
            config.server_url = url.trim_end_matches('/').to_string();
        }
        if let Ok(secs) = std::env::var("CHAIRSIDE_TIMEOUT_SECS") {
            if let Ok(secs) = secs.parse::<u64>() {
                config.request_timeout = Duration::from_secs(secs);
            }
        }
        config
    }

    /// Set the server base URL
    pub fn with_server_url(mut self, url: impl Into<String>) -> Self {
        let url: String = url.into();
        self.server_url = url.trim_end_matches('/').to_string();
        self
    }

    /// Set the request timeout
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Full URL of the conversational turn endpoint
    pub fn voice_chat_url(&self) -> String {
        format!("{}{}", self.server_url, VOICE_CHAT_PATH)
    }

    /// Full URL of the summary endpoint
    pub fn summary_url(&self) -> String {
        format!("{}{}", self.server_url, SUMMARY_PATH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_urls() {
        let config = ChairsideConfig::default();
        assert_eq!(config.voice_chat_url(), "http://localhost:5000/voice-chat");
        assert_eq!(config.summary_url(), "http://localhost:5000/get-summary");
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let config = ChairsideConfig::new().with_server_url("http://intake.example/");
        assert_eq!(config.voice_chat_url(), "http://intake.example/voice-chat");
    }
}
