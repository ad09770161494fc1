pub mod audio;
pub mod client;
pub mod config;
pub mod session;
pub mod transcript;
pub mod ui;

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum ChairsideError {
    #[error("Microphone access error: {0}")]
    MicAccessError(String),

    #[error("Exchange error: {0}")]
    ExchangeError(String),

    #[error("Summary error: {0}")]
    SummaryError(String),

    #[error("Playback error: {0}")]
    PlaybackError(String),

    #[error("Channel error: {0}")]
    ChannelError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl ChairsideError {
    /// Check if this error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            // The user can grant access and try recording again
            ChairsideError::MicAccessError(_) => true,
            // A failed turn is retried by recording again
            ChairsideError::ExchangeError(_) => true,
            // Summary failures leave the conversation readable in the log
            ChairsideError::SummaryError(_) => true,
            // Playback failures never lose the transcript
            ChairsideError::PlaybackError(_) => true,
            // Channel errors indicate internal issues
            ChairsideError::ChannelError(_) => false,
            // Config errors require user intervention
            ChairsideError::ConfigError(_) => false,
        }
    }

    /// Get a user-friendly description
    pub fn user_message(&self) -> String {
        match self {
            ChairsideError::MicAccessError(_) => "Could not access microphone.".to_string(),
            ChairsideError::ExchangeError(_) => {
                "Error processing audio. Please try again.".to_string()
            }
            ChairsideError::SummaryError(_) => "Could not generate the summary.".to_string(),
            ChairsideError::PlaybackError(_) => {
                "Could not play the reply audio. The transcript is shown above.".to_string()
            }
            ChairsideError::ChannelError(_) => {
                "Internal communication error. Please restart the application.".to_string()
            }
            ChairsideError::ConfigError(_) => {
                "Configuration error. Please check settings.".to_string()
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, ChairsideError>;
