//! Interaction state machine
//!
//! The whole conversation flow is one finite-state machine with a single
//! dispatch function mapping (state, event) to (effects, next state).
//! The machine is pure apart from appending to the transcript: all I/O
//! (microphone, network, speaker) is requested through [`Effect`]s and
//! reported back as [`SessionEvent`]s, so every transition is testable
//! without hardware or a server.

pub mod driver;

pub use driver::{SessionDriver, SessionHandle, SessionSnapshot, UiCommand};

use crate::client::ExchangeReply;
use crate::transcript::{Sender, Transcript};
use crate::ChairsideError;
use tracing::debug;

/// Status line texts, matching the server-side assistant's register.
pub mod status {
    pub const IDLE: &str = "Click the button to start talking.";
    pub const RECORDING: &str = "Recording... Click to stop.";
    pub const PROCESSING: &str = "Processing...";
    pub const AWAITING_REPLY: &str = "Click the button to reply.";
    pub const COMPLETE: &str = "Conversation complete.";
    pub const REPORT: &str = "Report generated.";
}

/// Apology appended to the log when a turn fails, voiced by the assistant.
pub const APOLOGY: &str = "Sorry, something went wrong. Please try again.";

/// Current position in the conversation flow
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InteractionState {
    /// Ready to start a recording
    #[default]
    Idle,
    /// Microphone is live, capturing a turn
    Recording,
    /// Turn uploaded, waiting for the server's reply
    Processing,
    /// Server signalled the conversation has concluded
    ConversationOver {
        /// A summary fetch is in flight
        summary_pending: bool,
    },
}

impl InteractionState {
    pub fn is_idle(&self) -> bool {
        matches!(self, InteractionState::Idle)
    }

    pub fn is_recording(&self) -> bool {
        matches!(self, InteractionState::Recording)
    }

    pub fn is_processing(&self) -> bool {
        matches!(self, InteractionState::Processing)
    }

    pub fn is_over(&self) -> bool {
        matches!(self, InteractionState::ConversationOver { .. })
    }
}

/// What the user can see and press right now
///
/// Derived exclusively by the state machine, never mutated elsewhere, so
/// the controls can never be observed in an inconsistent combination.
#[derive(Clone, Debug)]
pub struct ViewState {
    pub record_visible: bool,
    pub summary_visible: bool,
    pub loader_visible: bool,
    pub status: String,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            record_visible: true,
            summary_visible: false,
            loader_visible: false,
            status: status::IDLE.to_string(),
        }
    }
}

/// Everything that can drive the state machine
#[derive(Clone, Debug)]
pub enum SessionEvent {
    /// The record control was activated
    RecordPressed,
    /// The summary control was activated
    SummaryPressed,
    /// Microphone access granted, capture running
    CaptureStarted,
    /// Microphone access denied or hardware failure
    CaptureFailed(ChairsideError),
    /// The conversational turn resolved
    ExchangeResolved(ExchangeReply),
    /// The conversational turn failed
    ExchangeFailed(ChairsideError),
    /// The summary fetch resolved
    SummaryResolved(String),
    /// The summary fetch failed
    SummaryFailed(ChairsideError),
}

/// Side effects requested by a transition, executed by the driver
#[derive(Clone, Debug)]
pub enum Effect {
    /// Acquire the microphone and begin capturing
    StartCapture,
    /// Finalize the recording and upload it
    FinishCaptureAndSend,
    /// Play the assistant's spoken reply
    Play(Vec<u8>),
    /// Request the post-conversation summary
    FetchSummary,
}

/// The interaction state machine itself
pub struct Session {
    state: InteractionState,
    view: ViewState,
    transcript: Transcript,
}

impl Session {
    /// Create a session over the given transcript
    pub fn new(transcript: Transcript) -> Self {
        Self {
            state: InteractionState::Idle,
            view: ViewState::default(),
            transcript,
        }
    }

    pub fn state(&self) -> InteractionState {
        self.state
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Dispatch one event: apply the transition, return requested effects
    ///
    /// Unexpected (state, event) pairs are ignored; the controls that emit
    /// events are only live in the states where the events are expected.
    pub fn handle(&mut self, event: SessionEvent) -> Vec<Effect> {
        match (self.state, event) {
            (InteractionState::Idle, SessionEvent::RecordPressed) => {
                vec![Effect::StartCapture]
            }

            (InteractionState::Idle, SessionEvent::CaptureStarted) => {
                self.state = InteractionState::Recording;
                self.view.status = status::RECORDING.to_string();
                vec![]
            }

            (InteractionState::Idle, SessionEvent::CaptureFailed(e)) => {
                self.view.status = e.user_message();
                vec![]
            }

            (InteractionState::Recording, SessionEvent::RecordPressed) => {
                self.state = InteractionState::Processing;
                self.view.status = status::PROCESSING.to_string();
                self.view.loader_visible = true;
                vec![Effect::FinishCaptureAndSend]
            }

            (InteractionState::Processing, SessionEvent::ExchangeResolved(reply)) => {
                self.transcript.append(Sender::User, reply.user_transcript);
                self.transcript
                    .append(Sender::Assistant, reply.assistant_transcript);
                self.view.loader_visible = false;

                if reply.conversation_over {
                    self.view.record_visible = false;
                    self.view.summary_visible = true;
                    self.view.status = status::COMPLETE.to_string();
                    self.state = InteractionState::ConversationOver {
                        summary_pending: false,
                    };
                } else {
                    self.view.status = status::AWAITING_REPLY.to_string();
                    self.state = InteractionState::Idle;
                }
                vec![Effect::Play(reply.reply_audio)]
            }

            (InteractionState::Processing, SessionEvent::ExchangeFailed(e)) => {
                self.transcript.append(Sender::Assistant, APOLOGY);
                self.view.loader_visible = false;
                self.view.status = e.user_message();
                self.state = InteractionState::Idle;
                vec![]
            }

            (
                InteractionState::ConversationOver {
                    summary_pending: false,
                },
                SessionEvent::SummaryPressed,
            ) => {
                // Hidden synchronously: a second activation is unreachable
                // before the fetch resolves
                self.view.summary_visible = false;
                self.view.loader_visible = true;
                self.state = InteractionState::ConversationOver {
                    summary_pending: true,
                };
                vec![Effect::FetchSummary]
            }

            (
                InteractionState::ConversationOver {
                    summary_pending: true,
                },
                SessionEvent::SummaryResolved(text),
            ) => {
                self.transcript.append(Sender::Summary, text);
                self.view.loader_visible = false;
                self.view.status = status::REPORT.to_string();
                self.state = InteractionState::ConversationOver {
                    summary_pending: false,
                };
                vec![]
            }

            (
                InteractionState::ConversationOver {
                    summary_pending: true,
                },
                SessionEvent::SummaryFailed(e),
            ) => {
                self.transcript.append(Sender::Assistant, e.user_message());
                self.view.loader_visible = false;
                self.view.status = status::REPORT.to_string();
                self.state = InteractionState::ConversationOver {
                    summary_pending: false,
                };
                vec![]
            }

            (state, event) => {
                debug!("Ignoring {:?} in state {:?}", event, state);
                vec![]
            }
        }
    }
}
