//! Session driver: wires the pure state machine to the real world
//!
//! Runs on a dedicated thread owning the recorder, the playback backend,
//! both HTTP clients, and a current-thread tokio runtime. UI commands
//! arrive over a channel; each one is dispatched through the state machine
//! and its effects are executed to completion before the next command is
//! taken, so there is never more than one recording session or in-flight
//! request at a time.

use crate::audio::{PlaybackBackend, Recorder};
use crate::client::{build_http_client, ExchangeClient, SummaryClient};
use crate::config::ChairsideConfig;
use crate::session::{Effect, InteractionState, Session, SessionEvent, ViewState};
use crate::transcript::{Message, Transcript};
use crate::{ChairsideError, Result};
use crossbeam_channel::{unbounded, Receiver, Sender};
use parking_lot::RwLock;
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Control activations forwarded from the UI
#[derive(Clone, Copy, Debug)]
pub enum UiCommand {
    RecordPressed,
    SummaryPressed,
}

/// Read-only view of the session for rendering
#[derive(Clone, Debug)]
pub struct SessionSnapshot {
    pub state: InteractionState,
    pub view: ViewState,
    pub messages: Vec<Message>,
}

/// Handle for the UI (and tests) to drive and observe the session
#[derive(Clone)]
pub struct SessionHandle {
    command_tx: Sender<UiCommand>,
    shared: Arc<RwLock<Session>>,
}

impl SessionHandle {
    /// Forward a record-control activation
    pub fn press_record(&self) -> Result<()> {
        self.send(UiCommand::RecordPressed)
    }

    /// Forward a summary-control activation
    pub fn press_summary(&self) -> Result<()> {
        self.send(UiCommand::SummaryPressed)
    }

    fn send(&self, cmd: UiCommand) -> Result<()> {
        self.command_tx
            .send(cmd)
            .map_err(|e| ChairsideError::ChannelError(format!("Failed to send command: {}", e)))
    }

    /// Snapshot state, view, and transcript for one rendered frame
    pub fn snapshot(&self) -> SessionSnapshot {
        let session = self.shared.read();
        SessionSnapshot {
            state: session.state(),
            view: session.view().clone(),
            messages: session.transcript().get_all(),
        }
    }
}

/// Owns the session loop thread
pub struct SessionDriver {
    recorder: Recorder,
    playback: Box<dyn PlaybackBackend>,
    exchange: ExchangeClient,
    summary: SummaryClient,
    runtime: tokio::runtime::Runtime,
    shared: Arc<RwLock<Session>>,
    command_rx: Receiver<UiCommand>,
}

impl SessionDriver {
    /// Spawn the driver thread; the returned handle keeps it alive
    ///
    /// The loop exits when every clone of the handle has been dropped.
    pub fn spawn(
        config: ChairsideConfig,
        recorder: Recorder,
        playback: Box<dyn PlaybackBackend>,
    ) -> Result<SessionHandle> {
        let http = build_http_client(&config)?;
        let exchange = ExchangeClient::new(http.clone(), &config);
        let summary = SummaryClient::new(http, &config);

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| ChairsideError::ConfigError(format!("Failed to build runtime: {}", e)))?;

        let shared = Arc::new(RwLock::new(Session::new(Transcript::with_greeting())));
        let (command_tx, command_rx) = unbounded();

        let handle = SessionHandle {
            command_tx,
            shared: Arc::clone(&shared),
        };

        let driver = SessionDriver {
            recorder,
            playback,
            exchange,
            summary,
            runtime,
            shared,
            command_rx,
        };

        std::thread::Builder::new()
            .name("chairside-session".to_string())
            .spawn(move || driver.run())
            .map_err(|e| ChairsideError::ChannelError(format!("Failed to spawn driver: {}", e)))?;

        Ok(handle)
    }

    fn run(mut self) {
        info!("Session driver started");
        while let Ok(cmd) = self.command_rx.recv() {
            let event = match cmd {
                UiCommand::RecordPressed => SessionEvent::RecordPressed,
                UiCommand::SummaryPressed => SessionEvent::SummaryPressed,
            };
            self.dispatch(event);
        }
        info!("Session driver stopped");
    }

    /// Run one event and every follow-up it induces to completion
    fn dispatch(&mut self, event: SessionEvent) {
        let mut queue = VecDeque::from([event]);
        let mut blocked = false;
        while let Some(event) = queue.pop_front() {
            let effects = self.shared.write().handle(event);
            for effect in effects {
                blocked |= matches!(effect, Effect::FinishCaptureAndSend | Effect::FetchSummary);
                if let Some(follow_up) = self.execute(effect) {
                    queue.push_back(follow_up);
                }
            }
        }

        // Presses made while a request held the loop pile up in the
        // channel; replaying them now would act on a state the user
        // never saw, so they are discarded instead.
        if blocked {
            let stale = self.command_rx.try_iter().count();
            if stale > 0 {
                debug!("Discarded {} presses made during a blocking request", stale);
            }
        }
    }

    fn execute(&mut self, effect: Effect) -> Option<SessionEvent> {
        match effect {
            Effect::StartCapture => match self.recorder.start() {
                Ok(()) => Some(SessionEvent::CaptureStarted),
                Err(e) => {
                    warn!("Capture failed to start: {}", e);
                    Some(SessionEvent::CaptureFailed(e))
                }
            },

            Effect::FinishCaptureAndSend => {
                // Exchange and summary requests are mutually exclusive in
                // time; the machine only sends while Processing
                debug_assert!(self.shared.read().state().is_processing());
                let audio = self.recorder.stop();
                debug!("Sending {} byte recording", audio.len());
                match self.runtime.block_on(self.exchange.send(audio)) {
                    Ok(reply) => Some(SessionEvent::ExchangeResolved(reply)),
                    Err(e) => {
                        warn!("Exchange failed: {}", e);
                        Some(SessionEvent::ExchangeFailed(e))
                    }
                }
            }

            Effect::Play(bytes) => {
                // Playback failure never disturbs the conversation flow
                if let Err(e) = self.playback.play(&bytes) {
                    warn!("Reply playback failed: {}", e);
                }
                None
            }

            Effect::FetchSummary => {
                debug_assert!(matches!(
                    self.shared.read().state(),
                    InteractionState::ConversationOver {
                        summary_pending: true
                    }
                ));
                match self.runtime.block_on(self.summary.fetch()) {
                    Ok(text) => Some(SessionEvent::SummaryResolved(text)),
                    Err(e) => {
                        warn!("Summary fetch failed: {}", e);
                        Some(SessionEvent::SummaryFailed(e))
                    }
                }
            }
        }
    }
}
