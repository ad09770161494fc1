//! End-to-end session flow tests
//!
//! Drive the full session stack — state machine, recorder, HTTP clients —
//! with deterministic fake audio backends and a mock server, covering the
//! main conversation scenarios.

use chairside::audio::testing::{FakeCapture, FakePlayback};
use chairside::audio::Recorder;
use chairside::config::ChairsideConfig;
use chairside::session::{status, InteractionState, SessionDriver, SessionHandle, SessionSnapshot};
use chairside::transcript::Sender;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const REPLY_AUDIO: &[u8] = &[0x52, 0x49, 0x46, 0x46];

fn spawn_session(server: &MockServer, capture: FakeCapture) -> (SessionHandle, FakePlayback) {
    let config = ChairsideConfig::new().with_server_url(server.uri());
    let recorder = Recorder::new(Box::new(capture));
    let playback = FakePlayback::new();
    let handle = SessionDriver::spawn(config, recorder, Box::new(playback.clone()))
        .expect("driver should spawn");
    (handle, playback)
}

/// Poll the session until the predicate holds or a deadline passes
async fn wait_for(handle: &SessionHandle, what: &str, pred: impl Fn(&SessionSnapshot) -> bool) {
    for _ in 0..100 {
        if pred(&handle.snapshot()) {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("timed out waiting for {}: {:?}", what, handle.snapshot());
}

fn turn_response(conversation_over: Option<&str>) -> ResponseTemplate {
    let mut response = ResponseTemplate::new(200)
        .append_header("x-user-transcript", "My tooth hurts")
        .append_header("x-ai-transcript", "**I understand.** Let's take a look.")
        .set_body_bytes(REPLY_AUDIO.to_vec());
    if let Some(value) = conversation_over {
        response = response.append_header("x-conversation-over", value);
    }
    response
}

async fn run_one_turn(handle: &SessionHandle) {
    handle.press_record().unwrap();
    wait_for(handle, "recording to start", |s| s.state.is_recording()).await;
    handle.press_record().unwrap();
}

#[tokio::test]
async fn test_turn_renders_transcripts_and_plays_reply() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/voice-chat"))
        .respond_with(turn_response(None))
        .mount(&server)
        .await;

    let (handle, playback) =
        spawn_session(&server, FakeCapture::new(vec![vec![1, 2], vec![3, 4]]));

    run_one_turn(&handle).await;
    wait_for(&handle, "turn to resolve", |s| {
        s.state.is_idle() && s.messages.len() == 3
    })
    .await;

    let snapshot = handle.snapshot();
    // Greeting, then the two rendered transcripts
    assert_eq!(snapshot.messages[1].sender, Sender::User);
    assert_eq!(snapshot.messages[1].text, "My tooth hurts");
    assert_eq!(snapshot.messages[2].sender, Sender::Assistant);
    assert_eq!(
        snapshot.messages[2].text,
        "**I understand.** Let's take a look."
    );
    assert_eq!(snapshot.view.status, status::AWAITING_REPLY);
    assert!(snapshot.view.record_visible);
    assert!(!snapshot.view.summary_visible);
    assert!(!snapshot.view.loader_visible);

    // The binary body reached the playback capability intact
    assert_eq!(playback.played(), vec![REPLY_AUDIO.to_vec()]);
}

#[tokio::test]
async fn test_conversation_over_reveals_summary_control() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/voice-chat"))
        .respond_with(turn_response(Some("True")))
        .mount(&server)
        .await;

    let (handle, _playback) = spawn_session(&server, FakeCapture::new(vec![vec![1]]));

    run_one_turn(&handle).await;
    wait_for(&handle, "conversation end", |s| s.state.is_over()).await;

    let snapshot = handle.snapshot();
    assert!(!snapshot.view.record_visible);
    assert!(snapshot.view.summary_visible);
    assert_eq!(snapshot.view.status, status::COMPLETE);
}

#[tokio::test]
async fn test_lowercase_true_does_not_end_conversation() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/voice-chat"))
        .respond_with(turn_response(Some("true")))
        .mount(&server)
        .await;

    let (handle, _playback) = spawn_session(&server, FakeCapture::new(vec![vec![1]]));

    run_one_turn(&handle).await;
    wait_for(&handle, "turn to resolve", |s| s.messages.len() == 3).await;

    let snapshot = handle.snapshot();
    assert!(snapshot.state.is_idle());
    assert!(snapshot.view.record_visible);
    assert!(!snapshot.view.summary_visible);
}

#[tokio::test]
async fn test_server_failure_appends_apology_and_returns_to_idle() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/voice-chat"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let (handle, playback) = spawn_session(&server, FakeCapture::new(vec![vec![1]]));

    run_one_turn(&handle).await;
    wait_for(&handle, "failure to land", |s| s.messages.len() == 2).await;

    let snapshot = handle.snapshot();
    assert!(snapshot.state.is_idle());
    let apology = &snapshot.messages[1];
    assert_eq!(apology.sender, Sender::Assistant);
    assert_eq!(apology.text, "Sorry, something went wrong. Please try again.");
    assert_eq!(
        snapshot.view.status,
        "Error processing audio. Please try again."
    );
    assert!(!snapshot.view.loader_visible);
    assert!(playback.played().is_empty());
}

#[tokio::test]
async fn test_summary_rendered_after_conversation_over() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/voice-chat"))
        .respond_with(turn_response(Some("True")))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/get-summary"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "summary_text": "Routine checkup recommended."
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (handle, _playback) = spawn_session(&server, FakeCapture::new(vec![vec![1]]));

    run_one_turn(&handle).await;
    wait_for(&handle, "conversation end", |s| s.state.is_over()).await;

    handle.press_summary().unwrap();
    wait_for(&handle, "summary to render", |s| {
        s.messages.last().map(|m| m.sender) == Some(Sender::Summary)
    })
    .await;

    let snapshot = handle.snapshot();
    assert_eq!(
        snapshot.messages.last().unwrap().text,
        "Routine checkup recommended."
    );
    assert_eq!(snapshot.view.status, status::REPORT);
    // One-shot: the control stays hidden
    assert!(!snapshot.view.summary_visible);
    assert_eq!(
        snapshot.state,
        InteractionState::ConversationOver {
            summary_pending: false
        }
    );
}

#[tokio::test]
async fn test_press_during_in_flight_request_is_discarded() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/voice-chat"))
        .respond_with(turn_response(None).set_delay(Duration::from_millis(400)))
        .mount(&server)
        .await;

    let (handle, _playback) = spawn_session(&server, FakeCapture::new(vec![vec![1]]));

    run_one_turn(&handle).await;
    wait_for(&handle, "upload to start", |s| s.state.is_processing()).await;

    // Pressed while the loader is up; the control is inert at this point
    // and the press must not start a new capture once the reply lands
    handle.press_record().unwrap();

    wait_for(&handle, "turn to resolve", |s| s.messages.len() == 3).await;
    tokio::time::sleep(Duration::from_millis(100)).await;

    let snapshot = handle.snapshot();
    assert!(snapshot.state.is_idle());
    assert_eq!(snapshot.view.status, status::AWAITING_REPLY);
    assert!(!snapshot.view.loader_visible);
}

#[tokio::test]
async fn test_mic_denied_stays_idle_with_status() {
    let server = MockServer::start().await;
    let (handle, _playback) = spawn_session(&server, FakeCapture::denied());

    handle.press_record().unwrap();
    wait_for(&handle, "denial to land", |s| {
        s.view.status == "Could not access microphone."
    })
    .await;

    let snapshot = handle.snapshot();
    assert!(snapshot.state.is_idle());
    // No message appended; only the seeded greeting
    assert_eq!(snapshot.messages.len(), 1);
}
