//! Integration tests: whole conversations driven through the public API.
//!
//! These tests run a [`SessionController`] against self-contained collaborator
//! doubles and verify the observable contract end to end: transcript contents
//! and ordering, the full inference context, the state-event chain, and clean
//! teardown mid-conversation.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use bloom_voice::{
    AudioClip, AudioPlayback, CaptureErrorKind, CaptureEvent, ConversationInference, InferenceReply,
    InferenceRequest, Result, Role, SessionConfig, SessionController, SessionEvent, SessionHandle,
    SessionState, SpeechCapture, Turn,
};
use tokio::sync::broadcast;

// ---------------------------------------------------------------------------
// Collaborator doubles
// ---------------------------------------------------------------------------

/// Capture source that yields a scripted sequence of outcomes, one per
/// activation, then reports silence forever.
struct ScriptedMic {
    script: Mutex<VecDeque<CaptureEvent>>,
    stops: AtomicUsize,
}

impl ScriptedMic {
    fn speaking(utterances: &[&str]) -> Arc<Self> {
        let script = utterances
            .iter()
            .map(|text| CaptureEvent::Transcript((*text).to_owned()))
            .collect();
        Arc::new(Self {
            script: Mutex::new(script),
            stops: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl SpeechCapture for ScriptedMic {
    async fn start(&self) -> CaptureEvent {
        self.script
            .lock()
            .expect("mic script lock")
            .pop_front()
            .unwrap_or(CaptureEvent::Empty)
    }

    async fn stop(&self) {
        self.stops.fetch_add(1, Ordering::SeqCst);
    }
}

/// Dialogue service that echoes the utterance back with a short audio clip
/// and records every request it saw.
struct EchoService {
    requests: Mutex<Vec<InferenceRequest>>,
}

impl EchoService {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            requests: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl ConversationInference for EchoService {
    async fn reply(&self, request: InferenceRequest) -> Result<InferenceReply> {
        let text = format!("You said: {}", request.utterance);
        self.requests.lock().expect("request lock").push(request);
        Ok(InferenceReply {
            text,
            audio: Some(AudioClip::new(vec![0.2; 480], 24_000)),
        })
    }
}

/// Playback sink that completes instantly (or after a fixed delay) and
/// counts clips and stop calls.
struct CountingSpeaker {
    delay: Duration,
    played: AtomicUsize,
    stops: AtomicUsize,
}

impl CountingSpeaker {
    fn instant() -> Arc<Self> {
        Arc::new(Self {
            delay: Duration::ZERO,
            played: AtomicUsize::new(0),
            stops: AtomicUsize::new(0),
        })
    }

    fn slow() -> Arc<Self> {
        Arc::new(Self {
            delay: Duration::from_secs(10),
            played: AtomicUsize::new(0),
            stops: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl AudioPlayback for CountingSpeaker {
    async fn play(&self, _clip: AudioClip) -> Result<()> {
        self.played.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        Ok(())
    }

    async fn stop(&self) {
        self.stops.fetch_add(1, Ordering::SeqCst);
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn spawn(
    config: SessionConfig,
    mic: Arc<ScriptedMic>,
    service: Arc<EchoService>,
    speaker: Arc<CountingSpeaker>,
) -> (
    SessionHandle,
    broadcast::Receiver<SessionEvent>,
    tokio::task::JoinHandle<Result<()>>,
) {
    let (event_tx, event_rx) = broadcast::channel(256);
    let (controller, handle) = SessionController::new(config, mic, service, speaker);
    let join = tokio::spawn(controller.with_events(event_tx).run());
    (handle, event_rx, join)
}

/// Polls the session until it rests idle with the expected transcript length.
async fn settle(handle: &SessionHandle, want_turns: usize) -> bloom_voice::SessionSnapshot {
    for _ in 0..500 {
        let snapshot = handle.snapshot().await.expect("snapshot");
        if snapshot.state == SessionState::Idle && snapshot.turns.len() == want_turns {
            return snapshot;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("session never settled at {want_turns} turns");
}

async fn next_event(rx: &mut broadcast::Receiver<SessionEvent>) -> SessionEvent {
    tokio::time::timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("timed out waiting for session event")
        .expect("event channel closed")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn full_conversation_round_trip() {
    let mic = ScriptedMic::speaking(&["I feel anxious", "Thank you"]);
    let service = EchoService::new();
    let speaker = CountingSpeaker::instant();
    let (handle, _events, join) = spawn(
        SessionConfig::default(),
        Arc::clone(&mic),
        Arc::clone(&service),
        Arc::clone(&speaker),
    );

    // Greeting plus two captured turns: one agent turn, then two user/agent
    // pairs. The mic runs on its own after each reply finishes playing.
    let snapshot = settle(&handle, 5).await;

    let roles: Vec<Role> = snapshot.turns.iter().map(|t| t.role).collect();
    assert_eq!(
        roles,
        vec![Role::Agent, Role::User, Role::Agent, Role::User, Role::Agent]
    );
    assert_eq!(snapshot.turns[1], Turn::user("I feel anxious"));
    assert_eq!(snapshot.turns[2], Turn::agent("You said: I feel anxious"));
    assert_eq!(snapshot.turns[3], Turn::user("Thank you"));
    assert_eq!(snapshot.latest_agent_text.as_deref(), Some("You said: Thank you"));

    // Every reply was spoken.
    assert_eq!(speaker.played.load(Ordering::SeqCst), 3);

    // Each request carried the complete prior transcript.
    let requests = service.requests.lock().expect("request lock");
    assert_eq!(requests.len(), 3);
    assert!(requests[0].history.is_empty());
    assert_eq!(requests[1].history.len(), 1);
    assert_eq!(requests[2].history.len(), 3);
    assert_eq!(requests[1].utterance, "I feel anxious");
    assert!(!requests[0].system_prompt.is_empty());

    handle.end();
    join.await.expect("join").expect("run");
}

#[tokio::test]
async fn state_events_form_an_unbroken_chain() {
    let mic = ScriptedMic::speaking(&["hello there"]);
    let service = EchoService::new();
    let speaker = CountingSpeaker::instant();
    let (handle, mut events, join) = spawn(SessionConfig::default(), mic, service, speaker);

    settle(&handle, 3).await;
    handle.end();
    join.await.expect("join").expect("run");

    // Drain everything up to the end marker.
    let mut changes: Vec<(SessionState, SessionState)> = Vec::new();
    loop {
        match next_event(&mut events).await {
            SessionEvent::StateChanged { from, to } => changes.push((from, to)),
            SessionEvent::Ended => break,
            _ => {}
        }
    }

    // The session holds exactly one state at a time, so every transition
    // starts where the previous one ended.
    assert!(!changes.is_empty());
    assert_eq!(changes[0].0, SessionState::Idle);
    for pair in changes.windows(2) {
        assert_eq!(
            pair[0].1, pair[1].0,
            "state chain broken between {:?} and {:?}",
            pair[0], pair[1]
        );
    }
}

#[tokio::test]
async fn permission_fault_is_reported_and_session_survives() {
    let mic = Arc::new(ScriptedMic {
        script: Mutex::new(VecDeque::from([
            CaptureEvent::Failed(CaptureErrorKind::PermissionDenied),
            CaptureEvent::Transcript("can you hear me now".to_owned()),
        ])),
        stops: AtomicUsize::new(0),
    });
    let service = EchoService::new();
    let speaker = CountingSpeaker::instant();
    let config = SessionConfig {
        greeting_prompt: String::new(),
        ..SessionConfig::default()
    };
    let (handle, mut events, join) = spawn(config, mic, service, speaker);

    handle.toggle_mic().expect("toggle");
    let mut faults = 0;
    loop {
        match next_event(&mut events).await {
            SessionEvent::CaptureFault { kind } => {
                assert_eq!(kind, CaptureErrorKind::PermissionDenied);
                faults += 1;
            }
            SessionEvent::StateChanged {
                to: SessionState::Idle,
                ..
            } => break,
            _ => {}
        }
    }
    assert_eq!(faults, 1);

    // The same session accepts another activation and completes a turn.
    handle.toggle_mic().expect("toggle again");
    let snapshot = settle(&handle, 2).await;
    assert_eq!(snapshot.turns[0], Turn::user("can you hear me now"));

    handle.end();
    join.await.expect("join").expect("run");
}

#[tokio::test]
async fn ending_mid_playback_stops_the_speaker() {
    let mic = ScriptedMic::speaking(&[]);
    let service = EchoService::new();
    let speaker = CountingSpeaker::slow();
    let (handle, mut events, join) = spawn(
        SessionConfig::default(),
        mic,
        service,
        Arc::clone(&speaker),
    );

    // Wait for the greeting to start playing, then hang up on it.
    loop {
        if let SessionEvent::StateChanged {
            to: SessionState::Speaking,
            ..
        } = next_event(&mut events).await
        {
            break;
        }
    }
    handle.end();
    join.await.expect("join").expect("run");

    assert_eq!(speaker.stops.load(Ordering::SeqCst), 1);
    assert!(handle.is_ended());

    // The end marker is the last event; nothing follows it.
    loop {
        if let SessionEvent::Ended = next_event(&mut events).await {
            break;
        }
    }
    assert!(matches!(
        events.try_recv(),
        Err(broadcast::error::TryRecvError::Closed)
    ));
}

#[tokio::test]
async fn handle_clones_steer_the_same_session() {
    let mic = ScriptedMic::speaking(&[]);
    let service = EchoService::new();
    let speaker = CountingSpeaker::instant();
    let config = SessionConfig {
        greeting_prompt: String::new(),
        ..SessionConfig::default()
    };
    let (handle, _events, join) = spawn(config, mic, service, speaker);

    let clone = handle.clone();
    assert_eq!(clone.id(), handle.id());

    let snapshot = clone.snapshot().await.expect("snapshot via clone");
    assert_eq!(snapshot.state, SessionState::Idle);

    handle.end();
    join.await.expect("join").expect("run");
    assert!(clone.is_ended());
    assert!(clone.toggle_mic().is_err());
}
