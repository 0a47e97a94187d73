//! The session event loop.
//!
//! [`SessionController`] drives one conversation turn at a time through
//! capture → inference → playback. Each stage runs on a spawned task that
//! reports back over a oneshot channel; the loop holds at most one such
//! receiver, so two operations can never be in flight together. Outcomes
//! are applied only if the session is still in the state that started them,
//! and ending the session drops the receiver outright, so a slow reply or a
//! late playback completion can never touch a finished conversation.

use std::sync::Arc;

use tokio::sync::{broadcast, mpsc, oneshot};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::SessionId;
use super::handle::{SessionCommand, SessionHandle, SessionSnapshot};
use super::state::SessionState;
use crate::audio::AudioClip;
use crate::capture::{CaptureEvent, SpeechCapture};
use crate::config::SessionConfig;
use crate::error::{Result, SessionError};
use crate::events::SessionEvent;
use crate::history::{ConversationHistory, Role, Turn};
use crate::inference::{ConversationInference, InferenceReply, InferenceRequest};
use crate::playback::AudioPlayback;

/// Outcome of the one operation currently in flight.
enum OpOutcome {
    Capture(CaptureEvent),
    Inference(Result<InferenceReply>),
    Playback(Result<()>),
}

/// What the event loop should do next, decided by the select below.
enum Step {
    Cancelled,
    Command(Option<SessionCommand>),
    Outcome(OpOutcome),
    OutcomeLost,
}

/// Resolves with the pending operation's outcome, or never if none is in
/// flight.
async fn recv_outcome(
    pending: &mut Option<oneshot::Receiver<OpOutcome>>,
) -> std::result::Result<OpOutcome, oneshot::error::RecvError> {
    match pending.as_mut() {
        Some(rx) => rx.await,
        None => std::future::pending().await,
    }
}

/// Owns one live conversation between a user and the companion.
pub struct SessionController {
    id: SessionId,
    config: SessionConfig,
    capture: Arc<dyn SpeechCapture>,
    inference: Arc<dyn ConversationInference>,
    playback: Arc<dyn AudioPlayback>,
    state: SessionState,
    history: ConversationHistory,
    /// Captured text waiting on its reply; recorded only once the reply
    /// arrives, dropped if inference fails.
    pending_utterance: Option<String>,
    commands: mpsc::UnboundedReceiver<SessionCommand>,
    events: Option<broadcast::Sender<SessionEvent>>,
    cancel: CancellationToken,
}

impl SessionController {
    /// Creates a controller and the handle that steers it.
    pub fn new(
        config: SessionConfig,
        capture: Arc<dyn SpeechCapture>,
        inference: Arc<dyn ConversationInference>,
        playback: Arc<dyn AudioPlayback>,
    ) -> (Self, SessionHandle) {
        let id = SessionId::new();
        let cancel = CancellationToken::new();
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let handle = SessionHandle::new(id.clone(), command_tx, cancel.clone());
        let controller = Self {
            id,
            config,
            capture,
            inference,
            playback,
            state: SessionState::Idle,
            history: ConversationHistory::new(),
            pending_utterance: None,
            commands: command_rx,
            events: None,
            cancel,
        };
        (controller, handle)
    }

    /// Attach an event broadcaster for UI/observability.
    pub fn with_events(mut self, tx: broadcast::Sender<SessionEvent>) -> Self {
        self.events = Some(tx);
        self
    }

    /// This session's identifier.
    pub fn id(&self) -> &SessionId {
        &self.id
    }

    /// Get a clone of the cancellation token for external use.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Run the session until it ends.
    ///
    /// The session ends when a handle calls [`SessionHandle::end`], when the
    /// cancellation token fires, or when every handle has been dropped.
    ///
    /// # Errors
    ///
    /// Stage failures are absorbed by the turn-taking policy and never
    /// surface here; the current design always returns `Ok(())`.
    pub async fn run(mut self) -> Result<()> {
        info!("session {} starting (voice: {})", self.id, self.config.voice);

        let cancel = self.cancel.clone();
        let mut pending: Option<oneshot::Receiver<OpOutcome>> = None;

        // Open with a greeting: the fixed prompt goes through the inference
        // path like any utterance so the reply arrives with synthesized
        // audio, but only the agent's side is recorded.
        if self.config.greeting_enabled() {
            let prompt = self.config.greeting_prompt.clone();
            self.set_state(SessionState::Thinking);
            pending = Some(self.begin_inference(prompt));
        }

        loop {
            let step = tokio::select! {
                // Teardown wins over an outcome that became ready in the
                // same instant.
                biased;
                () = cancel.cancelled() => Step::Cancelled,
                cmd = self.commands.recv() => Step::Command(cmd),
                outcome = recv_outcome(&mut pending) => match outcome {
                    Ok(outcome) => Step::Outcome(outcome),
                    Err(_) => Step::OutcomeLost,
                },
            };

            match step {
                Step::Cancelled => break,
                Step::Command(None) => {
                    debug!("session {}: all handles dropped", self.id);
                    break;
                }
                Step::Command(Some(cmd)) => self.handle_command(cmd, &mut pending).await,
                Step::Outcome(outcome) => {
                    pending = None;
                    match outcome {
                        OpOutcome::Capture(event) => {
                            self.handle_capture_event(event, &mut pending);
                        }
                        OpOutcome::Inference(result) => {
                            self.handle_inference_outcome(result, &mut pending);
                        }
                        OpOutcome::Playback(result) => {
                            self.handle_playback_outcome(result, &mut pending);
                        }
                    }
                }
                Step::OutcomeLost => {
                    pending = None;
                    warn!("session {}: operation dropped without an outcome", self.id);
                    self.set_state(SessionState::Idle);
                }
            }
        }

        self.teardown(pending).await;
        Ok(())
    }

    async fn handle_command(
        &mut self,
        cmd: SessionCommand,
        pending: &mut Option<oneshot::Receiver<OpOutcome>>,
    ) {
        match cmd {
            SessionCommand::ToggleMic => match self.state {
                SessionState::Idle => {
                    self.set_state(SessionState::Listening);
                    *pending = Some(self.begin_capture());
                }
                SessionState::Listening => {
                    // Manual stop: drop the receiver first so a transcript
                    // racing the stop is discarded, never sent.
                    *pending = None;
                    self.capture.stop().await;
                    debug!("session {}: capture stopped by user", self.id);
                    self.set_state(SessionState::Idle);
                }
                SessionState::Thinking | SessionState::Speaking => {
                    debug!("session {}: mic toggle ignored while {}", self.id, self.state);
                }
            },
            SessionCommand::Snapshot { reply } => {
                let _ = reply.send(self.snapshot());
            }
        }
    }

    fn handle_capture_event(
        &mut self,
        event: CaptureEvent,
        pending: &mut Option<oneshot::Receiver<OpOutcome>>,
    ) {
        if self.state != SessionState::Listening {
            debug!("session {}: capture outcome ignored while {}", self.id, self.state);
            return;
        }
        match event {
            CaptureEvent::Transcript(text) if !text.trim().is_empty() => {
                let text = text.trim().to_owned();
                debug!("session {}: transcript captured ({} chars)", self.id, text.len());
                self.pending_utterance = Some(text.clone());
                self.set_state(SessionState::Thinking);
                *pending = Some(self.begin_inference(text));
            }
            CaptureEvent::Transcript(_) | CaptureEvent::Empty => {
                debug!("session {}: capture heard nothing usable", self.id);
                self.set_state(SessionState::Idle);
            }
            CaptureEvent::Failed(kind) => {
                if kind.is_fatal() {
                    warn!("session {}: capture failed: {kind}", self.id);
                    self.emit(SessionEvent::CaptureFault { kind });
                } else {
                    debug!("session {}: capture ended: {kind}", self.id);
                }
                self.set_state(SessionState::Idle);
            }
        }
    }

    fn handle_inference_outcome(
        &mut self,
        result: Result<InferenceReply>,
        pending: &mut Option<oneshot::Receiver<OpOutcome>>,
    ) {
        if self.state != SessionState::Thinking {
            debug!("session {}: inference outcome ignored while {}", self.id, self.state);
            return;
        }
        match result {
            Ok(reply) => {
                // The greeting carries no user utterance; ordinary turns
                // record the user's words first, then the reply.
                if let Some(utterance) = self.pending_utterance.take() {
                    self.record_turn(Turn::user(utterance));
                }
                self.record_turn(Turn::agent(reply.text));
                match reply.audio {
                    Some(clip) if !clip.is_empty() => {
                        debug!(
                            "session {}: reply audio ready ({:.2}s)",
                            self.id,
                            clip.duration_secs()
                        );
                        self.set_state(SessionState::Speaking);
                        *pending = Some(self.begin_playback(clip));
                    }
                    _ => {
                        debug!("session {}: reply carried no audio", self.id);
                        self.set_state(SessionState::Idle);
                    }
                }
            }
            Err(err) => {
                warn!("session {}: inference failed, recording fallback reply: {err}", self.id);
                self.pending_utterance = None;
                let fallback = self.config.fallback_reply.clone();
                self.record_turn(Turn::agent(fallback));
                self.set_state(SessionState::Idle);
            }
        }
    }

    fn handle_playback_outcome(
        &mut self,
        result: Result<()>,
        pending: &mut Option<oneshot::Receiver<OpOutcome>>,
    ) {
        if self.state != SessionState::Speaking {
            debug!("session {}: playback outcome ignored while {}", self.id, self.state);
            return;
        }
        match result {
            Ok(()) => {
                self.set_state(SessionState::Idle);
                // Keep the conversation going: listen again as soon as the
                // companion finishes speaking.
                self.set_state(SessionState::Listening);
                *pending = Some(self.begin_capture());
            }
            Err(err) => {
                warn!("session {}: playback failed: {err}", self.id);
                self.set_state(SessionState::Idle);
            }
        }
    }

    fn begin_capture(&self) -> oneshot::Receiver<OpOutcome> {
        let (tx, rx) = oneshot::channel();
        let capture = Arc::clone(&self.capture);
        tokio::spawn(async move {
            let event = capture.start().await;
            let _ = tx.send(OpOutcome::Capture(event));
        });
        rx
    }

    fn begin_inference(&self, utterance: String) -> oneshot::Receiver<OpOutcome> {
        let request = InferenceRequest {
            system_prompt: self.config.system_prompt.clone(),
            history: self.history.snapshot(),
            utterance,
            voice: self.config.voice.clone(),
        };
        let (tx, rx) = oneshot::channel();
        let inference = Arc::clone(&self.inference);
        let timeout = self.config.inference_timeout();
        tokio::spawn(async move {
            let result = match timeout {
                Some(limit) => match tokio::time::timeout(limit, inference.reply(request)).await {
                    Ok(result) => result,
                    Err(_) => Err(SessionError::Inference(format!(
                        "no reply within {}s",
                        limit.as_secs()
                    ))),
                },
                None => inference.reply(request).await,
            };
            let _ = tx.send(OpOutcome::Inference(result));
        });
        rx
    }

    fn begin_playback(&self, clip: AudioClip) -> oneshot::Receiver<OpOutcome> {
        let (tx, rx) = oneshot::channel();
        let playback = Arc::clone(&self.playback);
        tokio::spawn(async move {
            let result = playback.play(clip).await;
            let _ = tx.send(OpOutcome::Playback(result));
        });
        rx
    }

    fn record_turn(&mut self, turn: Turn) {
        debug!("session {}: {:?} turn recorded ({} chars)", self.id, turn.role, turn.text.len());
        self.history.push(turn.clone());
        self.emit(SessionEvent::TurnRecorded { turn });
    }

    fn set_state(&mut self, next: SessionState) {
        if self.state == next {
            return;
        }
        debug!("session {}: {} -> {next}", self.id, self.state);
        let from = self.state;
        self.state = next;
        self.emit(SessionEvent::StateChanged { from, to: next });
    }

    fn emit(&self, event: SessionEvent) {
        if let Some(tx) = &self.events {
            let _ = tx.send(event);
        }
    }

    fn snapshot(&self) -> SessionSnapshot {
        let latest_user_text = self
            .pending_utterance
            .clone()
            .or_else(|| self.history.latest(Role::User).map(|t| t.text.clone()));
        let latest_agent_text = self.history.latest(Role::Agent).map(|t| t.text.clone());
        SessionSnapshot {
            id: self.id.clone(),
            state: self.state,
            turns: self.history.snapshot(),
            latest_user_text,
            latest_agent_text,
        }
    }

    async fn teardown(&mut self, pending: Option<oneshot::Receiver<OpOutcome>>) {
        // Dropping the receiver discards any outcome still in flight; the
        // transcript cannot change once the session is over.
        drop(pending);
        match self.state {
            SessionState::Listening => self.capture.stop().await,
            SessionState::Speaking => self.playback.stop().await,
            SessionState::Idle | SessionState::Thinking => {}
        }
        // Mark the token either way so handles observe the end whichever
        // path ended the loop.
        self.cancel.cancel();
        self.set_state(SessionState::Idle);
        self.emit(SessionEvent::Ended);
        info!("session {} ended ({} turns recorded)", self.id, self.history.len());
    }
}
