//! Bloom voice: turn-taking session engine for the Bloom wellness companion.
//!
//! This crate owns one thing: the conversation loop of a live voice session
//! between a user and the companion. Each turn moves through
//! Capture → Inference → Playback, one operation at a time:
//!
//! - **Capture**: a speech-to-text activation turns the user's words into a
//!   transcript (trait [`capture::SpeechCapture`])
//! - **Inference**: the transcript plus the full prior conversation goes to a
//!   dialogue service, which answers with reply text and synthesized audio
//!   (trait [`inference::ConversationInference`])
//! - **Playback**: the synthesized reply is played to the user, then the
//!   session listens again (trait [`playback::AudioPlayback`])
//!
//! Concrete backends implement the three traits; the engine supplies the
//! state machine, transcript, failure policy, and cancellation safety. See
//! [`session::SessionController`] for the loop and
//! [`session::SessionHandle`] for the host-facing controls.

pub mod audio;
pub mod capture;
pub mod config;
pub mod error;
pub mod events;
pub mod history;
pub mod inference;
pub mod playback;
pub mod prompts;
pub mod session;
pub mod voice;

pub use audio::AudioClip;
pub use capture::{CaptureErrorKind, CaptureEvent, SpeechCapture};
pub use config::SessionConfig;
pub use error::{Result, SessionError};
pub use events::SessionEvent;
pub use history::{ConversationHistory, Role, Turn};
pub use inference::{ConversationInference, InferenceReply, InferenceRequest};
pub use playback::AudioPlayback;
pub use session::{SessionController, SessionHandle, SessionId, SessionSnapshot, SessionState};
pub use voice::VoiceProfile;
