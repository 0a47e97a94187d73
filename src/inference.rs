//! Conversation inference seam.
//!
//! One request/response round trip per user turn: the full prior transcript
//! plus the new utterance go out, reply text plus optional synthesized audio
//! come back. Concrete backends (hosted generative-AI services, local models)
//! implement [`ConversationInference`] outside this crate.

use async_trait::async_trait;

use crate::audio::AudioClip;
use crate::error::Result;
use crate::history::Turn;
use crate::voice::VoiceProfile;

/// One dialogue request.
#[derive(Debug, Clone)]
pub struct InferenceRequest {
    /// System-level behaviour rules for the companion persona.
    pub system_prompt: String,
    /// Every prior turn, in order. Excludes `utterance`.
    pub history: Vec<Turn>,
    /// The text to reply to.
    pub utterance: String,
    /// Voice to synthesize the reply with.
    pub voice: VoiceProfile,
}

/// The service's reply.
#[derive(Debug, Clone)]
pub struct InferenceReply {
    /// Reply text, recorded in the transcript.
    pub text: String,
    /// Synthesized speech for `text`, when the backend produced audio.
    pub audio: Option<AudioClip>,
}

/// Request/response dialogue service.
#[async_trait]
pub trait ConversationInference: Send + Sync {
    /// Produces a reply to `request.utterance` given the prior transcript.
    ///
    /// # Errors
    ///
    /// Any failure (network, model, synthesis) surfaces as a single error;
    /// the engine records a fallback turn and does not retry.
    async fn reply(&self, request: InferenceRequest) -> Result<InferenceReply>;
}
