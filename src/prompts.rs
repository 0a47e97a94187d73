//! Prompt assets for the Bloom companion.
//!
//! The session engine ships with a fixed set of conversational texts:
//!
//! 1. **Persona prompt** ([`PERSONA_PROMPT`]): the system-level behaviour
//!    rules sent with every inference request.
//! 2. **Greeting prompt** ([`GREETING_PROMPT`]): the opening line fed through
//!    the inference path when a session starts with an empty transcript.
//! 3. **Fallback reply** ([`FALLBACK_REPLY`]): spoken-for text recorded when
//!    the inference service fails, so the conversation is never left silent.
//! 4. **Disclaimer** ([`SESSION_DISCLAIMER`]): shown by hosts before the
//!    first session; the engine itself is created only after acknowledgment.
//!
//! All four are overridable via [`crate::config::SessionConfig`]; these
//! constants are the defaults.

/// Behaviour rules for the companion persona.
///
/// Sent as the system layer of every inference request.
pub const PERSONA_PROMPT: &str = "\
You are an AI companion named Bloom. Your goal is to provide a safe, supportive, and empathetic space for the user to share their thoughts and feelings.\n\
- Listen actively and respond with empathy and understanding.\n\
- Ask open-ended questions to encourage reflection.\n\
- Do not give direct advice, but help the user explore their own solutions.\n\
- Keep your responses concise and conversational.\n\
- Maintain a calm and non-judgmental tone.\n\
- Do not diagnose or provide medical advice.\n\
- If the user is in crisis, provide a supportive message and gently suggest they contact a crisis hotline or a mental health professional.";

/// Opening line delivered when a session starts.
///
/// Fed through the same inference path as a user utterance so the reply
/// arrives with synthesized audio, but never recorded as a user turn.
pub const GREETING_PROMPT: &str =
    "Hello, I'm Bloom. I'm here to listen. How are you feeling today?";

/// Reply recorded when the inference service fails mid-conversation.
pub const FALLBACK_REPLY: &str =
    "I'm having a little trouble connecting right now. Please give me a moment.";

/// Text hosts must show (and have acknowledged) before the first session.
pub const SESSION_DISCLAIMER: &str = "\
Bloom is an AI companion, not a licensed therapist or medical professional. \
Conversations are not a substitute for professional mental health care. \
If you are in crisis or thinking about harming yourself, please contact a \
crisis hotline or emergency services immediately.";
