//! Conversation transcript owned by a session.
//!
//! The history is append-only for the lifetime of a session and is dropped
//! with it; persisting transcripts is a host concern, never the engine's.
//! Every inference request carries the full ordered history, because the
//! dialogue service's replies depend on the complete prior context.

use serde::{Deserialize, Serialize};

/// Who produced a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// The person speaking to the companion.
    User,
    /// The companion's reply.
    Agent,
}

/// One utterance in the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    /// Speaker attribution.
    pub role: Role,
    /// What was said.
    pub text: String,
}

impl Turn {
    /// A turn spoken by the user.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    /// A turn spoken by the companion.
    pub fn agent(text: impl Into<String>) -> Self {
        Self {
            role: Role::Agent,
            text: text.into(),
        }
    }
}

/// Ordered, append-only record of everything said in one session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversationHistory {
    turns: Vec<Turn>,
}

impl ConversationHistory {
    /// Creates an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a turn at the end of the transcript.
    pub fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    /// All turns in order.
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Number of turns recorded so far.
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Whether nothing has been said yet.
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// The most recent turn with the given role, if any.
    pub fn latest(&self, role: Role) -> Option<&Turn> {
        self.turns.iter().rev().find(|turn| turn.role == role)
    }

    /// Copies the transcript for an inference request.
    pub fn snapshot(&self) -> Vec<Turn> {
        self.turns.clone()
    }
}
