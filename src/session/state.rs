//! Session turn-taking states.

use serde::{Deserialize, Serialize};

/// Where the session is in its capture → inference → playback cycle.
///
/// Exactly one state holds at any time, and each non-idle state corresponds
/// to exactly one operation in flight. The engine never lets two operations
/// overlap within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// Nothing in flight; waiting for the user to activate the mic.
    Idle,
    /// A capture activation is running.
    Listening,
    /// An inference request is awaiting its reply.
    Thinking,
    /// A synthesized reply is playing.
    Speaking,
}

impl SessionState {
    /// Whether a mic toggle does anything in this state.
    ///
    /// Hosts use this to grey out the mic control while the companion is
    /// thinking or speaking; the engine ignores toggles in those states
    /// regardless.
    pub fn mic_enabled(self) -> bool {
        matches!(self, Self::Idle | Self::Listening)
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Listening => "listening",
            Self::Thinking => "thinking",
            Self::Speaking => "speaking",
        };
        f.write_str(name)
    }
}
