//! The turn-taking voice session.
//!
//! One [`SessionController`] owns one live conversation: it drives exactly
//! one turn at a time through capture → inference → playback, records the
//! transcript, and recovers from every stage failure by returning to a
//! listenable state. Hosts steer it through a [`SessionHandle`] and observe
//! it through [`crate::events::SessionEvent`] broadcasts.

mod controller;
mod handle;
mod state;

pub use controller::SessionController;
pub use handle::{SessionHandle, SessionSnapshot};
pub use state::SessionState;

use serde::{Deserialize, Serialize};

/// Unique identifier for one session.
///
/// Fresh per session; never reused. Serializes as a bare string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Creates a fresh random identifier.
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// The identifier as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique() {
        assert_ne!(SessionId::new(), SessionId::new());
    }
}
