//! Session events broadcast to hosts.
//!
//! A host attaches a [`tokio::sync::broadcast`] sender via
//! [`crate::session::SessionController::with_events`] and receives one
//! [`SessionEvent`] per observable change. Events serialize as tagged JSON so
//! host bridges can forward them to frontends unchanged.
//!
//! Delivery is best-effort: a lagging receiver drops events rather than
//! blocking the session.

use serde::{Deserialize, Serialize};

use crate::capture::CaptureErrorKind;
use crate::history::Turn;
use crate::session::SessionState;

/// An observable change in a running session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// The turn-taking state moved.
    StateChanged {
        /// State before the transition.
        from: SessionState,
        /// State after the transition.
        to: SessionState,
    },
    /// A turn was appended to the transcript.
    TurnRecorded {
        /// The recorded turn.
        turn: Turn,
    },
    /// A capture activation failed in a way the user should see.
    ///
    /// Emitted once per occurrence; benign capture outcomes (silence, engine
    /// aborts) produce no event.
    CaptureFault {
        /// What went wrong.
        kind: CaptureErrorKind,
    },
    /// The session ended; no further events follow.
    Ended,
}
