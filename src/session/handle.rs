//! Host-facing control surface for a running session.

use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;

use super::SessionId;
use super::state::SessionState;
use crate::error::{Result, SessionError};
use crate::history::Turn;

/// Commands a handle sends to its controller.
#[derive(Debug)]
pub(crate) enum SessionCommand {
    /// Toggle the microphone: start listening from idle, stop and discard
    /// from listening, ignored while thinking or speaking.
    ToggleMic,
    /// Request a point-in-time view of the session.
    Snapshot {
        /// Where to deliver the snapshot.
        reply: oneshot::Sender<SessionSnapshot>,
    },
}

/// Point-in-time view of a session, for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// The session this snapshot describes.
    pub id: SessionId,
    /// Turn-taking state at snapshot time.
    pub state: SessionState,
    /// Full transcript so far, in order.
    pub turns: Vec<Turn>,
    /// The user's most recent words, including an utterance still being
    /// processed (captured but not yet recorded while a reply is pending).
    pub latest_user_text: Option<String>,
    /// The companion's most recent reply.
    pub latest_agent_text: Option<String>,
}

/// Cloneable handle steering one [`super::SessionController`].
///
/// Dropping every clone ends the session, as does [`SessionHandle::end`].
#[derive(Debug, Clone)]
pub struct SessionHandle {
    id: SessionId,
    commands: mpsc::UnboundedSender<SessionCommand>,
    cancel: CancellationToken,
}

impl SessionHandle {
    pub(crate) fn new(
        id: SessionId,
        commands: mpsc::UnboundedSender<SessionCommand>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            id,
            commands,
            cancel,
        }
    }

    /// The session this handle steers.
    pub fn id(&self) -> &SessionId {
        &self.id
    }

    /// Toggles the microphone.
    ///
    /// From idle this starts listening; from listening it stops and discards
    /// the partial transcript. While the companion is thinking or speaking
    /// the toggle is ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the session has already ended.
    pub fn toggle_mic(&self) -> Result<()> {
        self.commands
            .send(SessionCommand::ToggleMic)
            .map_err(|_| SessionError::Session("session already ended".to_owned()))
    }

    /// Fetches a point-in-time view of the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the session has already ended.
    pub async fn snapshot(&self) -> Result<SessionSnapshot> {
        let (tx, rx) = oneshot::channel();
        self.commands
            .send(SessionCommand::Snapshot { reply: tx })
            .map_err(|_| SessionError::Session("session already ended".to_owned()))?;
        rx.await
            .map_err(|_| SessionError::Session("session ended before replying".to_owned()))
    }

    /// Ends the session: aborts any capture, stops any playback, and
    /// discards any reply still in flight.
    pub fn end(&self) {
        self.cancel.cancel();
    }

    /// Whether the session has ended.
    pub fn is_ended(&self) -> bool {
        self.cancel.is_cancelled()
    }
}
