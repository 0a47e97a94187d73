//! Audio playback seam.
//!
//! The engine hands a decoded [`AudioClip`] to the sink and waits for the
//! outcome. Concrete sinks (audio device output, a host bridge forwarding to
//! a frontend) implement [`AudioPlayback`] outside this crate.

use async_trait::async_trait;

use crate::audio::AudioClip;
use crate::error::Result;

/// Plays synthesized speech to the user.
#[async_trait]
pub trait AudioPlayback: Send + Sync {
    /// Plays a clip to completion.
    ///
    /// Resolves with `Ok(())` when the clip finished, or an error if playback
    /// failed to start or ended early. A `stop` call should make the pending
    /// `play` future resolve promptly; the engine ignores its outcome then.
    ///
    /// # Errors
    ///
    /// Playback failures are absorbed by the engine (the session returns to
    /// idle); they never terminate the session.
    async fn play(&self, clip: AudioClip) -> Result<()>;

    /// Stops the clip currently playing, if any.
    async fn stop(&self);
}
