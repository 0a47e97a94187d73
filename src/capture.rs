//! Speech capture seam.
//!
//! Concrete backends (platform speech recognizers, on-device STT) live
//! outside this crate; the engine only needs the activation contract: one
//! [`CaptureEvent`] per [`SpeechCapture::start`] call.

use async_trait::async_trait;

/// Why a capture activation ended without a usable transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptureErrorKind {
    /// Nothing was heard before the recognizer gave up.
    NoSpeech,
    /// The activation was cancelled, by the engine or the backend.
    Aborted,
    /// Microphone access was denied.
    PermissionDenied,
    /// The capture device failed (missing, disconnected, stream error).
    Device,
}

impl CaptureErrorKind {
    /// Whether this failure should be surfaced to the user.
    ///
    /// Benign kinds (silence, cancellation) simply return the session to an
    /// idle state; fatal kinds are reported once per occurrence, and the
    /// session stays usable either way.
    pub fn is_fatal(self) -> bool {
        matches!(self, Self::PermissionDenied | Self::Device)
    }
}

impl std::fmt::Display for CaptureErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::NoSpeech => "no speech",
            Self::Aborted => "aborted",
            Self::PermissionDenied => "permission denied",
            Self::Device => "device failure",
        };
        f.write_str(name)
    }
}

/// Outcome of one capture activation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureEvent {
    /// The user finished speaking; the final transcript.
    Transcript(String),
    /// The activation completed without hearing anything usable.
    Empty,
    /// The activation failed; see [`CaptureErrorKind::is_fatal`].
    Failed(CaptureErrorKind),
}

/// One-shot speech-to-text activation source.
///
/// Each `start` call runs a single activation to completion and resolves with
/// its outcome. `stop` aborts the activation in progress, after which the
/// pending `start` future should resolve (typically with
/// [`CaptureEvent::Failed`]`(`[`CaptureErrorKind::Aborted`]`)`); the engine
/// discards the outcome of a stopped activation either way.
#[async_trait]
pub trait SpeechCapture: Send + Sync {
    /// Runs one capture activation and resolves with its outcome.
    async fn start(&self) -> CaptureEvent;

    /// Aborts the activation in progress, if any.
    async fn stop(&self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fatal_classification() {
        assert!(!CaptureErrorKind::NoSpeech.is_fatal());
        assert!(!CaptureErrorKind::Aborted.is_fatal());
        assert!(CaptureErrorKind::PermissionDenied.is_fatal());
        assert!(CaptureErrorKind::Device.is_fatal());
    }
}
