//! Error types for the voice session engine.

/// Top-level error type for the session engine.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Speech capture error (device, permission, recognizer).
    #[error("capture error: {0}")]
    Capture(String),

    /// Conversation inference error (reply generation or speech synthesis).
    #[error("inference error: {0}")]
    Inference(String),

    /// Audio playback error.
    #[error("playback error: {0}")]
    Playback(String),

    /// Audio clip encode/decode error.
    #[error("audio error: {0}")]
    Audio(String),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// Session control error (controller gone, command rejected).
    #[error("session error: {0}")]
    Session(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Channel send/receive error.
    #[error("channel error: {0}")]
    Channel(String),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, SessionError>;
