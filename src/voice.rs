//! Synthesized-voice selection.
//!
//! A [`VoiceProfile`] names the voice the inference service should use when
//! synthesizing replies. The profile is chosen before a session starts and is
//! immutable for the session's duration; changing voice means starting a new
//! session.

use serde::{Deserialize, Serialize};

/// Identifier of a synthesized voice, passed through to the inference service.
///
/// Serializes as a bare string so config files read `voice = "Puck"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VoiceProfile(String);

/// Voices the hosted synthesis backend ships with.
pub const BUILT_IN_VOICES: [&str; 7] = [
    "Algenib", "Achernar", "Schedar", "Umbriel", "Puck", "Gacrux", "Zephyr",
];

impl VoiceProfile {
    /// Creates a profile from a voice name.
    ///
    /// Names outside [`BUILT_IN_VOICES`] are allowed; the catalog is what the
    /// default backend offers, not a closed set.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The voice name as sent to the synthesis backend.
    pub fn name(&self) -> &str {
        &self.0
    }

    /// Whether this voice is in the built-in catalog.
    pub fn is_built_in(&self) -> bool {
        BUILT_IN_VOICES.contains(&self.0.as_str())
    }
}

impl Default for VoiceProfile {
    fn default() -> Self {
        Self("Algenib".to_owned())
    }
}

impl std::fmt::Display for VoiceProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;

    #[test]
    fn default_voice_is_algenib() {
        assert_eq!(VoiceProfile::default().name(), "Algenib");
        assert!(VoiceProfile::default().is_built_in());
    }

    #[test]
    fn custom_voice_allowed_outside_catalog() {
        let voice = VoiceProfile::new("Vega");
        assert_eq!(voice.name(), "Vega");
        assert!(!voice.is_built_in());
    }

    #[test]
    fn serializes_as_bare_string() {
        let voice = VoiceProfile::new("Puck");
        assert_eq!(serde_json::to_string(&voice).unwrap(), r#""Puck""#);
        let back: VoiceProfile = serde_json::from_str(r#""Puck""#).unwrap();
        assert_eq!(back, voice);
    }
}
