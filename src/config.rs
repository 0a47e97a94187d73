//! Configuration types for the session engine.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::prompts;
use crate::voice::VoiceProfile;

/// Per-session configuration.
///
/// All fields have sensible defaults; a host that wants the stock Bloom
/// persona can use `SessionConfig::default()` unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Voice the inference service synthesizes replies with.
    pub voice: VoiceProfile,
    /// System-level behaviour rules sent with every inference request.
    pub system_prompt: String,
    /// Opening line fed through the inference path when the session starts.
    ///
    /// Set to an empty string to start silently in the idle state.
    pub greeting_prompt: String,
    /// Turn recorded when the inference service fails.
    pub fallback_reply: String,
    /// Upper bound on one inference round trip, in seconds.
    ///
    /// Absent by default: the observed backends respond or fail on their
    /// own. A fired timeout is handled exactly like an inference failure.
    pub inference_timeout_secs: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            voice: VoiceProfile::default(),
            system_prompt: prompts::PERSONA_PROMPT.to_owned(),
            greeting_prompt: prompts::GREETING_PROMPT.to_owned(),
            fallback_reply: prompts::FALLBACK_REPLY.to_owned(),
            inference_timeout_secs: None,
        }
    }
}

impl SessionConfig {
    /// Load configuration from a TOML file, falling back to defaults for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| crate::error::SessionError::Config(e.to_string()))
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot be serialized.
    pub fn save_to_file(&self, path: &std::path::Path) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::SessionError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Returns the default config file path: `~/.config/bloom/voice.toml`.
    pub fn default_config_path() -> PathBuf {
        if let Some(config) = std::env::var_os("XDG_CONFIG_HOME") {
            PathBuf::from(config).join("bloom").join("voice.toml")
        } else if let Some(home) = std::env::var_os("HOME") {
            PathBuf::from(home)
                .join(".config")
                .join("bloom")
                .join("voice.toml")
        } else {
            PathBuf::from("/tmp/bloom-config/voice.toml")
        }
    }

    /// Whether the session opens with a greeting turn.
    pub fn greeting_enabled(&self) -> bool {
        !self.greeting_prompt.trim().is_empty()
    }

    /// The inference timeout as a [`Duration`], if one is configured.
    pub fn inference_timeout(&self) -> Option<Duration> {
        self.inference_timeout_secs.map(Duration::from_secs)
    }
}
