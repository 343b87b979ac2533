//! Speech Synthesis
//!
//! Parameters and result for AI narration. The narrator voice is one of a
//! small fixed set of prebuilt provider voices.

use serde::{Deserialize, Serialize};

use crate::core::media::MediaHandle;

/// Prebuilt narrator voices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Voice {
    /// Firm, neutral narrator
    #[default]
    Kore,
    /// Upbeat, playful
    Puck,
    /// Deep, intense
    Fenrir,
    /// Informative, measured
    Charon,
}

impl Voice {
    /// Returns all available voices
    pub fn all() -> Vec<Voice> {
        vec![Voice::Kore, Voice::Puck, Voice::Fenrir, Voice::Charon]
    }

    /// Provider-side voice identifier
    pub fn api_name(&self) -> &'static str {
        match self {
            Voice::Kore => "Kore",
            Voice::Puck => "Puck",
            Voice::Fenrir => "Fenrir",
            Voice::Charon => "Charon",
        }
    }
}

impl std::fmt::Display for Voice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.api_name())
    }
}

/// Parameters for a speech request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechParams {
    /// Script to narrate
    pub text: String,
    /// Narrator voice
    pub voice: Voice,
}

impl SpeechParams {
    /// Creates new params with the default voice
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            voice: Voice::default(),
        }
    }

    /// Sets the narrator voice
    pub fn with_voice(mut self, voice: Voice) -> Self {
        self.voice = voice;
        self
    }

    /// Validates the parameters
    pub fn validate(&self) -> Result<(), String> {
        if self.text.trim().is_empty() {
            return Err("Script text cannot be empty".to_string());
        }
        Ok(())
    }
}

/// Result of a completed speech synthesis
#[derive(Debug)]
pub struct SpeechResult {
    /// Decoded audio wrapped in a revocable handle
    pub audio: MediaHandle,
    /// Voice used for synthesis
    pub voice: Voice,
}

// ============================================================================
// Tests
// ============================================================================
