//! Thumbnail Generation
//!
//! Parameters and result for thumbnail image generation. When a reference
//! image is supplied, a synchronous analysis call critiques its style first
//! and the resulting text is folded into the final generation prompt.

use serde::{Deserialize, Serialize};

use crate::core::media::MediaHandle;

/// Instruction for the reference-image style critique
pub const ANALYSIS_INSTRUCTION: &str = "Analyze this YouTube thumbnail. Describe its color \
     palette, emotion, composition, typography style, and why it is click-worthy. Keep it concise.";

/// Fixed output aspect ratio for thumbnails
pub const THUMBNAIL_ASPECT_RATIO: &str = "16:9";

/// Fixed output resolution tier for thumbnails
pub const THUMBNAIL_IMAGE_SIZE: &str = "1K";

/// A reference image uploaded by the user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceImage {
    /// Raw image bytes
    pub bytes: Vec<u8>,
    /// MIME type (e.g. "image/png", "image/jpeg")
    pub mime_type: String,
}

impl ReferenceImage {
    /// Creates a reference image from bytes and MIME type
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            bytes,
            mime_type: mime_type.into(),
        }
    }
}

/// Parameters for a thumbnail request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThumbnailParams {
    /// User-supplied prompt text
    pub prompt: String,
    /// Optional reference image to imitate
    pub reference: Option<ReferenceImage>,
}

impl ThumbnailParams {
    /// Creates new params from a prompt
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            reference: None,
        }
    }

    /// Attaches a reference image
    pub fn with_reference(mut self, reference: ReferenceImage) -> Self {
        self.reference = Some(reference);
        self
    }

    /// Validates the parameters
    pub fn validate(&self) -> Result<(), String> {
        if self.prompt.trim().is_empty() {
            return Err("Prompt cannot be empty".to_string());
        }
        if let Some(reference) = &self.reference {
            if reference.bytes.is_empty() {
                return Err("Reference image is empty".to_string());
            }
            if reference.mime_type.trim().is_empty() {
                return Err("Reference image MIME type is missing".to_string());
            }
        }
        Ok(())
    }

    /// Builds the final generation prompt.
    ///
    /// With an analysis of the reference image, the critique text is folded
    /// in alongside the user's own requirement; otherwise the user text is
    /// used verbatim.
    pub fn final_prompt(&self, analysis: Option<&str>) -> String {
        match analysis {
            Some(analysis) => format!(
                "Create a YouTube thumbnail based on this style description: {}. \n\n\
                 Additional user requirement: {}. \n\n\
                 Ensure high contrast, vibrant colors, and 2025 trending aesthetics.",
                analysis, self.prompt
            ),
            None => self.prompt.clone(),
        }
    }
}

/// Result of a completed thumbnail generation
#[derive(Debug)]
pub struct ThumbnailResult {
    /// Generated image wrapped in a revocable handle
    pub image: MediaHandle,
    /// Style critique of the reference image, when one was supplied
    pub analysis: Option<String>,
}

// ============================================================================
// Tests
// ============================================================================
