//! TubeStudio — AI Creator Studio Orchestration
//!
//! Library core for an AI-assisted video creator studio. Wraps the Gemini
//! API behind a provider trait and exposes four features:
//!
//! - **Upload pack**: structured titles/description/tags/hashtags metadata
//! - **Thumbnail**: image generation, optionally guided by a reference critique
//! - **Speech**: narration synthesis with a fixed set of prebuilt voices
//! - **Video**: long-running text-to-video with submit/poll/download
//!
//! Entry point is [`StudioEngine`]; binary results come back as revocable
//! [`MediaHandle`]s.

pub mod core;

pub use crate::core::credentials::{CredentialGate, KeySelector, KeyState};
pub use crate::core::error::{CoreError, CoreResult};
pub use crate::core::gemini::GeminiProvider;
pub use crate::core::generative::{
    GenerativeProvider, MockGenerativeProvider, PollConfig, ReferenceImage, SpeechParams,
    SpeechResult, StudioEngine, ThumbnailParams, ThumbnailResult, UploadPack, UploadPackParams,
    VideoGenerationParams, VideoGenerationResult, Voice,
};
pub use crate::core::media::MediaHandle;

use tracing_subscriber::EnvFilter;

/// Initializes structured logging for embedding applications.
///
/// Honors `RUST_LOG`, defaulting to `info` for this crate. Safe to call more
/// than once; subsequent calls are no-ops.
pub fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tubestudio=info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}
