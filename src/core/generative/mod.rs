//! Generative Feature Modules
//!
//! One module per studio feature (upload pack, thumbnail, speech, video),
//! the provider trait boundary, and the orchestration engine that ties them
//! together.

pub mod audio;
pub mod engine;
pub mod image;
pub mod metadata;
pub mod provider;
pub mod video;

pub use audio::{SpeechParams, SpeechResult, Voice};
pub use engine::StudioEngine;
pub use image::{ReferenceImage, ThumbnailParams, ThumbnailResult};
pub use metadata::{UploadPack, UploadPackParams};
pub use provider::{GenerativeProvider, InlineArtifact, MockGenerativeProvider};
pub use video::{
    PollConfig, VideoAspectRatio, VideoGenerationParams, VideoGenerationResult, VideoJobHandle,
    VideoJobStatus, VideoResolution,
};
