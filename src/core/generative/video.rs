//! Video Generation Types
//!
//! Data models for long-running text-to-video generation: request
//! parameters, the opaque job handle returned on submit, the polled job
//! status, and the poll-loop configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::media::MediaHandle;

// =============================================================================
// Enums
// =============================================================================

/// Output aspect ratio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum VideoAspectRatio {
    /// 16:9 landscape
    #[default]
    Landscape,
    /// 9:16 portrait (shorts/reels)
    Portrait,
}

impl VideoAspectRatio {
    /// Provider-side ratio string
    pub fn api_str(&self) -> &'static str {
        match self {
            VideoAspectRatio::Landscape => "16:9",
            VideoAspectRatio::Portrait => "9:16",
        }
    }
}

impl std::fmt::Display for VideoAspectRatio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.api_str())
    }
}

/// Output resolution tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum VideoResolution {
    /// 720p
    Hd720,
    /// 1080p
    #[default]
    Fhd1080,
}

impl VideoResolution {
    /// Provider-side resolution string
    pub fn api_str(&self) -> &'static str {
        match self {
            VideoResolution::Hd720 => "720p",
            VideoResolution::Fhd1080 => "1080p",
        }
    }
}

impl std::fmt::Display for VideoResolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.api_str())
    }
}

// =============================================================================
// Generation Parameters
// =============================================================================

/// Parameters for video generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoGenerationParams {
    /// Text prompt describing the desired video
    pub prompt: String,
    /// Aspect ratio
    pub aspect_ratio: VideoAspectRatio,
    /// Resolution tier
    pub resolution: VideoResolution,
}

impl VideoGenerationParams {
    /// Creates new params with defaults (16:9, 1080p)
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            aspect_ratio: VideoAspectRatio::default(),
            resolution: VideoResolution::default(),
        }
    }

    /// Sets the aspect ratio
    pub fn with_aspect_ratio(mut self, aspect_ratio: VideoAspectRatio) -> Self {
        self.aspect_ratio = aspect_ratio;
        self
    }

    /// Sets the resolution tier
    pub fn with_resolution(mut self, resolution: VideoResolution) -> Self {
        self.resolution = resolution;
        self
    }

    /// Validates the parameters
    pub fn validate(&self) -> Result<(), String> {
        let trimmed = self.prompt.trim();
        if trimmed.is_empty() {
            return Err("Prompt cannot be empty".to_string());
        }
        if trimmed.len() > 4096 {
            return Err("Prompt too long (max 4096 characters)".to_string());
        }
        Ok(())
    }
}

// =============================================================================
// Job Handle & Status
// =============================================================================

/// Handle for a submitted video generation job.
///
/// Holds the provider operation name; discarded once resolved or failed,
/// never persisted across sessions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoJobHandle {
    /// Provider-assigned operation name
    pub operation_name: String,
    /// Completion flag as reported at submit time
    pub done: bool,
    /// Unix timestamp when submitted
    pub submitted_at: i64,
}

/// Polled status of a video generation job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum VideoJobStatus {
    /// Job has not reported completion yet
    Running,
    /// Job completed; the result URI may still be absent on provider failure
    Completed { uri: Option<String> },
    /// Job failed provider-side
    Failed { error: String },
}

impl VideoJobStatus {
    /// Whether the job is in a terminal state
    pub fn is_terminal(&self) -> bool {
        !matches!(self, VideoJobStatus::Running)
    }
}

// =============================================================================
// Poll Configuration
// =============================================================================

/// Configuration for the status poll loop
#[derive(Debug, Clone, Copy)]
pub struct PollConfig {
    /// Delay between status fetches
    pub interval: Duration,
    /// Wall-clock budget before the attempt fails with a timeout
    pub max_wait: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            max_wait: Duration::from_secs(600),
        }
    }
}

impl PollConfig {
    /// Sets the poll interval
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Sets the wait budget
    pub fn with_max_wait(mut self, max_wait: Duration) -> Self {
        self.max_wait = max_wait;
        self
    }
}

// =============================================================================
// Generation Result
// =============================================================================

/// Result of a completed video generation
#[derive(Debug)]
pub struct VideoGenerationResult {
    /// Downloaded video wrapped in a revocable handle
    pub video: MediaHandle,
    /// Provider result URI the video was fetched from
    pub uri: String,
    /// Wall-clock generation time in milliseconds
    pub generation_time_ms: u64,
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aspect_ratio_api_str() {
        assert_eq!(VideoAspectRatio::Landscape.api_str(), "16:9");
        assert_eq!(VideoAspectRatio::Portrait.api_str(), "9:16");
        assert_eq!(VideoAspectRatio::default(), VideoAspectRatio::Landscape);
    }

    #[test]
    fn test_resolution_api_str() {
        assert_eq!(VideoResolution::Hd720.api_str(), "720p");
        assert_eq!(VideoResolution::Fhd1080.api_str(), "1080p");
        assert_eq!(VideoResolution::default(), VideoResolution::Fhd1080);
    }

    #[test]
    fn test_params_defaults_and_builder() {
        let params = VideoGenerationParams::new("A drone shot of a city at sunset");
        assert_eq!(params.aspect_ratio, VideoAspectRatio::Landscape);
        assert_eq!(params.resolution, VideoResolution::Fhd1080);

        let params = params
            .with_aspect_ratio(VideoAspectRatio::Portrait)
            .with_resolution(VideoResolution::Hd720);
        assert_eq!(params.aspect_ratio, VideoAspectRatio::Portrait);
        assert_eq!(params.resolution, VideoResolution::Hd720);
    }

    #[test]
    fn test_params_validate() {
        assert!(VideoGenerationParams::new("ocean waves").validate().is_ok());
        assert!(VideoGenerationParams::new("  ").validate().is_err());
        assert!(VideoGenerationParams::new("x".repeat(5000))
            .validate()
            .is_err());
    }

    #[test]
    fn test_status_is_terminal() {
        assert!(!VideoJobStatus::Running.is_terminal());
        assert!(VideoJobStatus::Completed { uri: None }.is_terminal());
        assert!(VideoJobStatus::Failed {
            error: "quota".to_string()
        }
        .is_terminal());
    }

    #[test]
    fn test_status_serialization() {
        let status = VideoJobStatus::Completed {
            uri: Some("https://example.com/v.mp4".to_string()),
        };
        let json = serde_json::to_string(&status).unwrap();
        assert!(json.contains("\"status\":\"completed\""));

        let parsed: VideoJobStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, status);
    }

    #[test]
    fn test_poll_config_default() {
        let config = PollConfig::default();
        assert_eq!(config.interval, Duration::from_secs(5));
        assert_eq!(config.max_wait, Duration::from_secs(600));
    }

    #[test]
    fn test_job_handle_serialization() {
        let handle = VideoJobHandle {
            operation_name: "operations/veo-123".to_string(),
            done: false,
            submitted_at: 1700000000,
        };
        let json = serde_json::to_string(&handle).unwrap();
        let parsed: VideoJobHandle = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.operation_name, "operations/veo-123");
        assert!(!parsed.done);
    }
}
