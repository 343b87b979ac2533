//! Generative Provider Abstraction
//!
//! Trait boundary between the orchestration layer and the remote AI
//! provider. Each feature entry point maps to one trait method; the remote
//! implementation lives in [`crate::core::gemini`], and a scriptable mock is
//! provided for tests.

use async_trait::async_trait;

use super::audio::SpeechParams;
use super::image::ReferenceImage;
use super::metadata::{UploadPack, UploadPackParams};
use super::video::{VideoGenerationParams, VideoJobHandle, VideoJobStatus};
use crate::core::{CoreError, CoreResult};

/// An inline binary artifact returned by a synchronous generation call
#[derive(Debug, Clone)]
pub struct InlineArtifact {
    /// Decoded payload bytes
    pub data: Vec<u8>,
    /// MIME type reported by the provider
    pub mime_type: String,
}

/// Trait for generative AI providers
#[async_trait]
pub trait GenerativeProvider: Send + Sync {
    /// Returns the provider name
    fn name(&self) -> &str;

    /// Checks if the provider is configured correctly
    fn is_available(&self) -> bool;

    /// Generates a structured metadata upload pack
    async fn generate_upload_pack(&self, params: &UploadPackParams) -> CoreResult<UploadPack>;

    /// Critiques a reference thumbnail and returns the analysis text
    async fn analyze_reference(&self, reference: &ReferenceImage) -> CoreResult<String>;

    /// Generates a thumbnail image from the final prompt
    async fn generate_image(&self, prompt: &str) -> CoreResult<InlineArtifact>;

    /// Synthesizes narration audio, returning decoded raw bytes
    async fn generate_speech(&self, params: &SpeechParams) -> CoreResult<Vec<u8>>;

    /// Submits a long-running video generation job
    async fn submit_video(&self, params: &VideoGenerationParams) -> CoreResult<VideoJobHandle>;

    /// Fetches the current status of a submitted job
    async fn poll_video(&self, handle: &VideoJobHandle) -> CoreResult<VideoJobStatus>;

    /// Fetches the finished video stream from its result URI
    async fn download_video(&self, uri: &str) -> CoreResult<Vec<u8>>;
}

// ============================================================================
// Mock Provider for Testing
// ============================================================================

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Scriptable provider for tests.
///
/// Poll statuses are served from a queue; once exhausted the job reports
/// completion with the configured URI. Call counters allow asserting that a
/// gated operation never reached the provider.
pub struct MockGenerativeProvider {
    name: String,
    /// Raw JSON text the "provider" returns for upload pack requests
    pub upload_pack_json: Mutex<String>,
    /// Analysis text for reference critiques
    pub analysis_text: String,
    /// Image bytes returned for thumbnail prompts
    pub image_data: Vec<u8>,
    /// Audio bytes returned for speech requests
    pub audio_data: Vec<u8>,
    /// Video bytes returned by download
    pub video_data: Vec<u8>,
    /// URI reported once the job completes
    pub result_uri: Option<String>,
    /// Error message injected into the next submit call
    pub submit_error: Mutex<Option<String>>,
    /// Scripted poll statuses, served front to back
    pub poll_statuses: Mutex<VecDeque<VideoJobStatus>>,
    /// Prompts passed to `generate_image`
    pub image_prompts: Mutex<Vec<String>>,
    /// Number of submit calls observed
    pub submit_calls: AtomicUsize,
    /// Number of poll calls observed
    pub poll_calls: AtomicUsize,
    /// Number of download calls observed
    pub download_calls: AtomicUsize,
}

impl MockGenerativeProvider {
    /// Creates a mock with sensible defaults
    pub fn new(name: impl Into<String>) -> Self {
        let pack = serde_json::json!({
            "titles": ["Title A", "Title B", "Title C"],
            "description": "A mock description.",
            "tags": ["mock"],
            "hashtags": ["#mock"],
            "pinnedComment": "First!",
            "thumbnailConcepts": ["C1", "C2", "C3", "C4"]
        });

        Self {
            name: name.into(),
            upload_pack_json: Mutex::new(pack.to_string()),
            analysis_text: "Mock style analysis".to_string(),
            image_data: vec![0u8; 64],
            audio_data: vec![0u8; 64],
            video_data: vec![0u8; 64],
            result_uri: Some("https://example.com/video?gen=1".to_string()),
            submit_error: Mutex::new(None),
            poll_statuses: Mutex::new(VecDeque::new()),
            image_prompts: Mutex::new(Vec::new()),
            submit_calls: AtomicUsize::new(0),
            poll_calls: AtomicUsize::new(0),
            download_calls: AtomicUsize::new(0),
        }
    }

    /// Sets the raw upload pack JSON the mock returns
    pub fn with_upload_pack_json(self, json: impl Into<String>) -> Self {
        *self.upload_pack_json.lock().unwrap() = json.into();
        self
    }

    /// Sets the completed-job URI (`None` reproduces a done job with no URI)
    pub fn with_result_uri(mut self, uri: Option<String>) -> Self {
        self.result_uri = uri;
        self
    }

    /// Scripts the poll status sequence
    pub fn with_poll_statuses(self, statuses: Vec<VideoJobStatus>) -> Self {
        *self.poll_statuses.lock().unwrap() = statuses.into();
        self
    }

    /// Injects a failure into the next submit call
    pub fn with_submit_error(self, message: impl Into<String>) -> Self {
        *self.submit_error.lock().unwrap() = Some(message.into());
        self
    }
}

#[async_trait]
impl GenerativeProvider for MockGenerativeProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_available(&self) -> bool {
        true
    }

    async fn generate_upload_pack(&self, _params: &UploadPackParams) -> CoreResult<UploadPack> {
        let json = self.upload_pack_json.lock().unwrap().clone();
        UploadPack::from_json(&json)
    }

    async fn analyze_reference(&self, _reference: &ReferenceImage) -> CoreResult<String> {
        Ok(self.analysis_text.clone())
    }

    async fn generate_image(&self, prompt: &str) -> CoreResult<InlineArtifact> {
        self.image_prompts.lock().unwrap().push(prompt.to_string());
        Ok(InlineArtifact {
            data: self.image_data.clone(),
            mime_type: "image/png".to_string(),
        })
    }

    async fn generate_speech(&self, _params: &SpeechParams) -> CoreResult<Vec<u8>> {
        Ok(self.audio_data.clone())
    }

    async fn submit_video(&self, _params: &VideoGenerationParams) -> CoreResult<VideoJobHandle> {
        self.submit_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = self.submit_error.lock().unwrap().take() {
            return Err(CoreError::RequestFailed(message));
        }
        Ok(VideoJobHandle {
            operation_name: "operations/mock-job".to_string(),
            done: false,
            submitted_at: chrono::Utc::now().timestamp(),
        })
    }

    async fn poll_video(&self, _handle: &VideoJobHandle) -> CoreResult<VideoJobStatus> {
        self.poll_calls.fetch_add(1, Ordering::SeqCst);
        let next = self.poll_statuses.lock().unwrap().pop_front();
        Ok(next.unwrap_or(VideoJobStatus::Completed {
            uri: self.result_uri.clone(),
        }))
    }

    async fn download_video(&self, _uri: &str) -> CoreResult<Vec<u8>> {
        self.download_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.video_data.clone())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_upload_pack_uses_shared_decoder() {
        let provider = MockGenerativeProvider::new("mock");
        let pack = provider
            .generate_upload_pack(&UploadPackParams::new("ai"))
            .await
            .unwrap();
        assert_eq!(pack.titles.len(), 3);

        let malformed = MockGenerativeProvider::new("mock").with_upload_pack_json("{broken");
        let err = malformed
            .generate_upload_pack(&UploadPackParams::new("ai"))
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Decode(_)));
    }

    #[tokio::test]
    async fn test_mock_poll_script_then_completion() {
        let provider = MockGenerativeProvider::new("mock")
            .with_poll_statuses(vec![VideoJobStatus::Running, VideoJobStatus::Running]);
        let handle = provider
            .submit_video(&VideoGenerationParams::new("test"))
            .await
            .unwrap();

        assert_eq!(
            provider.poll_video(&handle).await.unwrap(),
            VideoJobStatus::Running
        );
        assert_eq!(
            provider.poll_video(&handle).await.unwrap(),
            VideoJobStatus::Running
        );
        assert!(matches!(
            provider.poll_video(&handle).await.unwrap(),
            VideoJobStatus::Completed { uri: Some(_) }
        ));
        assert_eq!(provider.poll_calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_mock_submit_error_fires_once() {
        let provider = MockGenerativeProvider::new("mock")
            .with_submit_error("Requested entity was not found.");
        let params = VideoGenerationParams::new("test");

        let err = provider.submit_video(&params).await.unwrap_err();
        assert!(err.is_expiry());

        // Second submit succeeds
        assert!(provider.submit_video(&params).await.is_ok());
    }
}
