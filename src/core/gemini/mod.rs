//! Google Gemini Provider Implementation
//!
//! Implements [`GenerativeProvider`] against the Gemini REST API:
//! `generateContent` for the synchronous features (upload pack, thumbnail
//! analysis and generation, speech) and `predictLongRunning` plus operation
//! polling for Veo video generation.

use async_trait::async_trait;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

use crate::core::generative::audio::SpeechParams;
use crate::core::generative::image::{
    ReferenceImage, ANALYSIS_INSTRUCTION, THUMBNAIL_ASPECT_RATIO, THUMBNAIL_IMAGE_SIZE,
};
use crate::core::generative::metadata::{UploadPack, UploadPackParams};
use crate::core::generative::provider::{GenerativeProvider, InlineArtifact};
use crate::core::generative::video::{VideoGenerationParams, VideoJobHandle, VideoJobStatus};
use crate::core::{credentials, CoreError, CoreResult};

// =============================================================================
// Constants
// =============================================================================

/// Default Gemini API base URL
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Model for structured metadata generation and reference analysis
const METADATA_MODEL: &str = "gemini-2.5-flash";

/// Model for high-quality thumbnail generation
const IMAGE_MODEL: &str = "gemini-3-pro-image-preview";

/// Model for speech synthesis
const TTS_MODEL: &str = "gemini-2.5-flash-preview-tts";

/// Model for video generation
const VIDEO_MODEL: &str = "veo-3.1-fast-generate-preview";

// =============================================================================
// Wire Types
// =============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    /// Text-safe (base64) payload
    data: String,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_modalities: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    speech_config: Option<SpeechConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    image_config: Option<ImageConfig>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SpeechConfig {
    voice_config: VoiceConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VoiceConfig {
    prebuilt_voice_config: PrebuiltVoiceConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PrebuiltVoiceConfig {
    voice_name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ImageConfig {
    aspect_ratio: String,
    image_size: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Deserialize)]
struct ApiError {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
    #[serde(default)]
    status: Option<String>,
}

// Video wire types

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PredictLongRunningRequest {
    instances: Vec<VideoInstance>,
    parameters: VideoParameters,
}

#[derive(Debug, Serialize)]
struct VideoInstance {
    prompt: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VideoParameters {
    number_of_videos: u32,
    aspect_ratio: String,
    resolution: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OperationResponse {
    name: String,
    #[serde(default)]
    done: bool,
    #[serde(default)]
    error: Option<OperationError>,
    #[serde(default)]
    response: Option<OperationResult>,
}

#[derive(Debug, Deserialize)]
struct OperationError {
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OperationResult {
    #[serde(default)]
    generate_video_response: Option<GenerateVideoResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateVideoResponse {
    // The API has surfaced both field names across versions.
    #[serde(default)]
    generated_samples: Option<Vec<GeneratedVideo>>,
    #[serde(default)]
    generated_videos: Option<Vec<GeneratedVideo>>,
}

#[derive(Debug, Deserialize)]
struct GeneratedVideo {
    #[serde(default)]
    video: Option<VideoRef>,
}

#[derive(Debug, Deserialize)]
struct VideoRef {
    #[serde(default)]
    uri: Option<String>,
}

impl OperationResponse {
    /// First generated-video URI, if the response carries one
    fn first_video_uri(&self) -> Option<String> {
        let generated = self.response.as_ref()?.generate_video_response.as_ref()?;
        let videos = generated
            .generated_samples
            .as_ref()
            .or(generated.generated_videos.as_ref())?;
        videos.first()?.video.as_ref()?.uri.clone()
    }
}

// =============================================================================
// GeminiProvider
// =============================================================================

/// Gemini REST API provider
pub struct GeminiProvider {
    /// HTTP client with configured timeout
    client: reqwest::Client,
    /// API key for authentication
    api_key: String,
    /// Base URL for the API
    base_url: String,
}

impl std::fmt::Debug for GeminiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiProvider")
            .field("base_url", &self.base_url)
            .field("api_key", &credentials::redact(&self.api_key))
            .finish()
    }
}

impl GeminiProvider {
    /// Creates a new Gemini provider
    pub fn new(api_key: impl Into<String>) -> CoreResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(180))
            .build()
            .map_err(|e| CoreError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Sets a custom base URL
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    fn generate_url(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.base_url, model)
    }

    fn submit_url(&self) -> String {
        format!("{}/models/{}:predictLongRunning", self.base_url, VIDEO_MODEL)
    }

    fn operation_url(&self, operation_name: &str) -> String {
        format!("{}/{}", self.base_url, operation_name)
    }

    /// Appends the active API key to a result URI for the binary fetch
    fn authorize_uri(&self, uri: &str) -> String {
        let separator = if uri.contains('?') { '&' } else { '?' };
        format!("{}{}key={}", uri, separator, self.api_key)
    }

    fn parse_api_error(status: reqwest::StatusCode, body: &str) -> CoreError {
        if let Ok(parsed) = serde_json::from_str::<ApiError>(body) {
            let status_str = parsed.error.status.as_deref().unwrap_or("unknown");
            return CoreError::RequestFailed(format!(
                "Gemini API error ({}; status={}): {}",
                status, status_str, parsed.error.message
            ));
        }

        let truncated: String = body.chars().take(500).collect();
        CoreError::RequestFailed(format!("Gemini API error ({}): {}", status, truncated))
    }

    async fn read_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> CoreResult<T> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| CoreError::RequestFailed(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            return Err(Self::parse_api_error(status, &body));
        }

        serde_json::from_str(&body)
            .map_err(|e| CoreError::RequestFailed(format!("Failed to parse response: {}", e)))
    }

    async fn invoke(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> CoreResult<GenerateContentResponse> {
        let response = self
            .client
            .post(self.generate_url(model))
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| CoreError::RequestFailed(format!("Request failed: {}", e)))?;

        let parsed: GenerateContentResponse = Self::read_response(response).await?;

        if let Some(feedback) = &parsed.prompt_feedback {
            if let Some(reason) = &feedback.block_reason {
                return Err(CoreError::RequestFailed(format!(
                    "Content blocked by safety filters: {}",
                    reason
                )));
            }
        }

        Ok(parsed)
    }

    fn user_content(parts: Vec<Part>) -> Vec<Content> {
        vec![Content {
            role: Some("user".to_string()),
            parts,
        }]
    }

    fn text_part(text: impl Into<String>) -> Part {
        Part {
            text: Some(text.into()),
            ..Default::default()
        }
    }

    fn decode_inline(data: &str) -> CoreResult<Vec<u8>> {
        base64::engine::general_purpose::STANDARD
            .decode(data)
            .map_err(|e| CoreError::Decode(format!("Invalid inline payload encoding: {}", e)))
    }
}

/// Text of the first part of the first candidate
fn first_text(response: &GenerateContentResponse) -> Option<String> {
    response
        .candidates
        .as_ref()?
        .first()?
        .content
        .as_ref()?
        .parts
        .first()?
        .text
        .clone()
}

/// First inline-binary segment across the first candidate's parts
fn first_inline(response: &GenerateContentResponse) -> Option<&InlineData> {
    response
        .candidates
        .as_ref()?
        .first()?
        .content
        .as_ref()?
        .parts
        .iter()
        .find_map(|part| part.inline_data.as_ref())
}

#[async_trait]
impl GenerativeProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    fn is_available(&self) -> bool {
        !self.api_key.is_empty()
    }

    async fn generate_upload_pack(&self, params: &UploadPackParams) -> CoreResult<UploadPack> {
        let request = GenerateContentRequest {
            contents: Self::user_content(vec![Self::text_part(params.instruction())]),
            generation_config: Some(GenerationConfig {
                response_mime_type: Some("application/json".to_string()),
                response_schema: Some(UploadPackParams::response_schema()),
                ..Default::default()
            }),
        };

        let response = self.invoke(METADATA_MODEL, &request).await?;
        let text = first_text(&response)
            .ok_or_else(|| CoreError::Decode("No response from AI".to_string()))?;

        UploadPack::from_json(&text)
    }

    async fn analyze_reference(&self, reference: &ReferenceImage) -> CoreResult<String> {
        let inline = Part {
            inline_data: Some(InlineData {
                mime_type: reference.mime_type.clone(),
                data: base64::engine::general_purpose::STANDARD.encode(&reference.bytes),
            }),
            ..Default::default()
        };

        let request = GenerateContentRequest {
            contents: Self::user_content(vec![inline, Self::text_part(ANALYSIS_INSTRUCTION)]),
            generation_config: None,
        };

        let response = self.invoke(METADATA_MODEL, &request).await?;

        // The reference critique is advisory; a missing text segment falls
        // back to a marker instead of aborting the thumbnail request.
        Ok(first_text(&response).unwrap_or_else(|| "Analysis failed".to_string()))
    }

    async fn generate_image(&self, prompt: &str) -> CoreResult<InlineArtifact> {
        let request = GenerateContentRequest {
            contents: Self::user_content(vec![Self::text_part(prompt)]),
            generation_config: Some(GenerationConfig {
                image_config: Some(ImageConfig {
                    aspect_ratio: THUMBNAIL_ASPECT_RATIO.to_string(),
                    image_size: THUMBNAIL_IMAGE_SIZE.to_string(),
                }),
                ..Default::default()
            }),
        };

        let response = self.invoke(IMAGE_MODEL, &request).await?;
        let inline = first_inline(&response)
            .ok_or_else(|| CoreError::Generation("Failed to generate image".to_string()))?;

        Ok(InlineArtifact {
            data: Self::decode_inline(&inline.data)?,
            mime_type: if inline.mime_type.is_empty() {
                "image/png".to_string()
            } else {
                inline.mime_type.clone()
            },
        })
    }

    async fn generate_speech(&self, params: &SpeechParams) -> CoreResult<Vec<u8>> {
        let request = GenerateContentRequest {
            contents: Self::user_content(vec![Self::text_part(&params.text)]),
            generation_config: Some(GenerationConfig {
                response_modalities: Some(vec!["AUDIO".to_string()]),
                speech_config: Some(SpeechConfig {
                    voice_config: VoiceConfig {
                        prebuilt_voice_config: PrebuiltVoiceConfig {
                            voice_name: params.voice.api_name().to_string(),
                        },
                    },
                }),
                ..Default::default()
            }),
        };

        let response = self.invoke(TTS_MODEL, &request).await?;
        let inline = first_inline(&response)
            .ok_or_else(|| CoreError::Generation("No audio generated".to_string()))?;

        Self::decode_inline(&inline.data)
    }

    async fn submit_video(&self, params: &VideoGenerationParams) -> CoreResult<VideoJobHandle> {
        let request = PredictLongRunningRequest {
            instances: vec![VideoInstance {
                prompt: params.prompt.clone(),
            }],
            parameters: VideoParameters {
                number_of_videos: 1,
                aspect_ratio: params.aspect_ratio.api_str().to_string(),
                resolution: params.resolution.api_str().to_string(),
            },
        };

        let response = self
            .client
            .post(self.submit_url())
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| CoreError::RequestFailed(format!("Request failed: {}", e)))?;

        let operation: OperationResponse = Self::read_response(response).await?;

        info!("Video generation submitted: operation={}", operation.name);

        Ok(VideoJobHandle {
            operation_name: operation.name,
            done: operation.done,
            submitted_at: chrono::Utc::now().timestamp(),
        })
    }

    async fn poll_video(&self, handle: &VideoJobHandle) -> CoreResult<VideoJobStatus> {
        let response = self
            .client
            .get(self.operation_url(&handle.operation_name))
            .header("x-goog-api-key", &self.api_key)
            .send()
            .await
            .map_err(|e| CoreError::RequestFailed(format!("Request failed: {}", e)))?;

        let operation: OperationResponse = Self::read_response(response).await?;

        debug!(
            "Poll for {}: done={}",
            handle.operation_name, operation.done
        );

        if let Some(error) = operation.error {
            return Ok(VideoJobStatus::Failed {
                error: error
                    .message
                    .unwrap_or_else(|| "Unknown provider error".to_string()),
            });
        }

        if !operation.done {
            return Ok(VideoJobStatus::Running);
        }

        Ok(VideoJobStatus::Completed {
            uri: operation.first_video_uri(),
        })
    }

    async fn download_video(&self, uri: &str) -> CoreResult<Vec<u8>> {
        let response = self
            .client
            .get(self.authorize_uri(uri))
            .send()
            .await
            .map_err(|e| CoreError::Transport(format!("Video fetch failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CoreError::Transport(format!(
                "Video fetch failed with status: {}",
                status
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| CoreError::Transport(format!("Failed to read video stream: {}", e)))?;

        info!("Downloaded generated video ({} bytes)", bytes.len());
        Ok(bytes.to_vec())
    }
}

// =============================================================================
// Tests
// =============================================================================
