//! Studio Orchestration Engine
//!
//! Front door for the four creator-studio features. The engine validates
//! parameters, runs the credential handshake for long-running jobs, drives
//! the submit/poll/download video loop, and wraps every binary result in a
//! revocable [`MediaHandle`].
//!
//! Each call is a single attempt: failures are surfaced to the caller and
//! never retried internally, including after an expiry-triggered key
//! re-selection.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::audio::{SpeechParams, SpeechResult};
use super::image::{ThumbnailParams, ThumbnailResult};
use super::metadata::{UploadPack, UploadPackParams};
use super::provider::GenerativeProvider;
use super::video::{PollConfig, VideoGenerationParams, VideoGenerationResult, VideoJobStatus};
use crate::core::credentials::{CredentialGate, KeySelector, KeyState};
use crate::core::media::MediaHandle;
use crate::core::{CoreError, CoreResult};

/// Orchestrates generative requests against a single provider
pub struct StudioEngine {
    provider: Arc<dyn GenerativeProvider>,
    gate: CredentialGate,
    poll_config: PollConfig,
}

impl StudioEngine {
    /// Creates an engine with no interactive key surface (ambient key)
    pub fn new(provider: Arc<dyn GenerativeProvider>) -> Self {
        Self {
            provider,
            gate: CredentialGate::ambient(),
            poll_config: PollConfig::default(),
        }
    }

    /// Injects the host environment's interactive key selector
    pub fn with_key_selector(mut self, selector: Arc<dyn KeySelector>) -> Self {
        self.gate = CredentialGate::new(Some(selector));
        self
    }

    /// Overrides the video poll configuration
    pub fn with_poll_config(mut self, config: PollConfig) -> Self {
        self.poll_config = config;
        self
    }

    /// Current verification state of the active key
    pub async fn key_state(&self) -> KeyState {
        self.gate.state().await
    }

    /// Runs an expiry-class failure through the credential gate.
    ///
    /// Re-opens the selection dialog as recovery, but the failed attempt is
    /// not resumed; the original error still reaches the caller.
    async fn note_failure(&self, error: &CoreError) {
        if error.is_expiry() {
            warn!("Provider reports the active key as expired or deselected");
            self.gate.on_expiry().await;
        }
    }

    // -------------------------------------------------------------------------
    // Upload pack
    // -------------------------------------------------------------------------

    /// Generates a structured metadata upload pack
    pub async fn generate_upload_pack(&self, params: &UploadPackParams) -> CoreResult<UploadPack> {
        params.validate().map_err(CoreError::Validation)?;

        let result = self.provider.generate_upload_pack(params).await;
        match &result {
            Ok(pack) => {
                self.gate.mark_verified().await;
                info!("Upload pack generated with {} titles", pack.titles.len());
            }
            Err(e) => self.note_failure(e).await,
        }
        result
    }

    // -------------------------------------------------------------------------
    // Thumbnail
    // -------------------------------------------------------------------------

    /// Generates a thumbnail image, optionally guided by a reference critique
    pub async fn generate_thumbnail(
        &self,
        params: &ThumbnailParams,
    ) -> CoreResult<ThumbnailResult> {
        params.validate().map_err(CoreError::Validation)?;

        let analysis = match &params.reference {
            Some(reference) => Some(self.provider.analyze_reference(reference).await?),
            None => None,
        };

        let prompt = params.final_prompt(analysis.as_deref());
        let artifact = match self.provider.generate_image(&prompt).await {
            Ok(artifact) => artifact,
            Err(e) => {
                self.note_failure(&e).await;
                return Err(e);
            }
        };

        self.gate.mark_verified().await;
        info!("Thumbnail generated ({} bytes)", artifact.data.len());

        Ok(ThumbnailResult {
            image: MediaHandle::new(artifact.data, artifact.mime_type),
            analysis,
        })
    }

    // -------------------------------------------------------------------------
    // Speech
    // -------------------------------------------------------------------------

    /// Synthesizes narration audio for a script
    pub async fn generate_speech(&self, params: &SpeechParams) -> CoreResult<SpeechResult> {
        params.validate().map_err(CoreError::Validation)?;

        let audio = match self.provider.generate_speech(params).await {
            Ok(audio) => audio,
            Err(e) => {
                self.note_failure(&e).await;
                return Err(e);
            }
        };

        self.gate.mark_verified().await;
        info!(
            "Narration synthesized with voice {} ({} bytes)",
            params.voice,
            audio.len()
        );

        Ok(SpeechResult {
            audio: MediaHandle::wav(audio),
            voice: params.voice,
        })
    }

    // -------------------------------------------------------------------------
    // Video
    // -------------------------------------------------------------------------

    /// Generates a video: key handshake, submit, poll until done, download.
    ///
    /// Polls at the configured interval until the job completes, the wait
    /// budget runs out ([`CoreError::Timeout`]), or `cancel` fires
    /// ([`CoreError::Cancelled`]). A completed job without a result URI and a
    /// provider-side failure both surface as [`CoreError::Generation`].
    pub async fn generate_video(
        &self,
        params: &VideoGenerationParams,
        cancel: CancellationToken,
    ) -> CoreResult<VideoGenerationResult> {
        params.validate().map_err(CoreError::Validation)?;

        if cancel.is_cancelled() {
            return Err(CoreError::Cancelled(
                "Video generation cancelled before submit".to_string(),
            ));
        }

        self.gate.ensure_key().await?;

        let started = tokio::time::Instant::now();

        let handle = match self.provider.submit_video(params).await {
            Ok(handle) => handle,
            Err(e) => {
                self.note_failure(&e).await;
                return Err(e);
            }
        };
        self.gate.mark_verified().await;

        let uri = loop {
            if cancel.is_cancelled() {
                return Err(CoreError::Cancelled(
                    "Video generation cancelled while polling".to_string(),
                ));
            }

            let status = match self.provider.poll_video(&handle).await {
                Ok(status) => status,
                Err(e) => {
                    self.note_failure(&e).await;
                    return Err(e);
                }
            };

            match status {
                VideoJobStatus::Completed { uri: Some(uri) } => break uri,
                VideoJobStatus::Completed { uri: None } => {
                    return Err(CoreError::Generation(
                        "Video generation failed or no URI returned".to_string(),
                    ));
                }
                VideoJobStatus::Failed { error } => {
                    return Err(CoreError::Generation(format!(
                        "Video generation failed: {}",
                        error
                    )));
                }
                VideoJobStatus::Running => {
                    if started.elapsed() >= self.poll_config.max_wait {
                        return Err(CoreError::Timeout(format!(
                            "Video generation exceeded {}s wait budget",
                            self.poll_config.max_wait.as_secs()
                        )));
                    }
                    tokio::select! {
                        _ = cancel.cancelled() => {
                            return Err(CoreError::Cancelled(
                                "Video generation cancelled while polling".to_string(),
                            ));
                        }
                        _ = tokio::time::sleep(self.poll_config.interval) => {}
                    }
                }
            }
        };

        let bytes = match self.provider.download_video(&uri).await {
            Ok(bytes) => bytes,
            Err(e) => {
                self.note_failure(&e).await;
                return Err(e);
            }
        };

        let generation_time_ms = started.elapsed().as_millis() as u64;
        info!(
            "Video generated in {}ms ({} bytes)",
            generation_time_ms,
            bytes.len()
        );

        Ok(VideoGenerationResult {
            video: MediaHandle::mp4(bytes),
            uri,
            generation_time_ms,
        })
    }
}

impl std::fmt::Debug for StudioEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StudioEngine")
            .field("provider", &self.provider.name())
            .field("poll_config", &self.poll_config)
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
