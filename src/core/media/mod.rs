//! Media Result Transport
//!
//! Wraps generated binary payloads (image, audio, video bytes) in locally
//! addressable, revocable handles the presentation layer can render or
//! download. Once revoked, the underlying buffer is released and the handle
//! refuses further access.

use base64::Engine;

use crate::core::{CoreError, CoreResult};

/// A revocable in-memory handle to a generated binary artifact.
///
/// The consumer owns the handle once produced and is responsible for revoking
/// it when a new result supersedes an old one or the view is torn down.
pub struct MediaHandle {
    /// Unique handle ID
    id: String,
    /// MIME type of the payload (e.g. "image/png", "audio/wav", "video/mp4")
    mime_type: String,
    /// Payload bytes; `None` after revocation
    data: Option<Vec<u8>>,
}

impl std::fmt::Debug for MediaHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaHandle")
            .field("id", &self.id)
            .field("mime_type", &self.mime_type)
            .field("len", &self.data.as_ref().map(Vec::len))
            .field("revoked", &self.data.is_none())
            .finish()
    }
}

impl MediaHandle {
    /// Wraps raw bytes in a new handle
    pub fn new(data: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            id: ulid::Ulid::new().to_string(),
            mime_type: mime_type.into(),
            data: Some(data),
        }
    }

    /// PNG image handle
    pub fn png(data: Vec<u8>) -> Self {
        Self::new(data, "image/png")
    }

    /// WAV audio handle
    pub fn wav(data: Vec<u8>) -> Self {
        Self::new(data, "audio/wav")
    }

    /// MP4 video handle
    pub fn mp4(data: Vec<u8>) -> Self {
        Self::new(data, "video/mp4")
    }

    /// Returns the handle ID
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the MIME type
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Whether the handle has been revoked
    pub fn is_revoked(&self) -> bool {
        self.data.is_none()
    }

    /// Payload size in bytes, if not revoked
    pub fn len(&self) -> Option<usize> {
        self.data.as_ref().map(Vec::len)
    }

    /// Returns the payload bytes, failing after revocation
    pub fn bytes(&self) -> CoreResult<&[u8]> {
        self.data.as_deref().ok_or_else(|| {
            CoreError::Transport(format!("resource handle {} has been revoked", self.id))
        })
    }

    /// Renders the payload as a `data:` URI, failing after revocation.
    ///
    /// Used for inline image results, which need no network fetch.
    pub fn to_data_uri(&self) -> CoreResult<String> {
        let bytes = self.bytes()?;
        let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
        Ok(format!("data:{};base64,{}", self.mime_type, encoded))
    }

    /// Suggested download file name derived from the MIME type
    pub fn suggested_file_name(&self) -> String {
        match self.mime_type.as_str() {
            "image/png" => "thumbnail.png".to_string(),
            "audio/wav" => "narration.wav".to_string(),
            "video/mp4" => "video.mp4".to_string(),
            other => {
                let ext = other.rsplit('/').next().unwrap_or("bin");
                format!("result.{}", ext)
            }
        }
    }

    /// Releases the underlying buffer. Further access fails.
    pub fn revoke(&mut self) {
        if let Some(data) = self.data.take() {
            tracing::debug!("Revoked media handle {} ({} bytes)", self.id, data.len());
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_new() {
        let handle = MediaHandle::png(vec![1, 2, 3]);
        assert!(!handle.id().is_empty());
        assert_eq!(handle.mime_type(), "image/png");
        assert_eq!(handle.len(), Some(3));
        assert!(!handle.is_revoked());
        assert_eq!(handle.bytes().unwrap(), &[1, 2, 3]);
    }

    #[test]
    fn test_handle_data_uri() {
        let handle = MediaHandle::png(vec![0x89, 0x50, 0x4e, 0x47]);
        let uri = handle.to_data_uri().unwrap();
        assert!(uri.starts_with("data:image/png;base64,"));
        assert!(uri.ends_with("iVBORw=="));
    }

    #[test]
    fn test_handle_revoke_blocks_access() {
        let mut handle = MediaHandle::wav(vec![0u8; 16]);
        handle.revoke();

        assert!(handle.is_revoked());
        assert_eq!(handle.len(), None);
        assert!(matches!(handle.bytes(), Err(CoreError::Transport(_))));
        assert!(matches!(handle.to_data_uri(), Err(CoreError::Transport(_))));
    }

    #[test]
    fn test_handle_revoke_is_idempotent() {
        let mut handle = MediaHandle::mp4(vec![0u8; 8]);
        handle.revoke();
        handle.revoke();
        assert!(handle.is_revoked());
    }

    #[test]
    fn test_suggested_file_names() {
        assert_eq!(
            MediaHandle::wav(vec![]).suggested_file_name(),
            "narration.wav"
        );
        assert_eq!(MediaHandle::mp4(vec![]).suggested_file_name(), "video.mp4");
        assert_eq!(
            MediaHandle::png(vec![]).suggested_file_name(),
            "thumbnail.png"
        );
        assert_eq!(
            MediaHandle::new(vec![], "image/webp").suggested_file_name(),
            "result.webp"
        );
    }
}
