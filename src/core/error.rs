//! TubeStudio Error Definitions
//!
//! Error types shared across the orchestration core. Every failure is scoped
//! to the single requested operation; the calling layer is the recovery
//! boundary and receives these unmodified.

use thiserror::Error;

use super::credentials::CredentialError;

/// Core error types
#[derive(Error, Debug)]
pub enum CoreError {
    /// Required input missing or malformed; never submitted to the network
    #[error("Validation error: {0}")]
    Validation(String),

    /// Response payload missing or malformed structured data
    #[error("Decode error: {0}")]
    Decode(String),

    /// Provider returned no usable artifact
    #[error("Generation failed: {0}")]
    Generation(String),

    /// Non-success status or network failure fetching a binary result
    #[error("Transport error: {0}")]
    Transport(String),

    /// Interactive key selection failed, was cancelled, or expired mid-flow
    #[error("Credential error: {0}")]
    Credential(#[from] CredentialError),

    /// Provider request failed (HTTP error, network error, unreadable body)
    #[error("AI request failed: {0}")]
    RequestFailed(String),

    /// Poll budget exhausted before the job reached a terminal state
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Operation aborted via cancellation token
    #[error("Cancelled: {0}")]
    Cancelled(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Core result type
pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    /// Whether this error looks like a provider-side session/key expiry.
    ///
    /// The provider reports an expired or deselected key as an entity-not-found
    /// failure on the video endpoints.
    pub fn is_expiry(&self) -> bool {
        match self {
            CoreError::RequestFailed(msg) | CoreError::Generation(msg) => {
                msg.contains("Requested entity was not found")
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_expiry_matches_entity_not_found() {
        let err = CoreError::RequestFailed(
            "Gemini API error (404): Requested entity was not found.".to_string(),
        );
        assert!(err.is_expiry());

        let err = CoreError::RequestFailed("Gemini API error (429): rate limit".to_string());
        assert!(!err.is_expiry());

        let err = CoreError::Validation("Requested entity was not found".to_string());
        assert!(!err.is_expiry());
    }

    #[test]
    fn test_error_display() {
        let err = CoreError::Decode("no response from AI".to_string());
        assert_eq!(err.to_string(), "Decode error: no response from AI");

        let err = CoreError::Timeout("poll budget of 600s exhausted".to_string());
        assert!(err.to_string().starts_with("Timeout:"));
    }
}
