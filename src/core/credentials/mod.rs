//! Interactive API-Key Selection
//!
//! The video feature requires a billed API key that the hosting environment
//! selects through an interactive dialog. The selection surface is an
//! optional capability: it is injected as a [`KeySelector`] at construction
//! time rather than probed from ambient global state, and when absent the
//! gate assumes an ambient key is configured.
//!
//! Dialog completion is treated as **unverified**: the key only counts as
//! verified once a subsequent provider call succeeds. An expiry-class
//! failure mid-flow triggers one best-effort re-prompt; the failed attempt
//! is never resumed automatically.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Errors that can occur during the key selection handshake
#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("Key selection failed or cancelled: {0}")]
    SelectionFailed(String),

    #[error("Key selection check failed: {0}")]
    CheckFailed(String),

    #[error("Session expired: {0}")]
    Expired(String),
}

/// Result type for credential operations
pub type CredentialResult<T> = Result<T, CredentialError>;

/// Host-environment capability for interactive key selection
#[async_trait]
pub trait KeySelector: Send + Sync {
    /// Whether a usable API key is already selected
    async fn has_selected_key(&self) -> CredentialResult<bool>;

    /// Opens the selection dialog and waits for it to close
    async fn open_select_key(&self) -> CredentialResult<()>;
}

/// Verification state of the active key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyState {
    /// No selection has been observed yet
    Unknown,
    /// A key was selected (or reported present) but has not completed a call
    Unverified,
    /// A provider call has succeeded with the current key
    Verified,
}

/// Gate that runs the key selection handshake before long-running jobs
pub struct CredentialGate {
    selector: Option<Arc<dyn KeySelector>>,
    state: RwLock<KeyState>,
}

impl CredentialGate {
    /// Creates a gate with an optional interactive selector
    pub fn new(selector: Option<Arc<dyn KeySelector>>) -> Self {
        Self {
            selector,
            state: RwLock::new(KeyState::Unknown),
        }
    }

    /// Gate without a selection surface; an ambient key is assumed
    pub fn ambient() -> Self {
        Self::new(None)
    }

    /// Returns the current key state
    pub async fn state(&self) -> KeyState {
        *self.state.read().await
    }

    /// Ensures a usable key is selected before spending a long-running job.
    ///
    /// Runs the interactive flow when the environment exposes one and no key
    /// is active. A failed or cancelled dialog aborts the whole attempt.
    pub async fn ensure_key(&self) -> CredentialResult<()> {
        let Some(selector) = &self.selector else {
            debug!("No key selection surface; assuming ambient key");
            return Ok(());
        };

        if *self.state.read().await == KeyState::Verified {
            return Ok(());
        }

        let has_key = selector.has_selected_key().await?;
        if !has_key {
            info!("No API key selected; opening selection dialog");
            selector.open_select_key().await?;
        }

        // The dialog closing does not prove the key works; the first
        // subsequent provider call settles it.
        let mut state = self.state.write().await;
        if *state == KeyState::Unknown {
            *state = KeyState::Unverified;
        }
        Ok(())
    }

    /// Records that a provider call succeeded with the current key
    pub async fn mark_verified(&self) {
        let mut state = self.state.write().await;
        if *state != KeyState::Verified {
            debug!("API key verified by successful provider call");
            *state = KeyState::Verified;
        }
    }

    /// Handles a detected session/key expiry.
    ///
    /// Resets the key state and re-opens the selection dialog as a
    /// best-effort recovery. The interrupted attempt is not resumed; the
    /// caller still surfaces the original failure.
    pub async fn on_expiry(&self) {
        {
            let mut state = self.state.write().await;
            *state = KeyState::Unknown;
        }

        if let Some(selector) = &self.selector {
            warn!("Session appears expired; re-opening key selection dialog");
            if let Err(e) = selector.open_select_key().await {
                warn!("Key re-selection failed: {}", e);
            }
        }
    }
}

/// Returns a redacted preview of a key for logging
pub fn redact(value: &str) -> String {
    if value.len() < 12 {
        "*".repeat(value.len())
    } else {
        format!("{}...{}", &value[..4], &value[value.len() - 4..])
    }
}

// ============================================================================
// Tests
// ============================================================================
