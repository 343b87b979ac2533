//! TubeStudio Core
//!
//! Core orchestration logic: error types, credential gating, the generative
//! feature modules, the Gemini provider, and media result transport.

pub mod credentials;
pub mod error;
pub mod gemini;
pub mod generative;
pub mod media;

pub use error::{CoreError, CoreResult};
