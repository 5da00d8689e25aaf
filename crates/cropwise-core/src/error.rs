//! Unified error type exposed by **`cropwise-core`**.
//!
//! Provider crates convert their transport-level failures into one of these
//! variants before handing them to the advisory pipeline.  The pipeline
//! treats every variant the same way (it is a transport failure and routes to
//! the offline fallback), so the set stays small.

use thiserror::Error;

/// Convenient alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, CropwiseError>;

#[derive(Debug, Error)]
pub enum CropwiseError {
    /// The selected backend does not recognise the requested `model`.
    #[error("provider `{provider}` does not support model `{model}`")]
    ModelNotSupported {
        provider: &'static str,
        model: String,
    },

    /// Failure while serialising or deserialising JSON payloads sent to / received
    /// from the LLM provider.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic forwarding of any backend-specific error (network failure,
    /// timeout, non-success HTTP status, ...).
    #[error("backend returned an error: {0}")]
    Backend(Box<dyn std::error::Error + Send + Sync + 'static>),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("invalid: {0}")]
    Invalid(String),
}

impl CropwiseError {
    /// Wrap any backend error.
    pub fn backend(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Backend(Box::new(err))
    }
}
