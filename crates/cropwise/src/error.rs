use std::path::PathBuf;

use cropwise_core::error::CropwiseError;
use thiserror::Error;

/// Reasons the live path of the pipeline could not produce a record.
///
/// Everything except [`PipelineError::EmptySubject`] is absorbed by
/// [`crate::CropAdvisor::advise`] and answered from the fallback path.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Network failure, timeout, non-success status or undecodable body.
    #[error("transport failed: {0}")]
    Transport(#[from] CropwiseError),

    /// The reply carried no usable text.
    #[error("response carried no content")]
    NoContent,

    /// The reply parsed, but yielded no required field.
    #[error("response held no recognisable advisory fields: {preview}")]
    MalformedResponse { preview: String },

    /// The crop name was empty after trimming.
    #[error("crop name must not be empty")]
    EmptySubject,
}

impl PipelineError {
    /// Build a [`PipelineError::MalformedResponse`] carrying the first
    /// characters of `content`.
    pub fn malformed(content: &str) -> Self {
        const PREVIEW_CHARS: usize = 120;
        let preview: String = content.chars().take(PREVIEW_CHARS).collect();
        PipelineError::MalformedResponse { preview }
    }
}

/// Failures while loading an [`crate::AdvisorConfig`] or turning it into a
/// backend.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("environment variable `{0}` is not set")]
    MissingApiKey(String),

    #[error("failed to build backend: {0}")]
    Backend(#[from] CropwiseError),
}
