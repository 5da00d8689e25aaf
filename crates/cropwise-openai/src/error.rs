use cropwise_core::error::CropwiseError;
use reqwest::StatusCode;

/// High-level error type covering every failure mode the client can hit.
#[derive(Debug, thiserror::Error)]
pub enum OpenAiError {
    /// Connection refused, DNS failure, TLS failure, timeout, ...
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("couldn’t (de)serialise body: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("API returned non-success status {status}: {body}")]
    Api { status: StatusCode, body: String },

    #[error("invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),
}

impl OpenAiError {
    /// `true` when the request never produced an HTTP response in time.
    pub fn is_timeout(&self) -> bool {
        matches!(self, OpenAiError::Http(err) if err.is_timeout())
    }
}

impl From<OpenAiError> for CropwiseError {
    fn from(value: OpenAiError) -> Self {
        CropwiseError::backend(value)
    }
}
