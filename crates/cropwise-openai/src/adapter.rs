use std::{env, sync::Arc, time::Duration};

use cropwise_core::error::{CropwiseError, Result};

use crate::client::{DEFAULT_TIMEOUT, OpenAiClient};

/// Env var read by [`OpenAiAdapterBuilder::new_from_env`] for the API key.
pub const API_KEY_ENV: &str = "CROPWISE_API_KEY";
/// Env var read by [`OpenAiAdapterBuilder::new_from_env`] for the endpoint.
pub const BASE_URL_ENV: &str = "CROPWISE_BASE_URL";

/// Wires the HTTP client [`OpenAiClient`] into a value that implements
/// [`cropwise_core::provider::ChatCompletionProvider`].
///
/// Cheap to clone; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct OpenAiAdapter {
    pub(crate) client: Arc<OpenAiClient>,
}

impl OpenAiAdapter {
    pub fn base_url(&self) -> &str {
        self.client.base_url()
    }
}

/// Builder for [`OpenAiAdapter`].
///
/// # Typical usage
///
/// ```rust,no_run
/// use cropwise_openai::OpenAiAdapterBuilder;
///
/// let backend = OpenAiAdapterBuilder::new_from_env()
///     .build()
///     .expect("CROPWISE_API_KEY must be set");
/// ```
#[derive(Default)]
pub struct OpenAiAdapterBuilder {
    pub(crate) api_key: Option<String>,
    pub(crate) base_url: Option<String>,
    pub(crate) timeout: Option<Duration>,
}

impl OpenAiAdapterBuilder {
    /// Create an *empty* builder. Remember to supply an API key manually.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the key from `CROPWISE_API_KEY` and, if set, the endpoint from
    /// `CROPWISE_BASE_URL`. Missing keys only surface during [`Self::build`].
    pub fn new_from_env() -> Self {
        Self::new()
            .with_api_key_from_env(API_KEY_ENV)
            .with_base_url_opt(env::var(BASE_URL_ENV).ok())
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Read the key from the named environment variable, if present.
    pub fn with_api_key_from_env(mut self, var: &str) -> Self {
        if let Ok(key) = env::var(var) {
            self.api_key = Some(key);
        }
        self
    }

    /// Point the adapter at another OpenAI-compatible server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    fn with_base_url_opt(mut self, base_url: Option<String>) -> Self {
        if base_url.is_some() {
            self.base_url = base_url;
        }
        self
    }

    /// Whole-request timeout; defaults to 30 s.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Finalise the builder and return a ready-to-use adapter.
    ///
    /// # Errors
    ///
    /// * [`CropwiseError::Invalid`] – if the API key is missing or blank.
    /// * [`CropwiseError::Backend`] – if the HTTP client cannot be built.
    pub fn build(self) -> Result<OpenAiAdapter> {
        let api_key = self
            .api_key
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| CropwiseError::Invalid(format!("missing API key (`{API_KEY_ENV}`)")))?;

        let client = OpenAiClient::new(
            api_key,
            self.base_url,
            self.timeout.unwrap_or(DEFAULT_TIMEOUT),
        )?;

        Ok(OpenAiAdapter {
            client: Arc::new(client),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::DEFAULT_BASE_URL;

    #[test]
    fn missing_key_is_rejected() {
        let err = OpenAiAdapterBuilder::new().build().unwrap_err();
        assert!(matches!(err, CropwiseError::Invalid(_)));

        let err = OpenAiAdapterBuilder::new()
            .with_api_key("   ")
            .build()
            .unwrap_err();
        assert!(matches!(err, CropwiseError::Invalid(_)));
    }

    #[test]
    fn builds_with_defaults_and_overrides() {
        let adapter = OpenAiAdapterBuilder::new()
            .with_api_key("k")
            .build()
            .unwrap();
        assert_eq!(adapter.base_url(), DEFAULT_BASE_URL);

        let adapter = OpenAiAdapterBuilder::new()
            .with_api_key("k")
            .with_base_url("https://api.openai.com/v1")
            .with_timeout(Duration::from_secs(5))
            .build()
            .unwrap();
        assert_eq!(adapter.base_url(), "https://api.openai.com/v1");
    }

    #[test]
    fn unset_env_var_leaves_key_empty() {
        let builder = OpenAiAdapterBuilder::new()
            .with_api_key_from_env("CROPWISE_TEST_SURELY_UNSET_VARIABLE");
        assert!(builder.api_key.is_none());
    }
}
