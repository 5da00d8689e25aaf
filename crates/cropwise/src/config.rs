//! Advisor configuration.
//!
//! Loaded from TOML; every key is optional and falls back to the Groq
//! defaults. The API key itself is never stored, only the name of the
//! environment variable that holds it.
//!
//! ```toml
//! [api]
//! base_url = "https://api.groq.com/openai/v1"
//! api_key_env = "GROQ_API_KEY"
//! timeout_secs = 30
//!
//! [generation]
//! kind = "crop_profile"          # or "farming_guide"
//! model = "llama-3.1-8b-instant"
//! temperature = 0.7
//! max_tokens = 1500              # omit to use the kind's own budget
//! response_mode = "json_object"
//! ```
use std::{path::Path, time::Duration};

use cropwise_core::model::Model;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level config, deserialised from TOML.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdvisorConfig {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub generation: GenerationConfig,
}

impl AdvisorConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    /// Read and parse the file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }
}

/// `[api]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Root of the OpenAI-compatible API, without `/chat/completions`.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Name of the env var holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key_env: default_api_key_env(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Read the key from `api_key_env` and build an HTTP backend.
    #[cfg(feature = "openai")]
    pub fn build_adapter(&self) -> Result<cropwise_openai::OpenAiAdapter, ConfigError> {
        let api_key = std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingApiKey(self.api_key_env.clone()))?;

        let adapter = cropwise_openai::OpenAiAdapterBuilder::new()
            .with_api_key(api_key)
            .with_base_url(self.base_url.clone())
            .with_timeout(self.timeout())
            .build()?;

        Ok(adapter)
    }
}

fn default_base_url() -> String {
    "https://api.groq.com/openai/v1".into()
}
fn default_api_key_env() -> String {
    "GROQ_API_KEY".into()
}
fn default_timeout_secs() -> u64 {
    30
}

/// `[generation]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    #[serde(default)]
    pub kind: AdvisoryKind,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_temperature")]
    pub temperature: f64,

    /// Output-token budget. `None` keeps the prompt's own: 1500 for a crop
    /// profile, 2000 for a farming guide.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    #[serde(default)]
    pub response_mode: ResponseMode,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            kind: AdvisoryKind::default(),
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: None,
            response_mode: ResponseMode::default(),
        }
    }
}

impl GenerationConfig {
    /// The configured model name as a provider-agnostic [`Model`].
    pub fn model(&self) -> Model {
        Model::from(self.model.clone())
    }
}

fn default_model() -> String {
    "llama-3.1-8b-instant".into()
}
fn default_temperature() -> f64 {
    0.7
}

/// What the model is asked for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdvisoryKind {
    /// The required fields only.
    #[default]
    CropProfile,
    /// The required fields plus cultivation practice, economics and tips.
    FarmingGuide,
}

/// How strictly the reply shape is pinned down.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseMode {
    /// Any JSON object.
    #[default]
    JsonObject,
    /// The advisory record's JSON schema, enforced by the provider.
    JsonSchema,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config = AdvisorConfig::from_toml_str("").unwrap();
        assert_eq!(config, AdvisorConfig::default());
        assert_eq!(config.api.base_url, "https://api.groq.com/openai/v1");
        assert_eq!(config.api.api_key_env, "GROQ_API_KEY");
        assert_eq!(config.api.timeout(), Duration::from_secs(30));
        assert_eq!(config.generation.model().to_string(), "llama-3.1-8b-instant");
        assert_eq!(config.generation.temperature, 0.7);
        assert_eq!(config.generation.kind, AdvisoryKind::CropProfile);
        assert_eq!(config.generation.max_tokens, None);
        assert_eq!(config.generation.response_mode, ResponseMode::JsonObject);
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let config = AdvisorConfig::from_toml_str(
            r#"
            [api]
            base_url = "http://localhost:8080/v1"
            timeout_secs = 5

            [generation]
            response_mode = "json_schema"
            "#,
        )
        .unwrap();

        assert_eq!(config.api.base_url, "http://localhost:8080/v1");
        assert_eq!(config.api.api_key_env, "GROQ_API_KEY");
        assert_eq!(config.api.timeout_secs, 5);
        assert_eq!(config.generation.max_tokens, None);
        assert_eq!(config.generation.response_mode, ResponseMode::JsonSchema);
    }

    #[test]
    fn farming_guide_kind_and_token_override() {
        let config = AdvisorConfig::from_toml_str(
            r#"
            [generation]
            kind = "farming_guide"
            max_tokens = 2500
            "#,
        )
        .unwrap();

        assert_eq!(config.generation.kind, AdvisoryKind::FarmingGuide);
        assert_eq!(config.generation.max_tokens, Some(2500));
        assert_eq!(config.generation.temperature, 0.7);

        let err = AdvisorConfig::from_toml_str("[generation]\nkind = \"essay\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = AdvisorConfig::from_toml_str("[api\nbase_url = 1").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));

        let err = AdvisorConfig::from_toml_str("[generation]\nresponse_mode = \"yaml\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = AdvisorConfig::load("/definitely/not/here/cropwise.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[cfg(feature = "openai")]
    #[test]
    fn unset_key_variable_is_reported() {
        let api = ApiConfig {
            api_key_env: "CROPWISE_TEST_UNSET_KEY_VARIABLE".into(),
            ..ApiConfig::default()
        };
        let err = api.build_adapter().unwrap_err();
        assert!(
            matches!(err, ConfigError::MissingApiKey(ref var) if var == "CROPWISE_TEST_UNSET_KEY_VARIABLE")
        );
    }
}
