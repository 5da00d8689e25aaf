//! Model identifiers used throughout the **cropwise** workspace.
//!
//! Provider crates map the variants onto their own naming scheme, so
//! application code picks an enum variant instead of typing literal strings
//! such as `"llama-3.1-8b-instant"`.  Anything not covered by a dedicated
//! variant goes through [`Model::Custom`], which is also what a model name
//! read from configuration turns into.
//!
//! # Example
//!
//! ```rust
//! use cropwise_core::model::{GroqModel, Model};
//! assert_eq!(Model::from(GroqModel::Llama3_1_8bInstant),
//!            Model::Groq(GroqModel::Llama3_1_8bInstant));
//! assert_eq!(Model::from("my-local-model".to_string()).to_string(), "my-local-model");
//! ```
use std::{borrow::Cow, fmt::Display};

/// Universal identifier for an LLM model.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Model {
    /// Models served by Groq's OpenAI-compatible endpoint.
    Groq(GroqModel),
    /// Built-in OpenAI models (chat completion API).
    OpenAi(OpenAiModel),
    /// Verbatim provider model name.
    Custom(Cow<'static, str>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroqModel {
    Llama3_1_8bInstant,
    Llama3_3_70bVersatile,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpenAiModel {
    Gpt4o,
    Gpt4oMini,
}

impl From<GroqModel> for Model {
    fn from(val: GroqModel) -> Self {
        Model::Groq(val)
    }
}

impl From<OpenAiModel> for Model {
    fn from(val: OpenAiModel) -> Self {
        Model::OpenAi(val)
    }
}

impl From<String> for Model {
    fn from(val: String) -> Self {
        Model::Custom(Cow::Owned(val))
    }
}

impl From<&'static str> for Model {
    fn from(val: &'static str) -> Self {
        Model::Custom(Cow::Borrowed(val))
    }
}

impl Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Model::Groq(model) => write!(f, "groq:{model:?}"),
            Model::OpenAi(model) => write!(f, "openai:{model:?}"),
            Model::Custom(name) => f.write_str(name),
        }
    }
}
