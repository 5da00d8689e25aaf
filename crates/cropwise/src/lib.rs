//! # `cropwise` – crop advisories that always arrive
//!
//! Given a crop name, [`CropAdvisor`] asks an OpenAI-compatible chat API
//! (Groq by default) for a structured advisory. Whatever comes back, or
//! doesn't, the caller receives a complete [`AdvisoryResult`]:
//!
//! | Outcome                                   | `success` | `source`            |
//! |-------------------------------------------|-----------|---------------------|
//! | reply parsed (JSON or `KEY: value` lines) | `true`    | `generative-api`    |
//! | failure, crop in the curated table        | `false`   | `curated-database`  |
//! | failure, unknown crop                     | `false`   | `generic-default`   |
//!
//! Missing fields are filled per field, so a half-answered reply still
//! yields a full record.
//!
//! The workspace crates are re-exported so one dependency line suffices:
//!
//! | Crate                  | What it provides                                          |
//! |------------------------|-----------------------------------------------------------|
//! | **`cropwise-core`**    | provider trait, generic messages, model ids, errors       |
//! | **`cropwise-prompt`**  | markdown `PromptBuilder`                                  |
//! | **`cropwise-types`**   | records, provenance, classification and validation        |
//! | **`cropwise-openai`**  | reqwest adapter for `chat/completions` *(feature `openai`)* |
//!
//! ## Quick example
//!
//! ```rust,no_run
//! use cropwise::{AdvisorConfig, AdvisoryRequest, CropAdvisor};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = AdvisorConfig::default();
//!     let backend = config.api.build_adapter()?;
//!     let advisor = CropAdvisor::with_config(backend, config.generation);
//!
//!     let result = advisor.advise(&AdvisoryRequest::new("Basmati Rice")?).await;
//!     println!("{}", serde_json::to_string_pretty(&result)?);
//!     Ok(())
//! }
//! ```
pub mod advisor;
pub mod config;
pub mod error;
pub mod knowledge;
pub mod parser;
pub mod prompt;

pub use advisor::{AdvisoryRequest, CropAdvisor, fallback};
pub use config::{AdvisorConfig, AdvisoryKind, ApiConfig, GenerationConfig, ResponseMode};
pub use error::{ConfigError, PipelineError};
pub use knowledge::KnowledgeBase;
pub use prompt::{CropGuidePrompt, FarmingGuidePrompt};

pub use cropwise_core::*;
pub use cropwise_prompt as prompt_builder;
pub use cropwise_types as types;
pub use cropwise_types::{AdvisoryRecord, AdvisoryResult, Field, Provenance};

#[cfg(feature = "openai")]
pub use cropwise_openai as openai;
