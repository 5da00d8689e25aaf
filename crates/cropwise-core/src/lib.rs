//! Provider-agnostic building blocks of the Cropwise advisory pipeline.
//!
//! | Module          | What it provides                                           |
//! |-----------------|------------------------------------------------------------|
//! | [`generic`]     | chat messages, roles, provider responses                   |
//! | [`model`]       | model identifiers                                          |
//! | [`template`]    | `IntoPrompt` / `PromptTemplate`                            |
//! | [`provider`]    | the `ChatCompletionProvider` seam and its parameters       |
//! | [`schema_util`] | JSON-schema `response_format` helpers                      |
//! | [`error`]       | the transport-facing error type                            |
pub mod error;
pub mod generic;
pub mod model;
pub mod provider;
pub mod schema_util;
pub mod template;

pub use error::{CropwiseError, Result};
