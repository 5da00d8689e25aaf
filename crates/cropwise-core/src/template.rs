//! Abstractions that tie a **prompt** to a default **model** and to the
//! **shape** of the reply it asks for.
//!
//! 1. [`IntoPrompt`] – turns a value into a list of chat messages.
//! 2. [`PromptTemplate`] – adds request metadata: the default model, the
//!    sampling temperature, the output-token budget and the JSON shape the
//!    reply is expected to follow.
//!
//! ```rust
//! use cropwise_core::template::{IntoPrompt, PromptTemplate};
//! use cropwise_core::generic::{GenericMessage, GenericRole};
//! use cropwise_core::model::{GroqModel, Model};
//! use schemars::JsonSchema;
//!
//! #[derive(JsonSchema)]
//! struct Hello { greeting: String }
//!
//! struct HelloPrompt;
//!
//! impl IntoPrompt for HelloPrompt {
//!     type Message = GenericMessage;
//!     fn into_prompt(self) -> Vec<Self::Message> {
//!         vec![GenericMessage::new("Say hello!".into(), GenericRole::User)]
//!     }
//! }
//!
//! impl PromptTemplate for HelloPrompt {
//!     type Output = Hello;
//!     const MODEL: Model = Model::Groq(GroqModel::Llama3_1_8bInstant);
//! }
//!
//! assert_eq!(HelloPrompt::TEMPERATURE, 0.7);
//! ```
use schemars::JsonSchema;

use crate::model::Model;

/// High-level description of a prompt.
///
/// Implement this trait **in addition** to [`IntoPrompt`].  The constants are
/// defaults; callers may still override them per request through
/// [`crate::provider::ChatCompleteParameters`].
pub trait PromptTemplate: IntoPrompt {
    /// Shape of the JSON document the model is asked to return.
    type Output: JsonSchema;

    /// Logical model identifier.  The back-end maps this to its own naming
    /// scheme (`"llama-3.1-8b-instant"`, `"gpt-4o-mini"`, …).
    const MODEL: Model;

    const TEMPERATURE: f64 = 0.7;

    /// Upper bound on generated tokens.
    const MAX_TOKENS: u32 = 1500;
}

/// Converts a value into a series of chat messages.
///
/// Making the `Message` type an **associated type** lets a back-end require
/// its own richer struct without resorting to dynamic dispatch.
pub trait IntoPrompt {
    /// Chat message representation emitted by the prompt.
    type Message: Send + Sync + 'static;

    /// Consume `self` and return **all** messages in the desired order.
    fn into_prompt(self) -> Vec<Self::Message>;
}

/// A single [`crate::generic::GenericMessage`] is already a prompt.
impl IntoPrompt for crate::generic::GenericMessage {
    type Message = crate::generic::GenericMessage;

    fn into_prompt(self) -> Vec<Self::Message> {
        vec![self]
    }
}
